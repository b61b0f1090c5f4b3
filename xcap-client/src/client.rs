use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hyper::Uri;

use xcap_xml::capstypes::XCapCaps;
use xcap_xml::xml::{self, Document};

use crate::base::{BaseHttpXCapClient, HttpXCapClient};
use crate::error::ClientError;
use crate::pres_content::PRES_CONTENT_AUID;
use crate::pres_rules::PRES_RULES_AUID;
use crate::report::ErrorReporter;
use crate::resource::{XCapResource, XCapResourceId};
use crate::resource_lists::RESOURCE_LISTS_AUID;
use crate::response::XCapHttpResponse;
use crate::transport::HttpTransport;
use crate::xcap_caps::XCapCapsClient;

/// The full XCAP client: raw resource access plus the typed document
/// clients. The server capabilities are loaded when connecting.
pub struct XCapClient {
    base: BaseHttpXCapClient,
    caps: Option<XCapCaps>,
}

impl Default for XCapClient {
    fn default() -> Self {
        Self::new()
    }
}

impl XCapClient {
    pub fn new() -> Self {
        Self::from_base(BaseHttpXCapClient::new())
    }

    pub fn with_collaborators(
        transport: Arc<dyn HttpTransport>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self::from_base(BaseHttpXCapClient::with_collaborators(transport, reporter))
    }

    pub fn from_base(base: BaseHttpXCapClient) -> Self {
        Self { base, caps: None }
    }

    pub fn resource_uri(&self, id: &XCapResourceId) -> Result<Uri, ClientError> {
        self.base.resource_uri(id)
    }

    /// Capabilities loaded by the last successful connect
    pub fn caps(&self) -> Option<&XCapCaps> {
        self.caps.as_ref()
    }

    pub fn is_resource_lists_supported(&self) -> bool {
        self.supports(RESOURCE_LISTS_AUID)
    }

    pub fn is_pres_rules_supported(&self) -> bool {
        self.supports(PRES_RULES_AUID)
    }

    pub fn is_pres_content_supported(&self) -> bool {
        self.supports(PRES_CONTENT_AUID)
    }

    fn supports(&self, auid: &str) -> bool {
        self.caps.as_ref().map_or(false, |c| c.supports(auid))
    }

    /// Fill a document path template: `{user}` is the user address,
    /// `{name}` the name of the document when it has one
    pub(crate) fn document_id(
        &self,
        template: &str,
        name: Option<&str>,
    ) -> Result<XCapResourceId, ClientError> {
        let user = self.base.user_address().ok_or(ClientError::NotConnected)?;
        let mut document = template.replace("{user}", user);
        if let Some(name) = name {
            document = document.replace("{name}", name);
        }
        XCapResourceId::new(document)
    }

    /// 200 gives the document, 404 gives nothing
    pub(crate) async fn get_document<T: Document>(
        &mut self,
        id: &XCapResourceId,
        what: &'static str,
    ) -> Result<Option<T>, ClientError> {
        let response = self.base.get(id).await?;
        match response.http_code() {
            200 => {
                let content = response.content().unwrap_or_default();
                xml::deserialize::<T>(content)
                    .map(Some)
                    .map_err(|source| ClientError::Document { what, source })
            }
            404 => Ok(None),
            _ => Err(self.rejected(&response)),
        }
    }

    pub(crate) async fn put_document<T: Document + Sync>(
        &mut self,
        id: &XCapResourceId,
        doc: &T,
        content_type: &str,
        what: &'static str,
    ) -> Result<(), ClientError> {
        let bytes = xml::serialize(doc).map_err(|source| ClientError::Serialize { what, source })?;
        let content = String::from_utf8(bytes).map_err(|e| ClientError::Serialize {
            what,
            source: quick_xml::Error::NonDecodable(Some(e.utf8_error())),
        })?;

        let resource = XCapResource::new(id.clone(), content, content_type);
        let response = self.base.put(&resource).await?;
        match response.http_code() {
            200 | 201 => Ok(()),
            _ => Err(self.rejected(&response)),
        }
    }

    /// Deleting a missing document is not an error
    pub(crate) async fn delete_document(&mut self, id: &XCapResourceId) -> Result<(), ClientError> {
        let response = self.base.delete(id).await?;
        match response.http_code() {
            200 | 404 => Ok(()),
            _ => Err(self.rejected(&response)),
        }
    }

    pub(crate) fn rejected(&self, response: &XCapHttpResponse) -> ClientError {
        ClientError::Rejected {
            status: response.http_code(),
            message: self.base.get_xcap_error_message(response),
        }
    }
}

#[async_trait]
impl HttpXCapClient for XCapClient {
    async fn connect(
        &mut self,
        server_uri: &str,
        user_address: &str,
        username: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        self.base
            .connect(server_uri, user_address, username, password)
            .await?;

        match self.get_xcap_caps().await {
            Ok(caps) => {
                tracing::debug!(auids=?caps.auids, "XCAP server capabilities");
                self.caps = Some(caps);
                Ok(())
            }
            Err(e) => {
                tracing::error!(err=%e, "unable to load the XCAP server capabilities");
                self.disconnect();
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.base.disconnect();
        self.caps = None;
    }

    fn is_connected(&self) -> bool {
        self.base.is_connected()
    }

    fn user_address(&self) -> Option<&str> {
        self.base.user_address()
    }

    async fn get(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError> {
        self.base.get(id).await
    }

    async fn get_uri(&mut self, uri: &Uri) -> Result<XCapHttpResponse, ClientError> {
        self.base.get_uri(uri).await
    }

    async fn put(&mut self, resource: &XCapResource) -> Result<XCapHttpResponse, ClientError> {
        self.base.put(resource).await
    }

    async fn delete(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError> {
        self.base.delete(id).await
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.base.set_timeout(timeout)
    }
}
