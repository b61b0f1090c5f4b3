use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::Uri;

use xcap_xml::contenttypes::PresContent;
use xcap_xml::xml::PC_NS;

use crate::base::HttpXCapClient;
use crate::client::XCapClient;
use crate::error::ClientError;

pub const PRES_CONTENT_AUID: &str = "org.openmobilealliance.pres-content";
pub const PRES_CONTENT_DOCUMENT: &str = "oma_status-icon/users/{user}/{name}";
pub const PRES_CONTENT_CONTENT_TYPE: &str = "application/vnd.oma.pres-content+xml";

/// OMA presence content, the avatar of the user
#[async_trait]
pub trait PresContentClient: HttpXCapClient {
    const DOCUMENT_FORMAT: &'static str = PRES_CONTENT_DOCUMENT;
    const CONTENT_TYPE: &'static str = PRES_CONTENT_CONTENT_TYPE;
    const NAMESPACE: &'static str = PC_NS;

    async fn get_pres_content(&mut self, name: &str) -> Result<Option<PresContent>, ClientError>;

    async fn put_pres_content(&mut self, content: &PresContent, name: &str) -> Result<(), ClientError>;

    async fn delete_pres_content(&mut self, name: &str) -> Result<(), ClientError>;

    /// Raw bytes of an image found at an absolute URI
    async fn get_image(&mut self, uri: &str) -> Result<Bytes, ClientError>;
}

#[async_trait]
impl PresContentClient for XCapClient {
    async fn get_pres_content(&mut self, name: &str) -> Result<Option<PresContent>, ClientError> {
        let id = self.document_id(PRES_CONTENT_DOCUMENT, Some(name))?;
        self.get_document::<PresContent>(&id, "pres-content").await
    }

    async fn put_pres_content(&mut self, content: &PresContent, name: &str) -> Result<(), ClientError> {
        let id = self.document_id(PRES_CONTENT_DOCUMENT, Some(name))?;
        self.put_document(&id, content, PRES_CONTENT_CONTENT_TYPE, "pres-content")
            .await
    }

    async fn delete_pres_content(&mut self, name: &str) -> Result<(), ClientError> {
        let id = self.document_id(PRES_CONTENT_DOCUMENT, Some(name))?;
        self.delete_document(&id).await
    }

    async fn get_image(&mut self, uri: &str) -> Result<Bytes, ClientError> {
        let uri = uri
            .parse::<Uri>()
            .map_err(|e| ClientError::InvalidArgument(format!("{} is not a valid URI: {}", uri, e)))?;
        let response = self.get_uri(&uri).await?;
        match response.http_code() {
            200 => Ok(Bytes::copy_from_slice(response.content().unwrap_or_default())),
            _ => Err(self.rejected(&response)),
        }
    }
}
