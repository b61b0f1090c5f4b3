use async_trait::async_trait;

use xcap_xml::capstypes::XCapCaps;
use xcap_xml::xml::CAPS_NS;

use crate::base::HttpXCapClient;
use crate::client::XCapClient;
use crate::error::ClientError;
use crate::resource::XCapResourceId;

pub const XCAP_CAPS_DOCUMENT: &str = "xcap-caps/global/index";
pub const XCAP_CAPS_CONTENT_TYPE: &str = "application/xcap-caps+xml";

/// RFC4825 section 12, what the server supports
#[async_trait]
pub trait XCapCapsClient: HttpXCapClient {
    const DOCUMENT_FORMAT: &'static str = XCAP_CAPS_DOCUMENT;
    const CONTENT_TYPE: &'static str = XCAP_CAPS_CONTENT_TYPE;
    const NAMESPACE: &'static str = CAPS_NS;

    async fn get_xcap_caps(&mut self) -> Result<XCapCaps, ClientError>;
}

#[async_trait]
impl XCapCapsClient for XCapClient {
    async fn get_xcap_caps(&mut self) -> Result<XCapCaps, ClientError> {
        let id = XCapResourceId::new(XCAP_CAPS_DOCUMENT)?;
        let response = self.get(&id).await?;
        match response.http_code() {
            200 => xcap_xml::xml::deserialize::<XCapCaps>(response.content().unwrap_or_default())
                .map_err(|source| ClientError::Document {
                    what: "xcap-caps",
                    source,
                }),
            _ => Err(self.rejected(&response)),
        }
    }
}
