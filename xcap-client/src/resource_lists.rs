use async_trait::async_trait;

use xcap_xml::rltypes::ResourceLists;
use xcap_xml::xml::RL_NS;

use crate::base::HttpXCapClient;
use crate::client::XCapClient;
use crate::error::ClientError;

pub const RESOURCE_LISTS_AUID: &str = "resource-lists";
pub const RESOURCE_LISTS_DOCUMENT: &str = "resource-lists/users/{user}/index";
pub const RESOURCE_LISTS_CONTENT_TYPE: &str = "application/resource-lists+xml";

/// RFC4826, the contact list of the user
#[async_trait]
pub trait ResourceListsClient: HttpXCapClient {
    const DOCUMENT_FORMAT: &'static str = RESOURCE_LISTS_DOCUMENT;
    const CONTENT_TYPE: &'static str = RESOURCE_LISTS_CONTENT_TYPE;
    const NAMESPACE: &'static str = RL_NS;

    /// A missing document is an empty one
    async fn get_resource_lists(&mut self) -> Result<ResourceLists, ClientError>;

    /// Putting an empty document deletes it
    async fn put_resource_lists(&mut self, lists: &ResourceLists) -> Result<(), ClientError>;

    async fn delete_resource_lists(&mut self) -> Result<(), ClientError>;
}

#[async_trait]
impl ResourceListsClient for XCapClient {
    async fn get_resource_lists(&mut self) -> Result<ResourceLists, ClientError> {
        let id = self.document_id(RESOURCE_LISTS_DOCUMENT, None)?;
        let lists = self
            .get_document::<ResourceLists>(&id, "resource-lists")
            .await?;
        Ok(lists.unwrap_or_default())
    }

    async fn put_resource_lists(&mut self, lists: &ResourceLists) -> Result<(), ClientError> {
        if lists.is_empty() {
            return self.delete_resource_lists().await;
        }
        let id = self.document_id(RESOURCE_LISTS_DOCUMENT, None)?;
        self.put_document(&id, lists, RESOURCE_LISTS_CONTENT_TYPE, "resource-lists")
            .await
    }

    async fn delete_resource_lists(&mut self) -> Result<(), ClientError> {
        let id = self.document_id(RESOURCE_LISTS_DOCUMENT, None)?;
        self.delete_document(&id).await
    }
}
