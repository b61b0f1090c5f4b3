use async_trait::async_trait;

use xcap_xml::policytypes::Ruleset;
use xcap_xml::xml::PR_NS;

use crate::base::HttpXCapClient;
use crate::client::XCapClient;
use crate::error::ClientError;

pub const PRES_RULES_AUID: &str = "pres-rules";
pub const PRES_RULES_DOCUMENT: &str = "pres-rules/users/{user}/presrules";
pub const PRES_RULES_CONTENT_TYPE: &str = "application/auth-policy+xml";

/// RFC5025, who may subscribe to the presence of the user
#[async_trait]
pub trait PresRulesClient: HttpXCapClient {
    const DOCUMENT_FORMAT: &'static str = PRES_RULES_DOCUMENT;
    const CONTENT_TYPE: &'static str = PRES_RULES_CONTENT_TYPE;
    const NAMESPACE: &'static str = PR_NS;

    /// A missing document is an empty ruleset
    async fn get_pres_rules(&mut self) -> Result<Ruleset, ClientError>;

    /// Putting an empty ruleset deletes the document
    async fn put_pres_rules(&mut self, ruleset: &Ruleset) -> Result<(), ClientError>;

    async fn delete_pres_rules(&mut self) -> Result<(), ClientError>;
}

#[async_trait]
impl PresRulesClient for XCapClient {
    async fn get_pres_rules(&mut self) -> Result<Ruleset, ClientError> {
        let id = self.document_id(PRES_RULES_DOCUMENT, None)?;
        let ruleset = self.get_document::<Ruleset>(&id, "pres-rules").await?;
        Ok(ruleset.unwrap_or_default())
    }

    async fn put_pres_rules(&mut self, ruleset: &Ruleset) -> Result<(), ClientError> {
        if ruleset.is_empty() {
            return self.delete_pres_rules().await;
        }
        let id = self.document_id(PRES_RULES_DOCUMENT, None)?;
        self.put_document(&id, ruleset, PRES_RULES_CONTENT_TYPE, "pres-rules")
            .await
    }

    async fn delete_pres_rules(&mut self) -> Result<(), ClientError> {
        let id = self.document_id(PRES_RULES_DOCUMENT, None)?;
        self.delete_document(&id).await
    }
}
