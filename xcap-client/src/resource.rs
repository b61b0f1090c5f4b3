use std::fmt;

use crate::error::ClientError;

/// Separates the document selector from the node selector in a resource path
pub const NODE_SEPARATOR: &str = "/~~";

/// The path of an XCAP resource relative to the XCAP root: a document
/// selector, optionally followed by a node selector pointing inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XCapResourceId {
    document: String,
    node: Option<String>,
}

impl XCapResourceId {
    pub fn new(document: impl Into<String>) -> Result<Self, ClientError> {
        let document = document.into();
        if document.is_empty() {
            return Err(ClientError::InvalidArgument(
                "the document selector of a resource can't be empty".into(),
            ));
        }
        Ok(Self {
            document,
            node: None,
        })
    }

    /// An empty node is the same as no node. The node is stored with a leading `/`.
    pub fn with_node(document: impl Into<String>, node: impl Into<String>) -> Result<Self, ClientError> {
        let mut id = Self::new(document)?;
        let node = node.into();
        id.node = match node.as_str() {
            "" => None,
            n if n.starts_with('/') => Some(node),
            n => Some(format!("/{}", n)),
        };
        Ok(id)
    }

    /// Inverse of the `Display` implementation
    pub fn parse(value: &str) -> Result<Self, ClientError> {
        match value.split_once(NODE_SEPARATOR) {
            Some((document, node)) => Self::with_node(document, node),
            None => Self::new(value),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }
}

impl fmt::Display for XCapResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            None => write!(f, "{}", self.document),
            Some(node) => write!(f, "{}{}{}", self.document, NODE_SEPARATOR, node),
        }
    }
}

/// A resource to PUT on the server
#[derive(Debug, Clone, PartialEq)]
pub struct XCapResource {
    id: XCapResourceId,
    content: String,
    content_type: String,
    if_match: Option<String>,
}

impl XCapResource {
    pub fn new(id: XCapResourceId, content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            content_type: content_type.into(),
            if_match: None,
        }
    }

    /// Only replace the resource if its current entity tag is `etag`
    pub fn with_if_match(self, etag: impl Into<String>) -> Self {
        Self {
            if_match: Some(etag.into()),
            ..self
        }
    }

    pub fn id(&self) -> &XCapResourceId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn if_match(&self) -> Option<&str> {
        self.if_match.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_only() {
        let id = XCapResourceId::new("resource-lists/users/sip:alice@example.com/index").unwrap();
        assert_eq!(id.to_string(), "resource-lists/users/sip:alice@example.com/index");
        assert_eq!(id.node(), None);

        let empty_node = XCapResourceId::with_node("pres-rules/users/sip:a@b/presrules", "").unwrap();
        assert_eq!(empty_node, XCapResourceId::new("pres-rules/users/sip:a@b/presrules").unwrap());
    }

    #[test]
    fn node_selector() {
        let with_slash = XCapResourceId::with_node("rl/index", "/resource-lists/list").unwrap();
        let without_slash = XCapResourceId::with_node("rl/index", "resource-lists/list").unwrap();
        assert_eq!(with_slash.to_string(), "rl/index/~~/resource-lists/list");
        assert_eq!(with_slash, without_slash);

        let parsed = XCapResourceId::parse(&with_slash.to_string()).unwrap();
        assert_eq!(parsed, with_slash);
        assert_eq!(parsed.document(), "rl/index");
        assert_eq!(parsed.node(), Some("/resource-lists/list"));
    }

    #[test]
    fn empty_document() {
        assert!(matches!(
            XCapResourceId::new(""),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            XCapResourceId::parse("/~~/resource-lists"),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn conditional_resource() {
        let id = XCapResourceId::new("xcap-caps/global/index").unwrap();
        let resource = XCapResource::new(id.clone(), "<a/>", "application/xml");
        assert_eq!(resource.if_match(), None);

        let resource = resource.with_if_match("\"abc123\"");
        assert_eq!(resource.if_match(), Some("\"abc123\""));
        assert_eq!(resource.id(), &id);
        assert_eq!(resource.content(), "<a/>");
    }
}
