use super::xml::{Document, CAPS_NS};

//RFC covered: RFC4825 section 12 (XCAP server capabilities)

/// 12.2.  Application Unique ID (AUID) of the xcap-caps document
///
/// The capabilities document is a global document, always found at
/// `xcap-caps/global/index`.
///
/// <xs:element name="xcap-caps">
///   <xs:complexType>
///     <xs:sequence>
///       <xs:element name="auids"> (auid+)
///       <xs:element name="extensions" minOccurs="0"> (extension*)
///       <xs:element name="namespaces"> (namespace+)
///       <xs:any namespace="##other" minOccurs="0" maxOccurs="unbounded"/>
///     </xs:sequence>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct XCapCaps {
    pub auids: Vec<Auid>,
    pub extensions: Vec<Extension>,
    pub namespaces: Vec<Namespace>,
}
impl XCapCaps {
    /// Is this application usage served by the XCAP server?
    pub fn supports(&self, auid: &str) -> bool {
        self.auids.iter().any(|a| a.0 == auid)
    }
}
impl Document for XCapCaps {
    const NAMESPACES: &'static [(&'static str, &'static str)] = &[("xc", CAPS_NS)];
}

/// An application usage, eg. `resource-lists` or `pres-rules`
#[derive(Debug, PartialEq, Clone)]
pub struct Auid(pub String);

/// An XCAP protocol extension supported by the server
#[derive(Debug, PartialEq, Clone)]
pub struct Extension(pub String);

/// A namespace the server understands in documents
#[derive(Debug, PartialEq, Clone)]
pub struct Namespace(pub String);
