use super::xml::{Document, ERR_NS};

//RFC covered: RFC4825 section 11 (XCAP error document)

/// 11.  Detailed Conflict Reports
///
/// When the server answers a request with a 409, it may describe the
/// conflict in a body of type `application/xcap-error+xml`. The root element
/// holds exactly one error condition.
///
/// <xs:element name="xcap-error">
///   <xs:complexType>
///     <xs:sequence>
///       <xs:element ref="xcap-error:error-element"/>
///     </xs:sequence>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone)]
pub struct XCapError(pub ErrorCondition);
impl XCapError {
    /// The human readable phrase of the condition, if the server sent one
    pub fn phrase(&self) -> Option<&str> {
        self.0.phrase.as_deref()
    }
}
impl Document for XCapError {
    const NAMESPACES: &'static [(&'static str, &'static str)] = &[("xe", ERR_NS)];
}

/// Every error element accepts an optional `phrase` attribute,
/// "a textual description of the error, meant for human consumption".
#[derive(Debug, PartialEq, Clone)]
pub struct ErrorCondition {
    pub kind: ErrorKind,
    pub phrase: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ErrorKind {
    /// The body of a PUT was not a well-formed XML fragment
    NotXmlFrag,
    /// The parent of the element to create does not exist.
    /// `ancestor` is the closest existing ancestor, as an HTTP URI.
    NoParent { ancestor: Option<String> },
    /// The element cannot be inserted at that place
    CannotInsert,
    /// The body is not a valid attribute value
    NotXmlAttValue,
    /// A uniqueness constraint of the application usage is violated
    UniquenessFailure(Vec<Exists>),
    NotWellFormed,
    ConstraintFailure,
    SchemaValidationError,
    NotUtf8,
    /// The deletion would leave the document invalid
    CannotDelete,
}
impl ErrorKind {
    pub const NAMES: [&'static str; 10] = [
        "not-xml-frag",
        "no-parent",
        "cannot-insert",
        "not-xml-att-value",
        "uniqueness-failure",
        "not-well-formed",
        "constraint-failure",
        "schema-validation-error",
        "not-utf-8",
        "cannot-delete",
    ];

    /// Local name of the element carrying this condition
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotXmlFrag => "not-xml-frag",
            Self::NoParent { .. } => "no-parent",
            Self::CannotInsert => "cannot-insert",
            Self::NotXmlAttValue => "not-xml-att-value",
            Self::UniquenessFailure(_) => "uniqueness-failure",
            Self::NotWellFormed => "not-well-formed",
            Self::ConstraintFailure => "constraint-failure",
            Self::SchemaValidationError => "schema-validation-error",
            Self::NotUtf8 => "not-utf-8",
            Self::CannotDelete => "cannot-delete",
        }
    }
}

/// <xs:element name="exists">
///   <xs:complexType>
///     <xs:sequence minOccurs="0">
///       <xs:element name="alt-value" type="xs:string" maxOccurs="unbounded"/>
///     </xs:sequence>
///     <xs:attribute name="field" type="xs:string" use="required"/>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone)]
pub struct Exists {
    pub field: String,
    pub alt_values: Vec<AltValue>,
}

/// A value the client may use instead of the one that collided
#[derive(Debug, PartialEq, Clone)]
pub struct AltValue(pub String);
