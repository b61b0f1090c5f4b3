use base64::Engine;

use super::error::ParsingError;
use super::xml::{Document, PC_NS};

//OMA-TS-Presence_SIMPLE_Content_XDM: the presence content document

/// A piece of content published next to the presence document,
/// in practice the avatar (status icon) of the user.
///
/// <xs:element name="content">
///   <xs:complexType>
///     <xs:sequence>
///       <xs:element name="mime-type" type="xs:string" minOccurs="0"/>
///       <xs:element name="encoding" type="xs:string" minOccurs="0"/>
///       <xs:element name="description" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
///       <xs:element name="data" type="xs:string"/>
///     </xs:sequence>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PresContent {
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub description: Option<String>,
    pub data: String,
}
impl Document for PresContent {
    const NAMESPACES: &'static [(&'static str, &'static str)] = &[("pc", PC_NS)];
}

pub const BASE64_ENCODING: &str = "base64";

impl PresContent {
    /// Wrap raw image bytes, base64 encoded
    pub fn from_image(mime_type: &str, image: &[u8]) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            encoding: Some(BASE64_ENCODING.into()),
            description: None,
            data: base64::engine::general_purpose::STANDARD.encode(image),
        }
    }

    /// Raw bytes of the data. Only base64 is defined, the encoding may be
    /// omitted. Servers are free to wrap the payload, whitespaces are ignored.
    pub fn decode_data(&self) -> Result<Vec<u8>, ParsingError> {
        match self.encoding.as_deref() {
            None | Some(BASE64_ENCODING) => (),
            Some(_) => return Err(ParsingError::InvalidValue),
        };
        let compact: String = self.data.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
    }
}
