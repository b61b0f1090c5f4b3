use super::contenttypes::*;
use super::error::ParsingError;
use super::xml::{IRead, QRead, Reader, PC_URN};

impl QRead<PresContent> for PresContent {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(PC_URN, "content")?;
        let mut content = PresContent::default();
        let mut data = None;
        loop {
            if xml.maybe_open(PC_URN, "mime-type")?.is_some() {
                content.mime_type = Some(xml.tag_string()?.trim().into());
                xml.close()?;
                continue;
            }
            if xml.maybe_open(PC_URN, "encoding")?.is_some() {
                content.encoding = Some(xml.tag_string()?.trim().into());
                xml.close()?;
                continue;
            }
            if xml.maybe_open(PC_URN, "description")?.is_some() {
                // several descriptions may exist, one per language, the first one wins
                let description = xml.tag_string()?.trim().to_string();
                content.description.get_or_insert(description);
                xml.close()?;
                continue;
            }
            if xml.maybe_open(PC_URN, "data")?.is_some() {
                data = Some(xml.tag_string()?);
                xml.close()?;
                continue;
            }
            if !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        content.data = data.ok_or(ParsingError::MissingChild)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::deserialize;

    #[test]
    fn wrapped_base64() {
        let src = r#"<?xml version="1.0" encoding="UTF-8"?>
<content xmlns="urn:oma:xml:prs:pres-content">
  <mime-type>image/png</mime-type>
  <encoding>base64</encoding>
  <description xml:lang="en">My icon</description>
  <description xml:lang="fr">Mon icone</description>
  <data>
    iVBO
    Rw==
  </data>
</content>"#;

        let got = deserialize::<PresContent>(src.as_bytes()).unwrap();
        assert_eq!(got.mime_type.as_deref(), Some("image/png"));
        assert_eq!(got.description.as_deref(), Some("My icon"));
        assert_eq!(got.decode_data().unwrap(), b"\x89PNG".to_vec());
    }

    #[test]
    fn data_is_required() {
        let src = r#"<content xmlns="urn:oma:xml:prs:pres-content"><mime-type>image/png</mime-type></content>"#;
        assert!(matches!(
            deserialize::<PresContent>(src.as_bytes()),
            Err(ParsingError::MissingChild)
        ));
    }

    #[test]
    fn unsupported_encoding() {
        let content = PresContent {
            encoding: Some("quoted-printable".into()),
            data: "abc".into(),
            ..PresContent::default()
        };
        assert!(matches!(content.decode_data(), Err(ParsingError::InvalidValue)));
    }
}
