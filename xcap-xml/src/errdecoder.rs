use super::error::ParsingError;
use super::errtypes::*;
use super::xml::{IRead, QRead, Reader, ERR_URN};

impl QRead<XCapError> for XCapError {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(ERR_URN, "xcap-error")?;
        let mut condition = None;
        loop {
            let mut dirty = false;
            xml.maybe_read::<ErrorCondition>(&mut condition, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        condition.map(XCapError).ok_or(ParsingError::MissingChild)
    }
}

impl QRead<ErrorCondition> for ErrorCondition {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        let mut name = None;
        for candidate in ErrorKind::NAMES {
            if xml.maybe_open(ERR_URN, candidate)?.is_some() {
                name = Some(candidate);
                break;
            }
        }
        let name = name.ok_or(ParsingError::Recoverable)?;
        let phrase = xml.prev_attr("phrase");

        let kind = match name {
            "not-xml-frag" => ErrorKind::NotXmlFrag,
            "no-parent" => {
                let mut ancestor = None;
                loop {
                    if xml.maybe_open(ERR_URN, "ancestor")?.is_some() {
                        ancestor = Some(xml.tag_string()?.trim().to_string());
                        xml.close()?;
                        continue;
                    }
                    if !xml.skip_unknown()? {
                        break;
                    }
                }
                ErrorKind::NoParent { ancestor }
            }
            "cannot-insert" => ErrorKind::CannotInsert,
            "not-xml-att-value" => ErrorKind::NotXmlAttValue,
            "uniqueness-failure" => ErrorKind::UniquenessFailure(xml.collect::<Exists>()?),
            "not-well-formed" => ErrorKind::NotWellFormed,
            "constraint-failure" => ErrorKind::ConstraintFailure,
            "schema-validation-error" => ErrorKind::SchemaValidationError,
            "not-utf-8" => ErrorKind::NotUtf8,
            "cannot-delete" => ErrorKind::CannotDelete,
            _ => return Err(ParsingError::InvalidValue),
        };
        xml.close()?;

        Ok(ErrorCondition { kind, phrase })
    }
}

impl QRead<Exists> for Exists {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(ERR_URN, "exists")?;
        let field = xml.prev_attr("field").ok_or(ParsingError::MissingAttribute)?;
        let alt_values = xml.collect::<AltValue>()?;
        xml.close()?;
        Ok(Exists { field, alt_values })
    }
}

impl QRead<AltValue> for AltValue {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(ERR_URN, "alt-value")?;
        let value = xml.tag_string()?;
        xml.close()?;
        Ok(AltValue(value.trim().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::deserialize;

    #[test]
    fn rfc_uniqueness_failure() {
        let src = r#"<?xml version="1.0" encoding="UTF-8"?>
<xcap-error xmlns="urn:ietf:params:xml:ns:xcap-error">
  <uniqueness-failure phrase="Entry already exists">
    <exists field="rl:list/rl:entry/@uri">
      <alt-value>sip:bob2@example.com</alt-value>
    </exists>
  </uniqueness-failure>
</xcap-error>
"#;

        let got = deserialize::<XCapError>(src.as_bytes()).unwrap();
        assert_eq!(got.phrase(), Some("Entry already exists"));
        assert_eq!(
            got.0.kind,
            ErrorKind::UniquenessFailure(vec![Exists {
                field: "rl:list/rl:entry/@uri".into(),
                alt_values: vec![AltValue("sip:bob2@example.com".into())],
            }])
        );
    }

    #[test]
    fn no_parent_with_ancestor() {
        let src = r#"<xcap-error xmlns="urn:ietf:params:xml:ns:xcap-error">
  <no-parent><ancestor>http://xcap.example.com/root/rl/users/sip:joe@example.com/index</ancestor></no-parent>
</xcap-error>"#;

        let got = deserialize::<XCapError>(src.as_bytes()).unwrap();
        assert_eq!(got.phrase(), None);
        assert_eq!(
            got.0.kind,
            ErrorKind::NoParent {
                ancestor: Some(
                    "http://xcap.example.com/root/rl/users/sip:joe@example.com/index".into()
                )
            }
        );
    }

    #[test]
    fn self_closed_condition_and_unknown_siblings() {
        let src = r#"<e:xcap-error xmlns:e="urn:ietf:params:xml:ns:xcap-error" xmlns:x="urn:example:ext">
  <x:vendor-info>ignored</x:vendor-info>
  <e:cannot-delete phrase="Cannot remove the last list"/>
</e:xcap-error>"#;

        let got = deserialize::<XCapError>(src.as_bytes()).unwrap();
        assert_eq!(got.0.kind, ErrorKind::CannotDelete);
        assert_eq!(got.phrase(), Some("Cannot remove the last list"));
    }

    #[test]
    fn missing_condition() {
        let src = r#"<xcap-error xmlns="urn:ietf:params:xml:ns:xcap-error"></xcap-error>"#;
        assert!(matches!(
            deserialize::<XCapError>(src.as_bytes()),
            Err(ParsingError::MissingChild)
        ));
    }
}
