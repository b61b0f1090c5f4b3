use super::capstypes::*;
use super::error::ParsingError;
use super::xml::{IRead, QRead, Reader, CAPS_URN};

impl QRead<XCapCaps> for XCapCaps {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CAPS_URN, "xcap-caps")?;
        let (mut auids, mut extensions, mut namespaces) = (None, Vec::new(), Vec::new());
        loop {
            if xml.maybe_open(CAPS_URN, "auids")?.is_some() {
                auids = Some(xml.collect::<Auid>()?);
                xml.close()?;
                continue;
            }
            if xml.maybe_open(CAPS_URN, "extensions")?.is_some() {
                extensions = xml.collect::<Extension>()?;
                xml.close()?;
                continue;
            }
            if xml.maybe_open(CAPS_URN, "namespaces")?.is_some() {
                namespaces = xml.collect::<Namespace>()?;
                xml.close()?;
                continue;
            }
            if !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        let auids = auids.ok_or(ParsingError::MissingChild)?;
        Ok(XCapCaps {
            auids,
            extensions,
            namespaces,
        })
    }
}

impl QRead<Auid> for Auid {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CAPS_URN, "auid")?;
        let auid = xml.tag_string()?;
        xml.close()?;
        Ok(Auid(auid.trim().into()))
    }
}

impl QRead<Extension> for Extension {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CAPS_URN, "extension")?;
        let extension = xml.tag_string()?;
        xml.close()?;
        Ok(Extension(extension.trim().into()))
    }
}

impl QRead<Namespace> for Namespace {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CAPS_URN, "namespace")?;
        let namespace = xml.tag_string()?;
        xml.close()?;
        Ok(Namespace(namespace.trim().into()))
    }
}
