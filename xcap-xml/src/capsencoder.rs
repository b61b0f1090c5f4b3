use quick_xml::events::Event;
use quick_xml::Error as QError;

use super::capstypes::*;
use super::xml::{IWrite, QWrite, Writer};

impl QWrite for XCapCaps {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_caps_element("xcap-caps");
        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;

        let auids = xml.create_caps_element("auids");
        xml.q.write_event(Event::Start(auids.clone()))?;
        for auid in self.auids.iter() {
            auid.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(auids.to_end()))?;

        if !self.extensions.is_empty() {
            let extensions = xml.create_caps_element("extensions");
            xml.q.write_event(Event::Start(extensions.clone()))?;
            for extension in self.extensions.iter() {
                extension.qwrite(xml)?;
            }
            xml.q.write_event(Event::End(extensions.to_end()))?;
        }

        let namespaces = xml.create_caps_element("namespaces");
        xml.q.write_event(Event::Start(namespaces.clone()))?;
        for namespace in self.namespaces.iter() {
            namespace.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(namespaces.to_end()))?;

        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Auid {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_caps_element("auid");
        xml.text_element(start, &self.0)
    }
}

impl QWrite for Extension {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_caps_element("extension");
        xml.text_element(start, &self.0)
    }
}

impl QWrite for Namespace {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_caps_element("namespace");
        xml.text_element(start, &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::CAPS_NS;

    fn serialize(elem: &impl QWrite) -> String {
        let q = quick_xml::writer::Writer::new_with_indent(Vec::new(), b' ', 4);
        let ns_to_apply = vec![("xmlns:xc".into(), CAPS_NS.into())];
        let mut writer = Writer { q, ns_to_apply };

        elem.qwrite(&mut writer).expect("xml serialization");
        String::from_utf8(writer.q.into_inner()).unwrap()
    }

    #[test]
    fn caps_without_extensions() {
        let got = serialize(&XCapCaps {
            auids: vec![
                Auid("xcap-caps".into()),
                Auid("resource-lists".into()),
            ],
            extensions: vec![],
            namespaces: vec![Namespace("urn:ietf:params:xml:ns:resource-lists".into())],
        });

        let expected = r#"<xc:xcap-caps xmlns:xc="urn:ietf:params:xml:ns:xcap-caps">
    <xc:auids>
        <xc:auid>xcap-caps</xc:auid>
        <xc:auid>resource-lists</xc:auid>
    </xc:auids>
    <xc:namespaces>
        <xc:namespace>urn:ietf:params:xml:ns:resource-lists</xc:namespace>
    </xc:namespaces>
</xc:xcap-caps>"#;

        assert_eq!(&got, expected, "\n---GOT---\n{got}\n---EXP---\n{expected}\n");
    }
}
