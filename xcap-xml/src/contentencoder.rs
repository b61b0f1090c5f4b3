use quick_xml::events::Event;
use quick_xml::Error as QError;

use super::contenttypes::*;
use super::xml::{IWrite, QWrite, Writer};

impl QWrite for PresContent {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_pc_element("content");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(mime_type) = &self.mime_type {
            let elem = xml.create_pc_element("mime-type");
            xml.text_element(elem, mime_type)?;
        }
        if let Some(encoding) = &self.encoding {
            let elem = xml.create_pc_element("encoding");
            xml.text_element(elem, encoding)?;
        }
        if let Some(description) = &self.description {
            let elem = xml.create_pc_element("description");
            xml.text_element(elem, description)?;
        }
        let data = xml.create_pc_element("data");
        xml.text_element(data, &self.data)?;
        xml.q.write_event(Event::End(end))
    }
}
