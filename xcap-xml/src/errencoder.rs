use quick_xml::events::Event;
use quick_xml::Error as QError;

use super::errtypes::*;
use super::xml::{IWrite, QWrite, Writer};

impl QWrite for XCapError {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_err_element("xcap-error");
        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        self.0.qwrite(xml)?;
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for ErrorCondition {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_err_element(self.kind.name());
        if let Some(phrase) = &self.phrase {
            start.push_attribute(("phrase", phrase.as_str()));
        }

        match &self.kind {
            ErrorKind::NoParent {
                ancestor: Some(ancestor),
            } => {
                xml.q.write_event(Event::Start(start.clone()))?;
                let elem = xml.create_err_element("ancestor");
                xml.text_element(elem, ancestor)?;
                xml.q.write_event(Event::End(start.to_end()))
            }
            ErrorKind::UniquenessFailure(exists) if !exists.is_empty() => {
                xml.q.write_event(Event::Start(start.clone()))?;
                for e in exists.iter() {
                    e.qwrite(xml)?;
                }
                xml.q.write_event(Event::End(start.to_end()))
            }
            _ => xml.q.write_event(Event::Empty(start)),
        }
    }
}

impl QWrite for Exists {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_err_element("exists");
        start.push_attribute(("field", self.field.as_str()));
        if self.alt_values.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        for alt in self.alt_values.iter() {
            alt.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for AltValue {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_err_element("alt-value");
        xml.text_element(start, &self.0)
    }
}
