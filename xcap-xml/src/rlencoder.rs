use quick_xml::events::{BytesStart, Event};
use quick_xml::Error as QError;

use super::rltypes::*;
use super::xml::{IWrite, QWrite, Writer};

impl QWrite for ResourceLists {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_rl_element("resource-lists");
        if self.0.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        for list in self.0.iter() {
            list.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for List {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_rl_element("list");
        if let Some(name) = &self.name {
            start.push_attribute(("name", name.as_str()));
        }
        if self.display_name.is_none() && self.items.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(display_name) = &self.display_name {
            display_name.qwrite(xml)?;
        }
        for item in self.items.iter() {
            item.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for ListItem {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        match self {
            Self::List(l) => l.qwrite(xml),
            Self::External(e) => e.qwrite(xml),
            Self::Entry(e) => e.qwrite(xml),
            Self::EntryRef(e) => e.qwrite(xml),
        }
    }
}

impl QWrite for Entry {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_rl_element("entry");
        start.push_attribute(("uri", self.uri.as_str()));
        with_display_name(xml, start, &self.display_name)
    }
}

impl QWrite for EntryRef {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_rl_element("entry-ref");
        start.push_attribute(("ref", self.reference.as_str()));
        with_display_name(xml, start, &self.display_name)
    }
}

impl QWrite for External {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_rl_element("external");
        start.push_attribute(("anchor", self.anchor.as_str()));
        with_display_name(xml, start, &self.display_name)
    }
}

impl QWrite for DisplayName {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_rl_element("display-name");
        if let Some(lang) = &self.lang {
            start.push_attribute(("xml:lang", lang.as_str()));
        }
        xml.text_element(start, &self.value)
    }
}

fn with_display_name(
    xml: &mut Writer<impl IWrite>,
    start: BytesStart<'static>,
    display_name: &Option<DisplayName>,
) -> Result<(), QError> {
    match display_name {
        None => xml.q.write_event(Event::Empty(start)),
        Some(display_name) => {
            let end = start.to_end();
            xml.q.write_event(Event::Start(start.clone()))?;
            display_name.qwrite(xml)?;
            xml.q.write_event(Event::End(end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::serialize;

    #[test]
    fn contact_list() {
        let mut doc = ResourceLists::default();
        let list = doc.list_or_create("buddies");
        list.display_name = Some(DisplayName::new("Buddies"));
        list.add_entry(Entry::new("sip:alice@example.com", Some("Alice")));
        list.add_entry(Entry::new("sip:bob@example.com", None));
        list.items.push(ListItem::External(External {
            anchor: "http://xcap.example.com/resource-lists/users/sip:a@example.com/index/~~/resource-lists/list%5b@name=%22x%22%5d".into(),
            display_name: None,
        }));
        doc.0.push(List::named("empty"));

        let got = String::from_utf8(serialize(&doc).unwrap()).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rl:resource-lists xmlns:rl="urn:ietf:params:xml:ns:resource-lists">
    <rl:list name="buddies">
        <rl:display-name>Buddies</rl:display-name>
        <rl:entry uri="sip:alice@example.com">
            <rl:display-name>Alice</rl:display-name>
        </rl:entry>
        <rl:entry uri="sip:bob@example.com"/>
        <rl:external anchor="http://xcap.example.com/resource-lists/users/sip:a@example.com/index/~~/resource-lists/list%5b@name=%22x%22%5d"/>
    </rl:list>
    <rl:list name="empty"/>
</rl:resource-lists>"#;

        assert_eq!(&got, expected, "\n---GOT---\n{got}\n---EXP---\n{expected}\n");
    }

    #[test]
    fn empty_document() {
        let got = String::from_utf8(serialize(&ResourceLists::default()).unwrap()).unwrap();
        assert_eq!(
            got,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rl:resource-lists xmlns:rl="urn:ietf:params:xml:ns:resource-lists"/>"#
        );
    }
}
