use super::error::ParsingError;
use super::rltypes::*;
use super::xml::{IRead, QRead, Reader, RL_URN};

impl QRead<ResourceLists> for ResourceLists {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "resource-lists")?;
        let lists = xml.collect::<List>()?;
        xml.close()?;
        Ok(ResourceLists(lists))
    }
}

impl QRead<List> for List {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "list")?;
        let name = xml.prev_attr("name");
        let (mut display_name, mut items) = (None, Vec::new());
        loop {
            let mut dirty = false;
            xml.maybe_read::<DisplayName>(&mut display_name, &mut dirty)?;
            xml.maybe_push::<ListItem>(&mut items, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        Ok(List {
            name,
            display_name,
            items,
        })
    }
}

impl QRead<ListItem> for ListItem {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        match Entry::qread(xml) {
            Err(ParsingError::Recoverable) => (),
            otherwise => return otherwise.map(ListItem::Entry),
        }
        match EntryRef::qread(xml) {
            Err(ParsingError::Recoverable) => (),
            otherwise => return otherwise.map(ListItem::EntryRef),
        }
        match External::qread(xml) {
            Err(ParsingError::Recoverable) => (),
            otherwise => return otherwise.map(ListItem::External),
        }
        List::qread(xml).map(ListItem::List)
    }
}

impl QRead<Entry> for Entry {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "entry")?;
        let uri = xml.prev_attr("uri").ok_or(ParsingError::MissingAttribute)?;
        let display_name = xml.maybe_find::<DisplayName>()?;
        xml.close()?;
        Ok(Entry { uri, display_name })
    }
}

impl QRead<EntryRef> for EntryRef {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "entry-ref")?;
        let reference = xml.prev_attr("ref").ok_or(ParsingError::MissingAttribute)?;
        let display_name = xml.maybe_find::<DisplayName>()?;
        xml.close()?;
        Ok(EntryRef {
            reference,
            display_name,
        })
    }
}

impl QRead<External> for External {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "external")?;
        let anchor = xml.prev_attr("anchor").ok_or(ParsingError::MissingAttribute)?;
        let display_name = xml.maybe_find::<DisplayName>()?;
        xml.close()?;
        Ok(External {
            anchor,
            display_name,
        })
    }
}

impl QRead<DisplayName> for DisplayName {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(RL_URN, "display-name")?;
        let lang = xml.prev_attr("xml:lang");
        let value = xml.tag_string()?;
        xml.close()?;
        Ok(DisplayName {
            lang,
            value: value.trim().into(),
        })
    }
}
