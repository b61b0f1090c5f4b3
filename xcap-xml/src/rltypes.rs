use super::xml::{Document, RL_NS};

//RFC covered: RFC4826 section 3 (resource lists documents)

/// 3.2.  Structure
///
/// The root of a resource lists document contains any number of `<list>`
/// elements. A list may hold entries, references to entries, references to
/// external lists, and sub-lists.
///
/// <xs:element name="resource-lists">
///   <xs:complexType>
///     <xs:sequence minOccurs="0" maxOccurs="unbounded">
///       <xs:element name="list" type="listType"/>
///     </xs:sequence>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ResourceLists(pub Vec<List>);
impl ResourceLists {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top level list with this name
    pub fn list(&self, name: &str) -> Option<&List> {
        self.0.iter().find(|l| l.name.as_deref() == Some(name))
    }

    pub fn list_mut(&mut self, name: &str) -> Option<&mut List> {
        self.0.iter_mut().find(|l| l.name.as_deref() == Some(name))
    }

    /// Top level list with this name, appended to the document when missing
    pub fn list_or_create(&mut self, name: &str) -> &mut List {
        let idx = match self.0.iter().position(|l| l.name.as_deref() == Some(name)) {
            Some(idx) => idx,
            None => {
                self.0.push(List::named(name));
                self.0.len() - 1
            }
        };
        &mut self.0[idx]
    }

    /// Remove `uri` from every top level list, returns the number of removed entries
    pub fn remove_entry(&mut self, uri: &str) -> usize {
        self.0
            .iter_mut()
            .filter_map(|l| l.remove_entry(uri))
            .count()
    }
}
impl Document for ResourceLists {
    const NAMESPACES: &'static [(&'static str, &'static str)] = &[("rl", RL_NS)];
}

/// <xs:complexType name="listType">
///   <xs:sequence>
///     <xs:element name="display-name" type="display-nameType" minOccurs="0"/>
///     <xs:sequence minOccurs="0" maxOccurs="unbounded">
///       <xs:choice>
///         <xs:element name="list"> ...
///         <xs:element name="external" type="externalType"/>
///         <xs:element name="entry" type="entryType"/>
///         <xs:element name="entry-ref" type="entry-refType"/>
///       </xs:choice>
///     </xs:sequence>
///     <xs:any namespace="##other" processContents="lax" minOccurs="0" maxOccurs="unbounded"/>
///   </xs:sequence>
///   <xs:attribute name="name" type="xs:string" use="optional"/>
/// </xs:complexType>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct List {
    pub name: Option<String>,
    pub display_name: Option<DisplayName>,
    pub items: Vec<ListItem>,
}
impl List {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Direct entries of this list, sub-lists are not visited
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter_map(|i| match i {
            ListItem::Entry(e) => Some(e),
            _ => None,
        })
    }

    pub fn find_entry(&self, uri: &str) -> Option<&Entry> {
        self.entries().find(|e| e.uri == uri)
    }

    /// Append an entry, returns false if an entry with the same uri is already there.
    /// The uri of an entry is unique inside its list.
    pub fn add_entry(&mut self, entry: Entry) -> bool {
        if self.find_entry(&entry.uri).is_some() {
            return false;
        }
        self.items.push(ListItem::Entry(entry));
        true
    }

    pub fn remove_entry(&mut self, uri: &str) -> Option<Entry> {
        let idx = self
            .items
            .iter()
            .position(|i| matches!(i, ListItem::Entry(e) if e.uri == uri))?;
        match self.items.remove(idx) {
            ListItem::Entry(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ListItem {
    List(List),
    External(External),
    Entry(Entry),
    EntryRef(EntryRef),
}

/// A single resource, identified by its URI (usually a SIP URI).
///
/// <xs:attribute name="uri" type="xs:anyURI" use="required"/>
#[derive(Debug, PartialEq, Clone)]
pub struct Entry {
    pub uri: String,
    pub display_name: Option<DisplayName>,
}
impl Entry {
    pub fn new(uri: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            uri: uri.into(),
            display_name: display_name.map(DisplayName::new),
        }
    }
}

/// A reference to an entry stored elsewhere on the same XCAP server.
/// `ref` is a relative HTTP URI, resolved against the XCAP root.
#[derive(Debug, PartialEq, Clone)]
pub struct EntryRef {
    pub reference: String,
    pub display_name: Option<DisplayName>,
}

/// Include a whole list stored elsewhere, `anchor` is an absolute HTTP URI
#[derive(Debug, PartialEq, Clone)]
pub struct External {
    pub anchor: String,
    pub display_name: Option<DisplayName>,
}

/// <xs:complexType name="display-nameType">
///   <xs:simpleContent>
///     <xs:extension base="xs:string">
///       <xs:attribute ref="xml:lang"/>
///     </xs:extension>
///   </xs:simpleContent>
/// </xs:complexType>
#[derive(Debug, PartialEq, Clone)]
pub struct DisplayName {
    pub lang: Option<String>,
    pub value: String,
}
impl DisplayName {
    pub fn new(value: &str) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }
}
