use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::error::ParsingError;

// Constants
pub const CAPS_NS: &str = "urn:ietf:params:xml:ns:xcap-caps";
pub const ERR_NS: &str = "urn:ietf:params:xml:ns:xcap-error";
pub const RL_NS: &str = "urn:ietf:params:xml:ns:resource-lists";
pub const CP_NS: &str = "urn:ietf:params:xml:ns:common-policy";
pub const PR_NS: &str = "urn:ietf:params:xml:ns:pres-rules";
pub const PC_NS: &str = "urn:oma:xml:prs:pres-content";

pub const CAPS_URN: &[u8] = CAPS_NS.as_bytes();
pub const ERR_URN: &[u8] = ERR_NS.as_bytes();
pub const RL_URN: &[u8] = RL_NS.as_bytes();
pub const CP_URN: &[u8] = CP_NS.as_bytes();
pub const PR_URN: &[u8] = PR_NS.as_bytes();
pub const PC_URN: &[u8] = PC_NS.as_bytes();

// IO traits
pub trait IWrite: Write {}
impl<T: Write> IWrite for T {}
pub trait IRead: BufRead {}
impl<T: BufRead> IRead for T {}

// Serialization/Deserialization traits
pub trait QWrite {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), quick_xml::Error>;
}
pub trait QRead<T> {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<T, ParsingError>;
}

// The representation of an XML node in Rust
pub trait Node<T>: QRead<T> + QWrite + std::fmt::Debug + PartialEq + Clone {}
impl<T: QRead<T> + QWrite + std::fmt::Debug + PartialEq + Clone> Node<T> for T {}

/// A node that is the root element of an XCAP document body.
///
/// `NAMESPACES` lists the `(prefix, urn)` pairs declared on the root element,
/// every prefix used by the encoder of this document must be part of it.
pub trait Document: Node<Self> + Sized {
    const NAMESPACES: &'static [(&'static str, &'static str)];
}

/// Serialize a full document, XML declaration included
pub fn serialize<T: Document>(doc: &T) -> Result<Vec<u8>, quick_xml::Error> {
    let q = quick_xml::writer::Writer::new_with_indent(Vec::new(), b' ', 4);
    let ns_to_apply = T::NAMESPACES
        .iter()
        .map(|(prefix, urn)| (format!("xmlns:{}", prefix), urn.to_string()))
        .collect();
    let mut writer = Writer { q, ns_to_apply };
    writer
        .q
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    doc.qwrite(&mut writer)?;
    Ok(writer.q.into_inner())
}

/// Deserialize the first `T` found in the byte stream, anything before it is skipped
pub fn deserialize<T: Node<T>>(src: &[u8]) -> Result<T, ParsingError> {
    let mut rdr = Reader::new(NsReader::from_reader(src))?;
    rdr.find::<T>()
}

// ---------------

/// Transform a Rust object into an XML stream of characters
pub struct Writer<T: IWrite> {
    pub q: quick_xml::writer::Writer<T>,
    pub ns_to_apply: Vec<(String, String)>,
}
impl<T: IWrite> Writer<T> {
    pub fn create_caps_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("xc", name)
    }
    pub fn create_err_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("xe", name)
    }
    pub fn create_rl_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("rl", name)
    }
    pub fn create_cp_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("cp", name)
    }
    pub fn create_pr_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("pr", name)
    }
    pub fn create_pc_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("pc", name)
    }

    fn create_ns_element(&mut self, ns: &str, name: &str) -> BytesStart<'static> {
        let mut start = BytesStart::new(format!("{}:{}", ns, name));
        if !self.ns_to_apply.is_empty() {
            start.extend_attributes(
                self.ns_to_apply
                    .iter()
                    .map(|(k, n)| (k.as_str(), n.as_str())),
            );
            self.ns_to_apply.clear()
        }
        start
    }

    /// `<start>text</start>`
    pub fn text_element(&mut self, start: BytesStart<'static>, text: &str) -> Result<(), quick_xml::Error> {
        let end = start.to_end();
        self.q.write_event(Event::Start(start.clone()))?;
        self.q.write_event(Event::Text(BytesText::new(text)))?;
        self.q.write_event(Event::End(end))
    }
}

/// Transform an XML stream of characters into a Rust object
pub struct Reader<T: IRead> {
    pub rdr: NsReader<T>,
    cur: Event<'static>,
    prev: Event<'static>,
    parents: Vec<Event<'static>>,
    buf: Vec<u8>,
}
impl<T: IRead> Reader<T> {
    pub fn new(mut rdr: NsReader<T>) -> Result<Self, ParsingError> {
        let mut buf: Vec<u8> = vec![];
        let cur = rdr.read_event_into(&mut buf)?.into_owned();
        let parents = vec![];
        let prev = Event::Eof;
        buf.clear();
        Ok(Self {
            cur,
            prev,
            parents,
            rdr,
            buf,
        })
    }

    /// read one more tag
    fn next(&mut self) -> Result<Event<'static>, ParsingError> {
        let evt = self.rdr.read_event_into(&mut self.buf)?.into_owned();
        self.buf.clear();
        self.prev = std::mem::replace(&mut self.cur, evt);
        Ok(self.prev.clone())
    }

    /// skip a node at current level
    pub fn skip(&mut self) -> Result<Event<'static>, ParsingError> {
        match &self.cur {
            Event::Start(b) => {
                tracing::trace!(tag=?b.name(), "skipping unknown element");
                let _span = self.rdr.read_to_end_into(b.to_end().name(), &mut self.buf)?;
                self.buf.clear();
                self.next()
            }
            Event::End(_) => Err(ParsingError::WrongToken),
            Event::Eof => Err(ParsingError::Eof),
            _ => self.next(),
        }
    }

    /// Skip one unknown child of the opened element.
    /// Returns false when there is nothing left to skip, ie. the end of the
    /// opened element has been reached or it was self-closed.
    pub fn skip_unknown(&mut self) -> Result<bool, ParsingError> {
        if !self.parent_has_child() {
            return Ok(false);
        }
        match self.peek() {
            Event::End(_) | Event::Eof => Ok(false),
            _ => {
                self.skip()?;
                Ok(true)
            }
        }
    }

    /// check if this is the desired tag
    fn is_tag(&self, ns: &[u8], key: &str) -> bool {
        let qname = match self.peek() {
            Event::Start(bs) | Event::Empty(bs) => bs.name(),
            Event::End(be) => be.name(),
            _ => return false,
        };

        let (extr_ns, local) = self.rdr.resolve_element(qname);

        if local.into_inner() != key.as_bytes() {
            return false;
        }

        match extr_ns {
            ResolveResult::Bound(v) => v.into_inner() == ns,
            _ => false,
        }
    }

    fn parent_has_child(&self) -> bool {
        matches!(self.parents.last(), Some(Event::Start(_)) | None)
    }

    fn ensure_parent_has_child(&self) -> Result<(), ParsingError> {
        match self.parent_has_child() {
            true => Ok(()),
            false => Err(ParsingError::Recoverable),
        }
    }

    pub fn peek(&self) -> &Event<'static> {
        &self.cur
    }

    /// Text content of the currently opened element, empty for a self-closed one
    pub fn tag_string(&mut self) -> Result<String, ParsingError> {
        if !self.parent_has_child() {
            return Ok(String::new());
        }

        let mut acc = String::new();
        loop {
            match self.peek() {
                Event::CData(unescaped) => {
                    acc.push_str(std::str::from_utf8(unescaped.as_ref())?);
                    self.next()?
                }
                Event::Text(escaped) => {
                    acc.push_str(escaped.unescape()?.as_ref());
                    self.next()?
                }
                Event::End(_) | Event::Start(_) | Event::Empty(_) | Event::Eof => return Ok(acc),
                _ => self.next()?,
            };
        }
    }

    pub fn maybe_read<N: Node<N>>(
        &mut self,
        t: &mut Option<N>,
        dirty: &mut bool,
    ) -> Result<(), ParsingError> {
        if !self.parent_has_child() {
            return Ok(());
        }

        match N::qread(self) {
            Ok(v) => {
                *t = Some(v);
                *dirty = true;
                Ok(())
            }
            Err(ParsingError::Recoverable) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn maybe_push<N: Node<N>>(
        &mut self,
        t: &mut Vec<N>,
        dirty: &mut bool,
    ) -> Result<(), ParsingError> {
        if !self.parent_has_child() {
            return Ok(());
        }

        match N::qread(self) {
            Ok(v) => {
                t.push(v);
                *dirty = true;
                Ok(())
            }
            Err(ParsingError::Recoverable) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn find<N: Node<N>>(&mut self) -> Result<N, ParsingError> {
        self.ensure_parent_has_child()?;

        loop {
            // Try parse
            match N::qread(self) {
                Err(ParsingError::Recoverable) => (),
                otherwise => return otherwise,
            }

            // If recovered, skip the element
            self.skip()?;
        }
    }

    pub fn maybe_find<N: Node<N>>(&mut self) -> Result<Option<N>, ParsingError> {
        // We can't find anything inside a self-closed tag
        if !self.parent_has_child() {
            return Ok(None);
        }

        loop {
            // Try parse
            match N::qread(self) {
                Err(ParsingError::Recoverable) => (),
                otherwise => return otherwise.map(Some),
            }

            // Skip or stop
            match self.peek() {
                Event::End(_) => return Ok(None),
                _ => self.skip()?,
            };
        }
    }

    pub fn collect<N: Node<N>>(&mut self) -> Result<Vec<N>, ParsingError> {
        let mut acc = Vec::new();
        if !self.parent_has_child() {
            return Ok(acc);
        }

        loop {
            match N::qread(self) {
                Err(ParsingError::Recoverable) => match self.peek() {
                    Event::End(_) => return Ok(acc),
                    _ => {
                        self.skip()?;
                    }
                },
                Ok(v) => acc.push(v),
                Err(e) => return Err(e),
            }
        }
    }

    pub fn open(&mut self, ns: &[u8], key: &str) -> Result<Event<'static>, ParsingError> {
        // A self-closed parent is still the current event, it has no child to open
        self.ensure_parent_has_child()?;

        let evt = match self.peek() {
            Event::Empty(_) if self.is_tag(ns, key) => {
                // Virtually move one token forward on self-closed elements,
                // so `prev_attr` reads the attributes of the opened element
                // in both the empty and the start/end cases.
                self.prev = self.cur.clone();
                self.cur.clone()
            }
            Event::Start(_) if self.is_tag(ns, key) => self.next()?,
            _ => return Err(ParsingError::Recoverable),
        };

        self.parents.push(evt.clone());
        Ok(evt)
    }

    pub fn maybe_open(&mut self, ns: &[u8], key: &str) -> Result<Option<Event<'static>>, ParsingError> {
        match self.open(ns, key) {
            Ok(v) => Ok(Some(v)),
            Err(ParsingError::Recoverable) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn prev_attr(&self, attr: &str) -> Option<String> {
        match &self.prev {
            Event::Start(bs) | Event::Empty(bs) => match bs.try_get_attribute(attr) {
                Ok(Some(attr)) => attr
                    .decode_and_unescape_value(&self.rdr)
                    .ok()
                    .map(|v| v.into_owned()),
                _ => None,
            },
            _ => None,
        }
    }

    // find stop tag
    pub fn close(&mut self) -> Result<Event<'static>, ParsingError> {
        // Handle the empty case
        if !self.parent_has_child() {
            self.parents.pop();
            return self.next();
        }

        // Handle the start/end case
        loop {
            match self.peek() {
                Event::End(_) => {
                    self.parents.pop();
                    return self.next();
                }
                _ => self.skip()?,
            };
        }
    }
}
