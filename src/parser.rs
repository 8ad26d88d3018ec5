use crate::document::{Document, Node};
use crate::element::Element;
use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

/// Options when parsing xml.
///
/// `empty_text_node`: `<tag></tag>` will have a `Node::Text("")` as its child,
/// while `<tag />` won't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub empty_text_node: bool,
}

impl ReadOptions {
    pub fn default() -> ReadOptions {
        ReadOptions {
            empty_text_node: true,
        }
    }
}

// Figure out the document encoding from the first bytes.
// Returns the sniffed encoding and how many bytes of byte order mark to skip.
fn sniff_encoding(bytes: &[u8]) -> (Option<&'static Encoding>, usize) {
    match bytes {
        [0xfe, 0xff, ..] => (Some(UTF_16BE), 2), // UTF-16 BE BOM
        [0xff, 0xfe, ..] => (Some(UTF_16LE), 2), // UTF-16 LE BOM
        [0xef, 0xbb, 0xbf, ..] => (None, 3),     // UTF-8 BOM
        [0x00, 0x3c, 0x00, 0x3f, ..] => (Some(UTF_16BE), 0),
        [0x3c, 0x00, 0x3f, 0x00, ..] => (Some(UTF_16LE), 0),
        _ => (None, 0),
    }
}

// Pull the encoding label out of the XML declaration, if there is one.
// The declaration is the first event and is plain ASCII in any
// ASCII-compatible encoding. Parse errors are left for the real pass.
fn declared_encoding(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::with_capacity(150);
    match reader.read_event(&mut buf) {
        Ok(Event::Decl(ev)) => match ev.encoding() {
            Some(Ok(label)) => Some(label.to_vec()),
            _ => None,
        },
        _ => None,
    }
}

// Decode the whole document to UTF-8 before parsing. A UTF-16 byte order
// mark (or a UTF-16 pattern in the first four bytes) takes precedence over
// the declared encoding.
fn decode_bytes(bytes: &[u8]) -> Result<String> {
    let (sniffed, bom_len) = sniff_encoding(bytes);
    let bytes = &bytes[bom_len..];
    let encoding = match sniffed {
        Some(encoding) => encoding,
        None => match declared_encoding(bytes) {
            Some(label) => Encoding::for_label(&label).ok_or(Error::CannotDecode)?,
            None => UTF_8,
        },
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(Error::CannotDecode);
    }
    Ok(text.into_owned())
}

pub(crate) struct DocumentParser {
    document: Document,
    read_opts: ReadOptions,
}

impl DocumentParser {
    pub(crate) fn parse_bytes(bytes: &[u8], opts: ReadOptions) -> Result<Document> {
        let text = decode_bytes(bytes)?;
        let mut parser = DocumentParser {
            document: Document::new(),
            read_opts: opts,
        };
        parser.parse_content(&text)?;
        Ok(parser.document)
    }

    fn handle_decl(&mut self, ev: &BytesDecl) -> Result<()> {
        self.document.version = Some(String::from_utf8(ev.version()?.to_vec())?);
        self.document.encoding = match ev.encoding() {
            Some(res) => Some(String::from_utf8(res?.to_vec())?),
            None => None,
        };
        self.document.standalone = match ev.standalone() {
            Some(res) => {
                let val = std::str::from_utf8(&*res?)?.to_lowercase();
                if val == "yes" {
                    true
                } else if val == "no" {
                    false
                } else {
                    return Err(Error::MalformedXML(
                        "Standalone Document Declaration has non boolean value".to_string(),
                    ));
                }
            }
            None => false,
        };
        Ok(())
    }

    fn handle_bytes_start(
        &mut self,
        element_stack: &[Element],
        ev: &BytesStart,
    ) -> Result<Element> {
        let document = &mut self.document;
        let full_name = String::from_utf8(ev.name().to_vec())?;
        let element = Element::new(document, full_name);
        let attributes = element.mut_attributes(document);
        for attr in ev.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.to_vec())?;
            let value = String::from_utf8(attr.unescaped_value()?.to_vec())?;
            attributes.insert(key, value);
        }
        let parent = *element_stack.last().unwrap();
        parent.push_child(document, Node::Element(element));
        Ok(element)
    }

    // Returns whether document parsing is finished.
    fn handle_event(&mut self, element_stack: &mut Vec<Element>, event: Event) -> Result<bool> {
        match event {
            Event::Start(ref ev) => {
                let element = self.handle_bytes_start(element_stack, ev)?;
                element_stack.push(element);
                Ok(false)
            }
            Event::End(_) => {
                let elem = element_stack.pop().unwrap(); // quick-xml checks that tag names match for us
                if self.read_opts.empty_text_node {
                    // distinguish <tag></tag> and <tag />
                    if !elem.has_children(&self.document) {
                        elem.push_child(&mut self.document, Node::Text(String::new()));
                    }
                }
                Ok(false)
            }
            Event::Empty(ref ev) => {
                self.handle_bytes_start(element_stack, ev)?;
                Ok(false)
            }
            Event::Text(ev) => {
                let content = String::from_utf8(ev.unescaped()?.to_vec())?;
                let elem = *element_stack.last().unwrap();
                elem.push_child(&mut self.document, Node::Text(content));
                Ok(false)
            }
            // Comment, CData, PI and DocType content is kept verbatim.
            Event::Comment(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                let elem = *element_stack.last().unwrap();
                elem.push_child(&mut self.document, Node::Comment(content));
                Ok(false)
            }
            Event::CData(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                let elem = *element_stack.last().unwrap();
                elem.push_child(&mut self.document, Node::CData(content));
                Ok(false)
            }
            Event::PI(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                let elem = *element_stack.last().unwrap();
                elem.push_child(&mut self.document, Node::PI(content));
                Ok(false)
            }
            Event::DocType(ev) => {
                let content = String::from_utf8(ev.to_vec())?;
                let elem = *element_stack.last().unwrap();
                elem.push_child(&mut self.document, Node::DocType(content));
                Ok(false)
            }
            Event::Decl(ref ev) => {
                self.handle_decl(ev)?;
                Ok(false)
            }
            Event::Eof => {
                if element_stack.len() > 1 {
                    let elem = element_stack.pop().unwrap();
                    return Err(Error::MalformedXML(format!(
                        "Missing closing tag for {}",
                        elem.full_name(&self.document)
                    )));
                }
                Ok(true)
            }
        }
    }

    fn parse_content(&mut self, text: &str) -> Result<()> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);
        let mut buf = Vec::with_capacity(200); // reduce time increasing capacity at start.
        let mut element_stack: Vec<Element> = vec![self.document.container()];

        loop {
            let event = reader.read_event(&mut buf)?;
            if self.handle_event(&mut element_stack, event)? {
                return Ok(());
            }
        }
    }
}
