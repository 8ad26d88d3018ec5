use crate::element::{Element, ElementData};
use crate::error::{Error, Result};
use crate::parser::{DocumentParser, ReadOptions};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    PI(String),
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<Element> {
        match self {
            Self::Element(elem) => Some(*elem),
            _ => None,
        }
    }

    pub(crate) fn build_text_content(&self, document: &Document, buf: &mut String) {
        match self {
            Node::Element(elem) => elem.build_text_content(document, buf),
            Node::Text(text) => buf.push_str(text),
            Node::CData(text) => buf.push_str(text),
            _ => {}
        }
    }

    /// Returns content if node is `Text` or `CData`.
    /// If node is `Element`, returns [`Element::text_content()`].
    pub fn text_content(&self, document: &Document) -> String {
        let mut buf = String::new();
        self.build_text_content(document, &mut buf);
        buf
    }
}

/// Represents a XML document.
///
/// Use [`Document::parse_file()`] or [`Document::parse_str()`] to parse xml.
///
/// # Examples
/// ```
/// use xmledit::Document;
///
/// let mut doc = Document::parse_str(r#"<package>
///     <metadata>
///         <author>Lewis Carol</author>
///     </metadata>
/// </package>"#).unwrap();
/// let author = doc.find_element("author").unwrap();
/// author.set_text_content(&mut doc, "Lewis Carroll");
/// assert_eq!(author.text_content(&doc), "Lewis Carroll");
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) store: Vec<ElementData>,
    container: Element,

    pub(crate) version: Option<String>,
    pub(crate) encoding: Option<String>,
    pub(crate) standalone: bool,
}

impl Document {
    /// Create a blank new xml document.
    pub fn new() -> Document {
        let (container, container_data) = Element::container();
        Document {
            store: vec![container_data],
            container,
            version: None,
            encoding: None,
            standalone: false,
        }
    }

    /// Get the container element. It is not part of the document and holds
    /// the root nodes; its only purpose is to make traversal uniform.
    pub fn container(&self) -> Element {
        self.container
    }

    /// Get root nodes of document.
    pub fn root_nodes(&self) -> &Vec<Node> {
        self.container.children(self)
    }

    /// Get the first element of the document.
    pub fn root_element(&self) -> Option<Element> {
        self.container.child_elements(self).get(0).copied()
    }

    /// Find the first element named `tag`, in depth-first document order.
    /// The root element itself is eligible.
    ///
    /// The comparison is an exact match on the raw tag name, see
    /// [`Element::find_descendant()`] for the namespace caveat.
    pub fn find_element(&self, tag: &str) -> Option<Element> {
        self.container.find_descendant(self, tag)
    }
}

// Read and write
impl Document {
    /// Read the whole file into memory and parse it.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`]: failed to read the file.
    /// - [`Error::CannotDecode`]: could not decode the file content.
    /// - [`Error::MalformedXML`]: the content is not well-formed XML.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        Document::parse_file_with_opts(path, ReadOptions::default())
    }

    pub fn parse_file_with_opts<P: AsRef<Path>>(path: P, opts: ReadOptions) -> Result<Document> {
        let bytes = std::fs::read(path)?;
        DocumentParser::parse_bytes(&bytes, opts)
    }

    /// Parse an xml string.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Document::parse_file()`], except [`Error::Io`].
    pub fn parse_str(str: &str) -> Result<Document> {
        Document::parse_str_with_opts(str, ReadOptions::default())
    }

    pub fn parse_str_with_opts(str: &str, opts: ReadOptions) -> Result<Document> {
        DocumentParser::parse_bytes(str.as_bytes(), opts)
    }

    /// Write the document to `path`, overwriting it. The output is UTF-8.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the document as an xml string.
    pub fn write_str(&self) -> Result<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(200);
        self.write(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        let container = self.container();
        let mut writer = Writer::new_with_indent(writer, b' ', 4);
        self.write_decl(&mut writer)?;
        self.write_nodes(&mut writer, container.children(self))?;
        writer.write_event(Event::Eof)?;
        Ok(())
    }

    // A document parsed without a declaration is written without one.
    // The encoding label is rewritten to UTF-8, which is what we write.
    fn write_decl(&self, writer: &mut Writer<impl Write>) -> Result<()> {
        let version = match &self.version {
            Some(version) => version,
            None => return Ok(()),
        };
        let encoding = self.encoding.as_ref().map(|_| "UTF-8".as_bytes());
        let standalone = match self.standalone {
            true => Some("yes".as_bytes()),
            false => None,
        };
        writer.write_event(Event::Decl(BytesDecl::new(
            version.as_bytes(),
            encoding,
            standalone,
        )))?;
        Ok(())
    }

    fn write_nodes(&self, writer: &mut Writer<impl Write>, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Element(eid) => self.write_element(writer, *eid)?,
                Node::Text(text) => {
                    writer.write_event(Event::Text(BytesText::from_plain_str(text)))?
                }
                // Comment, CData, PI and DocType content round-trips verbatim.
                Node::Comment(text) => {
                    writer.write_event(Event::Comment(BytesText::from_escaped_str(text)))?
                }
                Node::CData(text) => {
                    writer.write_event(Event::CData(BytesText::from_escaped_str(text)))?
                }
                Node::PI(text) => {
                    writer.write_event(Event::PI(BytesText::from_escaped_str(text)))?
                }
                Node::DocType(text) => {
                    writer.write_event(Event::DocType(BytesText::from_escaped_str(text)))?
                }
            };
        }
        Ok(())
    }

    fn write_element(&self, writer: &mut Writer<impl Write>, element: Element) -> Result<()> {
        let name_bytes = element.full_name(self).as_bytes();
        let mut start = BytesStart::borrowed_name(name_bytes);
        for (key, value) in element.attributes(self) {
            // The (&str, &str) form escapes the value.
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if element.has_children(self) {
            writer.write_event(Event::Start(start))?;
            self.write_nodes(writer, element.children(self))?;
            writer.write_event(Event::End(BytesEnd::borrowed(name_bytes)))?;
        } else {
            writer.write_event(Event::Empty(start))?;
        }
        Ok(())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Document> {
        Document::parse_str(s)
    }
}
