use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use xmledit::{set_element_attribute, set_element_text, Document, Error, Node};

fn xml_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("doc.xml");
    fs::write(&path, content).unwrap();
    path
}

// Renders the node tree into a comparable form. Formatting on disk may
// change between writes, the structure may not.
fn tree(doc: &Document) -> String {
    let mut buf = String::new();
    render_nodes(doc, doc.root_nodes(), 0, &mut buf);
    buf
}

fn render_nodes(doc: &Document, nodes: &[Node], depth: usize, buf: &mut String) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Element(elem) => {
                let attrs: String = elem
                    .attributes(doc)
                    .iter()
                    .map(|(key, value)| format!(" {}={:?}", key, value))
                    .collect();
                writeln!(buf, "{}element {}{}", indent, elem.full_name(doc), attrs).unwrap();
                render_nodes(doc, elem.children(doc), depth + 1, buf);
            }
            Node::Text(text) => writeln!(buf, "{}text {:?}", indent, text).unwrap(),
            Node::Comment(text) => writeln!(buf, "{}comment {:?}", indent, text).unwrap(),
            Node::CData(text) => writeln!(buf, "{}cdata {:?}", indent, text).unwrap(),
            Node::PI(text) => writeln!(buf, "{}pi {:?}", indent, text).unwrap(),
            Node::DocType(text) => writeln!(buf, "{}doctype {:?}", indent, text).unwrap(),
        }
    }
}

#[test]
fn set_text_replaces_element_text() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(&dir, "<root><name>old</name></root>");

    set_element_text(&path, "name", "new").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.full_name(&doc), "root");
    let name = doc.find_element("name").unwrap();
    assert_eq!(name.text_content(&doc), "new");
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("<name>new</name>"));
}

#[test]
fn set_text_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(&dir, "<root><name>old</name></root>");

    set_element_text(&path, "name", "new").unwrap();
    let once = fs::read(&path).unwrap();
    set_element_text(&path, "name", "new").unwrap();
    let twice = fs::read(&path).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn set_text_edits_first_match_only() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(
        &dir,
        "<root><a><target n=\"1\">x</target></a><target n=\"2\">y</target></root>",
    );

    set_element_text(&path, "target", "edited").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    let root = doc.root_element().unwrap();
    let first = root.child_elements(&doc)[0].child_elements(&doc)[0];
    let second = root.child_elements(&doc)[1];
    assert_eq!(first.attribute(&doc, "n"), Some("1"));
    assert_eq!(first.text_content(&doc), "edited");
    assert_eq!(second.text_content(&doc), "y");
}

#[test]
fn set_text_on_root_element() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(&dir, "<root>old</root>");

    set_element_text(&path, "root", "new").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    assert_eq!(doc.root_element().unwrap().text_content(&doc), "new");
}

#[test]
fn set_text_keeps_other_content_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(
        &dir,
        "<root keep=\"1\"><name>old</name><other flag=\"yes\">stays</other></root>",
    );

    set_element_text(&path, "name", "new").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    let root = doc.root_element().unwrap();
    assert_eq!(root.attribute(&doc, "keep"), Some("1"));
    let other = doc.find_element("other").unwrap();
    assert_eq!(other.attribute(&doc, "flag"), Some("yes"));
    assert_eq!(other.text_content(&doc), "stays");
}

#[test]
fn set_attribute_updates_value() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(&dir, "<config><item id=\"1\"/></config>");

    set_element_attribute(&path, "item", "id", "2").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    let item = doc.find_element("item").unwrap();
    assert_eq!(item.attribute(&doc, "id"), Some("2"));
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("<item id=\"2\"/>"));
}

#[test]
fn set_attribute_creates_missing_attribute() {
    let dir = TempDir::new().unwrap();
    let path = xml_file(&dir, "<config><item a=\"1\" b=\"2\"/></config>");

    set_element_attribute(&path, "item", "c", "3").unwrap();

    let doc = Document::parse_file(&path).unwrap();
    let item = doc.find_element("item").unwrap();
    let attrs: Vec<(&str, &str)> = item
        .attributes(&doc)
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    assert_eq!(attrs, vec![("a", "1"), ("b", "2"), ("c", "3")]);
}

#[test]
fn missing_tag_fails_and_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let content = "<root>\n\n  <name>old</name>   </root>";
    let path = xml_file(&dir, content);

    let err = set_element_text(&path, "nonexistent-tag", "v").unwrap_err();
    assert!(matches!(err, Error::ElementNotFound { ref tag } if tag == "nonexistent-tag"));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);

    let err = set_element_attribute(&path, "nonexistent-tag", "a", "v").unwrap_err();
    assert!(matches!(err, Error::ElementNotFound { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn resave_round_trips_structure() {
    let dir = TempDir::new().unwrap();
    let content = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <library>\n\
            <!-- catalogue -->\n\
            <book isbn=\"1518\" lang=\"en\">\n\
                <title>Don Quixote &amp; co</title>\n\
                <blurb><![CDATA[some <raw> text]]></blurb>\n\
            </book>\n\
        </library>";
    let path = xml_file(&dir, content);
    let before = tree(&Document::parse_str(content).unwrap());

    xmledit::resave(&path).unwrap();

    let after = tree(&Document::parse_file(&path).unwrap());
    assert_eq!(before, after);
}

#[test]
fn resave_keeps_utf16_content() {
    let dir = TempDir::new().unwrap();
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><greeting>h\u{e9}llo</greeting>";
    let mut bytes: Vec<u8> = vec![0xff, 0xfe];
    bytes.extend(xml.encode_utf16().flat_map(|unit| unit.to_le_bytes()));
    let path = dir.path().join("doc.xml");
    fs::write(&path, &bytes).unwrap();

    xmledit::resave(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    let doc = Document::parse_file(&path).unwrap();
    assert_eq!(
        doc.root_element().unwrap().text_content(&doc),
        "h\u{e9}llo"
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-file.xml");
    let err = xmledit::resave(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
