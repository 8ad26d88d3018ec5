use crate::document::{Document, Node};
use indexmap::IndexMap;

/// Data of an element, stored in [`Document`].
#[derive(Debug)]
pub struct ElementData {
    full_name: String,
    attributes: IndexMap<String, String>, // q:attr="val" => {"q:attr": "val"}, in document order
    children: Vec<Node>,
}

/// Represents an xml element.
///
/// This struct only contains a unique `usize` id and implements trait `Copy`,
/// so you do not need to bother with having a reference.
///
/// Because the actual data of the element is stored in [`Document`],
/// most methods take `&Document` or `&mut Document` as their first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    id: usize,
}

impl Element {
    /// Create a new empty element with name.
    pub fn new<S: Into<String>>(document: &mut Document, full_name: S) -> Element {
        let elem = Element {
            id: document.store.len(),
        };
        let elem_data = ElementData {
            full_name: full_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        };
        document.store.push(elem_data);
        elem
    }

    pub(crate) fn container() -> (Element, ElementData) {
        let elem_data = ElementData {
            full_name: String::new(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        };
        let elem = Element { id: 0 };
        (elem, elem_data)
    }

    fn data<'a>(&self, document: &'a Document) -> &'a ElementData {
        document.store.get(self.id).unwrap()
    }

    fn mut_data<'a>(&self, document: &'a mut Document) -> &'a mut ElementData {
        document.store.get_mut(self.id).unwrap()
    }

    /// Get raw name of element, including its namespace prefix.
    pub fn full_name<'a>(&self, document: &'a Document) -> &'a str {
        &self.data(document).full_name
    }

    /// Get attributes of element, in document order.
    ///
    /// The attribute names keep any namespace prefix, the values are unescaped.
    pub fn attributes<'a>(&self, document: &'a Document) -> &'a IndexMap<String, String> {
        &self.data(document).attributes
    }

    pub fn mut_attributes<'a>(
        &self,
        document: &'a mut Document,
    ) -> &'a mut IndexMap<String, String> {
        &mut self.mut_data(document).attributes
    }

    /// Get the value of the attribute `name`.
    pub fn attribute<'a>(&self, document: &'a Document, name: &str) -> Option<&'a str> {
        self.attributes(document).get(name).map(|value| value.as_str())
    }

    /// Set the attribute `name` to `value`, inserting the attribute if it
    /// isn't present. An updated attribute keeps its position, an inserted
    /// one goes after the existing attributes.
    pub fn set_attribute<S, T>(&self, document: &mut Document, name: S, value: T)
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.mut_attributes(document).insert(name.into(), value.into());
    }

    pub fn children<'a>(&self, document: &'a Document) -> &'a Vec<Node> {
        &self.data(document).children
    }

    /// ```ignore
    /// !self.children(document).is_empty()
    /// ```
    pub fn has_children(&self, document: &Document) -> bool {
        !self.children(document).is_empty()
    }

    pub fn child_elements(&self, document: &Document) -> Vec<Element> {
        self.children(document)
            .iter()
            .filter_map(|node| {
                if let Node::Element(elemid) = node {
                    Some(*elemid)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Equivalent to `vec.push()`.
    pub fn push_child(&self, document: &mut Document, node: Node) {
        self.mut_data(document).children.push(node);
    }

    /// Search the subtree below this element, depth-first in document order,
    /// for the first element whose full tag name equals `tag`.
    ///
    /// The comparison is an exact string match on the raw name.
    /// Namespaces are not resolved: `"ns:tag"` matches only the literal
    /// name `ns:tag`, whatever namespace `ns` is bound to.
    pub fn find_descendant(&self, document: &Document, tag: &str) -> Option<Element> {
        for node in self.children(document) {
            if let Node::Element(elem) = node {
                if elem.full_name(document) == tag {
                    return Some(*elem);
                }
                if let Some(found) = elem.find_descendant(document, tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Concatenated content of the text and cdata nodes below this element.
    pub fn text_content(&self, document: &Document) -> String {
        let mut buf = String::new();
        self.build_text_content(document, &mut buf);
        buf
    }

    pub(crate) fn build_text_content(&self, document: &Document, buf: &mut String) {
        for node in self.children(document) {
            node.build_text_content(document, buf);
        }
    }

    /// Replace the text content of this element, leaving its attributes and
    /// child elements in place. Existing text and cdata nodes are removed
    /// and the new text becomes the element's first child.
    pub fn set_text_content<S: Into<String>>(&self, document: &mut Document, text: S) {
        let children = &mut self.mut_data(document).children;
        children.retain(|node| !matches!(node, Node::Text(_) | Node::CData(_)));
        children.insert(0, Node::Text(text.into()));
    }
}
