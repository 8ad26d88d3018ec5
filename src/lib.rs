//! Read, edit and write xml files in a tree-like structure.
//!
//! The tree is held in a [`Document`]; an [`Element`] is a cheap `Copy` id
//! into it. [`resave`], [`set_element_text`] and [`set_element_attribute`]
//! are the file-level operations the `xmledit` binary dispatches to.
//!
//! ```
//! use xmledit::Document;
//!
//! let mut doc = Document::parse_str("<config><item id=\"1\"/></config>").unwrap();
//! let item = doc.find_element("item").unwrap();
//! item.set_attribute(&mut doc, "id", "2");
//! assert_eq!(item.attribute(&doc, "id"), Some("2"));
//! ```

mod document;
mod edit;
mod element;
mod error;
mod parser;

pub use crate::document::{Document, Node};
pub use crate::edit::{resave, set_element_attribute, set_element_text};
pub use crate::element::Element;
pub use crate::error::{Error, Result};
pub use crate::parser::ReadOptions;
