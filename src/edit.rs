//! The file-level operations behind the command line: parse a file, edit at
//! most one element, and write the result back over the same path.

use crate::document::Document;
use crate::error::{Error, Result};
use std::path::Path;

/// Parse the file at `path` and write it straight back, normalizing the
/// formatting. The content is unchanged.
pub fn resave<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let document = Document::parse_file(path)?;
    document.write_file(path)
}

/// Set the text content of the first element named `tag` and rewrite the
/// file. The file is left untouched when no element matches.
///
/// # Errors
///
/// - [`Error::ElementNotFound`]: no element in the file is named `tag`.
/// - The errors of [`Document::parse_file()`] and [`Document::write_file()`].
pub fn set_element_text<P: AsRef<Path>>(path: P, tag: &str, text: &str) -> Result<()> {
    let path = path.as_ref();
    let mut document = Document::parse_file(path)?;
    let element = document
        .find_element(tag)
        .ok_or_else(|| Error::ElementNotFound {
            tag: tag.to_string(),
        })?;
    element.set_text_content(&mut document, text);
    document.write_file(path)
}

/// Set the attribute `name` to `value` on the first element named `tag` and
/// rewrite the file. The attribute is created when it isn't present.
/// The file is left untouched when no element matches.
///
/// # Errors
///
/// Same as [`set_element_text()`].
pub fn set_element_attribute<P: AsRef<Path>>(
    path: P,
    tag: &str,
    name: &str,
    value: &str,
) -> Result<()> {
    let path = path.as_ref();
    let mut document = Document::parse_file(path)?;
    let element = document
        .find_element(tag)
        .ok_or_else(|| Error::ElementNotFound {
            tag: tag.to_string(),
        })?;
    element.set_attribute(&mut document, name, value);
    document.write_file(path)
}
