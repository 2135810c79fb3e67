//! Term extraction from Android string-resource XML.
//!
//! Only `<string name="...">` elements matter here; the `name` attribute is
//! the PoEditor term identifier. Values, comments, and sibling resource kinds
//! (`plurals`, `string-array`, ...) are ignored.

use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::api::types::Term;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("failed to read strings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed strings XML: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("invalid attribute in strings XML: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
}

/// Parses `path` and returns one [`Term`] per `<string>` element, keyed by
/// its `name` attribute and carrying `tags`. Duplicate names collapse into a
/// single entry.
pub fn extract_terms(path: &Path, tags: &[String]) -> Result<BTreeMap<String, Term>, XmlError> {
    let content = std::fs::read_to_string(path)?;
    extract_terms_from_str(&content, tags)
}

fn extract_terms_from_str(xml: &str, tags: &[String]) -> Result<BTreeMap<String, Term>, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut terms = BTreeMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                if element.name().as_ref() == b"string" {
                    match name_attribute(&element)? {
                        Some(name) => {
                            terms.insert(name.clone(), Term::new(name, tags.to_vec()));
                        }
                        None => warn!("skipping <string> element without a name attribute"),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(terms)
}

fn name_attribute(element: &BytesStart<'_>) -> Result<Option<String>, XmlError> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == b"name" {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
