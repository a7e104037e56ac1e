//! Container descriptor and OPF package parsing: the spine in reading order.

use crate::container::Archive;
use crate::error::{ExtractError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use tracing::{debug, warn};

const CONTAINER_XML: &str = "META-INF/container.xml";
const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// One content document in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    pub item_id: String,
    /// Href as declared in the manifest, relative to the package document.
    pub href: String,
    /// Archive path of the content document.
    pub path: String,
    pub declared_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Package {
    pub opf_path: String,
    pub spine: Vec<SpineEntry>,
}

#[derive(Debug, Clone)]
struct ManifestItem {
    href: String,
    title: Option<String>,
}

pub fn read_package<R: Read + Seek>(archive: &mut Archive<R>) -> Result<Package> {
    let container = archive.read_entry_string(CONTAINER_XML)?;
    let opf_path = parse_container(&container)?;
    let opf = archive.read_entry_string(&opf_path)?;
    let (manifest, idrefs) = parse_opf(&opf)?;
    let base_dir = parent_dir(&opf_path);

    let spine: Vec<SpineEntry> = idrefs
        .into_iter()
        .filter_map(|idref| {
            let Some(item) = manifest.get(&idref) else {
                warn!(%idref, "Spine references unknown manifest item");
                return None;
            };
            let href = strip_fragment(&item.href).to_string();
            Some(SpineEntry {
                path: resolve_href(base_dir, &href),
                href,
                declared_title: item.title.clone(),
                item_id: idref,
            })
        })
        .collect();

    debug!(opf = %opf_path, entries = spine.len(), "Read EPUB spine");
    Ok(Package { opf_path, spine })
}

/// `full-path` of the rootfile whose media type is the OPF package type.
fn parse_container(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                let media_type = attribute(&e, b"media-type");
                if media_type.as_deref() == Some(OPF_MEDIA_TYPE) {
                    if let Some(path) = attribute(&e, b"full-path").filter(|p| !p.is_empty()) {
                        return Ok(path);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Err(ExtractError::bad_archive(
        "container.xml declares no OPF package rootfile",
    ))
}

/// Manifest items by id, and spine idrefs in order.
fn parse_opf(xml: &str) -> Result<(HashMap<String, ManifestItem>, Vec<String>)> {
    let mut reader = Reader::from_str(xml);
    let mut manifest = HashMap::new();
    let mut idrefs = Vec::new();
    let mut in_spine = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"item" => {
                    if let (Some(id), Some(href)) = (attribute(&e, b"id"), attribute(&e, b"href")) {
                        let title = attribute(&e, b"title").filter(|t| !t.trim().is_empty());
                        manifest.insert(id, ManifestItem { href, title });
                    }
                }
                b"spine" => in_spine = true,
                b"itemref" if in_spine => {
                    if let Some(idref) = attribute(&e, b"idref") {
                        idrefs.push(idref);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"spine" => in_spine = false,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((manifest, idrefs))
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

fn strip_fragment(href: &str) -> &str {
    href.split('#').next().unwrap_or(href)
}

/// Join `href` onto `base_dir`, percent-decode it and fold `.`/`..` segments.
pub fn resolve_href(base_dir: &str, href: &str) -> String {
    // a decoded escape that is not UTF-8 leaves the href as declared
    let decoded = urlencoding::decode(href).unwrap_or_else(|_| href.into());
    let mut segments: Vec<&str> = if decoded.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
