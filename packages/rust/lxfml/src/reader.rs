//! Group hierarchy extraction.
//!
//! Locates the first `LXFML` element, the first `GroupSystem` below it, and
//! reads its nested `Group` elements into a [`GroupSystem`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use groups2bi_shared::{Group, GroupSystem, Groups2BiError, Result};

use crate::{GROUP, GROUP_SYSTEM, LXFML, PART_REFS, xml_error};

/// Deepest `Group` nesting accepted below a `GroupSystem`.
pub const MAX_GROUP_DEPTH: usize = 256;

/// Read the group hierarchy of an LXFML document.
///
/// # Errors
///
/// - [`Groups2BiError::NotLxfml`] when no `LXFML` element exists
/// - [`Groups2BiError::MissingGroupSystem`] when `LXFML` has no `GroupSystem`
/// - [`Groups2BiError::Xml`] when the XML before the group system is malformed
pub fn read_group_system(xml: &str) -> Result<GroupSystem> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) if e.name().as_ref() == LXFML => {
                let system = find_group_system(&mut reader)?;
                debug!(
                    top_level = system.groups.len(),
                    total = system.group_count(),
                    "read group system"
                );
                return Ok(system);
            }
            Event::Empty(ref e) if e.name().as_ref() == LXFML => {
                return Err(Groups2BiError::MissingGroupSystem);
            }
            Event::Eof => return Err(Groups2BiError::NotLxfml),
            _ => {}
        }
    }
}

/// Scan the content of the `LXFML` element for the first `GroupSystem`.
fn find_group_system(reader: &mut Reader<&[u8]>) -> Result<GroupSystem> {
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) if e.name().as_ref() == GROUP_SYSTEM => {
                let groups = read_groups(reader, GROUP_SYSTEM, 0)?;
                return Ok(GroupSystem { groups });
            }
            Event::Empty(ref e) if e.name().as_ref() == GROUP_SYSTEM => {
                return Ok(GroupSystem::default());
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Err(Groups2BiError::MissingGroupSystem),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(unexpected_eof(LXFML)),
            _ => {}
        }
    }
}

/// Read the direct `Group` children of the element that was just opened,
/// consuming everything up to and including its end tag. `depth` counts the
/// `Group` elements enclosing `parent`'s children.
fn read_groups(reader: &mut Reader<&[u8]>, parent: &[u8], depth: usize) -> Result<Vec<Group>> {
    let mut groups = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) if e.name().as_ref() == GROUP => {
                if depth >= MAX_GROUP_DEPTH {
                    return Err(Groups2BiError::xml(format!(
                        "groups nested deeper than {MAX_GROUP_DEPTH} levels"
                    )));
                }
                let part_refs = part_refs_attribute(e)?;
                let children = read_groups(reader, GROUP, depth + 1)?;
                groups.push(Group {
                    part_refs,
                    children,
                });
            }
            Event::Empty(ref e) if e.name().as_ref() == GROUP => {
                groups.push(Group {
                    part_refs: part_refs_attribute(e)?,
                    children: Vec::new(),
                });
            }
            // Anything else nested in a group is not ours to interpret
            Event::Start(ref e) => {
                reader.read_to_end(e.name()).map_err(xml_error)?;
            }
            // End names are checked by the reader, so this closes `parent`
            Event::End(_) => return Ok(groups),
            Event::Eof => return Err(unexpected_eof(parent)),
            _ => {}
        }
    }
}

/// Get the unescaped `partRefs` attribute, if present.
fn part_refs_attribute(e: &BytesStart) -> Result<Option<String>> {
    match e.try_get_attribute(PART_REFS).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

fn unexpected_eof(element: &[u8]) -> Groups2BiError {
    Groups2BiError::xml(format!(
        "unexpected end of file inside {}",
        String::from_utf8_lossy(element)
    ))
}
