//! Building instruction output.
//!
//! Renders a [`BuildingInstruction`] as a `BuildingInstructions` element and
//! splices it into an existing document in place of any earlier ones.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use groups2bi_shared::{BuildingInstruction, Groups2BiError, Result, Step};

use crate::{BUILDING_INSTRUCTION, BUILDING_INSTRUCTIONS, LXFML, PART_REF, STEP, xml_error};

/// UTF-8 byte order mark, kept in front of the rewritten document.
const BOM: &str = "\u{feff}";

/// A rewritten document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The full document text.
    pub xml: String,
    /// How many earlier `BuildingInstructions` elements were dropped.
    pub removed: usize,
}

/// Render the `BuildingInstructions` element for an instruction tree.
///
/// Nested elements are indented by `indent` spaces per level; the first line
/// is not indented and there is no trailing newline.
pub fn render_instructions(instruction: &BuildingInstruction, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);

    write(&mut writer, Event::Start(BytesStart::new(BUILDING_INSTRUCTIONS)))?;

    let mut start = BytesStart::new(BUILDING_INSTRUCTION);
    start.push_attribute(("name", instruction.name.as_str()));
    if instruction.steps.is_empty() {
        write(&mut writer, Event::Empty(start))?;
    } else {
        write(&mut writer, Event::Start(start))?;
        for step in &instruction.steps {
            write_step(&mut writer, step)?;
        }
        write(&mut writer, Event::End(BytesEnd::new(BUILDING_INSTRUCTION)))?;
    }

    write(&mut writer, Event::End(BytesEnd::new(BUILDING_INSTRUCTIONS)))?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_step<W: Write>(writer: &mut Writer<W>, step: &Step) -> Result<()> {
    let mut start = BytesStart::new(STEP);
    start.push_attribute(("name", step.name.as_str()));

    if step.part_refs.is_empty() && step.substeps.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    for part_ref in &step.part_refs {
        let mut element = BytesStart::new(PART_REF);
        element.push_attribute(("partRef", part_ref.as_str()));
        write(writer, Event::Empty(element))?;
    }
    for substep in &step.substeps {
        write_step(writer, substep)?;
    }
    write(writer, Event::End(BytesEnd::new(STEP)))
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

/// Where the rewrite is relative to the first `LXFML` element.
enum Position {
    Before,
    /// Inside `LXFML`, `depth` elements below it.
    Inside { depth: usize },
    After,
}

/// Replace the building instructions of a document.
///
/// Every `BuildingInstructions` element below the first `LXFML` element is
/// dropped together with the blank text right before it, and the rendered
/// `instruction` is appended as the last child of `LXFML`. Everything else
/// is copied through unchanged, so rewriting a rewritten document with the
/// same instruction reproduces it byte for byte.
pub fn replace_instructions(
    xml: &str,
    instruction: &BuildingInstruction,
    indent: usize,
) -> Result<Rewrite> {
    let newline = line_ending(xml);
    let fragment = indent_fragment(&render_instructions(instruction, indent)?, indent, newline);

    let mut writer = Writer::new(Vec::new());
    let body = match xml.strip_prefix(BOM) {
        Some(body) => {
            writer.get_mut().extend_from_slice(BOM.as_bytes());
            body
        }
        None => xml,
    };
    let mut reader = Reader::from_str(body);
    let mut position = Position::Before;
    let mut pending_blank: Option<BytesText<'_>> = None;
    let mut removed = 0usize;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        if let Event::Eof = event {
            break;
        }

        match position {
            Position::Before => match event {
                Event::Start(ref e) if e.name().as_ref() == LXFML => {
                    position = Position::Inside { depth: 0 };
                    write(&mut writer, event)?;
                }
                Event::Empty(e) if e.name().as_ref() == LXFML => {
                    let end = BytesEnd::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    write(&mut writer, Event::Start(e))?;
                    writer.get_mut().extend_from_slice(fragment.as_bytes());
                    writer.get_mut().extend_from_slice(newline.as_bytes());
                    write(&mut writer, Event::End(end))?;
                    position = Position::After;
                }
                _ => write(&mut writer, event)?,
            },
            Position::Inside { depth } => match event {
                Event::Text(text) if is_blank(&text) => {
                    if let Some(previous) = pending_blank.replace(text) {
                        write(&mut writer, Event::Text(previous))?;
                    }
                }
                Event::Start(ref e) if e.name().as_ref() == BUILDING_INSTRUCTIONS.as_bytes() => {
                    pending_blank = None;
                    reader.read_to_end(e.name()).map_err(xml_error)?;
                    removed += 1;
                }
                Event::Empty(ref e) if e.name().as_ref() == BUILDING_INSTRUCTIONS.as_bytes() => {
                    pending_blank = None;
                    removed += 1;
                }
                Event::End(_) if depth == 0 => {
                    writer.get_mut().extend_from_slice(fragment.as_bytes());
                    match pending_blank.take() {
                        Some(blank) => write(&mut writer, Event::Text(blank))?,
                        None => writer.get_mut().extend_from_slice(newline.as_bytes()),
                    }
                    write(&mut writer, event)?;
                    position = Position::After;
                }
                event => {
                    if let Some(blank) = pending_blank.take() {
                        write(&mut writer, Event::Text(blank))?;
                    }
                    position = match event {
                        Event::Start(_) => Position::Inside { depth: depth + 1 },
                        Event::End(_) => Position::Inside { depth: depth - 1 },
                        _ => Position::Inside { depth },
                    };
                    write(&mut writer, event)?;
                }
            },
            Position::After => write(&mut writer, event)?,
        }
    }

    match position {
        Position::Before => Err(Groups2BiError::NotLxfml),
        Position::Inside { .. } => Err(Groups2BiError::xml("unexpected end of file inside LXFML")),
        Position::After => {
            debug!(removed, "replaced building instructions");
            let xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
            Ok(Rewrite { xml, removed })
        }
    }
}

/// The document's line ending: CRLF if it uses any, LF otherwise.
fn line_ending(xml: &str) -> &'static str {
    if xml.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Prefix the rendered fragment with a line break and shift it one level in.
fn indent_fragment(rendered: &str, indent: usize, newline: &str) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::with_capacity(rendered.len() + 16);
    for line in rendered.lines() {
        out.push_str(newline);
        out.push_str(&pad);
        out.push_str(line);
    }
    out
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
