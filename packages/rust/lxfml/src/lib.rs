//! LXFML document access.
//!
//! Reads the `GroupSystem` hierarchy out of an LXFML model description and
//! writes generated building instructions back into it. The document is kept
//! as text and streamed through `quick-xml`, so content this crate does not
//! understand is preserved as-is.

use std::fmt::Display;
use std::path::Path;

use groups2bi_shared::{BuildingInstruction, GroupSystem, Groups2BiError, Result};

pub mod reader;
pub mod writer;

pub use reader::{MAX_GROUP_DEPTH, read_group_system};
pub use writer::{Rewrite, render_instructions, replace_instructions};

const LXFML: &[u8] = b"LXFML";
const GROUP_SYSTEM: &[u8] = b"GroupSystem";
const GROUP: &[u8] = b"Group";
const PART_REFS: &str = "partRefs";

const BUILDING_INSTRUCTIONS: &str = "BuildingInstructions";
const BUILDING_INSTRUCTION: &str = "BuildingInstruction";
const STEP: &str = "Step";
const PART_REF: &str = "PartRef";

fn xml_error(e: impl Display) -> Groups2BiError {
    Groups2BiError::xml(e.to_string())
}

/// An LXFML document held in memory.
#[derive(Debug, Clone)]
pub struct LxfmlDocument {
    xml: String,
}

impl LxfmlDocument {
    /// Wrap document text. Nothing is parsed until it is queried.
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// Read a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let xml =
            std::fs::read_to_string(path).map_err(|e| Groups2BiError::read_input(path, e))?;
        Ok(Self::new(xml))
    }

    /// The document text.
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    /// The group hierarchy of the first `GroupSystem`.
    pub fn group_system(&self) -> Result<GroupSystem> {
        read_group_system(&self.xml)
    }

    /// A copy of this document carrying `instruction` as its only building
    /// instructions.
    pub fn with_instructions(
        &self,
        instruction: &BuildingInstruction,
        indent: usize,
    ) -> Result<Rewrite> {
        replace_instructions(&self.xml, instruction, indent)
    }
}
