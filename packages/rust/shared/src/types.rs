//! Core domain types: the group hierarchy read from LXFML and the building
//! instruction tree generated from it.

use serde::{Deserialize, Serialize};

/// Name given to the single `BuildingInstruction` element the tool emits.
pub const BUILDING_GUIDE_NAME: &str = "BuildingGuide1";

// ---------------------------------------------------------------------------
// Input: groups
// ---------------------------------------------------------------------------

/// A node of the source group hierarchy.
///
/// Parents are not linked from their children. Whoever walks the tree knows
/// how many siblings a group has from the length of the parent's `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Raw `partRefs` attribute text (comma-separated), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_refs: Option<String>,
    /// Nested groups, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Group>,
}

impl Group {
    /// A group with the given part refs and child groups.
    pub fn new(part_refs: Option<&str>, children: Vec<Group>) -> Self {
        Self {
            part_refs: part_refs.map(String::from),
            children,
        }
    }

    /// A group carrying part refs and nothing else.
    pub fn leaf(part_refs: &str) -> Self {
        Self::new(Some(part_refs), Vec::new())
    }

    /// A group without part refs that only nests other groups.
    pub fn container(children: Vec<Group>) -> Self {
        Self::new(None, children)
    }
}

/// The ordered top-level groups of an LXFML `GroupSystem` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSystem {
    pub groups: Vec<Group>,
}

impl GroupSystem {
    /// Total number of groups at every level.
    pub fn group_count(&self) -> usize {
        fn count(groups: &[Group]) -> usize {
            groups.iter().map(|g| 1 + count(&g.children)).sum()
        }
        count(&self.groups)
    }
}

// ---------------------------------------------------------------------------
// Output: steps
// ---------------------------------------------------------------------------

/// A single step of a building instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique name within the parent scope (`Step2`, `Step2Substep1`, ...).
    pub name: String,
    /// Part references attached directly to this step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part_refs: Vec<String>,
    /// Nested sub-steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substeps: Vec<Step>,
}

impl Step {
    fn count(&self) -> usize {
        1 + self.substeps.iter().map(Step::count).sum::<usize>()
    }

    fn part_ref_count(&self) -> usize {
        self.part_refs.len() + self.substeps.iter().map(Step::part_ref_count).sum::<usize>()
    }

    fn depth(&self) -> usize {
        1 + self.substeps.iter().map(Step::depth).max().unwrap_or(0)
    }
}

/// Root of the generated instruction tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingInstruction {
    /// Always [`BUILDING_GUIDE_NAME`] for generated instructions.
    pub name: String,
    /// Top-level steps in build order.
    pub steps: Vec<Step>,
}

impl BuildingInstruction {
    /// Wrap top-level steps in an instruction named [`BUILDING_GUIDE_NAME`].
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            name: BUILDING_GUIDE_NAME.to_string(),
            steps,
        }
    }

    /// Number of steps at every level.
    pub fn step_count(&self) -> usize {
        self.steps.iter().map(Step::count).sum()
    }

    /// Number of part references attached anywhere in the tree.
    pub fn part_ref_count(&self) -> usize {
        self.steps.iter().map(Step::part_ref_count).sum()
    }

    /// Deepest step level: 0 when empty, 1 when there are no sub-steps.
    pub fn max_depth(&self) -> usize {
        self.steps.iter().map(Step::depth).max().unwrap_or(0)
    }
}
