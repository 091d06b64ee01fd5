//! Building instruction builder.
//!
//! Walks the group hierarchy depth-first and turns it into numbered steps:
//! groups with part refs become steps, and groups that have both children and
//! siblings open a sub-step whose children are numbered from 1 again, until
//! the configured sub-step depth is reached. Below that depth (and for only
//! children) nested groups are flattened into the enclosing scope.

use tracing::{debug, instrument};

use groups2bi_shared::{BuildOptions, BuildingInstruction, Group, GroupSystem, Step};

use crate::part_refs::split_part_refs;

/// Build the instruction for a whole group system.
#[instrument(skip_all, fields(groups = system.groups.len(), max_substep_depth = options.max_substep_depth))]
pub fn build_instruction(system: &GroupSystem, options: &BuildOptions) -> BuildingInstruction {
    let instruction = BuildingInstruction::new(build_steps(&system.groups, options.max_substep_depth));

    debug!(
        steps = instruction.step_count(),
        depth = instruction.max_depth(),
        "instruction built"
    );

    instruction
}

/// Build the top-level steps for `groups`, nesting sub-steps at most
/// `max_substep_depth` levels deep. A negative depth disables sub-steps.
///
/// All top-level groups share one running step number.
pub fn build_steps(groups: &[Group], max_substep_depth: i32) -> Vec<Step> {
    let mut scope = StepScope::top_level();
    let has_siblings = groups.len() > 1;

    for group in groups {
        generate_steps(group, has_siblings, &mut scope, 0, max_substep_depth);
    }

    scope.into_steps()
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// One step sequence being filled, with its own running number.
struct StepScope {
    /// Name of the step owning this sequence; `None` at top level.
    owner: Option<String>,
    steps: Vec<Step>,
    next: u32,
}

impl StepScope {
    fn top_level() -> Self {
        Self {
            owner: None,
            steps: Vec::new(),
            next: 1,
        }
    }

    fn substeps_of(owner: String) -> Self {
        Self {
            owner: Some(owner),
            steps: Vec::new(),
            next: 1,
        }
    }

    /// Take the next name in this scope: `StepN` at top level,
    /// `<owner>SubstepN` below it.
    fn next_name(&mut self) -> String {
        let number = self.next;
        self.next += 1;

        match &self.owner {
            None => format!("Step{number}"),
            Some(owner) => format!("{owner}Substep{number}"),
        }
    }

    fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

// ---------------------------------------------------------------------------
// Recursion
// ---------------------------------------------------------------------------

/// Emit the steps for `group` into `scope`.
///
/// `has_siblings` is whether the group's parent holds more than one group,
/// counting siblings that produce no steps themselves.
fn generate_steps(
    group: &Group,
    has_siblings: bool,
    scope: &mut StepScope,
    depth: i32,
    max_depth: i32,
) {
    let part_refs = group
        .part_refs
        .as_deref()
        .map(split_part_refs)
        .unwrap_or_default();

    if !part_refs.is_empty() {
        let name = scope.next_name();
        scope.push(Step {
            name,
            part_refs,
            substeps: Vec::new(),
        });
    }

    if group.children.is_empty() {
        return;
    }

    let children_have_siblings = group.children.len() > 1;

    if has_siblings && depth < max_depth {
        // The container takes its number before any of its children are visited
        let name = scope.next_name();
        let mut substeps = StepScope::substeps_of(name.clone());

        for child in &group.children {
            generate_steps(child, children_have_siblings, &mut substeps, depth + 1, max_depth);
        }

        scope.push(Step {
            name,
            part_refs: Vec::new(),
            substeps: substeps.into_steps(),
        });
    } else {
        for child in &group.children {
            generate_steps(child, children_have_siblings, scope, depth, max_depth);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
