//! End-to-end regeneration: LXFML file → groups → steps → rewritten LXFML file.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, instrument};

use groups2bi_lxfml::LxfmlDocument;
use groups2bi_shared::{BuildOptions, BuildingInstruction, Groups2BiError, Result};

use crate::builder::build_instruction;

/// Configuration for the `regenerate` pipeline.
#[derive(Debug, Clone)]
pub struct RegenerateConfig {
    /// LXFML file to read.
    pub input: PathBuf,
    /// File to write; the input is overwritten when `None`.
    pub output: Option<PathBuf>,
    /// Build options (sub-step depth, indentation).
    pub options: BuildOptions,
    /// Build the instruction but leave the filesystem untouched.
    pub dry_run: bool,
}

impl RegenerateConfig {
    /// Where the rewritten document goes.
    pub fn output_path(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.input)
    }
}

/// Result of the `regenerate` pipeline.
#[derive(Debug)]
pub struct RegenerateResult {
    /// Path the document was (or would have been) written to.
    pub output: PathBuf,
    /// The generated instruction tree.
    pub instruction: BuildingInstruction,
    /// Number of earlier `BuildingInstructions` elements removed.
    pub removed: usize,
    /// Whether the output file was written.
    pub written: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Run the full regeneration pipeline.
///
/// 1. Check that the input exists and read it
/// 2. Extract the group system
/// 3. Build the instruction tree
/// 4. Replace the document's building instructions
/// 5. Write the result (unless `dry_run`)
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn regenerate(config: &RegenerateConfig) -> Result<RegenerateResult> {
    let start = Instant::now();

    if !config.input.exists() {
        return Err(Groups2BiError::input_not_found(&config.input));
    }

    let document = LxfmlDocument::load(&config.input)?;
    let system = document.group_system()?;
    let instruction = build_instruction(&system, &config.options);
    let rewrite = document.with_instructions(&instruction, config.options.indent)?;

    let output = config.output_path().clone();
    if config.dry_run {
        debug!(output = %output.display(), "dry run, not writing output");
    } else {
        std::fs::write(&output, &rewrite.xml).map_err(|e| Groups2BiError::io(&output, e))?;
    }

    let result = RegenerateResult {
        output,
        instruction,
        removed: rewrite.removed,
        written: !config.dry_run,
        elapsed: start.elapsed(),
    };

    info!(
        output = %result.output.display(),
        steps = result.instruction.step_count(),
        part_refs = result.instruction.part_ref_count(),
        removed = result.removed,
        written = result.written,
        "building instructions regenerated"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LXFML versionMajor="5">
  <Bricks/>
  <GroupSystem>
    <Group partRefs="x,y"/>
    <Group>
      <Group partRefs="z"/>
      <Group partRefs="w"/>
    </Group>
  </GroupSystem>
</LXFML>
"#;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("g2bi-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(input: &Path, output: Option<PathBuf>) -> RegenerateConfig {
        RegenerateConfig {
            input: input.into(),
            output,
            options: BuildOptions::default(),
            dry_run: false,
        }
    }

    #[test]
    fn regenerates_in_place() {
        let tmp = temp_dir();
        let input = tmp.join("model.lxfml");
        std::fs::write(&input, MODEL).unwrap();

        let result = regenerate(&config(&input, None)).expect("regenerate");
        assert_eq!(result.output, input);
        assert!(result.written);
        assert_eq!(result.removed, 0);
        assert_eq!(result.instruction.step_count(), 4);

        let written = std::fs::read_to_string(&input).unwrap();
        assert!(written.contains(r#"<Step name="Step2Substep2">"#));
        assert!(written.contains("<Bricks/>"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn second_run_reproduces_the_file() {
        let tmp = temp_dir();
        let input = tmp.join("model.lxfml");
        std::fs::write(&input, MODEL).unwrap();

        regenerate(&config(&input, None)).expect("first run");
        let first = std::fs::read_to_string(&input).unwrap();

        let result = regenerate(&config(&input, None)).expect("second run");
        let second = std::fs::read_to_string(&input).unwrap();

        assert_eq!(result.removed, 1);
        assert_eq!(first, second);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn writes_to_separate_output() {
        let tmp = temp_dir();
        let input = tmp.join("model.lxfml");
        let output = tmp.join("guide.lxfml");
        std::fs::write(&input, MODEL).unwrap();

        let mut cfg = config(&input, Some(output.clone()));
        cfg.options.max_substep_depth = 0;
        let result = regenerate(&cfg).expect("regenerate");

        assert_eq!(result.output, output);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), MODEL);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains(r#"<Step name="Step3">"#));
        assert!(!written.contains("Substep"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn dry_run_leaves_files_alone() {
        let tmp = temp_dir();
        let input = tmp.join("model.lxfml");
        std::fs::write(&input, MODEL).unwrap();

        let mut cfg = config(&input, None);
        cfg.dry_run = true;
        let result = regenerate(&cfg).expect("regenerate");

        assert!(!result.written);
        assert_eq!(result.instruction.steps.len(), 2);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), MODEL);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_input_is_reported() {
        let tmp = temp_dir();
        let err = regenerate(&config(&tmp.join("absent.lxfml"), None)).unwrap_err();
        assert!(matches!(err, Groups2BiError::InputNotFound { .. }));
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn document_errors_leave_input_untouched() {
        let tmp = temp_dir();

        let not_lxfml = tmp.join("scene.xml");
        std::fs::write(&not_lxfml, "<Scene/>").unwrap();
        let err = regenerate(&config(&not_lxfml, None)).unwrap_err();
        assert!(matches!(err, Groups2BiError::NotLxfml));

        let no_groups = tmp.join("bricks.lxfml");
        std::fs::write(&no_groups, "<LXFML><Bricks/></LXFML>").unwrap();
        let err = regenerate(&config(&no_groups, None)).unwrap_err();
        assert!(matches!(err, Groups2BiError::MissingGroupSystem));
        assert_eq!(
            std::fs::read_to_string(&no_groups).unwrap(),
            "<LXFML><Bricks/></LXFML>"
        );

        std::fs::remove_dir_all(&tmp).ok();
    }
}
