//! Statement execution.
//!
//! One [`ScriptTree`] is walked twice with fresh [`Buffers`]: the filename pass
//! runs `filename` statements and the destination pass runs `destination` and
//! `subfolder` statements. Conditions, `skip` and `cancel` take effect in both.

use thiserror::Error;
use tracing::trace;

use crate::metadata::RenameRequest;

use super::EvalError;
use super::ast::{Expr, ScriptTree, Statement, Target};
use super::eval::Evaluator;

/// Output buffers filled by one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffers {
    /// Filename without extension.
    pub filename: String,
    /// Requested destination folder name or location.
    pub destination: String,
    /// Requested subfolder, segments separated by the reserved separator.
    pub subfolder: String,
    /// Whether a `set`/`add` wrote the destination.
    pub destination_written: bool,
    /// Whether a `set`/`add` wrote the subfolder.
    pub subfolder_written: bool,
}

impl Buffers {
    fn slot(&mut self, target: Target) -> &mut String {
        match target {
            Target::Filename | Target::DefaultFilename => &mut self.filename,
            Target::Destination => &mut self.destination,
            Target::Subfolder => &mut self.subfolder,
        }
    }

    fn mark_written(&mut self, target: Target) {
        match target {
            Target::Destination => self.destination_written = true,
            Target::Subfolder => self.subfolder_written = true,
            Target::Filename | Target::DefaultFilename => {}
        }
    }
}

/// Result of a pass that was not cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass ran to the end.
    Completed(Buffers),
    /// A `skip` statement ran; the buffers are discarded.
    Skipped,
}

/// Errors that abort a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// Evaluation failure
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// `cancel` statement with its message
    #[error("cancelled: {0}")]
    Cancelled(String),
}

/// Run the filename pass.
pub fn evaluate_for_filename(tree: &ScriptTree, request: &RenameRequest) -> Result<PassOutcome, ExecError> {
    Executor::new(request, Pass::Filename).run(tree)
}

/// Run the destination pass.
pub fn evaluate_for_destination(tree: &ScriptTree, request: &RenameRequest) -> Result<PassOutcome, ExecError> {
    Executor::new(request, Pass::Destination).run(tree)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Filename,
    Destination,
}

impl Pass {
    fn runs(self, target: Target) -> bool {
        target.is_destination_pass() == (self == Pass::Destination)
    }
}

enum Flow {
    Continue,
    Skip,
}

struct Executor<'a> {
    eval: Evaluator<'a>,
    pass: Pass,
    buffers: Buffers,
}

impl<'a> Executor<'a> {
    fn new(request: &'a RenameRequest, pass: Pass) -> Self {
        Self {
            eval: Evaluator::new(request),
            pass,
            buffers: Buffers::default(),
        }
    }

    fn run(mut self, tree: &ScriptTree) -> Result<PassOutcome, ExecError> {
        match self.run_block(&tree.statements)? {
            Flow::Continue => Ok(PassOutcome::Completed(self.buffers)),
            Flow::Skip => {
                trace!(pass = ?self.pass, "script skipped");
                Ok(PassOutcome::Skipped)
            }
        }
    }

    fn run_block(&mut self, statements: &[Statement]) -> Result<Flow, ExecError> {
        for statement in statements {
            if let Flow::Skip = self.run_statement(statement)? {
                return Ok(Flow::Skip);
            }
        }
        Ok(Flow::Continue)
    }

    fn run_statement(&mut self, statement: &Statement) -> Result<Flow, ExecError> {
        match statement {
            Statement::Conditional { arms, otherwise } => {
                for arm in arms {
                    if self.eval.truthy(&arm.condition)? {
                        return self.run_block(&arm.body);
                    }
                }
                match otherwise {
                    Some(body) => self.run_block(body),
                    None => Ok(Flow::Continue),
                }
            }
            Statement::Set { target, parts } if self.pass.runs(*target) => {
                let text = self.concat(*target, parts)?;
                *self.buffers.slot(*target) = text;
                self.buffers.mark_written(*target);
                Ok(Flow::Continue)
            }
            Statement::Add { target, parts } if self.pass.runs(*target) => {
                let text = self.concat(*target, parts)?;
                self.buffers.slot(*target).push_str(&text);
                self.buffers.mark_written(*target);
                Ok(Flow::Continue)
            }
            Statement::Replace { target, from, to } if self.pass.runs(*target) => {
                let from = self.operand(*target, from)?;
                let to = self.operand(*target, to)?;
                if !from.is_empty() {
                    let slot = self.buffers.slot(*target);
                    *slot = slot.replace(&from, &to);
                }
                Ok(Flow::Continue)
            }
            Statement::Set { .. } | Statement::Add { .. } | Statement::Replace { .. } => {
                Ok(Flow::Continue)
            }
            Statement::Skip => Ok(Flow::Skip),
            Statement::Cancel(parts) => {
                let message = parts
                    .iter()
                    .map(|part| self.eval.text(part))
                    .collect::<Result<String, _>>()?;
                Err(ExecError::Cancelled(message))
            }
        }
    }

    fn concat(&self, target: Target, parts: &[Expr]) -> Result<String, EvalError> {
        parts.iter().map(|part| self.operand(target, part)).collect()
    }

    fn operand(&self, target: Target, expr: &Expr) -> Result<String, EvalError> {
        match target {
            Target::Subfolder => self.eval.path_text(expr),
            _ => self.eval.text(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{SEGMENT_SEPARATOR, WILDCARD_SEGMENT};
    use crate::script::parse_script;

    fn request() -> RenameRequest {
        serde_json::from_value(serde_json::json!({
            "file": { "id": 7, "path": "/media/anime/Show/ep01.mkv" },
            "anime": [{ "id": 1, "preferred_title": "Show", "kind": "TvSeries" }],
            "episodes": [{ "id": 10, "anime_id": 1, "number": 4, "kind": "Episode" }]
        }))
        .expect("request fixture")
    }

    fn run(script: &str) -> (PassOutcome, PassOutcome) {
        let tree = parse_script(script).expect("parse");
        let req = request();
        (
            evaluate_for_filename(&tree, &req).expect("filename pass"),
            evaluate_for_destination(&tree, &req).expect("destination pass"),
        )
    }

    fn completed(outcome: PassOutcome) -> Buffers {
        match outcome {
            PassOutcome::Completed(buffers) => buffers,
            PassOutcome::Skipped => panic!("pass was skipped"),
        }
    }

    #[test]
    fn passes_write_disjoint_buffers() {
        let (names, places) = run("set AnimeTitlePreferred ' - ' pad(EpisodeNumber, 2)\n destination set 'Library'");
        let names = completed(names);
        assert_eq!(names.filename, "Show - 04");
        assert_eq!(names.destination, "");
        assert!(!names.destination_written);

        let places = completed(places);
        assert_eq!(places.filename, "");
        assert_eq!(places.destination, "Library");
        assert!(places.destination_written);
        assert!(!places.subfolder_written);
    }

    #[test]
    fn add_and_replace_edit_the_buffer() {
        let (names, _) = run("set 'a-b' add '-c' replace '-' '_' replace '' 'x'");
        assert_eq!(completed(names).filename, "a_b_c");
    }

    #[test]
    fn conditionals_pick_first_true_arm() {
        let (names, _) = run(
            "if (EpisodeNumber > 10) set 'late' else if (AnimeTitlePreferred == 'Show') set 'match' else set 'none'",
        );
        assert_eq!(completed(names).filename, "match");
    }

    #[test]
    fn skip_applies_to_both_passes() {
        let (names, places) = run("if (AnimeId == 1) skip");
        assert_eq!(names, PassOutcome::Skipped);
        assert_eq!(places, PassOutcome::Skipped);
    }

    #[test]
    fn cancel_is_ungated_and_concatenates() {
        let tree = parse_script("subfolder set 'x' cancel 'a' 'b'").expect("parse");
        let req = request();
        for outcome in [
            evaluate_for_filename(&tree, &req),
            evaluate_for_destination(&tree, &req),
        ] {
            assert_eq!(outcome, Err(ExecError::Cancelled("ab".into())));
        }
    }

    #[test]
    fn subfolder_literals_mark_segments() {
        let (_, places) = run("subfolder set AnimeTitlePreferred '/' '*' '\\\\Extra'");
        let buffers = completed(places);
        assert_eq!(
            buffers.subfolder,
            format!("Show{SEGMENT_SEPARATOR}{WILDCARD_SEGMENT}{SEGMENT_SEPARATOR}Extra")
        );
        assert!(buffers.subfolder_written);
    }

    #[test]
    fn type_errors_surface() {
        let tree = parse_script("set Restricted").expect("parse");
        let err = evaluate_for_filename(&tree, &request()).unwrap_err();
        assert!(matches!(err, ExecError::Eval(EvalError::TypeMismatch { .. })));
    }
}
