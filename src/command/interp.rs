use crate::command::table::{self, Phase, ScriptCtx, Step};
use crate::foundation::config::BridgeOpts;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::registry::table::Registry;
use crate::term::marshal::atom_name;
use crate::term::value::Term;

/// Reject a command whose phase cannot follow `state` (`None` = nothing created yet).
fn check_phase(state: Option<Phase>, name: &str, phase: Phase) -> BridgeResult<()> {
    match (phase, state) {
        (Phase::Seed, None | Some(Phase::Seed)) => Ok(()),
        (Phase::Seed, _) => Err(BridgeError::bad_argument(format!(
            "{name}: creation command after the image was mutated"
        ))),
        (Phase::Grow | Phase::Crop, Some(_)) => Ok(()),
        (Phase::Grow | Phase::Crop, None) => Err(BridgeError::bad_argument(format!(
            "{name}: no image has been created yet"
        ))),
    }
}

/// Run a command script against a fresh pipeline image.
///
/// Each entry is a tuple `{name, arg...}`. Creation commands come first, then mutations;
/// the first extraction command produces the result and ends the script, ignoring any
/// later entries. A failing entry aborts the script with its error. A script that runs out
/// of entries before an extraction fails with `ScriptIncomplete`.
#[tracing::instrument(skip_all, fields(entries = script.len()))]
pub fn run(registry: &Registry, opts: &BridgeOpts, script: &[Term]) -> BridgeResult<Term> {
    let mut ctx = ScriptCtx::new(registry, opts);
    let mut state = None;

    for (i, entry) in script.iter().enumerate() {
        let Term::Tuple(items) = entry else {
            return Err(BridgeError::bad_argument(format!(
                "script entry {i} must be a tuple, got {}",
                entry.kind_name()
            )));
        };
        let Some((head, args)) = items.split_first() else {
            return Err(BridgeError::bad_argument(format!("script entry {i} is empty")));
        };
        let name = atom_name(head)
            .map_err(|e| BridgeError::bad_argument(format!("script entry {i}: {e}")))?;
        let command = table::lookup(name)
            .ok_or_else(|| BridgeError::bad_argument(format!("unknown command '{name}'")))?;
        check_phase(state, name, command.phase)?;

        tracing::trace!(step = i, command = name, dims = %ctx.img.dims(), "script step");
        match (command.run)(&mut ctx, args)? {
            Step::Seed => state = Some(Phase::Seed),
            Step::Grow => state = Some(Phase::Grow),
            Step::Crop(result) => return Ok(result),
        }
    }

    Err(BridgeError::script_incomplete(format!(
        "{} entries ran without an extraction command",
        script.len()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/command/interp.rs"]
mod tests;
