//! Removal of build artifacts
//!
//! Removal is best-effort: every matched artifact is attempted even if an
//! earlier one fails, and the failures are reported together afterwards.

use crate::artifacts::{list_artifacts, Artifact};
use crate::config::BuildConfig;
use crate::error::{BuildError, InvalidModeError};
use crate::prompt::ask_yes_no;
use crate::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, instrument, warn};

/// Confirmation policy for a clean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanMode {
    /// Remove without asking
    #[default]
    Auto,
    /// Ask before removing
    Confirm,
}

impl FromStr for CleanMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Ok(CleanMode::Auto),
            "confirm" | "c" => Ok(CleanMode::Confirm),
            other => Err(InvalidModeError {
                option: "clean",
                value: other.to_string(),
            }),
        }
    }
}

/// How a clean ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed(Vec<Artifact>),
    Declined,
}

/// Remove the binary, module and object files from the output directory.
///
/// Fails with [`BuildError::NothingToClean`] before prompting when there is
/// nothing to remove.
#[instrument(skip_all, fields(mode = ?mode))]
pub fn clean<R, W>(
    config: &BuildConfig,
    mode: CleanMode,
    input: &mut R,
    out: &mut W,
) -> Result<CleanOutcome>
where
    R: BufRead,
    W: Write,
{
    clean_with(config, mode, input, out, |path| std::fs::remove_file(path))
}

/// [`clean`] with a caller-supplied removal function
pub fn clean_with<R, W, F>(
    config: &BuildConfig,
    mode: CleanMode,
    input: &mut R,
    out: &mut W,
    remove: F,
) -> Result<CleanOutcome>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Path) -> io::Result<()>,
{
    let output_dir = config.output_path();
    let artifacts = list_artifacts(&output_dir, &config.binary_name)?;
    if artifacts.is_empty() {
        return Err(BuildError::NothingToClean(output_dir));
    }

    writeln!(out, "Found {} binaries:", artifacts.len())?;
    for artifact in &artifacts {
        writeln!(out, "  {} ({})", artifact, artifact.kind)?;
    }

    let confirmed = match mode {
        CleanMode::Auto => true,
        CleanMode::Confirm => ask_yes_no(input, out, "Remove these files?")?,
    };
    if !confirmed {
        writeln!(out, "Binaries not removed.")?;
        return Ok(CleanOutcome::Declined);
    }

    let failures = remove_all(&artifacts, remove);
    for (artifact, e) in &failures {
        writeln!(out, "Could not remove {}: {}", artifact, e)?;
    }
    if !failures.is_empty() {
        return Err(BuildError::CleanIncomplete {
            failed: failures.len(),
            total: artifacts.len(),
        });
    }

    info!("Removed {} artifact(s) from {:?}", artifacts.len(), output_dir);
    writeln!(out, "Binaries removed.")?;
    Ok(CleanOutcome::Removed(artifacts))
}

/// Remove every artifact, collecting the ones that could not be removed
pub fn remove_all<F>(artifacts: &[Artifact], mut remove: F) -> Vec<(&Artifact, io::Error)>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    artifacts
        .iter()
        .filter_map(|artifact| match remove(&artifact.path) {
            Ok(()) => None,
            Err(e) => {
                warn!("Failed to remove {:?}: {}", artifact.path, e);
                Some((artifact, e))
            }
        })
        .collect()
}
