//! Adds the binary directory to the user's PATH via the shell profile
//!
//! The profile is treated as append-only. A line is added only when the
//! marker substring is absent, so repeated installs leave it unchanged.

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::prompt::ask_yes_no;
use crate::Result;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Shell whose profile format the installer writes
pub const SUPPORTED_SHELL: &str = "bash";

/// How an install attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Added,
    AlreadyPresent,
    Declined,
    UnsupportedShell,
    /// No profile configured, or it could not be read or written
    ProfileUnavailable,
}

/// Whether `shell` (a `$SHELL` value) names the supported shell
pub fn is_supported_shell(shell: Option<&str>) -> bool {
    shell
        .and_then(|s| Path::new(s).file_name())
        .and_then(|name| name.to_str())
        .map(|name| name == SUPPORTED_SHELL)
        .unwrap_or(false)
}

/// Read-only marker check; a missing profile has no marker
pub fn profile_contains_marker(profile: &Path, marker: &str) -> Result<bool> {
    match std::fs::read_to_string(profile) {
        Ok(content) => Ok(content.contains(marker)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// The line appended to the profile
pub fn export_line(bin_dir: &Path, marker: &str) -> String {
    format!("export PATH=\"$PATH:{}\" # {}", bin_dir.display(), marker)
}

/// Append `line` unless `marker` already occurs in the profile.
///
/// Returns `true` when the profile was written.
pub fn append_if_marker_absent(profile: &Path, marker: &str, line: &str) -> Result<bool> {
    if profile_contains_marker(profile, marker)? {
        return Ok(false);
    }

    let needs_newline = match std::fs::read(profile) {
        Ok(bytes) => bytes.last().map(|b| *b != b'\n').unwrap_or(false),
        Err(_) => false,
    };

    let mut file = OpenOptions::new().create(true).append(true).open(profile)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{}", line)?;
    Ok(true)
}

/// Offer to put the directory of `binary` on the PATH.
#[instrument(skip_all, fields(binary = ?binary))]
pub fn install_path<R, W>(
    config: &BuildConfig,
    binary: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<InstallOutcome>
where
    R: BufRead,
    W: Write,
{
    let bin_dir = binary
        .parent()
        .ok_or_else(|| BuildError::Config(format!("{:?} has no parent directory", binary)))?;
    let bin_dir = std::fs::canonicalize(bin_dir)?;

    let question = format!("Add {} to your PATH?", bin_dir.display());
    if !ask_yes_no(input, out, &question)? {
        writeln!(out, "SPINDEC was not added to PATH.")?;
        return Ok(InstallOutcome::Declined);
    }

    let Some(profile) = config.profile.as_deref() else {
        warn!("No shell profile configured (HOME is not set)");
        writeln!(
            out,
            "No shell profile configured; SPINDEC was not added to PATH. Add {} manually.",
            bin_dir.display()
        )?;
        return Ok(InstallOutcome::ProfileUnavailable);
    };

    let present = match profile_contains_marker(profile, &config.marker) {
        Ok(present) => present,
        Err(e) => return profile_unavailable(out, profile, &bin_dir, &e),
    };
    if present {
        writeln!(
            out,
            "SPINDEC is already present in {}, nothing added.",
            profile.display()
        )?;
        return Ok(InstallOutcome::AlreadyPresent);
    }

    if !is_supported_shell(config.shell.as_deref()) {
        debug!(shell = ?config.shell, "Unsupported shell");
        writeln!(
            out,
            "Unsupported shell {}; SPINDEC was not added to PATH. Add {} manually.",
            config.shell.as_deref().unwrap_or("(unknown)"),
            bin_dir.display()
        )?;
        return Ok(InstallOutcome::UnsupportedShell);
    }

    let line = export_line(&bin_dir, &config.marker);
    if let Err(e) = append_if_marker_absent(profile, &config.marker, &line) {
        return profile_unavailable(out, profile, &bin_dir, &e);
    }
    info!("Appended PATH export to {:?}", profile);
    writeln!(
        out,
        "SPINDEC added to PATH in {}. Run `source {}` or open a new shell.",
        profile.display(),
        profile.display()
    )?;
    Ok(InstallOutcome::Added)
}

fn profile_unavailable<W: Write>(
    out: &mut W,
    profile: &Path,
    bin_dir: &Path,
    err: &BuildError,
) -> Result<InstallOutcome> {
    warn!("Shell profile {:?} unusable: {}", profile, err);
    writeln!(
        out,
        "Could not update {}: {}. Add {} to PATH manually.",
        profile.display(),
        err,
        bin_dir.display()
    )?;
    Ok(InstallOutcome::ProfileUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn setup(shell: &str) -> (tempfile::TempDir, BuildConfig) {
        let dir = tempdir().unwrap();
        let config = BuildConfig::new(dir.path())
            .with_profile(dir.path().join(".bashrc"))
            .with_shell(shell);
        std::fs::create_dir_all(config.output_path()).unwrap();
        std::fs::write(config.binary_path(), b"").unwrap();
        (dir, config)
    }

    fn install(config: &BuildConfig, answers: &str) -> (InstallOutcome, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome = install_path(config, &config.binary_path(), &mut input, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_supported_shell_detection() {
        assert!(is_supported_shell(Some("/bin/bash")));
        assert!(is_supported_shell(Some("bash")));
        assert!(!is_supported_shell(Some("/usr/bin/zsh")));
        assert!(!is_supported_shell(None));
    }

    #[test]
    fn test_adds_export_line_once() {
        let (_dir, config) = setup("/bin/bash");
        let profile = config.profile.clone().unwrap();
        std::fs::write(&profile, "alias ll='ls -l'").unwrap();

        let (outcome, _) = install(&config, "y\n");
        assert_eq!(outcome, InstallOutcome::Added);

        let content = std::fs::read_to_string(&profile).unwrap();
        assert!(content.starts_with("alias ll='ls -l'\nexport PATH="));
        assert!(content.trim_end().ends_with("# spindec"));

        let (outcome, _) = install(&config, "\n");
        assert_eq!(outcome, InstallOutcome::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), content);
    }

    #[test]
    fn test_missing_profile_is_created() {
        let (_dir, config) = setup("/bin/bash");
        let (outcome, _) = install(&config, "y\n");
        assert_eq!(outcome, InstallOutcome::Added);
        assert!(config.profile.unwrap().exists());
    }

    #[test]
    fn test_decline_leaves_profile_alone() {
        let (_dir, config) = setup("/bin/bash");
        let (outcome, printed) = install(&config, "n\n");
        assert_eq!(outcome, InstallOutcome::Declined);
        assert!(printed.contains("not added"));
        assert!(!config.profile.unwrap().exists());
    }

    #[test]
    fn test_unsupported_shell_is_not_an_error() {
        let (_dir, config) = setup("/usr/bin/fish");
        let (outcome, printed) = install(&config, "y\n");
        assert_eq!(outcome, InstallOutcome::UnsupportedShell);
        assert!(printed.contains("Unsupported shell"));
        assert!(!config.profile.unwrap().exists());
    }

    #[test]
    fn test_marker_check_precedes_shell_check() {
        let (_dir, config) = setup("/usr/bin/zsh");
        let profile = config.profile.clone().unwrap();
        std::fs::write(&profile, "export PATH=\"$PATH:/opt/spindec/bin\"\n").unwrap();

        let (outcome, _) = install(&config, "y\n");
        assert_eq!(outcome, InstallOutcome::AlreadyPresent);
    }

    #[test]
    fn test_append_if_marker_absent_is_idempotent() {
        let dir = tempdir().unwrap();
        let profile = dir.path().join("profile");
        let line = export_line(Path::new("/opt/spindec/bin"), "spindec");

        assert!(append_if_marker_absent(&profile, "spindec", &line).unwrap());
        assert!(!append_if_marker_absent(&profile, "spindec", &line).unwrap());
        assert_eq!(
            std::fs::read_to_string(&profile).unwrap(),
            format!("{}\n", line)
        );
    }

    #[test]
    fn test_missing_profile_setting_is_not_an_error() {
        let (_dir, mut config) = setup("/bin/bash");
        config.profile = None;

        let (outcome, printed) = install(&config, "y\n");

        assert_eq!(outcome, InstallOutcome::ProfileUnavailable);
        assert!(printed.contains("manually"));
    }

    #[test]
    fn test_unreadable_profile_is_not_an_error() {
        let (_dir, config) = setup("/bin/bash");
        let profile = config.profile.clone().unwrap();
        std::fs::create_dir(&profile).unwrap();

        let (outcome, printed) = install(&config, "y\n");

        assert_eq!(outcome, InstallOutcome::ProfileUnavailable);
        assert!(printed.contains("Could not update"));
        assert!(profile.is_dir());
    }
}
