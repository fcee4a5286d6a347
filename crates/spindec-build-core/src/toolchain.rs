//! Compiler invocation and NetCDF flag discovery
//!
//! The compile operation asks the configuration helper for the NetCDF
//! compile and link flags, assembles one compiler command line covering
//! every source file, echoes it, and runs it.

use crate::artifacts::list_sources;
use crate::config::BuildConfig;
use crate::error::{BuildError, InvalidModeError};
use crate::Result;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Diagnostics level of a compile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// Debug symbols only
    #[default]
    Default,
    /// Strict checking: implicit-none, runtime checks, warnings, backtraces
    Debug,
}

impl CompileMode {
    /// Mode-specific compiler flags
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            CompileMode::Default => &["-g"],
            CompileMode::Debug => &[
                "-g",
                "-fimplicit-none",
                "-fcheck=all",
                "-Wall",
                "-Wextra",
                "-pedantic",
                "-fbacktrace",
            ],
        }
    }
}

impl FromStr for CompileMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Ok(CompileMode::Default),
            "debug" | "d" => Ok(CompileMode::Debug),
            other => Err(InvalidModeError {
                option: "compile",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileMode::Default => f.write_str("default"),
            CompileMode::Debug => f.write_str("debug"),
        }
    }
}

/// Flags reported by the NetCDF-Fortran configuration helper
///
/// Kept as the helper printed them; split on whitespace only when the
/// command line is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// Output of `nf-config --flibs`
    pub link_flags: String,
    /// Output of `nf-config --fflags`
    pub compile_flags: String,
}

/// Captured output of a successful tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A fully assembled compiler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CompileCommand {
    /// Assemble the invocation:
    /// compiler, mode flags, compile flags, sources, `-J <out>`, link flags,
    /// `-o <binary>`.
    pub fn build(
        config: &BuildConfig,
        mode: CompileMode,
        flags: &ToolchainConfig,
        sources: &[PathBuf],
    ) -> Self {
        let mut args: Vec<String> = mode.flags().iter().map(|f| f.to_string()).collect();
        args.extend(flags.compile_flags.split_whitespace().map(String::from));
        args.extend(sources.iter().map(|p| p.display().to_string()));
        args.push("-J".to_string());
        args.push(config.output_path().display().to_string());
        args.extend(flags.link_flags.split_whitespace().map(String::from));
        args.push("-o".to_string());
        args.push(config.binary_path().display().to_string());

        Self {
            program: config.compiler.clone(),
            args,
        }
    }

    /// Path passed to `-o`, if any
    pub fn output_path(&self) -> Option<&Path> {
        self.args
            .iter()
            .position(|a| a == "-o")
            .and_then(|i| self.args.get(i + 1))
            .map(Path::new)
    }
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Access to the external compiler toolchain
pub trait Toolchain {
    /// Query the configuration helper for link and compile flags
    fn library_flags(&self) -> Result<ToolchainConfig>;

    /// Run the compiler
    fn compile(&self, command: &CompileCommand) -> Result<ToolOutput>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn library_flags(&self) -> Result<ToolchainConfig> {
        (**self).library_flags()
    }

    fn compile(&self, command: &CompileCommand) -> Result<ToolOutput> {
        (**self).compile(command)
    }
}

/// Toolchain backed by real processes
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    helper: String,
}

impl ProcessToolchain {
    pub fn new(helper: impl Into<String>) -> Self {
        Self {
            helper: helper.into(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.config_helper.clone())
    }

    fn query(&self, arg: &str) -> Result<String> {
        let output = run_tool(&self.helper, &[arg])?;
        Ok(output.stdout.trim().to_string())
    }
}

impl Toolchain for ProcessToolchain {
    fn library_flags(&self) -> Result<ToolchainConfig> {
        let link_flags = self.query("--flibs")?;
        let compile_flags = self.query("--fflags")?;
        debug!(%link_flags, %compile_flags, "Queried {}", self.helper);

        Ok(ToolchainConfig {
            link_flags,
            compile_flags,
        })
    }

    fn compile(&self, command: &CompileCommand) -> Result<ToolOutput> {
        run_tool(&command.program, command.args.as_slice())
    }
}

/// Run `program` to completion, mapping launch and exit failures
pub fn run_tool<S: AsRef<std::ffi::OsStr>>(program: &str, args: &[S]) -> Result<ToolOutput> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| BuildError::ToolUnavailable {
            tool: program.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(BuildError::ToolFailed {
            tool: program.to_string(),
            code: output.status.code().unwrap_or(1),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

/// Compile the program; returns the path of the produced binary.
///
/// The command line is written to `out` before the compiler runs. On a
/// compiler failure any binary left at the output path is removed.
#[instrument(skip_all, fields(mode = %mode))]
pub fn compile<T, W>(
    config: &BuildConfig,
    mode: CompileMode,
    toolchain: &T,
    out: &mut W,
) -> Result<PathBuf>
where
    T: Toolchain + ?Sized,
    W: Write,
{
    let source_dir = config.source_path();
    if !source_dir.is_dir() {
        return Err(BuildError::NoSources(source_dir));
    }
    let sources = list_sources(&source_dir)?;
    if sources.is_empty() {
        return Err(BuildError::NoSources(source_dir));
    }
    info!("Compiling {} source file(s) from {:?}", sources.len(), source_dir);

    std::fs::create_dir_all(config.output_path())?;

    let flags = toolchain.library_flags()?;
    let command = CompileCommand::build(config, mode, &flags, &sources);

    writeln!(out, "{}", command)?;
    out.flush()?;

    let binary = config.binary_path();
    match toolchain.compile(&command) {
        Ok(output) => {
            relay(out, &output)?;
            info!("Built {:?}", binary);
            Ok(binary)
        }
        Err(err) => {
            remove_partial_binary(&binary);
            Err(err)
        }
    }
}

fn relay<W: Write>(out: &mut W, output: &ToolOutput) -> Result<()> {
    for text in [&output.stdout, &output.stderr] {
        let text = text.trim_end();
        if !text.is_empty() {
            writeln!(out, "{}", text)?;
        }
    }
    Ok(())
}

fn remove_partial_binary(binary: &Path) {
    if !binary.exists() {
        return;
    }
    match std::fs::remove_file(binary) {
        Ok(()) => debug!("Removed partial binary {:?}", binary),
        Err(e) => warn!("Could not remove partial binary {:?}: {}", binary, e),
    }
}
