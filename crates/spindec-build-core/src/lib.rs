//! spindec-build-core: compile, clean and install support for SPINDEC
//!
//! SPINDEC is a Fortran program linked against NetCDF-Fortran. This crate
//! drives the external toolchain (`gfortran`, `nf-config`), manages the
//! build artifacts in the output directory, and puts the binary on the
//! user's PATH through their shell profile.
//!
//! Every interactive step reads answers from a `BufRead` and writes to a
//! `Write`, so callers decide whether that is a terminal or a script.

pub mod artifacts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod fakes;
pub mod installer;
pub mod prompt;
pub mod suites;
pub mod telemetry;
pub mod toolchain;

pub use artifacts::{list_artifacts, list_sources, Artifact, ArtifactKind};
pub use cleaner::{clean, clean_with, CleanMode, CleanOutcome};
pub use config::BuildConfig;
pub use error::{BuildError, InvalidModeError};
pub use installer::{install_path, InstallOutcome};
pub use prompt::{ask_yes_no, PromptState};
pub use suites::{locate_suite, SuiteKind};
pub use telemetry::{init_tracing, LogSettings};
pub use toolchain::{
    compile, CompileCommand, CompileMode, ProcessToolchain, Toolchain, ToolchainConfig,
};

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;
