//! Argument parsing
//!
//! One invocation selects exactly one operation. An optional value has to
//! be attached to its flag (`-cdebug`, `--clean=confirm`), since a second
//! token is rejected before clap ever sees it.

use clap::{ArgGroup, Parser};
use spindec_build_core::{CleanMode, CompileMode, InvalidModeError};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "spindec-build")]
#[command(author = "SPINDEC Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, clean and install SPINDEC", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(group(ArgGroup::new("operation").multiple(false)))]
pub struct Cli {
    /// Compile SPINDEC; `debug`/`d` enables strict diagnostics
    #[arg(
        short = 'c',
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_missing_value = "",
        group = "operation"
    )]
    compile: Option<String>,

    /// Remove build artifacts; `confirm`/`c` asks first
    #[arg(
        short = 'C',
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_missing_value = "",
        group = "operation"
    )]
    clean: Option<String>,

    /// Run the test suite
    #[arg(short, long, group = "operation")]
    test: bool,

    /// Run the example scenarios
    #[arg(short, long, group = "operation")]
    example: bool,

    /// Print the banner and usage
    #[arg(short, long, group = "operation")]
    help: bool,

    /// Print the version
    #[arg(short = 'V', long, group = "operation")]
    version: bool,
}

/// The single action selected for this invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compile(CompileMode),
    Clean(CleanMode),
    Test,
    Example,
    Help,
    Version,
}

impl Operation {
    /// Whether the operation touches the project tree
    pub fn needs_project(self) -> bool {
        !matches!(self, Operation::Help | Operation::Version)
    }
}

/// Rejected command line
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("only one argument may be given (got {0})")]
    TooManyArguments(usize),

    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    #[error(transparent)]
    Malformed(#[from] clap::Error),
}

impl UsageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::Malformed(_) => 1,
            UsageError::TooManyArguments(_) | UsageError::InvalidMode(_) => 2,
        }
    }

    /// Whether the usage text should accompany the message
    pub fn shows_help(&self) -> bool {
        !matches!(self, UsageError::Malformed(_))
    }
}

impl Cli {
    fn into_operation(self) -> Result<Operation, UsageError> {
        let operation = if let Some(mode) = self.compile {
            Operation::Compile(mode.parse()?)
        } else if let Some(mode) = self.clean {
            Operation::Clean(mode.parse()?)
        } else if self.test {
            Operation::Test
        } else if self.example {
            Operation::Example
        } else if self.version {
            Operation::Version
        } else {
            Operation::Help
        };
        Ok(operation)
    }
}

/// Parse the arguments that follow the program name
pub fn parse_args(args: &[String]) -> Result<Operation, UsageError> {
    match args.len() {
        0 => return Ok(Operation::Help),
        1 => {}
        n => return Err(UsageError::TooManyArguments(n)),
    }

    let argv = std::iter::once("spindec-build").chain(args.iter().map(String::as_str));
    let cli = Cli::try_parse_from(argv)?;
    cli.into_operation()
}
