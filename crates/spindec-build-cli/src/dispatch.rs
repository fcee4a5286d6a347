//! Routes a parsed operation to its handler and maps the result to an exit code

use crate::cli::{parse_args, Operation, UsageError};
use crate::help::{write_banner, write_usage, write_version};
use spindec_build_core::{
    clean, compile, install_path, locate_suite, BuildConfig, SuiteKind, Toolchain,
};
use std::io::{BufRead, Write};
use tracing::debug;

/// Everything an operation needs besides its arguments
pub struct Context<'a> {
    pub config: BuildConfig,
    pub toolchain: Box<dyn Toolchain + 'a>,
}

/// Parse `args`, run the selected operation, return the process exit code.
///
/// `context` is only invoked for operations that touch the project.
pub fn run<'a, F, R, W>(args: &[String], context: F, input: &mut R, out: &mut W) -> i32
where
    F: FnOnce() -> anyhow::Result<Context<'a>>,
    R: BufRead,
    W: Write,
{
    let operation = match parse_args(args) {
        Ok(operation) => operation,
        Err(err) => return report_usage(&err, out),
    };
    debug!(?operation, "Dispatching");

    if !operation.needs_project() {
        let written = match operation {
            Operation::Version => write_version(out),
            _ => write_banner(out).and_then(|_| write_usage(out)),
        };
        return if written.is_ok() { 0 } else { 1 };
    }

    let context = match context() {
        Ok(context) => context,
        Err(err) => {
            let _ = writeln!(out, "Error: {:#}", err);
            return 1;
        }
    };

    match execute(operation, &context, input, out) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(out, "Error: {}", err);
            err.exit_code()
        }
    }
}

fn report_usage<W: Write>(err: &UsageError, out: &mut W) -> i32 {
    let _ = match err {
        UsageError::Malformed(clap_err) => write!(out, "{}", clap_err.render()),
        _ => writeln!(out, "Error: {}", err),
    };
    if err.shows_help() {
        let _ = write_usage(out);
    }
    err.exit_code()
}

fn execute<R, W>(
    operation: Operation,
    context: &Context<'_>,
    input: &mut R,
    out: &mut W,
) -> spindec_build_core::Result<()>
where
    R: BufRead,
    W: Write,
{
    let config = &context.config;

    match operation {
        Operation::Compile(mode) => {
            let binary = compile(config, mode, &*context.toolchain, out)?;
            writeln!(out, "SPINDEC compiled successfully: {}", binary.display())?;
            install_path(config, &binary, input, out)?;
        }
        Operation::Clean(mode) => {
            clean(config, mode, input, out)?;
        }
        Operation::Test => {
            let dir = locate_suite(config, SuiteKind::Tests);
            writeln!(out, "Test directory: {}", dir.display())?;
        }
        Operation::Example => {
            let dir = locate_suite(config, SuiteKind::Examples);
            writeln!(out, "Example directory: {}", dir.display())?;
        }
        Operation::Help | Operation::Version => {}
    }
    Ok(())
}
