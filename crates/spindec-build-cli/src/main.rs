//! spindec-build - build front-end for SPINDEC
//!
//! Runs exactly one operation per invocation:
//!
//! - `--compile[=debug]`: compile with gfortran and NetCDF-Fortran, then
//!   offer to add the binary to PATH
//! - `--clean[=confirm]`: remove the binary, module and object files
//! - `--test`, `--example`: locate the test and example suites
//! - `--help`: banner and usage

mod cli;
mod dispatch;
mod help;

use anyhow::Context as _;
use dispatch::Context;
use spindec_build_core::{init_tracing, BuildConfig, LogSettings, ProcessToolchain};
use std::io::Write;

fn load_context() -> anyhow::Result<Context<'static>> {
    let config = BuildConfig::from_env().context("Failed to load build configuration")?;
    let toolchain = ProcessToolchain::from_config(&config);

    Ok(Context {
        config,
        toolchain: Box::new(toolchain),
    })
}

fn main() {
    init_tracing(LogSettings::from_env());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let code = dispatch::run(&args, load_context, &mut input, &mut out);
    let _ = out.flush();
    std::process::exit(code);
}
