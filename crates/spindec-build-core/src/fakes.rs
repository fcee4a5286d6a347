//! In-memory toolchain fake (testing only)
//!
//! `RecordingToolchain` answers flag queries from a fixed `ToolchainConfig`,
//! records every compiler invocation, and writes an empty binary to the
//! `-o` path so later steps find a real file.

use std::sync::Mutex;

use crate::error::BuildError;
use crate::toolchain::{CompileCommand, Toolchain, ToolchainConfig, ToolOutput};
use crate::Result;

/// Toolchain that never spawns a process
#[derive(Debug, Default)]
pub struct RecordingToolchain {
    flags: ToolchainConfig,
    helper_exit: Option<i32>,
    compiler_exit: Option<i32>,
    queries: Mutex<usize>,
    commands: Mutex<Vec<CompileCommand>>,
}

impl RecordingToolchain {
    pub fn new(flags: ToolchainConfig) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Make the configuration helper exit with `code`
    pub fn failing_helper(mut self, code: i32) -> Self {
        self.helper_exit = Some(code);
        self
    }

    /// Make the compiler exit with `code`, leaving a partial binary behind
    pub fn failing_compiler(mut self, code: i32) -> Self {
        self.compiler_exit = Some(code);
        self
    }

    /// Compiler invocations so far
    pub fn commands(&self) -> Vec<CompileCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of `library_flags` calls so far
    pub fn flag_queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

impl Toolchain for RecordingToolchain {
    fn library_flags(&self) -> Result<ToolchainConfig> {
        *self.queries.lock().unwrap() += 1;
        if let Some(code) = self.helper_exit {
            return Err(BuildError::ToolFailed {
                tool: "nf-config".to_string(),
                code,
                stderr: "nf-config: netcdf-fortran not found".to_string(),
            });
        }
        Ok(self.flags.clone())
    }

    fn compile(&self, command: &CompileCommand) -> Result<ToolOutput> {
        self.commands.lock().unwrap().push(command.clone());

        if let Some(output) = command.output_path() {
            std::fs::write(output, b"")?;
        }

        if let Some(code) = self.compiler_exit {
            return Err(BuildError::ToolFailed {
                tool: command.program.clone(),
                code,
                stderr: "Error: Unexpected end of file".to_string(),
            });
        }
        Ok(ToolOutput::default())
    }
}
