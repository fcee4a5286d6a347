//! Banner and usage text

use std::io::{self, Write};

const BANNER: &str = r#"
   _____ ____  _____ _   _ _____  ______ _____
  / ____|  _ \|_   _| \ | |  __ \|  ____/ ____|
 | (___ | |_) | | | |  \| | |  | | |__ | |
  \___ \|  __/  | | | . ` | |  | |  __|| |
  ____) | |    _| |_| |\  | |__| | |___| |____
 |_____/|_|   |_____|_| \_|_____/|______\_____|
"#;

const USAGE: &str = "\
Usage: spindec-build [OPTION]

Exactly one option per invocation. Values attach to the flag: -cdebug, --clean=confirm.

Options:
  -c, --compile[=MODE]   Compile SPINDEC with gfortran and NetCDF-Fortran
                           MODE: debug | d   strict checks, warnings, backtraces
  -C, --clean[=MODE]     Remove the binary, module and object files
                           MODE: confirm | c ask before removing
  -t, --test             Run the test suite
  -e, --example          Run the example scenarios
  -h, --help             Show this help
  -V, --version          Show the version

Environment:
  SPINDEC_ROOT           Project root (default: current directory)
  SPINDEC_FC             gfortran-compatible compiler, e.g. mpif90
                           (default: gfortran)
  SPINDEC_NF_CONFIG      NetCDF-Fortran config helper (default: nf-config)
  SPINDEC_PROFILE        Shell profile for PATH install (default: ~/.bashrc)
  SPINDEC_VERBOSE        Set to 1 for debug logging
  SPINDEC_LOG_JSON       Set to 1 for JSON log lines
";

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", BANNER)
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{}", USAGE)
}

pub fn write_version<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "spindec-build {}", env!("CARGO_PKG_VERSION"))
}
