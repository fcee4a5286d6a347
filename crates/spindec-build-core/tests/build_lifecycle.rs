//! Compile → install → clean lifecycle against a fake toolchain.

use spindec_build_core::fakes::RecordingToolchain;
use spindec_build_core::{
    clean, compile, install_path, BuildConfig, BuildError, CleanMode, CleanOutcome, CompileMode,
    InstallOutcome, ToolchainConfig,
};
use std::io::Cursor;
use tempfile::tempdir;

fn netcdf() -> ToolchainConfig {
    ToolchainConfig {
        link_flags: "-L/usr/lib/x86_64-linux-gnu -lnetcdff -lnetcdf".to_string(),
        compile_flags: "-I/usr/include".to_string(),
    }
}

/// Test: a compiled tree is installed once and cleaned completely
#[test]
fn test_compile_install_clean_cycle() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    for name in ["constants.f90", "netcdf_io.f90", "spindec.f90"] {
        std::fs::write(src.join(name), b"! fortran\n").unwrap();
    }

    let config = BuildConfig::new(dir.path())
        .with_profile(dir.path().join(".bashrc"))
        .with_shell("/bin/bash");
    let toolchain = RecordingToolchain::new(netcdf());

    // First build adds the PATH export
    let mut out = Vec::new();
    let binary = compile(&config, CompileMode::Debug, &toolchain, &mut out).unwrap();
    let outcome = install_path(&config, &binary, &mut Cursor::new(b"y\n".to_vec()), &mut out).unwrap();
    assert_eq!(outcome, InstallOutcome::Added);
    let profile = std::fs::read_to_string(config.profile.as_ref().unwrap()).unwrap();

    // Sources reach the compiler in file-name order
    let command = &toolchain.commands()[0];
    let positions: Vec<_> = ["constants.f90", "netcdf_io.f90", "spindec.f90"]
        .iter()
        .map(|name| command.args.iter().position(|a| a.ends_with(name)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // Second build finds the marker and leaves the profile alone
    let binary = compile(&config, CompileMode::Default, &toolchain, &mut out).unwrap();
    let outcome = install_path(&config, &binary, &mut Cursor::new(b"\n".to_vec()), &mut out).unwrap();
    assert_eq!(outcome, InstallOutcome::AlreadyPresent);
    assert_eq!(
        std::fs::read_to_string(config.profile.as_ref().unwrap()).unwrap(),
        profile
    );

    // Module and object files the real compiler would leave behind
    std::fs::write(config.output_path().join("netcdf_io.mod"), b"").unwrap();
    std::fs::write(config.output_path().join("spindec.o"), b"").unwrap();

    let outcome = clean(&config, CleanMode::Auto, &mut Cursor::new(Vec::new()), &mut out).unwrap();
    match outcome {
        CleanOutcome::Removed(removed) => assert_eq!(removed.len(), 3),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let err = clean(&config, CleanMode::Auto, &mut Cursor::new(Vec::new()), &mut out).unwrap_err();
    assert!(matches!(err, BuildError::NothingToClean(_)));
}

/// Test: a failed compile leaves nothing for the installer or the cleaner
#[test]
fn test_failed_compile_leaves_no_binary() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    std::fs::write(src.join("spindec.f90"), b"program spindec\n").unwrap();

    let config = BuildConfig::new(dir.path());
    let toolchain = RecordingToolchain::new(netcdf()).failing_compiler(1);

    let mut out = Vec::new();
    let err = compile(&config, CompileMode::Default, &toolchain, &mut out).unwrap_err();
    assert_eq!(err.exit_code(), 1);

    // The command was still echoed before the compiler ran
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("gfortran -g -I/usr/include"));

    let err = clean(&config, CleanMode::Confirm, &mut Cursor::new(Vec::new()), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, BuildError::NothingToClean(_)));
}
