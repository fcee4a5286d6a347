//! Project layout and tool configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults (the SPINDEC source tree layout)
//! 2. an optional `spindec.toml` at the project root
//! 3. environment variables

use crate::error::BuildError;
use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the optional configuration file at the project root
pub const CONFIG_FILE: &str = "spindec.toml";

/// Resolved configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Project root; every relative directory below is resolved against it
    pub root: PathBuf,
    /// Directory holding the Fortran sources
    pub source_dir: PathBuf,
    /// Directory receiving the binary, module and object files
    pub output_dir: PathBuf,
    /// File name of the compiled program
    pub binary_name: String,
    /// Fortran compiler executable
    ///
    /// Must accept gfortran's command line (`-J`, `-fcheck=all`,
    /// `-fbacktrace`), e.g. gfortran itself or an MPI wrapper around it.
    pub compiler: String,
    /// NetCDF-Fortran configuration helper executable
    pub config_helper: String,
    /// Substring identifying a prior PATH installation in the profile
    pub marker: String,
    /// Directory of the automated tests
    pub tests_dir: PathBuf,
    /// Directory of the example scenarios
    pub examples_dir: PathBuf,
    /// Shell startup file receiving the PATH export
    pub profile: Option<PathBuf>,
    /// Active login shell, as reported by `$SHELL`
    pub shell: Option<String>,
}

/// Overrides read from `spindec.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    binary_name: Option<String>,
    compiler: Option<String>,
    config_helper: Option<String>,
    marker: Option<String>,
    tests_dir: Option<PathBuf>,
    examples_dir: Option<PathBuf>,
    profile: Option<PathBuf>,
}

impl BuildConfig {
    /// Default layout rooted at `root`, with no profile and no shell
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("bin"),
            binary_name: "spindec".to_string(),
            compiler: "gfortran".to_string(),
            config_helper: "nf-config".to_string(),
            marker: "spindec".to_string(),
            tests_dir: PathBuf::from("tests"),
            examples_dir: PathBuf::from("examples"),
            profile: None,
            shell: None,
        }
    }

    /// Set the shell profile path
    pub fn with_profile(mut self, profile: impl Into<PathBuf>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the active shell
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Set the compiler executable
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Create from the process environment
    ///
    /// Reads:
    /// - SPINDEC_ROOT (optional, default: current directory)
    /// - HOME (optional) - profile defaults to `$HOME/.bashrc`
    /// - SHELL (optional)
    /// - SPINDEC_FC (optional) - gfortran-compatible compiler override
    /// - SPINDEC_NF_CONFIG (optional) - configuration helper override
    /// - SPINDEC_PROFILE (optional) - profile path override
    pub fn from_env() -> Result<Self> {
        let root = match std::env::var_os("SPINDEC_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()?,
        };

        let mut config = Self::new(root);
        config.profile = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".bashrc"));
        config.shell = std::env::var("SHELL").ok();

        config.load_file()?;

        if let Ok(compiler) = std::env::var("SPINDEC_FC") {
            config.compiler = compiler;
        }
        if let Ok(helper) = std::env::var("SPINDEC_NF_CONFIG") {
            config.config_helper = helper;
        }
        if let Some(profile) = std::env::var_os("SPINDEC_PROFILE") {
            config.profile = Some(PathBuf::from(profile));
        }

        debug!(?config, "Resolved build configuration");
        Ok(config)
    }

    /// Apply `spindec.toml` from the project root, if present
    pub fn load_file(&mut self) -> Result<()> {
        let path = self.root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(());
        }

        debug!("Loading configuration from {:?}", path);
        let content = std::fs::read_to_string(&path)?;
        let file: ConfigFile = toml::from_str(&content)?;
        self.apply(file)
    }

    fn apply(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(name) = &file.binary_name {
            if name.is_empty() || name.contains(std::path::is_separator) {
                return Err(BuildError::Config(format!(
                    "binary_name must be a plain file name, got {:?}",
                    name
                )));
            }
        }

        let ConfigFile {
            source_dir,
            output_dir,
            binary_name,
            compiler,
            config_helper,
            marker,
            tests_dir,
            examples_dir,
            profile,
        } = file;

        if let Some(v) = source_dir {
            self.source_dir = v;
        }
        if let Some(v) = output_dir {
            self.output_dir = v;
        }
        if let Some(v) = binary_name {
            self.binary_name = v;
        }
        if let Some(v) = compiler {
            self.compiler = v;
        }
        if let Some(v) = config_helper {
            self.config_helper = v;
        }
        if let Some(v) = marker {
            if v.is_empty() {
                return Err(BuildError::Config("marker must not be empty".to_string()));
            }
            self.marker = v;
        }
        if let Some(v) = tests_dir {
            self.tests_dir = v;
        }
        if let Some(v) = examples_dir {
            self.examples_dir = v;
        }
        if let Some(v) = profile {
            self.profile = Some(v);
        }
        Ok(())
    }

    /// Absolute-or-root-relative source directory
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }

    /// Absolute-or-root-relative output directory
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    /// Full path of the compiled program
    pub fn binary_path(&self) -> PathBuf {
        self.output_path().join(&self.binary_name)
    }

    pub fn tests_path(&self) -> PathBuf {
        self.resolve(&self.tests_dir)
    }

    pub fn examples_path(&self) -> PathBuf {
        self.resolve(&self.examples_dir)
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        self.root.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let config = BuildConfig::new("/opt/spindec");
        assert_eq!(config.source_path(), PathBuf::from("/opt/spindec/src"));
        assert_eq!(config.binary_path(), PathBuf::from("/opt/spindec/bin/spindec"));
        assert_eq!(config.compiler, "gfortran");
        assert_eq!(config.config_helper, "nf-config");
        assert_eq!(config.marker, "spindec");
        assert!(config.profile.is_none());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "compiler = \"mpif90\"\noutput_dir = \"build\"\nprofile = \"/tmp/profile\"\n",
        )
        .unwrap();

        let mut config = BuildConfig::new(dir.path());
        config.load_file().unwrap();

        assert_eq!(config.compiler, "mpif90");
        assert_eq!(config.output_path(), dir.path().join("build"));
        assert_eq!(config.profile, Some(PathBuf::from("/tmp/profile")));
        assert_eq!(config.config_helper, "nf-config");
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut config = BuildConfig::new(dir.path());
        config.load_file().unwrap();
        assert_eq!(config, BuildConfig::new(dir.path()));
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "optimisation = 3\n").unwrap();

        let mut config = BuildConfig::new(dir.path());
        let err = config.load_file().unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }

    #[test]
    fn test_binary_name_with_separator_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "binary_name = \"../spindec\"\n").unwrap();

        let mut config = BuildConfig::new(dir.path());
        assert!(matches!(config.load_file(), Err(BuildError::Config(_))));
    }
}
