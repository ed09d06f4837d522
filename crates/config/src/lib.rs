//! Layered configuration for decompyler.
//!
//! Values are merged in increasing order of precedence:
//!
//! 1. built-in defaults (everything unset: discover tools on `PATH`, no
//!    interpreter version requirement, no timeout);
//! 2. a TOML file, either given explicitly or the per-user default at
//!    `<config dir>/decompyler/config.toml`;
//! 3. `DECOMPYLER_*` environment variables (`DECOMPYLER_DECOMPILER`,
//!    `DECOMPYLER_PYTHON`, `DECOMPYLER_PYTHON_VERSION`, `DECOMPYLER_TIMEOUT`);
//! 4. command-line flags, applied by the caller with [`Config::overridden_by`].
//!
//! ```toml
//! decompiler = "/opt/python27/bin/uncompyle6"
//! python = "python2.7"
//! python_version = "2.7"
//! timeout = 120
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "DECOMPYLER_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decompiler executable, as a command name or a path.
    pub decompiler: Option<PathBuf>,
    /// Python interpreter used for compiling, as a command name or a path.
    pub python: Option<PathBuf>,
    /// When set, refuse to compile unless the interpreter is exactly this
    /// `major.minor` version.
    pub python_version: Option<String>,
    /// Per-job timeout for external tools, in seconds.
    pub timeout: Option<u64>,
}

impl Config {
    /// Per-user configuration file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "decompyler").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the provider stack without extracting it.
    ///
    /// An explicit `file` must exist; the per-user default file is optional.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new();
        match file {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            },
            None => {
                if let Some(path) = Self::default_path() {
                    tracing::trace!(path = %path.display(), "Looking for default configuration file");
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(file)?)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout == Some(0) {
            exn::bail!(ErrorKind::Invalid("timeout must be at least one second; omit it to disable".to_string()));
        }
        if let Some(version) = &self.python_version
            && version.trim().is_empty()
        {
            exn::bail!(ErrorKind::Invalid("python_version must not be empty".to_string()));
        }
        Ok(())
    }

    /// Layer `overrides` on top of `self`; every value set in `overrides` wins.
    pub fn overridden_by(self, overrides: Config) -> Result<Self> {
        let merged = Self {
            decompiler: overrides.decompiler.or(self.decompiler),
            python: overrides.python.or(self.python),
            python_version: overrides.python_version.or(self.python_version),
            timeout: overrides.timeout.or(self.timeout),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn from_toml(contents: &str) -> Result<Config> {
        Config::from_figment(&Figment::from(Toml::string(contents)))
    }

    #[test]
    fn test_defaults_are_unset() {
        let config = from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_full_file() {
        let config = from_toml(
            r#"
            decompiler = "/opt/uncompyle6"
            python = "python2.7"
            python_version = "2.7"
            timeout = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.decompiler, Some(PathBuf::from("/opt/uncompyle6")));
        assert_eq!(config.python, Some(PathBuf::from("python2.7")));
        assert_eq!(config.python_version.as_deref(), Some("2.7"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decompyler.toml");
        fs::write(&path, "decompiler = \"C:/Python27/Scripts/uncompyle6.exe\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.decompiler, Some(PathBuf::from("C:/Python27/Scripts/uncompyle6.exe")));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[rstest]
    #[case("timeout = \"soon\"")]
    #[case("timeout = -5")]
    #[case("decompiler = [1, 2]")]
    fn test_wrong_shape(#[case] contents: &str) {
        let err = from_toml(contents).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[rstest]
    #[case("timeout = 0")]
    #[case("python_version = \"  \"")]
    fn test_invalid_values(#[case] contents: &str) {
        let err = from_toml(contents).unwrap_err();
        assert!(matches!(*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_overrides_win() {
        let file = from_toml("decompiler = \"from-file\"\npython = \"python2.7\"\ntimeout = 10").unwrap();
        let overrides = Config {
            decompiler: Some(PathBuf::from("from-cli")),
            timeout: Some(30),
            ..Config::default()
        };
        let merged = file.overridden_by(overrides).unwrap();
        assert_eq!(merged.decompiler, Some(PathBuf::from("from-cli")));
        assert_eq!(merged.python, Some(PathBuf::from("python2.7")));
        assert_eq!(merged.timeout, Some(30));
    }

    #[test]
    fn test_overrides_validated() {
        let overrides = Config { timeout: Some(0), ..Config::default() };
        assert!(Config::default().overridden_by(overrides).is_err());
    }
}
