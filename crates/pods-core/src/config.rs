//! Resolution options.
//!
//! The verbosity level is threaded into every resolution explicitly.
//! [`ResolveOptions::current`] snapshots the process-wide level;
//! [`ResolveOptions::from_env`] reads it from the environment.

use crate::verbosity::{verbosity_level, Reporter, VerbosityLevel};

/// Environment variable read by [`ResolveOptions::from_env`].
pub const VERBOSITY_ENV_VAR: &str = "STRONGPODS_VERBOSITY";

/// Options for one record construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub verbosity: VerbosityLevel,
}

impl ResolveOptions {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    /// Options carrying the current process-wide level.
    pub fn current() -> Self {
        Self::new(verbosity_level())
    }

    /// Load options from the environment.
    ///
    /// Variables:
    /// - `STRONGPODS_VERBOSITY`: `silent`, `warn` or `raise` (or `0`, `1`,
    ///   `2`). Falls back to the process-wide level when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(VERBOSITY_ENV_VAR)
    }

    fn from_var(var: &str) -> Result<Self, ConfigError> {
        match std::env::var(var) {
            Ok(raw) => Ok(Self::new(raw.parse()?)),
            Err(std::env::VarError::NotPresent) => Ok(Self::current()),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ConfigError::InvalidVerbosity(format!("non-unicode value in {var}")))
            }
        }
    }

    /// A fresh reporter applying these options.
    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.verbosity)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid verbosity level {0:?}; expected silent, warn or raise")]
    InvalidVerbosity(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_var_parses_level() {
        std::env::set_var("TEST_PODS_VERBOSITY_OK", "warn");
        let opts = ResolveOptions::from_var("TEST_PODS_VERBOSITY_OK");
        std::env::remove_var("TEST_PODS_VERBOSITY_OK");
        assert_eq!(opts.unwrap().verbosity, VerbosityLevel::Warn);
    }

    #[test]
    fn from_var_rejects_unknown_level() {
        std::env::set_var("TEST_PODS_VERBOSITY_BAD", "chatty");
        let result = ResolveOptions::from_var("TEST_PODS_VERBOSITY_BAD");
        std::env::remove_var("TEST_PODS_VERBOSITY_BAD");
        assert!(result.is_err());
    }

    #[test]
    fn from_var_absent_uses_process_level() {
        let opts = ResolveOptions::from_var("NONEXISTENT_PODS_VAR_12345").unwrap();
        assert_eq!(opts, ResolveOptions::current());
    }

    #[test]
    fn reporter_carries_level() {
        let opts = ResolveOptions::new(VerbosityLevel::Silent);
        assert_eq!(opts.reporter().level(), VerbosityLevel::Silent);
    }
}
