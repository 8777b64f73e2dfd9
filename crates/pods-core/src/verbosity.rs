//! # Verbosity: Problem Signalling Policy
//!
//! Every problem detected while resolving a record flows through
//! [`Reporter::signal`]. The verbosity level decides what happens:
//!
//! | Level  | Effect |
//! |--------|--------|
//! | Silent | nothing observable; the field stays unresolved |
//! | Warn   | a `tracing` warning is emitted and a [`Warning`] is collected |
//! | Raise  | a [`PodsError`] is returned and construction aborts |
//!
//! A process-wide default level backs [`set_verbosity_level`]. Callers that
//! want to avoid the global can pass an explicit level through
//! [`ResolveOptions`](crate::ResolveOptions).

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{ErrorKind, PodsError};

/// How problems detected during resolution are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VerbosityLevel {
    /// Drop problems.
    Silent = 0,
    /// Report problems as warnings and continue.
    Warn = 1,
    /// Abort construction on the first problem.
    #[default]
    Raise = 2,
}

impl VerbosityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Warn => "warn",
            Self::Raise => "raise",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Silent,
            1 => Self::Warn,
            _ => Self::Raise,
        }
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerbosityLevel {
    type Err = ConfigError;

    /// Accepts the level names (case-insensitive) or their numeric values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "0" => Ok(Self::Silent),
            "warn" | "warnings" | "1" => Ok(Self::Warn),
            "raise" | "errors" | "2" => Ok(Self::Raise),
            other => Err(ConfigError::InvalidVerbosity(other.to_string())),
        }
    }
}

static VERBOSITY_LEVEL: AtomicU8 = AtomicU8::new(VerbosityLevel::Raise as u8);

/// Replace the process-wide verbosity level.
pub fn set_verbosity_level(level: VerbosityLevel) {
    VERBOSITY_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// The current process-wide verbosity level.
pub fn verbosity_level() -> VerbosityLevel {
    VerbosityLevel::from_u8(VERBOSITY_LEVEL.load(Ordering::Relaxed))
}

/// Category of a non-fatal warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Problems caused by the caller's input. Used by every resolver call site.
    User,
    /// Problems in the environment rather than the input. Never raised by
    /// the resolver; available to callers of [`Reporter::signal`].
    Runtime,
}

/// A problem reported under [`VerbosityLevel::Warn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Category passed to [`Reporter::signal`].
    pub kind: WarningKind,
    /// The problem's message, identical to the error message under `Raise`.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Applies a verbosity level to problems and collects warnings.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    level: VerbosityLevel,
    warnings: Vec<Warning>,
}

impl Reporter {
    pub fn new(level: VerbosityLevel) -> Self {
        Self {
            level,
            warnings: Vec::new(),
        }
    }

    pub fn level(&self) -> VerbosityLevel {
        self.level
    }

    /// Signal a problem.
    ///
    /// # Errors
    ///
    /// Returns a [`PodsError`] of kind `error` when the level is `Raise`.
    pub fn signal(
        &mut self,
        message: impl Into<String>,
        warning: WarningKind,
        error: ErrorKind,
    ) -> Result<(), PodsError> {
        let message = message.into();
        match self.level {
            VerbosityLevel::Silent => {
                tracing::debug!(kind = %error, %message, "problem suppressed");
                Ok(())
            }
            VerbosityLevel::Warn => {
                tracing::warn!(kind = %error, "{message}");
                self.warnings.push(Warning {
                    kind: warning,
                    message,
                });
                Ok(())
            }
            VerbosityLevel::Raise => Err(PodsError::new(error, message)),
        }
    }

    /// Warnings collected so far, in signal order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_drops_everything() {
        let mut r = Reporter::new(VerbosityLevel::Silent);
        r.signal("ignored", WarningKind::User, ErrorKind::Value).unwrap();
        assert!(r.warnings().is_empty());
    }

    #[test]
    fn test_warn_collects_kind_and_message() {
        let mut r = Reporter::new(VerbosityLevel::Warn);
        r.signal("warning", WarningKind::User, ErrorKind::Value).unwrap();
        r.signal("warning", WarningKind::Runtime, ErrorKind::Type).unwrap();
        let kinds: Vec<WarningKind> = r.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::User, WarningKind::Runtime]);
        assert_eq!(r.warnings()[0].message, "warning");
    }

    #[test]
    fn test_raise_returns_tagged_error() {
        let mut r = Reporter::new(VerbosityLevel::Raise);
        let err = r.signal("error", WarningKind::User, ErrorKind::Value).unwrap_err();
        assert_eq!(err, PodsError::Value("error".to_string()));
        let err = r.signal("error", WarningKind::User, ErrorKind::Type).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("silent".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Silent);
        assert_eq!("WARN".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Warn);
        assert_eq!("2".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Raise);
        assert!("loud".parse::<VerbosityLevel>().is_err());
    }

    #[test]
    fn test_default_level_is_raise() {
        assert_eq!(VerbosityLevel::default(), VerbosityLevel::Raise);
    }

    #[test]
    fn test_display_matches_as_str() {
        for level in [VerbosityLevel::Silent, VerbosityLevel::Warn, VerbosityLevel::Raise] {
            assert_eq!(level.to_string(), level.as_str());
            assert_eq!(level.as_str().parse::<VerbosityLevel>().unwrap(), level);
        }
    }
}
