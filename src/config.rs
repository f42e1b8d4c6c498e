//! Session configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file is a valid config:
//!
//! ```toml
//! timeout_ms = 5000
//! unknown_policy = "fail"        # or "assume_unsat"
//! name_policy = "auto_register"  # or "strict"
//! undirected_links = true
//! model_capacity = 2
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CausewayResult};

/// How a boolean query resolves an `unknown` answer from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Surface the unknown result as `SolverError::Unknown`.
    #[default]
    Fail,
    /// Read unknown as "not satisfiable". Satisfiability queries answer
    /// `false`; validity queries answer `true`, since they are decided by the
    /// negation being unsatisfiable.
    AssumeUnsat,
}

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownPolicy::Fail => write!(f, "fail"),
            UnknownPolicy::AssumeUnsat => write!(f, "assume_unsat"),
        }
    }
}

impl std::str::FromStr for UnknownPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(UnknownPolicy::Fail),
            "assume_unsat" | "assume-unsat" => Ok(UnknownPolicy::AssumeUnsat),
            other => Err(format!(
                "unknown policy \"{other}\" (expected \"fail\" or \"assume_unsat\")"
            )),
        }
    }
}

/// How structures treat agent names and labels the session has not seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Intern on first use.
    #[default]
    AutoRegister,
    /// Reject names that were not declared or introduced by a graph literal.
    Strict,
}

/// Configuration for a reasoning [`Session`](crate::solver::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Per-check solver timeout in milliseconds. `None` means no limit.
    #[serde(default)]
    pub timeout_ms: Option<u32>,
    #[serde(default)]
    pub unknown_policy: UnknownPolicy,
    #[serde(default)]
    pub name_policy: NamePolicy,
    /// Whether link edges ignore endpoint order. Parent edges are always ordered.
    #[serde(default = "default_undirected_links")]
    pub undirected_links: bool,
    /// Number of rule slots in a symbolic model.
    #[serde(default = "default_model_capacity")]
    pub model_capacity: usize,
}

fn default_undirected_links() -> bool {
    true
}
fn default_model_capacity() -> usize {
    2
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            unknown_policy: UnknownPolicy::default(),
            name_policy: NamePolicy::default(),
            undirected_links: default_undirected_links(),
            model_capacity: default_model_capacity(),
        }
    }
}

impl SessionConfig {
    /// Check field ranges.
    pub fn validate(&self) -> CausewayResult<()> {
        if self.model_capacity == 0 {
            return Err(ConfigError::Invalid {
                message: "model_capacity must be > 0".into(),
            }
            .into());
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                message: "timeout_ms must be > 0 (omit it for no limit)".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> CausewayResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> CausewayResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> CausewayResult<()> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> CausewayResult<String> {
        Ok(toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: "<session config>".into(),
            message: e.to_string(),
        })?)
    }

    fn parse(content: &str, origin: &str) -> CausewayResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
