//! Synchronization configuration.
//!
//! Names the permission entity the store writes to and the policies that
//! govern duplicates, undocumented handlers and per-route failures.
//! Configuration is loaded from environment variables with defaults
//! suitable for local use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// What to do when a permission with the same name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDuplicate {
    /// Leave the existing record alone and report the route as skipped.
    #[default]
    Skip,
    /// Overwrite the existing record's display name and description.
    Update,
    /// Always create; the store rejects the duplicate.
    Fail,
}

/// What to do with a handler that exists but has no doc block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDocs {
    /// Create the permission with an empty display name and description.
    #[default]
    Empty,
    /// Skip the route and report it.
    Skip,
}

/// How per-route failures affect the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the failure and continue with the next route.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

macro_rules! policy_str {
    ($ty:ident, $key:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Get the string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $s,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($s => Ok($ty::$variant),)+
                    other => Err(ConfigError::InvalidValue {
                        key: $key.to_string(),
                        message: format!(
                            "unknown value '{}' (expected one of {})",
                            other,
                            [$($s),+].join(", ")
                        ),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

policy_str!(OnDuplicate, "RBAC_ON_DUPLICATE", { Skip => "skip", Update => "update", Fail => "fail" });
policy_str!(MissingDocs, "RBAC_MISSING_DOCS", { Empty => "empty", Skip => "skip" });
policy_str!(ErrorPolicy, "RBAC_ERROR_POLICY", { Continue => "continue", Abort => "abort" });

/// Configuration for permission generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Entity that represents a permission in the store (e.g., a table name).
    pub permission_model: String,

    /// Path of the JSON permission store.
    pub store_path: PathBuf,

    /// Duplicate-name policy.
    pub on_duplicate: OnDuplicate,

    /// Policy for handlers without documentation.
    pub missing_docs: MissingDocs,

    /// Per-route failure policy.
    pub error_policy: ErrorPolicy,

    /// Compute permissions without writing them.
    pub dry_run: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            permission_model: "permissions".to_string(),
            store_path: PathBuf::from("permissions.json"),
            on_duplicate: OnDuplicate::default(),
            missing_docs: MissingDocs::default(),
            error_policy: ErrorPolicy::default(),
            dry_run: false,
        }
    }
}

impl RbacConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RBAC_PERMISSION_MODEL`: Permission entity name (default: permissions)
    /// - `RBAC_STORE_PATH`: JSON store path (default: permissions.json)
    /// - `RBAC_ON_DUPLICATE`: skip, update or fail (default: skip)
    /// - `RBAC_MISSING_DOCS`: empty or skip (default: empty)
    /// - `RBAC_ERROR_POLICY`: continue or abort (default: continue)
    /// - `RBAC_DRY_RUN`: Whether to skip writes (default: false)
    ///
    /// Unparseable policy values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            permission_model: lookup("RBAC_PERMISSION_MODEL").unwrap_or(default.permission_model),
            store_path: lookup("RBAC_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.store_path),
            on_duplicate: parse_or_default(&lookup, "RBAC_ON_DUPLICATE", default.on_duplicate),
            missing_docs: parse_or_default(&lookup, "RBAC_MISSING_DOCS", default.missing_docs),
            error_policy: parse_or_default(&lookup, "RBAC_ERROR_POLICY", default.error_policy),
            dry_run: lookup("RBAC_DRY_RUN")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.dry_run),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.permission_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "RBAC_PERMISSION_MODEL".to_string(),
                message: "permission model name must not be empty".to_string(),
            });
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "RBAC_STORE_PATH".to_string(),
                message: "store path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr<Err = ConfigError> + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|value| value.parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Ignoring invalid configuration value");
            default
        }
        None => default,
    }
}
