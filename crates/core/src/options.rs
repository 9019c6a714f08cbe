//! Flat string-keyed processor options, read once per round.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;

/// `0`, `1` or `2`, see [`CheckLevel`].
pub const CHECK_TYPE_KEY: &str = "ktorgen_check_type";
/// Print the cause chain of fatal errors.
pub const PRINT_STACKTRACE_KEY: &str = "ktorgen_print_stacktrace_on_exception";
/// Enables `@KtorGenFunctionKmp` generation.
pub const EXPERIMENTAL_KEY: &str = "ktorgen_experimental";
/// Rounds a declaration with unresolved types may wait.
pub const MAX_DEFERRED_ROUNDS_KEY: &str = "ktorgen_max_deferred_rounds";

/// How validator-detected errors reach the diagnostics sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckLevel {
    /// Validation diagnostics are not reported. Invalid interfaces are still dropped.
    Off,
    /// Errors are reported as errors.
    #[default]
    Errors,
    /// Errors are reported as warnings.
    Warnings,
}

impl CheckLevel {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            "0" => Ok(Self::Off),
            "1" => Ok(Self::Errors),
            "2" => Ok(Self::Warnings),
            other => Err(ConfigError::InvalidValue {
                key: CHECK_TYPE_KEY.to_string(),
                value: other.to_string(),
                expected: "0, 1 or 2",
            }),
        }
    }
}

/// Options shared by every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorOptions {
    /// Where validation errors go.
    pub check_level: CheckLevel,
    /// Print the cause chain of fatal errors.
    pub print_stacktrace: bool,
    /// Generate `actual` functions for expect factories.
    pub experimental: bool,
    /// Deferral budget for unresolved declarations, at least 1.
    pub max_deferred_rounds: u32,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            check_level: CheckLevel::default(),
            print_stacktrace: false,
            experimental: false,
            max_deferred_rounds: 3,
        }
    }
}

impl ProcessorOptions {
    /// Reads known keys and ignores the rest.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                CHECK_TYPE_KEY => options.check_level = CheckLevel::parse(value)?,
                PRINT_STACKTRACE_KEY => options.print_stacktrace = parse_bool(key, value)?,
                EXPERIMENTAL_KEY => options.experimental = parse_bool(key, value)?,
                MAX_DEFERRED_ROUNDS_KEY => {
                    options.max_deferred_rounds = match value.trim().parse::<u32>() {
                        Ok(rounds) if rounds >= 1 => rounds,
                        _ => {
                            return Err(ConfigError::InvalidValue {
                                key: key.clone(),
                                value: value.clone(),
                                expected: "an integer >= 1",
                            });
                        }
                    };
                }
                _ => debug!(option = %key, "Ignoring unknown option."),
            }
        }
        Ok(options)
    }

    /// Parse `key=value` pairs as given on the command line.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(ConfigError::MalformedPair(pair.to_string()));
            };
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self::from_map(&map)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProcessorOptions::from_map(&BTreeMap::new()).unwrap();
        assert_eq!(options, ProcessorOptions::default());
        assert_eq!(options.check_level, CheckLevel::Errors);
        assert_eq!(options.max_deferred_rounds, 3);
    }

    #[test]
    fn test_from_pairs() {
        let options = ProcessorOptions::from_pairs([
            "ktorgen_check_type=2",
            "ktorgen_experimental = true",
            "ktorgen_print_stacktrace_on_exception=false",
            "unknown_key=whatever",
        ])
        .unwrap();
        assert_eq!(options.check_level, CheckLevel::Warnings);
        assert!(options.experimental);
        assert!(!options.print_stacktrace);
    }

    #[test]
    fn test_invalid_values() {
        let err = ProcessorOptions::from_pairs(["ktorgen_check_type=7"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = ProcessorOptions::from_pairs(["ktorgen_max_deferred_rounds=0"]).unwrap_err();
        assert!(err.to_string().contains("ktorgen_max_deferred_rounds"));
        let err = ProcessorOptions::from_pairs(["ktorgen_experimental"]).unwrap_err();
        assert_eq!(err, ConfigError::MalformedPair("ktorgen_experimental".into()));
    }
}
