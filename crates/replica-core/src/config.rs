use crate::{
    DEFAULT_MAX_DEPTH,
    spec::{IndexOrder, IndexSuffix},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse replica config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid replica config: {0}")]
    Invalid(String),
}

///
/// ReplicaConfig
///
/// Engine configuration. Every section and key is optional:
///
/// ```toml
/// [walk]
/// max_depth = 64
///
/// [naming]
/// separator = "_INDEX_"
/// order = "append"
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplicaConfig {
    pub walk: WalkConfig,
    pub naming: NamingConfig,
}

impl ReplicaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "walk.max_depth must be greater than zero".to_string(),
            ));
        }

        self.naming.index_suffix().map(|_| ())
    }
}

///
/// WalkConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    pub max_depth: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

///
/// NamingConfig
///
/// Settings for the built-in `IndexSuffix` spec.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub separator: String,
    pub order: IndexOrder,
}

impl NamingConfig {
    pub fn index_suffix(&self) -> Result<IndexSuffix, ConfigError> {
        IndexSuffix::new(self.separator.as_str(), self.order)
            .map_err(|err| ConfigError::Invalid(format!("naming.separator: {err}")))
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: IndexSuffix::DEFAULT_SEPARATOR.to_string(),
            order: IndexOrder::default(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ReplicaConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, ReplicaConfig::default());
        assert_eq!(config.walk.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.naming.separator, "_INDEX_");
        assert_eq!(config.naming.order, IndexOrder::Append);
    }

    #[test]
    fn sections_override_individual_keys() {
        let config = ReplicaConfig::from_toml_str(
            r#"
            [walk]
            max_depth = 8

            [naming]
            order = "insert"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.walk.max_depth, 8);
        assert_eq!(config.naming.separator, "_INDEX_");
        assert_eq!(config.naming.order, IndexOrder::Insert);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ReplicaConfig::from_toml_str("[walk]\nmax_width = 3\n")
            .expect_err("unknown key must fail");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_depth = ReplicaConfig::from_toml_str("[walk]\nmax_depth = 0\n")
            .expect_err("zero depth must fail");
        let bad_separator = ReplicaConfig::from_toml_str("[naming]\nseparator = \"a;b\"\n")
            .expect_err("list delimiter in separator must fail");

        assert!(matches!(zero_depth, ConfigError::Invalid(_)));
        assert!(matches!(bad_separator, ConfigError::Invalid(msg) if msg.contains("separator")));
    }
}
