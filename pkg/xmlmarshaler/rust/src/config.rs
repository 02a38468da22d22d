// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method};
use log::debug;
use serde::Deserialize;

use crate::errors::ConstructionError;

const DEFAULT_BODY_METHODS: [Method; 3] = [Method::POST, Method::PUT, Method::PATCH];

fn default_body_methods() -> Vec<String> {
    DEFAULT_BODY_METHODS
        .iter()
        .map(|method| method.as_str().to_string())
        .collect()
}

/// Adapter settings, usually read from YAML:
///
/// ```yaml
/// body_methods: [POST, PUT, PATCH]
/// snake_case_errors: true
/// default_headers:
///   Cache-Control: no-store
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarshalerConfig {
    /// Methods whose requests carry a body to decode.
    #[serde(default = "default_body_methods")]
    pub body_methods: Vec<String>,
    /// Name status-carrying errors after their status (`not_found`) instead
    /// of their type.
    #[serde(default)]
    pub snake_case_errors: bool,
    /// Headers set on every response before the handler's own are merged.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for MarshalerConfig {
    fn default() -> Self {
        Self {
            body_methods: default_body_methods(),
            snake_case_errors: false,
            default_headers: BTreeMap::new(),
        }
    }
}

impl MarshalerConfig {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).context("Failed to parse marshaler config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::from_yaml_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        debug!("Loaded marshaler config from {}", path.display());
        Ok(config)
    }

    pub(crate) fn settings(&self) -> Result<Settings, ConstructionError> {
        let body_methods = self
            .body_methods
            .iter()
            .map(|method| {
                Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
                    ConstructionError::InvalidBodyMethod {
                        method: method.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConstructionError::InvalidHeaderName { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConstructionError::InvalidHeaderValue { name: name.clone() })?;
            default_headers.append(header_name, header_value);
        }

        Ok(Settings {
            body_methods,
            snake_case_errors: self.snake_case_errors,
            default_headers,
        })
    }
}

/// Validated form of [`MarshalerConfig`].
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub body_methods: Vec<Method>,
    pub snake_case_errors: bool,
    pub default_headers: HeaderMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            body_methods: DEFAULT_BODY_METHODS.to_vec(),
            snake_case_errors: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl Settings {
    pub fn expects_body(&self, method: &Method) -> bool {
        self.body_methods.contains(method)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = MarshalerConfig::default();
        assert_eq!(config.body_methods, vec!["POST", "PUT", "PATCH"]);
        assert!(!config.snake_case_errors);
        assert!(config.default_headers.is_empty());

        let settings = config.settings().unwrap();
        assert!(settings.expects_body(&Method::POST));
        assert!(settings.expects_body(&Method::PUT));
        assert!(settings.expects_body(&Method::PATCH));
        assert!(!settings.expects_body(&Method::GET));
        assert!(!settings.expects_body(&Method::DELETE));
    }

    #[test]
    fn test_default_settings_match_default_config() {
        let from_config = MarshalerConfig::default().settings().unwrap();
        let default = Settings::default();
        assert_eq!(from_config.body_methods, default.body_methods);
        assert_eq!(from_config.snake_case_errors, default.snake_case_errors);
        assert_eq!(from_config.default_headers, default.default_headers);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            MarshalerConfig::from_yaml_str("").unwrap(),
            MarshalerConfig::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
body_methods: [post, DELETE]
snake_case_errors: true
default_headers:
  Cache-Control: no-store
  X-Served-By: marshaler
"#;
        let config = MarshalerConfig::from_yaml_str(yaml).unwrap();
        assert!(config.snake_case_errors);

        let settings = config.settings().unwrap();
        assert!(settings.expects_body(&Method::POST));
        assert!(settings.expects_body(&Method::DELETE));
        assert!(!settings.expects_body(&Method::PUT));
        assert_eq!(
            settings.default_headers.get("cache-control").unwrap(),
            "no-store"
        );
        assert_eq!(settings.default_headers.len(), 2);
    }

    #[test]
    fn test_partial_config_keeps_default_methods() {
        let config = MarshalerConfig::from_yaml_str("snake_case_errors: true\n").unwrap();
        assert_eq!(config.body_methods, default_body_methods());
    }

    #[test]
    fn test_invalid_method_rejected() {
        let config = MarshalerConfig {
            body_methods: vec!["PO ST".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.settings(),
            Err(ConstructionError::InvalidBodyMethod { method }) if method == "PO ST"
        ));
    }

    #[test]
    fn test_invalid_default_header_rejected() {
        let mut config = MarshalerConfig::default();
        config
            .default_headers
            .insert("bad header".to_string(), "x".to_string());
        assert!(matches!(
            config.settings(),
            Err(ConstructionError::InvalidHeaderName { .. })
        ));

        let mut config = MarshalerConfig::default();
        config
            .default_headers
            .insert("X-Line".to_string(), "a\nb".to_string());
        assert!(matches!(
            config.settings(),
            Err(ConstructionError::InvalidHeaderValue { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marshaler.yaml");
        fs::write(&path, "body_methods: [PUT]\n").unwrap();

        let config = MarshalerConfig::load(&path).unwrap();
        assert_eq!(config.body_methods, vec!["PUT"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarshalerConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.yaml"));
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marshaler.yaml");
        fs::write(&path, "body_methods: {not: [a list\n").unwrap();
        assert!(MarshalerConfig::load(&path).is_err());
    }
}
