//! Routing table loading from disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::RoutingTable;
use crate::config::validation::{validate_table, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source was read but is not a well-formed routing document.
    #[error("failed to parse {format} config: {source}")]
    Parse {
        format: ConfigFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document parsed but breaks a routing invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Serialization format of the routing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything unrecognised is
    /// treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => f.write_str("YAML"),
            ConfigFormat::Toml => f.write_str("TOML"),
            ConfigFormat::Json => f.write_str("JSON"),
        }
    }
}

/// Deserialize a routing table from in-memory text. Performs no validation.
pub fn parse_table(content: &str, format: ConfigFormat) -> Result<RoutingTable, ConfigError> {
    // An empty document is an empty table; validation rejects it.
    if content.trim().is_empty() {
        return Ok(RoutingTable::default());
    }

    let parsed: Result<RoutingTable, Box<dyn std::error::Error + Send + Sync>> = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.into()),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.into()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.into()),
    };

    parsed.map_err(|source| ConfigError::Parse { format, source })
}

/// Read and deserialize the routing file at `path`. Performs no validation.
pub fn load_table(path: &Path) -> Result<RoutingTable, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_table(&content, ConfigFormat::from_path(path))
}

/// Load the routing file and check it can become the active table.
pub fn load_validated(path: &Path) -> Result<RoutingTable, ConfigError> {
    let table = load_table(path)?;
    validate_table(&table)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Route;
    use std::io::Write;

    const YAML: &str = r#"
routes:
  - match:
      host: a.test
      path_prefix: /api
    forward_to:
      container: svc
      port: 9000
  - match:
      host: b.test
      path_prefix: /
    forward_to:
      container: web
      port: 80
"#;

    fn expected() -> RoutingTable {
        RoutingTable::new(vec![
            Route::new("a.test", "/api", "svc", 9000),
            Route::new("b.test", "/", "web", 80),
        ])
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("config.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("routes.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("routes.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("routes")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_parse_yaml_preserves_order() {
        let table = parse_table(YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(table, expected());
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
[[routes]]
match = { host = "a.test", path_prefix = "/api" }
forward_to = { container = "svc", port = 9000 }

[[routes]]
match = { host = "b.test", path_prefix = "/" }
forward_to = { container = "web", port = 80 }
"#;
        assert_eq!(parse_table(content, ConfigFormat::Toml).unwrap(), expected());
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{"routes": [
            {"match": {"host": "a.test", "path_prefix": "/api"}, "forward_to": {"container": "svc", "port": 9000}},
            {"match": {"host": "b.test", "path_prefix": "/"}, "forward_to": {"container": "web", "port": 80}}
        ]}"#;
        assert_eq!(parse_table(content, ConfigFormat::Json).unwrap(), expected());
    }

    #[test]
    fn test_missing_fields_default_to_zero_values() {
        let content = "routes:\n  - match:\n      host: a.test\n";
        let table = parse_table(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(table, RoutingTable::new(vec![Route::new("a.test", "", "", 0)]));
    }

    #[test]
    fn test_null_sections_reach_validation() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_file(&dir, "a.yaml", "routes:\n  - match:\n      host: a\n    forward_to: ~\n");
        let err = load_validated(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::EmptyPathPrefix { index: 0 })
        ));

        let path = write_file(&dir, "b.yaml", "routes:\n  - match: ~\n    forward_to: ~\n");
        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::EmptyHost { index: 0 })));

        let path = write_file(&dir, "c.json", r#"{"routes": [null, {"match": null}]}"#);
        assert_eq!(
            load_table(&path).unwrap(),
            RoutingTable::new(vec![Route::default(), Route::default()])
        );

        let path = write_file(&dir, "d.yaml", "routes: ~\n");
        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::EmptyTable)));
    }

    #[test]
    fn test_empty_document_is_empty_table() {
        let table = parse_table("  \n", ConfigFormat::Yaml).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_source_is_parse_error() {
        let err = parse_table("routes: [oops", ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: ConfigFormat::Yaml, .. }));

        let err = parse_table("routes = 3", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: ConfigFormat::Toml, .. }));
    }

    #[test]
    fn test_load_does_not_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.yaml", "routes: []\n");

        let table = load_table(&path).unwrap();
        assert!(table.is_empty());

        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ValidationError::EmptyTable)));
    }

    #[test]
    fn test_negative_port_reaches_validation() {
        let dir = tempfile::tempdir().unwrap();
        let content = YAML.replace("9000", "-5");
        let path = write_file(&dir, "config.yaml", &content);

        let err = load_validated(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::PortOutOfRange { index: 0, port: -5 })
        ));
    }

    #[test]
    fn test_missing_file_is_source_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_table(&path).unwrap_err();
        match err {
            ConfigError::SourceRead { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_validated_accepts_good_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.yml", YAML);
        assert_eq!(load_validated(&path).unwrap(), expected());
    }
}
