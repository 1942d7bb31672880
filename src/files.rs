//! Reading schema and data documents from disk for the command line.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::value::Value;
use crate::error::CliError;
use crate::schema::SchemaMap;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a schema map; `.yaml`/`.yml` files are read as YAML, anything else
/// as JSON.
pub fn read_schema(path: &Path) -> Result<SchemaMap, CliError> {
    let text = read(path)?;
    let parsed = if is_yaml(path) {
        SchemaMap::from_yaml_str(&text)
    } else {
        SchemaMap::from_json_str(&text)
    };
    let schema = parsed.map_err(|source| CliError::Schema {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), sections = schema.order().len(), "schema loaded");
    Ok(schema)
}

pub fn read_data(path: &Path) -> Result<Value, CliError> {
    let text = read(path)?;
    parse_data(path, &text)
}

fn parse_data(path: &Path, text: &str) -> Result<Value, CliError> {
    let raw: serde_json::Value = if is_yaml(path) {
        serde_yaml::from_str(text).map_err(|source| CliError::DataYaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(text).map_err(|source| CliError::DataJson {
            path: path.to_path_buf(),
            source,
        })?
    };
    Ok(Value::from_json(raw))
}

pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_data;
    use crate::core::value::Value;
    use crate::error::CliError;
    use std::path::Path;

    #[test]
    fn data_format_follows_extension() {
        let json = parse_data(Path::new("systems.json"), r#"{"systems": [{"a": 1}]}"#)
            .expect("json data");
        let yaml = parse_data(Path::new("systems.yaml"), "systems:\n  - a: 1\n").expect("yaml data");
        assert_eq!(json, yaml);
        assert!(matches!(json.get("systems"), Some(Value::List(rows)) if rows.len() == 1));
    }

    #[test]
    fn malformed_data_names_the_file() {
        let err = parse_data(Path::new("broken.json"), "{").expect_err("broken");
        assert!(matches!(err, CliError::DataJson { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
