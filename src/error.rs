use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

/// Failures of the command-line page controller. Rendering itself never
/// fails; only reading inputs and writing output can.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("schema `{path}`: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    #[error("invalid json data in `{path}`: {source}")]
    DataJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid yaml data in `{path}`: {source}")]
    DataYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
