use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a ruleset
#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("unresolved references in ruleset: {}", .0.join("; "))]
    UnresolvedReferences(Vec<String>),
}
