// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML parsing and serialization for pipelines (syntactic layer).
//!
//! No semantic checks happen here - that's the job of the validator.

use crate::pipeline::PipelineDefinition;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the textual form.
#[derive(Debug, Error)]
pub enum ParseError {
    /// YAML syntax or shape error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors from the file-form entry points.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The pipeline file does not exist
    #[error("pipeline file not found: {path}")]
    NotFound { path: PathBuf },

    /// IO error reading or writing the file
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse a pipeline from YAML text.
pub fn parse_pipeline(yaml: &str) -> Result<PipelineDefinition, ParseError> {
    let definition: PipelineDefinition = serde_yaml::from_str(yaml)?;
    Ok(definition)
}

/// Parse a pipeline from a YAML file.
pub fn parse_pipeline_file(path: &Path) -> Result<PipelineDefinition, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_pipeline(&content)?)
}

/// Serialize a definition to YAML text, omitting default values.
pub fn serialize_pipeline(definition: &PipelineDefinition) -> Result<String, ParseError> {
    Ok(serde_yaml::to_string(definition)?)
}

/// Write a definition to a YAML file.
pub fn write_pipeline_file(path: &Path, definition: &PipelineDefinition) -> Result<(), LoadError> {
    let yaml = serialize_pipeline(definition)?;
    std::fs::write(path, yaml).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
