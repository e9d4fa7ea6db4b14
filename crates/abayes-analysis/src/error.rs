use abayes_stats::error::{InvalidConfigError, InvalidInputError};

use crate::schema::SchemaResolutionError;

/// Any failure of an A/B analysis.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("{_0}")]
    Schema(SchemaResolutionError),
    #[display("invalid input: {_0}")]
    Input(InvalidInputError),
    #[display("invalid configuration: {_0}")]
    Config(InvalidConfigError),
}
