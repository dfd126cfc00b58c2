//! Shared error types for the services crate.

use thiserror::Error;

use scorm_core::model::{CourseError, SurveyUrlError};
use storage::StorageError;

/// Errors emitted while reading packager configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is set but empty")]
    Empty { var: &'static str },
    #[error("invalid survey domain")]
    SurveyDomain(#[from] SurveyUrlError),
}

/// Errors emitted by `PackageService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TrackingSimulation`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimulationError {
    #[error("frame depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: usize, max: usize },
}
