#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod package_service;
pub mod simulation;
pub mod templates;

pub use scorm_core::Clock;

pub use config::PackagerConfig;
pub use error::{ConfigError, PackageError, SimulationError};
pub use package_service::{BuiltPackage, PackageService};
pub use simulation::{SimulationReport, TrackingSimulation};
