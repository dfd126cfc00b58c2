use std::env;
use std::path::PathBuf;

use scorm_core::model::SurveyDomain;

use crate::error::ConfigError;

pub const OUT_DIR_VAR: &str = "SCORM_OUT_DIR";
pub const SURVEY_DOMAIN_VAR: &str = "SCORM_SURVEY_DOMAIN";

/// Where packages go and which survey provider they embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackagerConfig {
    pub out_dir: PathBuf,
    pub survey_domain: SurveyDomain,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            survey_domain: SurveyDomain::default(),
        }
    }
}

impl PackagerConfig {
    /// Read `SCORM_OUT_DIR` and `SCORM_SURVEY_DOMAIN`, falling back to the
    /// current directory and the default survey provider.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but empty or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`PackagerConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but empty or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(OUT_DIR_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::Empty { var: OUT_DIR_VAR });
            }
            config.out_dir = PathBuf::from(raw.trim());
        }

        if let Some(raw) = lookup(SURVEY_DOMAIN_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::Empty {
                    var: SURVEY_DOMAIN_VAR,
                });
            }
            config.survey_domain = SurveyDomain::new(raw)?;
        }

        Ok(config)
    }
}
