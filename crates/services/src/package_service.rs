use std::sync::Arc;

use scorm_core::model::{Course, CourseDraft, SurveyDomain};
use scorm_core::runtime::DEFAULT_MAX_RETRIES;
use storage::{PackageArchive, PackageStore, StoredPackage};
use tracing::info;

use crate::Clock;
use crate::error::PackageError;
use crate::templates::render_package;

/// An assembled package that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPackage {
    pub course: Course,
    pub file_name: String,
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

/// Validates course input, renders the package files, zips them and hands
/// the archive to a store.
#[derive(Clone)]
pub struct PackageService {
    clock: Clock,
    store: Arc<dyn PackageStore>,
    survey_domain: SurveyDomain,
    max_retries: u32,
}

impl PackageService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn PackageStore>, survey_domain: SurveyDomain) -> Self {
        Self {
            clock,
            store,
            survey_domain,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the frame hop budget baked into the tracking script.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn survey_domain(&self) -> &SurveyDomain {
        &self.survey_domain
    }

    /// Validate the draft and assemble the archive in memory.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::Course` if validation fails, or
    /// `PackageError::Storage` if the archive cannot be written.
    pub fn build(&self, draft: CourseDraft) -> Result<BuiltPackage, PackageError> {
        let course = draft.validate(&self.survey_domain)?;
        let files = render_package(&course, &self.survey_domain, self.max_retries);

        let archive = files.into_iter().fold(
            PackageArchive::new().modified_at(self.clock.now()),
            |archive, file| archive.add_file(file.name, file.contents),
        );
        let entries = archive
            .entry_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let bytes = archive.build()?;

        Ok(BuiltPackage {
            file_name: course.package_file_name(),
            course,
            entries,
            bytes,
        })
    }

    /// Build the package and store it as `<identifier>.zip`.
    ///
    /// # Errors
    ///
    /// Returns `PackageError` if validation, assembly or storage fails.
    pub async fn generate(&self, draft: CourseDraft) -> Result<StoredPackage, PackageError> {
        let package = self.build(draft)?;
        let stored = self
            .store
            .put_package(&package.file_name, &package.bytes)
            .await?;
        info!(
            identifier = %package.course.identifier(),
            location = %stored.location,
            size = stored.size,
            "SCORM package generated"
        );
        Ok(stored)
    }
}
