use std::fmt;

use thiserror::Error;

use crate::model::survey::{SurveyDomain, SurveyUrl, SurveyUrlError};

/// Prefix of identifiers derived from a course title.
pub const IDENTIFIER_PREFIX: &str = "com.scorm.wrapper.";

const MIN_TEXT_LEN: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error(transparent)]
    SurveyUrl(#[from] SurveyUrlError),

    #[error("course title must be longer than 3 characters")]
    TitleTooShort,

    #[error("course description must be longer than 3 characters")]
    DescriptionTooShort,

    #[error("course identifier must be longer than 3 characters")]
    IdentifierTooShort,

    #[error("course identifier may not contain whitespace, quotes or angle brackets")]
    IdentifierInvalid,
}

/// Identifier of the manifest and organization, also the archive's base name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseIdentifier(String);

impl CourseIdentifier {
    /// # Errors
    ///
    /// Returns `CourseError` if the identifier is too short or contains
    /// characters that cannot appear in an XML ID or a file name.
    pub fn new(raw: impl Into<String>) -> Result<Self, CourseError> {
        let raw = raw.into().trim().to_owned();
        if raw.chars().count() < MIN_TEXT_LEN {
            return Err(CourseError::IdentifierTooShort);
        }
        if raw
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&' | '/' | '\\'))
        {
            return Err(CourseError::IdentifierInvalid);
        }
        Ok(Self(raw))
    }

    /// Derive `com.scorm.wrapper.<slug>` from a course title.
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        Self(format!("{IDENTIFIER_PREFIX}{}", slugify(title)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase, collapse every run of characters outside `[a-z0-9]` to a single
/// `-`, then strip dashes from both ends.
fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Unvalidated form input for a new package.
#[derive(Clone, Debug, Default)]
pub struct CourseDraft {
    pub survey_url: String,
    pub title: String,
    pub description: String,
    /// Derived from the title when absent or blank.
    pub identifier: Option<String>,
}

impl CourseDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for the first field that fails validation.
    pub fn validate(self, domain: &SurveyDomain) -> Result<Course, CourseError> {
        let survey_url = SurveyUrl::parse(&self.survey_url, domain)?;

        let title = self.title.trim().to_owned();
        if title.chars().count() < MIN_TEXT_LEN {
            return Err(CourseError::TitleTooShort);
        }

        let description = self.description.trim().to_owned();
        if description.chars().count() < MIN_TEXT_LEN {
            return Err(CourseError::DescriptionTooShort);
        }

        let identifier = match self.identifier.filter(|id| !id.trim().is_empty()) {
            Some(explicit) => CourseIdentifier::new(explicit)?,
            None => {
                let derived = CourseIdentifier::from_title(&title);
                // A title without any letters or digits leaves only the prefix.
                if derived.as_str().len() == IDENTIFIER_PREFIX.len() {
                    return Err(CourseError::IdentifierTooShort);
                }
                derived
            }
        };

        Ok(Course {
            survey_url,
            title,
            description,
            identifier,
        })
    }
}

/// Validated metadata for one generated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    survey_url: SurveyUrl,
    title: String,
    description: String,
    identifier: CourseIdentifier,
}

impl Course {
    #[must_use]
    pub fn survey_url(&self) -> &SurveyUrl {
        &self.survey_url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn identifier(&self) -> &CourseIdentifier {
        &self.identifier
    }

    /// Name of the downloadable archive: `<identifier>.zip`.
    #[must_use]
    pub fn package_file_name(&self) -> String {
        format!("{}.zip", self.identifier)
    }
}
