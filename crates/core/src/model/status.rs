use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SCORM 1.2 data model element holding the lesson status.
pub const LESSON_STATUS: &str = "cmi.core.lesson_status";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson status: {raw:?}")]
pub struct UnknownLessonStatus {
    pub raw: String,
}

/// Lesson status vocabulary understood by a SCORM 1.2 runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonStatus {
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "incomplete")]
    Incomplete,
    #[serde(rename = "browsed")]
    Browsed,
    #[serde(rename = "not attempted")]
    NotAttempted,
}

impl LessonStatus {
    pub const ALL: [LessonStatus; 6] = [
        LessonStatus::Passed,
        LessonStatus::Completed,
        LessonStatus::Failed,
        LessonStatus::Incomplete,
        LessonStatus::Browsed,
        LessonStatus::NotAttempted,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::Passed => "passed",
            LessonStatus::Completed => "completed",
            LessonStatus::Failed => "failed",
            LessonStatus::Incomplete => "incomplete",
            LessonStatus::Browsed => "browsed",
            LessonStatus::NotAttempted => "not attempted",
        }
    }

    /// Parse a raw runtime value. Empty or unrecognised values yield `None`.
    #[must_use]
    pub fn from_runtime(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// Whether the attempt already has an outcome that must not be overwritten
    /// with `incomplete` when the page loads again.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            LessonStatus::Completed | LessonStatus::Passed | LessonStatus::Failed
        )
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = UnknownLessonStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_runtime(s).ok_or_else(|| UnknownLessonStatus { raw: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_vocabulary() {
        for status in LessonStatus::ALL {
            assert_eq!(status.as_str().parse::<LessonStatus>().unwrap(), status);
        }
        assert_eq!(
            LessonStatus::from_runtime("not attempted"),
            Some(LessonStatus::NotAttempted)
        );
    }

    #[test]
    fn empty_and_unknown_values_are_not_statuses() {
        assert_eq!(LessonStatus::from_runtime(""), None);
        assert_eq!(LessonStatus::from_runtime("Completed"), None);
        let err = "done".parse::<LessonStatus>().unwrap_err();
        assert_eq!(err.raw, "done");
    }

    #[test]
    fn only_outcomes_are_settled() {
        let settled: Vec<_> = LessonStatus::ALL
            .into_iter()
            .filter(|s| s.is_settled())
            .collect();
        assert_eq!(
            settled,
            vec![
                LessonStatus::Passed,
                LessonStatus::Completed,
                LessonStatus::Failed
            ]
        );
    }

    #[test]
    fn serializes_with_runtime_spelling() {
        let json = serde_json::to_string(&LessonStatus::NotAttempted).unwrap();
        assert_eq!(json, "\"not attempted\"");
    }
}
