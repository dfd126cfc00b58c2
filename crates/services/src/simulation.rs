use std::rc::Rc;

use scorm_core::model::{LESSON_STATUS, MessagePayload, SurveyDomain};
use scorm_core::runtime::{
    ApiLocator, EmbeddingHost, InMemoryLms, MessageOutcome, RuntimeApi, SessionState,
    SyntheticFrame, TrackingSession,
};
use serde::Serialize;
use tracing::debug;

use crate::error::SimulationError;

/// Deepest frame nesting a simulation accepts.
pub const MAX_DEPTH: usize = 32;

/// Result of one dry run of the wrapper page against an in-memory LMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub initialized: bool,
    pub status_after_load: Option<String>,
    pub outcome: Option<MessageOutcome>,
    pub terminated: bool,
    pub final_state: SessionState,
    pub committed_status: Option<String>,
    pub calls: Vec<String>,
}

/// Replays load, one optional message and unload for a package whose
/// wrapper sits `depth` frames below the LMS window.
#[derive(Debug, Clone)]
pub struct TrackingSimulation {
    survey_domain: SurveyDomain,
    locator: ApiLocator,
    depth: usize,
    initial_status: Option<String>,
    message: Option<(String, MessagePayload)>,
}

impl TrackingSimulation {
    /// `depth` counts the wrapper frame itself; `1` means the wrapper is the
    /// LMS window.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidDepth` if `depth` is zero or above
    /// [`MAX_DEPTH`].
    pub fn new(survey_domain: SurveyDomain, depth: usize) -> Result<Self, SimulationError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(SimulationError::InvalidDepth {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(Self {
            survey_domain,
            locator: ApiLocator::new(),
            depth,
            initial_status: None,
            message: None,
        })
    }

    #[must_use]
    pub fn with_locator(mut self, locator: ApiLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Status the LMS already holds for this attempt.
    #[must_use]
    pub fn with_initial_status(mut self, status: impl Into<String>) -> Self {
        self.initial_status = Some(status.into());
        self
    }

    /// Message delivered between load and unload.
    #[must_use]
    pub fn with_message(mut self, origin: impl Into<String>, payload: MessagePayload) -> Self {
        self.message = Some((origin.into(), payload));
        self
    }

    #[must_use]
    pub fn run(&self) -> SimulationReport {
        let lms = match &self.initial_status {
            Some(status) => InMemoryLms::new().with_value(LESSON_STATUS, status),
            None => InMemoryLms::new(),
        };
        let lms = Rc::new(lms);
        let api: Rc<dyn RuntimeApi> = lms.clone();
        let window = SyntheticFrame::chain(self.depth, Some(self.depth - 1), Some(api));

        let session = TrackingSession::with_locator(window, self.locator);
        let host = EmbeddingHost::new(&session, self.survey_domain.clone());

        let initialized = host.on_load();
        let status_after_load = lms.committed_value(LESSON_STATUS);
        let outcome = self
            .message
            .as_ref()
            .map(|(origin, payload)| host.on_message(origin, payload));
        let terminated = host.on_unload();
        debug!(depth = self.depth, initialized, ?outcome, "simulation finished");

        SimulationReport {
            initialized,
            status_after_load,
            outcome,
            terminated,
            final_state: session.state(),
            committed_status: lms.committed_value(LESSON_STATUS),
            calls: lms.calls().iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://acme.typeform.com";

    fn submit() -> MessagePayload {
        MessagePayload::Text(r#"{"type":"form-submit"}"#.into())
    }

    #[test]
    fn rejects_depth_outside_range() {
        assert!(matches!(
            TrackingSimulation::new(SurveyDomain::default(), 0),
            Err(SimulationError::InvalidDepth { depth: 0, .. })
        ));
        assert!(TrackingSimulation::new(SurveyDomain::default(), MAX_DEPTH + 1).is_err());
    }

    #[test]
    fn fresh_attempt_goes_incomplete_then_completed() {
        let report = TrackingSimulation::new(SurveyDomain::default(), 3)
            .unwrap()
            .with_message(ORIGIN, submit())
            .run();

        assert!(report.initialized);
        assert_eq!(report.status_after_load.as_deref(), Some("incomplete"));
        assert_eq!(report.outcome, Some(MessageOutcome::Completed));
        assert!(report.terminated);
        assert_eq!(report.final_state, SessionState::Terminated);
        assert_eq!(report.committed_status.as_deref(), Some("completed"));
        assert_eq!(report.calls.first().map(String::as_str), Some(r#"LMSInitialize("")"#));
        assert_eq!(report.calls.last().map(String::as_str), Some(r#"LMSFinish("")"#));
    }

    #[test]
    fn settled_attempt_is_left_alone_without_a_message() {
        let report = TrackingSimulation::new(SurveyDomain::default(), 1)
            .unwrap()
            .with_initial_status("passed")
            .run();

        assert_eq!(report.status_after_load.as_deref(), Some("passed"));
        assert_eq!(report.outcome, None);
        assert_eq!(report.committed_status.as_deref(), Some("passed"));
        assert!(!report.calls.iter().any(|call| call.starts_with("LMSSetValue")));
    }

    #[test]
    fn wrapper_too_deep_runs_without_lms() {
        let report = TrackingSimulation::new(SurveyDomain::default(), 9)
            .unwrap()
            .with_message(ORIGIN, submit())
            .run();

        assert!(!report.initialized);
        assert_eq!(report.outcome, Some(MessageOutcome::CompletionRejected));
        assert_eq!(report.final_state, SessionState::Uninitialized);
        assert!(report.calls.is_empty());
    }

    #[test]
    fn foreign_origin_is_reported() {
        let report = TrackingSimulation::new(SurveyDomain::default(), 2)
            .unwrap()
            .with_message("https://evil.example", submit())
            .run();

        assert_eq!(report.outcome, Some(MessageOutcome::IgnoredOrigin));
        assert_eq!(report.committed_status.as_deref(), Some("incomplete"));
    }
}
