use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{LESSON_STATUS, LessonStatus, MessagePayload, SurveyDomain};
use crate::runtime::session::TrackingSession;

/// What the wrapper page did with one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOutcome {
    /// Status set to `completed` and committed.
    Completed,
    /// A valid submission arrived but the LMS refused the write or commit,
    /// or the session was not active.
    CompletionRejected,
    IgnoredOrigin,
    IgnoredType,
    Malformed,
}

/// The wrapper page around the embedded survey: seeds the attempt on load,
/// marks it completed when the survey reports a submission, and closes the
/// session on unload.
pub struct EmbeddingHost<'s> {
    session: &'s TrackingSession,
    survey_domain: SurveyDomain,
}

impl<'s> EmbeddingHost<'s> {
    #[must_use]
    pub fn new(session: &'s TrackingSession, survey_domain: SurveyDomain) -> Self {
        Self {
            session,
            survey_domain,
        }
    }

    #[must_use]
    pub fn session(&self) -> &TrackingSession {
        self.session
    }

    /// Page `load`: initialize, then mark a fresh attempt as `incomplete`
    /// unless the LMS already holds an outcome for it.
    pub fn on_load(&self) -> bool {
        let initialized = self.session.initialize();

        let current = self.session.get(LESSON_STATUS);
        let settled = LessonStatus::from_runtime(&current).is_some_and(LessonStatus::is_settled);
        if !settled {
            debug!(status = %current, "seeding lesson status as incomplete");
            self.session
                .set(LESSON_STATUS, LessonStatus::Incomplete.as_str());
            self.session.save();
        }
        initialized
    }

    /// Cross-frame `message` event from the survey frame.
    pub fn on_message(&self, origin: &str, payload: &MessagePayload) -> MessageOutcome {
        if !self.survey_domain.matches_origin(origin) {
            return MessageOutcome::IgnoredOrigin;
        }

        let message = match payload.decode() {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, origin, "could not process message from survey frame");
                return MessageOutcome::Malformed;
            }
        };
        if !message.is_form_submit() {
            return MessageOutcome::IgnoredType;
        }

        info!("survey submitted, setting lesson status to completed");
        let written = self
            .session
            .set(LESSON_STATUS, LessonStatus::Completed.as_str());
        let saved = self.session.save();
        if written && saved {
            MessageOutcome::Completed
        } else {
            MessageOutcome::CompletionRejected
        }
    }

    /// Page `beforeunload`.
    pub fn on_unload(&self) -> bool {
        self.session.terminate()
    }
}
