use std::rc::Rc;

use scorm_core::model::{LESSON_STATUS, MessagePayload, SurveyDomain};
use scorm_core::runtime::{
    EmbeddingHost, InMemoryLms, LmsCall, MessageOutcome, RuntimeApi, SessionState,
    SyntheticFrame, TrackingSession,
};

const SURVEY_ORIGIN: &str = "https://acme.typeform.com";

#[test]
fn page_lifetime_reports_incomplete_then_completed() {
    let lms = Rc::new(InMemoryLms::new().with_value(LESSON_STATUS, ""));
    let api: Rc<dyn RuntimeApi> = lms.clone();
    // LMS player -> course frame -> wrapper page.
    let window = SyntheticFrame::chain(3, Some(2), Some(api));
    let session = TrackingSession::new(window);
    let host = EmbeddingHost::new(&session, SurveyDomain::default());

    assert!(host.on_load());
    assert_eq!(
        lms.mutations(),
        vec![
            LmsCall::Initialize,
            LmsCall::SetValue(LESSON_STATUS.into(), "incomplete".into()),
            LmsCall::Commit,
        ]
    );

    // Noise from the survey frame and from elsewhere.
    assert_eq!(
        host.on_message("https://ads.example.net", &MessagePayload::text(r#"{"type":"form-submit"}"#)),
        MessageOutcome::IgnoredOrigin
    );
    assert_eq!(
        host.on_message(SURVEY_ORIGIN, &MessagePayload::text("<html>")),
        MessageOutcome::Malformed
    );

    let outcome = host.on_message(
        SURVEY_ORIGIN,
        &MessagePayload::text(r#"{"type":"form-submit","response_id":"r-1"}"#),
    );
    assert_eq!(outcome, MessageOutcome::Completed);
    assert_eq!(
        lms.mutations(),
        vec![
            LmsCall::Initialize,
            LmsCall::SetValue(LESSON_STATUS.into(), "incomplete".into()),
            LmsCall::Commit,
            LmsCall::SetValue(LESSON_STATUS.into(), "completed".into()),
            LmsCall::Commit,
        ]
    );
    assert_eq!(session.get(LESSON_STATUS), "completed");

    assert!(host.on_unload());
    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(lms.count(|c| *c == LmsCall::Finish), 1);
    assert_eq!(
        lms.committed_value(LESSON_STATUS).as_deref(),
        Some("completed")
    );
}

#[test]
fn popup_launch_finds_lms_through_opener() {
    let lms = Rc::new(InMemoryLms::new());
    let api: Rc<dyn RuntimeApi> = lms.clone();
    let opener = SyntheticFrame::chain(2, Some(1), Some(api));
    let popup: Rc<dyn scorm_core::runtime::Frame> = SyntheticFrame::top().with_opener(opener).build();
    let session = TrackingSession::new(popup);

    assert!(session.initialize());
    assert!(session.set(LESSON_STATUS, "completed"));
    assert!(session.save());
    assert_eq!(session.get(LESSON_STATUS), "completed");
}

#[test]
fn message_before_load_is_harmless() {
    let lms = Rc::new(InMemoryLms::new());
    let api: Rc<dyn RuntimeApi> = lms.clone();
    let session = TrackingSession::new(SyntheticFrame::chain(2, Some(1), Some(api)));
    let host = EmbeddingHost::new(&session, SurveyDomain::default());

    let outcome = host.on_message(
        SURVEY_ORIGIN,
        &MessagePayload::text(r#"{"type":"form-submit"}"#),
    );

    assert_eq!(outcome, MessageOutcome::CompletionRejected);
    assert!(lms.calls().is_empty());
}
