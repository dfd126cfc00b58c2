use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use crate::runtime::api::{FALSE, NO_ERROR, RuntimeApi, TRUE};

/// `LMSGetLastError` code for an unspecified failure.
pub const GENERAL_EXCEPTION: &str = "101";
/// `LMSGetLastError` code for calls made outside an initialized session.
pub const NOT_INITIALIZED: &str = "301";

/// One call received by [`InMemoryLms`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LmsCall {
    Initialize,
    Finish,
    GetValue(String),
    SetValue(String, String),
    Commit,
    GetLastError,
}

impl fmt::Display for LmsCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LmsCall::Initialize => f.write_str("LMSInitialize(\"\")"),
            LmsCall::Finish => f.write_str("LMSFinish(\"\")"),
            LmsCall::GetValue(element) => write!(f, "LMSGetValue({element:?})"),
            LmsCall::SetValue(element, value) => {
                write!(f, "LMSSetValue({element:?}, {value:?})")
            }
            LmsCall::Commit => f.write_str("LMSCommit(\"\")"),
            LmsCall::GetLastError => f.write_str("LMSGetLastError()"),
        }
    }
}

/// Simple in-memory LMS runtime for tests and dry runs.
///
/// Values written with `set_value` become visible to `get_value` at once and
/// are copied to the committed snapshot on `commit`. Failures can be injected
/// per operation; every call is recorded.
#[derive(Debug, Default)]
pub struct InMemoryLms {
    values: RefCell<HashMap<String, String>>,
    committed: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<LmsCall>>,
    last_error: RefCell<String>,
    running: Cell<bool>,
    reject_initialize: Cell<bool>,
    fail_set: Cell<bool>,
    fail_commit: Cell<bool>,
    fail_get: Cell<bool>,
}

impl InMemoryLms {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_error: RefCell::new(NO_ERROR.to_owned()),
            ..Self::default()
        }
    }

    /// Seed a data model element, as if persisted by an earlier attempt.
    #[must_use]
    pub fn with_value(self, element: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(element.to_owned(), value.to_owned());
        self.committed
            .borrow_mut()
            .insert(element.to_owned(), value.to_owned());
        self
    }

    pub fn reject_initialize(&self, reject: bool) {
        self.reject_initialize.set(reject);
    }

    pub fn fail_set(&self, fail: bool) {
        self.fail_set.set(fail);
    }

    pub fn fail_commit(&self, fail: bool) {
        self.fail_commit.set(fail);
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.set(fail);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<LmsCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&LmsCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// The calls that change state, leaving out reads and error polling.
    #[must_use]
    pub fn mutations(&self) -> Vec<LmsCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, LmsCall::GetValue(_) | LmsCall::GetLastError))
            .cloned()
            .collect()
    }

    /// Value as of the last successful commit.
    #[must_use]
    pub fn committed_value(&self, element: &str) -> Option<String> {
        self.committed.borrow().get(element).cloned()
    }

    fn record(&self, call: LmsCall) {
        self.calls.borrow_mut().push(call);
    }

    fn finish_call(&self, code: &str, ok: bool) -> String {
        *self.last_error.borrow_mut() = code.to_owned();
        if ok { TRUE.to_owned() } else { FALSE.to_owned() }
    }
}

impl RuntimeApi for InMemoryLms {
    fn initialize(&self, _arg: &str) -> String {
        self.record(LmsCall::Initialize);
        if self.reject_initialize.get() {
            return self.finish_call(GENERAL_EXCEPTION, false);
        }
        self.running.set(true);
        self.finish_call(NO_ERROR, true)
    }

    fn finish(&self, _arg: &str) -> String {
        self.record(LmsCall::Finish);
        if !self.running.get() {
            return self.finish_call(NOT_INITIALIZED, false);
        }
        self.running.set(false);
        self.finish_call(NO_ERROR, true)
    }

    fn get_value(&self, element: &str) -> String {
        self.record(LmsCall::GetValue(element.to_owned()));
        if !self.running.get() {
            *self.last_error.borrow_mut() = NOT_INITIALIZED.to_owned();
            return String::new();
        }
        if self.fail_get.get() {
            *self.last_error.borrow_mut() = GENERAL_EXCEPTION.to_owned();
            return String::new();
        }
        *self.last_error.borrow_mut() = NO_ERROR.to_owned();
        self.values
            .borrow()
            .get(element)
            .cloned()
            .unwrap_or_default()
    }

    fn set_value(&self, element: &str, value: &str) -> String {
        self.record(LmsCall::SetValue(element.to_owned(), value.to_owned()));
        if !self.running.get() {
            return self.finish_call(NOT_INITIALIZED, false);
        }
        if self.fail_set.get() {
            return self.finish_call(GENERAL_EXCEPTION, false);
        }
        self.values
            .borrow_mut()
            .insert(element.to_owned(), value.to_owned());
        self.finish_call(NO_ERROR, true)
    }

    fn commit(&self, _arg: &str) -> String {
        self.record(LmsCall::Commit);
        if !self.running.get() {
            return self.finish_call(NOT_INITIALIZED, false);
        }
        if self.fail_commit.get() {
            return self.finish_call(GENERAL_EXCEPTION, false);
        }
        let snapshot = self.values.borrow().clone();
        *self.committed.borrow_mut() = snapshot;
        self.finish_call(NO_ERROR, true)
    }

    fn get_last_error(&self) -> String {
        self.record(LmsCall::GetLastError);
        self.last_error.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_outside_a_session_fail_with_not_initialized() {
        let lms = InMemoryLms::new();
        assert_eq!(lms.set_value("cmi.core.lesson_status", "completed"), FALSE);
        assert_eq!(lms.get_last_error(), NOT_INITIALIZED);
        assert_eq!(lms.get_value("cmi.core.lesson_status"), "");
        assert_eq!(lms.get_last_error(), NOT_INITIALIZED);
    }

    #[test]
    fn commit_snapshots_written_values() {
        let lms = InMemoryLms::new();
        assert_eq!(lms.initialize(""), TRUE);
        assert_eq!(lms.set_value("cmi.core.lesson_status", "incomplete"), TRUE);
        assert_eq!(lms.committed_value("cmi.core.lesson_status"), None);

        assert_eq!(lms.commit(""), TRUE);
        assert_eq!(
            lms.committed_value("cmi.core.lesson_status").as_deref(),
            Some("incomplete")
        );
        assert_eq!(lms.finish(""), TRUE);
        assert!(!lms.is_running());
    }

    #[test]
    fn seeded_values_are_readable_after_initialize() {
        let lms = InMemoryLms::new().with_value("cmi.core.lesson_status", "passed");
        lms.initialize("");
        assert_eq!(lms.get_value("cmi.core.lesson_status"), "passed");
        assert_eq!(lms.get_last_error(), NO_ERROR);
        assert_eq!(lms.mutations(), vec![LmsCall::Initialize]);
    }

    #[test]
    fn calls_render_like_the_js_api() {
        let call = LmsCall::SetValue("cmi.core.lesson_status".into(), "completed".into());
        assert_eq!(
            call.to_string(),
            r#"LMSSetValue("cmi.core.lesson_status", "completed")"#
        );
        assert_eq!(LmsCall::Commit.to_string(), r#"LMSCommit("")"#);
    }
}
