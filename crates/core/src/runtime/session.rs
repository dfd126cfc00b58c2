use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::runtime::api::{NO_ERROR, RuntimeApi, TRUE};
use crate::runtime::frame::Frame;
use crate::runtime::locator::ApiLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Terminated,
}

/// One page-lifetime attempt to report progress to the LMS.
///
/// The session never owns the LMS API object: it keeps a `Weak` handle found
/// by the locator. All accessors check the state first, so load, unload and
/// message handlers may call them in any order. Failures come back as `""` or
/// `false` and are logged; nothing here panics or returns an error.
pub struct TrackingSession {
    window: Rc<dyn Frame>,
    locator: ApiLocator,
    api: RefCell<Option<Weak<dyn RuntimeApi>>>,
    state: Cell<SessionState>,
}

impl TrackingSession {
    #[must_use]
    pub fn new(window: Rc<dyn Frame>) -> Self {
        Self::with_locator(window, ApiLocator::default())
    }

    #[must_use]
    pub fn with_locator(window: Rc<dyn Frame>, locator: ApiLocator) -> Self {
        Self {
            window,
            locator,
            api: RefCell::new(None),
            state: Cell::new(SessionState::Uninitialized),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.get() == SessionState::Initialized
    }

    /// Locate the LMS API and call `LMSInitialize`.
    ///
    /// Returns `true` at once if the session is already initialized. A
    /// terminated session stays terminated.
    pub fn initialize(&self) -> bool {
        match self.state.get() {
            SessionState::Initialized => return true,
            SessionState::Terminated => {
                warn!("tracking session already terminated, not initializing again");
                return false;
            }
            SessionState::Uninitialized => {}
        }

        let Some(api) = self.locator.locate(&self.window) else {
            error!("SCORM API not found, progress will not be tracked");
            return false;
        };

        if api.initialize("") != TRUE {
            error!("LMSInitialize failed");
            return false;
        }

        *self.api.borrow_mut() = Some(Rc::downgrade(&api));
        self.state.set(SessionState::Initialized);
        debug!("tracking session initialized");
        true
    }

    /// Call `LMSFinish` once. Always returns `true`.
    pub fn terminate(&self) -> bool {
        if !self.is_initialized() {
            return true;
        }
        if let Some(api) = self.live_api() {
            if api.finish("") != TRUE {
                warn!("LMSFinish reported failure");
            }
        }
        self.api.borrow_mut().take();
        self.state.set(SessionState::Terminated);
        debug!("tracking session terminated");
        true
    }

    /// Read a data model element. Returns `""` outside an initialized session.
    ///
    /// A non-zero last-error code is logged, but the value read is returned
    /// unchanged.
    pub fn get(&self, key: &str) -> String {
        let Some(api) = self.active_api() else {
            return String::new();
        };
        let value = api.get_value(key);
        let code = api.get_last_error();
        if code != NO_ERROR {
            error!(key, code = %code, "LMSGetValue failed");
        }
        value
    }

    /// Write a data model element. Returns `false` outside an initialized session.
    pub fn set(&self, key: &str, value: &str) -> bool {
        let Some(api) = self.active_api() else {
            return false;
        };
        let success = api.set_value(key, value) == TRUE;
        if !success {
            let code = api.get_last_error();
            error!(key, value, code = %code, "LMSSetValue failed");
        }
        success
    }

    /// Ask the LMS to persist the values written so far.
    pub fn save(&self) -> bool {
        let Some(api) = self.active_api() else {
            return false;
        };
        let success = api.commit("") == TRUE;
        if !success {
            let code = api.get_last_error();
            error!(code = %code, "LMSCommit failed");
        }
        success
    }

    fn active_api(&self) -> Option<Rc<dyn RuntimeApi>> {
        if !self.is_initialized() {
            return None;
        }
        self.live_api()
    }

    fn live_api(&self) -> Option<Rc<dyn RuntimeApi>> {
        let api = self.api.borrow().as_ref().and_then(Weak::upgrade);
        if api.is_none() {
            warn!("SCORM API is no longer available");
        }
        api
    }
}
