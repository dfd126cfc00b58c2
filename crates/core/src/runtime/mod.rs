//! Runtime side of a generated package: finding the LMS API from inside the
//! content frame, driving a SCORM 1.2 tracking session, and reacting to the
//! events of the wrapper page.
//!
//! Everything here is single-threaded and event driven, so handles are `Rc`
//! and state lives in `Cell`/`RefCell`.

mod api;
mod frame;
mod host;
mod locator;
mod memory;
mod session;

pub use api::{FALSE, NO_ERROR, RuntimeApi, TRUE};
pub use frame::{Frame, FrameAccessError, SyntheticFrame, SyntheticFrameBuilder};
pub use host::{EmbeddingHost, MessageOutcome};
pub use locator::{ApiLocator, DEFAULT_MAX_RETRIES};
pub use memory::{GENERAL_EXCEPTION, InMemoryLms, LmsCall, NOT_INITIALIZED};
pub use session::{SessionState, TrackingSession};
