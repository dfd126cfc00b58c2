use std::rc::Rc;

use tracing::{debug, error};

use crate::runtime::api::RuntimeApi;
use crate::runtime::frame::{Frame, FrameAccessError};

/// Parent hops allowed before the search gives up (8 frames inspected in total).
pub const DEFAULT_MAX_RETRIES: u32 = 7;

/// Finds the LMS `API` object in the frame ancestry of the content page,
/// falling back to the ancestry of the window that opened it.
#[derive(Debug, Clone, Copy)]
pub struct ApiLocator {
    max_retries: u32,
}

impl Default for ApiLocator {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ApiLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self { max_retries }
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Search `window`'s ancestors, then its opener's ancestors.
    ///
    /// Never fails: access errors and an exhausted hop budget both come back
    /// as `None` and are only logged.
    #[must_use]
    pub fn locate(&self, window: &Rc<dyn Frame>) -> Option<Rc<dyn RuntimeApi>> {
        let found = self
            .search_ancestry(Rc::clone(window))
            .and_then(|api| match api {
                Some(api) => Ok(Some(api)),
                None => match window.opener()? {
                    Some(opener) => {
                        debug!("SCORM API not in frame ancestry, trying opener window");
                        self.search_ancestry(opener)
                    }
                    None => Ok(None),
                },
            });

        match found {
            Ok(Some(api)) => Some(api),
            Ok(None) => {
                error!("unable to find SCORM API");
                None
            }
            Err(err) => {
                error!(%err, "error while searching for SCORM API");
                None
            }
        }
    }

    fn search_ancestry(
        &self,
        start: Rc<dyn Frame>,
    ) -> Result<Option<Rc<dyn RuntimeApi>>, FrameAccessError> {
        let mut frame = start;
        let mut retries = 0_u32;
        loop {
            if let Some(api) = frame.api()? {
                return Ok(Some(api));
            }
            let Some(parent) = frame.parent()? else {
                return Ok(None);
            };
            if std::ptr::addr_eq(Rc::as_ptr(&parent), Rc::as_ptr(&frame)) {
                return Ok(None);
            }
            retries += 1;
            if retries > self.max_retries {
                error!(
                    max_retries = self.max_retries,
                    "could not find SCORM API within the frame hop limit"
                );
                return Ok(None);
            }
            frame = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::frame::SyntheticFrame;
    use crate::runtime::memory::InMemoryLms;

    fn lms() -> (Rc<InMemoryLms>, Rc<dyn RuntimeApi>) {
        let lms = Rc::new(InMemoryLms::new());
        let api: Rc<dyn RuntimeApi> = lms.clone();
        (lms, api)
    }

    fn same_api(a: &Rc<dyn RuntimeApi>, b: &Rc<dyn RuntimeApi>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
    }

    #[test]
    fn finds_api_on_current_frame() {
        let (_lms, api) = lms();
        let window = SyntheticFrame::chain(1, Some(0), Some(Rc::clone(&api)));
        let found = ApiLocator::new().locate(&window).unwrap();
        assert!(same_api(&found, &api));
    }

    #[test]
    fn finds_api_within_hop_limit() {
        let (_lms, api) = lms();
        let window = SyntheticFrame::chain(10, Some(5), Some(Rc::clone(&api)));
        assert!(ApiLocator::new().locate(&window).is_some());

        let edge = SyntheticFrame::chain(10, Some(7), Some(Rc::clone(&api)));
        assert!(ApiLocator::new().locate(&edge).is_some());
    }

    #[test]
    fn gives_up_beyond_hop_limit() {
        let (_lms, api) = lms();
        let deep = SyntheticFrame::chain(10, Some(9), Some(Rc::clone(&api)));
        assert!(ApiLocator::new().locate(&deep).is_none());

        let just_past = SyntheticFrame::chain(10, Some(8), Some(api));
        assert!(ApiLocator::new().locate(&just_past).is_none());
    }

    #[test]
    fn custom_retry_budget_is_respected() {
        let (_lms, api) = lms();
        let window = SyntheticFrame::chain(4, Some(3), Some(api));
        assert!(ApiLocator::with_max_retries(2).locate(&window).is_none());
        assert!(ApiLocator::with_max_retries(3).locate(&window).is_some());
    }

    #[test]
    fn stops_at_top_window_without_api() {
        let window = SyntheticFrame::chain(3, None, None);
        assert!(ApiLocator::new().locate(&window).is_none());
    }

    #[test]
    fn stops_when_parent_is_absent() {
        let window: Rc<dyn Frame> = SyntheticFrame::detached().build();
        assert!(ApiLocator::new().locate(&window).is_none());
    }

    #[test]
    fn falls_back_to_opener_ancestry() {
        let (_lms, api) = lms();
        let opener = SyntheticFrame::chain(2, Some(1), Some(Rc::clone(&api)));
        let popup_top: Rc<dyn Frame> = SyntheticFrame::top().with_opener(opener).build();
        let window: Rc<dyn Frame> = SyntheticFrame::child_of(popup_top).build();

        // The opener belongs to the top-level popup window, not the content frame.
        assert!(ApiLocator::new().locate(&window).is_none());

        let opener = SyntheticFrame::chain(2, Some(1), Some(Rc::clone(&api)));
        let window: Rc<dyn Frame> = SyntheticFrame::top().with_opener(opener).build();
        let found = ApiLocator::new().locate(&window).unwrap();
        assert!(same_api(&found, &api));
    }

    #[test]
    fn cross_origin_ancestor_is_not_found() {
        let (_lms, api) = lms();
        let lms_frame: Rc<dyn Frame> = SyntheticFrame::top().with_api(api).build();
        let foreign: Rc<dyn Frame> = SyntheticFrame::child_of(lms_frame).cross_origin().build();
        let window: Rc<dyn Frame> = SyntheticFrame::child_of(foreign).build();
        assert!(ApiLocator::new().locate(&window).is_none());
    }
}
