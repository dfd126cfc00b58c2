use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::runtime::api::RuntimeApi;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameAccessError {
    #[error("access to a cross-origin frame was denied")]
    CrossOrigin,

    #[error("frame is no longer attached")]
    Detached,
}

/// One browsing context (window or iframe) as seen from the content page.
pub trait Frame {
    /// The `API` object published on this frame, if any.
    ///
    /// # Errors
    ///
    /// Returns `FrameAccessError` if the frame refuses property access.
    fn api(&self) -> Result<Option<Rc<dyn RuntimeApi>>, FrameAccessError>;

    /// `window.parent`. A top-level window returns itself.
    ///
    /// # Errors
    ///
    /// Returns `FrameAccessError` if the parent cannot be reached.
    fn parent(&self) -> Result<Option<Rc<dyn Frame>>, FrameAccessError>;

    /// `window.opener`, for pages opened as pop-ups.
    ///
    /// # Errors
    ///
    /// Returns `FrameAccessError` if the opener cannot be reached.
    fn opener(&self) -> Result<Option<Rc<dyn Frame>>, FrameAccessError>;
}

enum ParentLink {
    Detached,
    Itself,
    Frame(Rc<dyn Frame>),
}

/// In-memory frame used to model LMS embeddings in tests and simulations.
pub struct SyntheticFrame {
    me: Weak<SyntheticFrame>,
    api: Option<Rc<dyn RuntimeApi>>,
    parent: ParentLink,
    opener: Option<Rc<dyn Frame>>,
    cross_origin: bool,
}

impl SyntheticFrame {
    /// Starts a frame that behaves like a browser top-level window.
    #[must_use]
    pub fn top() -> SyntheticFrameBuilder {
        SyntheticFrameBuilder::new(ParentLink::Itself)
    }

    /// Starts a frame nested inside `parent`.
    #[must_use]
    pub fn child_of(parent: Rc<dyn Frame>) -> SyntheticFrameBuilder {
        SyntheticFrameBuilder::new(ParentLink::Frame(parent))
    }

    /// Starts a frame without any parent at all.
    #[must_use]
    pub fn detached() -> SyntheticFrameBuilder {
        SyntheticFrameBuilder::new(ParentLink::Detached)
    }

    /// Builds a chain of `depth` nested frames and returns the innermost one.
    ///
    /// Frame `0` is the returned frame and frame `depth - 1` is the top window.
    /// `api_at` places `api` on the frame with that index.
    #[must_use]
    pub fn chain(
        depth: usize,
        api_at: Option<usize>,
        api: Option<Rc<dyn RuntimeApi>>,
    ) -> Rc<dyn Frame> {
        let depth = depth.max(1);
        let mut current: Option<Rc<dyn Frame>> = None;
        for index in (0..depth).rev() {
            let builder = match current.take() {
                None => SyntheticFrame::top(),
                Some(parent) => SyntheticFrame::child_of(parent),
            };
            let builder = match (&api, api_at) {
                (Some(api), Some(at)) if at == index => builder.with_api(Rc::clone(api)),
                _ => builder,
            };
            let built: Rc<dyn Frame> = builder.build();
            current = Some(built);
        }
        if let Some(frame) = current {
            return frame;
        }
        let top: Rc<dyn Frame> = SyntheticFrame::top().build();
        top
    }
}

impl Frame for SyntheticFrame {
    fn api(&self) -> Result<Option<Rc<dyn RuntimeApi>>, FrameAccessError> {
        if self.cross_origin {
            return Err(FrameAccessError::CrossOrigin);
        }
        Ok(self.api.clone())
    }

    fn parent(&self) -> Result<Option<Rc<dyn Frame>>, FrameAccessError> {
        match &self.parent {
            ParentLink::Detached => Ok(None),
            ParentLink::Frame(parent) => Ok(Some(Rc::clone(parent))),
            ParentLink::Itself => {
                let me: Rc<dyn Frame> = self.me.upgrade().ok_or(FrameAccessError::Detached)?;
                Ok(Some(me))
            }
        }
    }

    fn opener(&self) -> Result<Option<Rc<dyn Frame>>, FrameAccessError> {
        Ok(self.opener.clone())
    }
}

pub struct SyntheticFrameBuilder {
    api: Option<Rc<dyn RuntimeApi>>,
    parent: ParentLink,
    opener: Option<Rc<dyn Frame>>,
    cross_origin: bool,
}

impl SyntheticFrameBuilder {
    fn new(parent: ParentLink) -> Self {
        Self {
            api: None,
            parent,
            opener: None,
            cross_origin: false,
        }
    }

    #[must_use]
    pub fn with_api(mut self, api: Rc<dyn RuntimeApi>) -> Self {
        self.api = Some(api);
        self
    }

    #[must_use]
    pub fn with_opener(mut self, opener: Rc<dyn Frame>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Property reads on the built frame fail like a cross-origin window.
    #[must_use]
    pub fn cross_origin(mut self) -> Self {
        self.cross_origin = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Rc<SyntheticFrame> {
        Rc::new_cyclic(|me| SyntheticFrame {
            me: me.clone(),
            api: self.api,
            parent: self.parent,
            opener: self.opener,
            cross_origin: self.cross_origin,
        })
    }
}
