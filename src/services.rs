//! External collaborators consumed by the coordinator
//!
//! The coordinator never renders, tracks touches, decodes images or buzzes
//! motors itself. It talks to the embedding application through these traits:
//!
//! ```text
//! Coordinator --[scroll_to]--> HostSurface
//! Coordinator --[prefetch]---> ImageService   (async, result fed back)
//! Coordinator --[impact]-----> HapticService  (fire-and-forget)
//! Coordinator --[warn]-------> ErrorReporter
//! Coordinator --[callbacks]--> CarouselListener
//! ```

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::carousel::{CarouselItem, ImageOptions, ImageSource};
use crate::error::PrefetchError;

/// Horizontal scroll surface owned by the host UI layer
pub trait HostSurface: Send + Sync {
    /// Move the viewport so that its left edge sits at `offset` pixels
    fn scroll_to(&self, offset: f64, animated: bool);
}

/// Image cache warmed ahead of display
pub trait ImageService: Send + Sync {
    /// Start warming `source`. Options are forwarded untouched from config.
    ///
    /// The returned future must not borrow `self`; it is driven on a
    /// separate task and may outlive the coordinator.
    fn prefetch(
        &self,
        source: &ImageSource,
        options: &ImageOptions,
    ) -> BoxFuture<'static, Result<(), PrefetchError>>;
}

/// Impact strength passed to the haptic engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HapticStyle {
    #[default]
    Light,
    Medium,
    Heavy,
}

pub trait HapticService: Send + Sync {
    fn impact(&self, style: HapticStyle);
}

/// Sink for recoverable problems (failed prefetches)
pub trait ErrorReporter: Send + Sync {
    fn warn(&self, message: &str);
}

/// Application callbacks (`onImageChange` / `onImagePress`)
pub trait CarouselListener: Send + Sync {
    fn on_image_change(&self, _index: usize, _item: &CarouselItem) {}

    fn on_image_press(&self, _index: usize, _item: &CarouselItem) {}
}

/// Haptics for platforms without a motor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticService for NoHaptics {
    fn impact(&self, _style: HapticStyle) {}
}

/// Reporter that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Listener that ignores every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl CarouselListener for NoopListener {}

/// Bundle of collaborators handed to a coordinator at mount time
#[derive(Clone)]
pub struct Collaborators {
    pub surface: Arc<dyn HostSurface>,
    pub images: Arc<dyn ImageService>,
    pub haptics: Arc<dyn HapticService>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub listener: Arc<dyn CarouselListener>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Surface and image service are mandatory; everything else has a quiet default
    pub fn new(surface: Arc<dyn HostSurface>, images: Arc<dyn ImageService>) -> Self {
        Self {
            surface,
            images,
            haptics: Arc::new(NoHaptics),
            reporter: Arc::new(TracingReporter),
            listener: Arc::new(NoopListener),
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn HapticService>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn CarouselListener>) -> Self {
        self.listener = listener;
        self
    }
}
