//! Carousel coordinator
//!
//! Rendering-agnostic control logic for a paged image carousel:
//! - `ViewportTracker`: settled offsets -> active index (single writer)
//! - `AutoAdvanceScheduler`: Stopped / Running / Paused timer state machine
//! - `PreloadPlanner`: neighbour window with in-flight de-duplication
//! - `Coordinator`: wires the three together with the host collaborators
//! - `handle`: tokio actor + non-blocking `CarouselHandle`

pub mod config;
pub mod context;
pub mod coordinator;
pub mod handle;
pub mod item;
pub mod preload;
pub mod scheduler;
pub mod viewport;

pub use config::{
    CachePolicy, CarouselConfig, CarouselHeight, ContentFit, ImageOptions, IndicatorPosition,
    MAX_AUTO_SCROLL_INTERVAL_MS, Platform, interval_millis,
};
pub use context::{CarouselContext, Dot, Indicators};
pub use coordinator::{Coordinator, CoordinatorState, PrefetchRequest};
pub use handle::{CarouselCommand, CarouselHandle, mount};
pub use item::{CarouselItem, Dataset, ImageSource, ItemId, Priority, dataset};
pub use preload::{PreloadPlanner, neighbors};
pub use scheduler::{AutoAdvanceScheduler, SchedulerState};
pub use viewport::ViewportTracker;
