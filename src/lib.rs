//! Carousel coordinator
//!
//! Drives a paged image carousel without rendering it: the host reports
//! layout, drags and settled scroll offsets; the coordinator answers with
//! scroll commands, prefetches and callbacks.

pub mod carousel;
pub mod error;
pub mod services;
pub mod utils;

pub use carousel::{
    CarouselConfig, CarouselHandle, CarouselItem, Coordinator, CoordinatorState, SchedulerState,
    mount,
};
pub use error::{CarouselError, PrefetchError};
pub use services::{
    CarouselListener, Collaborators, ErrorReporter, HapticService, HapticStyle, HostSurface,
    ImageService,
};
