//! Carousel coordinator - wires viewport, scheduler and preload planner
//!
//! The coordinator is a synchronous state machine. It calls the host surface,
//! haptics, reporter and listener directly (all fire-and-forget) and queues
//! prefetch work in an outbox that the runtime drains and spawns.
//!
//! ## Ownership
//! `ViewportTracker` is the only writer of the active index. Auto-advance
//! ticks and programmatic navigation only issue `scroll_to` commands; the
//! index moves once the host reports the resulting settle.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::config::{CarouselConfig, ImageOptions, interval_millis};
use super::context::CarouselContext;
use super::item::ImageSource;
use super::preload::{Completion, PreloadPlanner};
use super::scheduler::{AutoAdvanceScheduler, SchedulerState};
use super::viewport::ViewportTracker;
use crate::error::{CarouselError, PrefetchError, Result};
use crate::services::{Collaborators, HapticStyle};
use crate::utils::wrap_step;

/// Prefetch queued by the coordinator, to be issued by the runtime
#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchRequest {
    pub generation: u64,
    pub index: usize,
    pub source: ImageSource,
    pub options: ImageOptions,
}

/// Snapshot of everything the coordinator owns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinatorState {
    pub item_count: usize,
    /// `None` while the dataset is empty
    pub active_index: Option<usize>,
    pub is_dragging: bool,
    pub auto_advance_enabled: bool,
    pub auto_advance_interval: Duration,
    pub scheduler: SchedulerState,
    pub pending_preloads: BTreeSet<usize>,
    pub mounted: bool,
}

pub struct Coordinator {
    config: CarouselConfig,
    tracker: ViewportTracker,
    scheduler: AutoAdvanceScheduler,
    planner: PreloadPlanner,
    services: Collaborators,
    outbox: Vec<PrefetchRequest>,
    mounted: bool,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("tracker", &self.tracker)
            .field("scheduler", &self.scheduler)
            .field("planner", &self.planner)
            .field("outbox", &self.outbox.len())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Mount a coordinator. Warms the neighbours of the first slot right away.
    pub fn new(config: CarouselConfig, services: Collaborators, now: Instant) -> Result<Self> {
        config.validate()?;
        let item_count = config.item_count();
        let scheduler =
            AutoAdvanceScheduler::new(config.auto_scroll, config.interval(), item_count, now);

        info!(
            "Carousel mounted: {} items, auto_scroll={}, interval={}ms",
            item_count, config.auto_scroll, config.auto_scroll_interval_ms
        );

        let mut coordinator = Self {
            config,
            tracker: ViewportTracker::new(item_count),
            scheduler,
            planner: PreloadPlanner::new(),
            services,
            outbox: Vec::new(),
            mounted: true,
        };
        coordinator.refresh_preloads();
        Ok(coordinator)
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn services(&self) -> &Collaborators {
        &self.services
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState {
            item_count: self.tracker.item_count(),
            active_index: self.tracker.active_index(),
            is_dragging: self.tracker.is_dragging(),
            auto_advance_enabled: self.scheduler.is_enabled(),
            auto_advance_interval: self.scheduler.interval(),
            scheduler: self.scheduler.state(),
            pending_preloads: self.planner.pending().clone(),
            mounted: self.mounted,
        }
    }

    /// Context for sub-parts such as the indicator strip
    pub fn context(&self) -> CarouselContext {
        CarouselContext {
            item_count: self.tracker.item_count(),
            active_index: self.tracker.active_index(),
            show_indicators: self.config.show_indicators,
            indicator_position: self.config.indicator_position,
        }
    }

    /// When the runtime should call `tick` next
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.mounted {
            return None;
        }
        self.scheduler.next_due()
    }

    /// Drain prefetches queued since the last call
    pub fn take_prefetch_requests(&mut self) -> Vec<PrefetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    // ============ Host surface events ============

    pub fn on_layout(&mut self, width: f64) {
        if !self.mounted {
            return;
        }
        if !self.tracker.set_viewport_width(width) {
            debug!("Carousel: ignoring invalid viewport width {}", width);
        }
    }

    pub fn on_drag_begin(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        if self.tracker.begin_drag() {
            self.scheduler.pause_for_drag(now);
        }
    }

    pub fn on_drag_end(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        if self.tracker.end_drag() {
            self.scheduler.resume_after_drag(now);
        }
    }

    /// Momentum scrolling stopped at `offset` pixels
    pub fn on_scroll_settled(&mut self, offset: f64, now: Instant) {
        if !self.mounted {
            return;
        }
        let Some(index) = self.tracker.settle(offset) else {
            return;
        };
        debug!("Carousel: active index -> {}", index);

        if let Some(item) = self.config.data.get(index) {
            self.services.listener.on_image_change(index, item);
        }
        if self.config.haptics_active() {
            self.services.haptics.impact(HapticStyle::Light);
        }
        self.scheduler.restart(now);
        self.refresh_preloads();
    }

    pub fn on_item_press(&self, index: usize) {
        if !self.mounted {
            return;
        }
        if let Some(item) = self.config.data.get(index) {
            self.services.listener.on_image_press(index, item);
        }
    }

    // ============ Navigation ============

    /// Ask the surface to scroll to `index`. Returns false if nothing was issued.
    pub fn go_to(&mut self, index: usize) -> bool {
        if !self.mounted {
            return false;
        }
        match self.tracker.offset_for(index) {
            Some(offset) => {
                self.services.surface.scroll_to(offset, true);
                true
            }
            None => {
                debug!(
                    "Carousel: cannot scroll to {} (items={}, width={})",
                    index,
                    self.tracker.item_count(),
                    self.tracker.viewport_width()
                );
                false
            }
        }
    }

    /// Step `delta` slots from the active one, wrapping at both ends
    pub fn navigate(&mut self, delta: i64) -> bool {
        let Some(active) = self.tracker.active_index() else {
            return false;
        };
        match wrap_step(active, delta, self.tracker.item_count()) {
            Some(target) if target != active => self.go_to(target),
            _ => false,
        }
    }

    pub fn on_indicator_press(&mut self, index: usize) -> bool {
        self.go_to(index)
    }

    /// Timer callback; scrolls forward if the scheduler is due
    pub fn tick(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        let Some(active) = self.tracker.active_index() else {
            return;
        };
        if let Some(target) = self.scheduler.tick(now, active) {
            debug!("Auto-advance: {} -> {}", active, target);
            self.go_to(target);
        }
    }

    // ============ Reconfiguration ============

    /// Apply a new configuration.
    ///
    /// A different dataset `Arc` is a full reset; the same one only updates options.
    pub fn reconfigure(&mut self, config: CarouselConfig, now: Instant) -> Result<()> {
        if !self.mounted {
            return Err(CarouselError::Closed);
        }
        config.validate()?;

        let replaced = !Arc::ptr_eq(&self.config.data, &config.data);
        let auto_changed = config.auto_scroll != self.config.auto_scroll;
        let interval_changed =
            config.auto_scroll_interval_ms != self.config.auto_scroll_interval_ms;
        self.config = config;

        if replaced {
            let item_count = self.config.item_count();
            info!("Carousel: dataset replaced ({} items)", item_count);
            self.tracker.reset(item_count);
            self.planner.reset();
            self.outbox.clear();
            self.scheduler.set_item_count(item_count, now);
            if self.tracker.is_dragging() {
                // The release settle realigns the surface
                self.scheduler.pause_for_drag(now);
            } else if let Some(offset) = self.tracker.offset_for(0) {
                // Snap the surface to the slot the tracker now reports
                self.services.surface.scroll_to(offset, false);
            }
        }
        if interval_changed {
            self.scheduler.set_interval(self.config.interval(), now);
        }
        if auto_changed {
            self.apply_auto_scroll(now);
        }
        if replaced || auto_changed {
            self.refresh_preloads();
        }
        Ok(())
    }

    pub fn set_auto_scroll(&mut self, enabled: bool, now: Instant) {
        if !self.mounted || self.config.auto_scroll == enabled {
            return;
        }
        self.config.auto_scroll = enabled;
        self.apply_auto_scroll(now);
        self.refresh_preloads();
    }

    pub fn set_auto_scroll_interval(&mut self, interval: Duration, now: Instant) -> Result<()> {
        if !self.mounted {
            return Err(CarouselError::Closed);
        }
        let ms = interval_millis(interval)?;
        self.config.auto_scroll_interval_ms = ms;
        self.scheduler.set_interval(self.config.interval(), now);
        Ok(())
    }

    fn apply_auto_scroll(&mut self, now: Instant) {
        if self.config.auto_scroll {
            self.scheduler.enable(now);
        } else {
            self.scheduler.disable(now);
        }
    }

    // ============ Preloading ============

    fn refresh_preloads(&mut self) {
        let Some(active) = self.tracker.active_index() else {
            return;
        };
        let item_count = self.tracker.item_count();
        let generation = self.planner.generation();
        for index in self.planner.plan(active, item_count, self.config.auto_scroll) {
            let Some(item) = self.config.data.get(index) else {
                continue;
            };
            self.outbox.push(PrefetchRequest {
                generation,
                index,
                source: item.source.clone(),
                options: self.config.image.clone(),
            });
        }
    }

    /// Feed back a finished prefetch. Failures are reported, never returned.
    pub fn prefetch_finished(
        &mut self,
        generation: u64,
        index: usize,
        result: std::result::Result<(), PrefetchError>,
    ) {
        if !self.mounted {
            return;
        }
        match self.planner.complete(generation, index, result) {
            Completion::Loaded => debug!("Preload: index {} ready", index),
            Completion::Failed(e) => {
                let source = self
                    .config
                    .data
                    .get(index)
                    .map(|item| item.source.to_string())
                    .unwrap_or_default();
                self.services.reporter.warn(&format!(
                    "Failed to preload carousel image {} ({}): {}",
                    index, source, e
                ));
            }
            Completion::Stale => debug!("Preload: dropping stale completion for {}", index),
        }
    }

    /// Tear down: cancel the timer and orphan in-flight prefetches
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scheduler.teardown();
        self.planner.reset();
        self.outbox.clear();
        info!("Carousel unmounted");
    }
}
