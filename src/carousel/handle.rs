//! Carousel runtime: one actor task per mounted carousel
//!
//! `CarouselHandle` gives the host a non-blocking interface. Every method
//! sends a `CarouselCommand` to the actor and returns immediately; the
//! actor owns the `Coordinator`, so every mutation happens on one queue.
//!
//! ## Architecture
//! ```text
//! Host (CarouselHandle) --[CarouselCommand]--> Actor (Coordinator)
//! Actor                 --[spawn prefetch]---> ImageService
//! Actor                 <--[PrefetchDone]----- prefetch tasks
//! Actor                 ---[sleep_until]-----> scheduler deadline
//! Host                  <--[state]------------ Actor (non-blocking reads)
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use super::config::{CarouselConfig, interval_millis};
use super::context::CarouselContext;
use super::coordinator::{Coordinator, CoordinatorState};
use crate::error::{CarouselError, PrefetchError, Result};
use crate::services::Collaborators;

/// Commands sent from the host to the carousel actor
#[derive(Debug)]
pub enum CarouselCommand {
    Layout { width: f64 },
    DragBegin,
    DragEnd,
    ScrollSettled { offset: f64 },
    ItemPress { index: usize },
    GoTo { index: usize },
    Navigate { delta: i64 },
    IndicatorPress { index: usize },
    Reconfigure(Box<CarouselConfig>),
    SetAutoScroll(bool),
    SetAutoScrollInterval(Duration),
    Unmount,
}

/// Completion of a spawned prefetch
#[derive(Debug)]
struct PrefetchDone {
    generation: u64,
    index: usize,
    result: std::result::Result<(), PrefetchError>,
}

/// What the actor publishes after every step
#[derive(Debug, Clone)]
struct Published {
    state: CoordinatorState,
    context: CarouselContext,
}

impl Published {
    fn from_coordinator(coordinator: &Coordinator) -> Self {
        Self {
            state: coordinator.state(),
            context: coordinator.context(),
        }
    }
}

type SharedPublished = Arc<RwLock<Published>>;

/// Handle for driving a mounted carousel from the host
///
/// Cloning is cheap. The actor stops when `unmount` is called or every
/// handle has been dropped.
#[derive(Clone)]
pub struct CarouselHandle {
    command_tx: mpsc::UnboundedSender<CarouselCommand>,
    published: SharedPublished,
}

impl std::fmt::Debug for CarouselHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselHandle")
            .field("state", &self.published.read().state)
            .finish()
    }
}

/// Mount a carousel on the current tokio runtime
pub fn mount(
    config: CarouselConfig,
    services: Collaborators,
) -> Result<(CarouselHandle, JoinHandle<()>)> {
    let coordinator = Coordinator::new(config, services, Instant::now())?;
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let published = Arc::new(RwLock::new(Published::from_coordinator(&coordinator)));
    let task = tokio::spawn(run(coordinator, command_rx, published.clone()));
    Ok((
        CarouselHandle {
            command_tx,
            published,
        },
        task,
    ))
}

impl CarouselHandle {
    fn send(&self, command: CarouselCommand) {
        let _ = self.command_tx.send(command);
    }

    /// Latest published state (never blocks on the actor)
    pub fn state(&self) -> CoordinatorState {
        self.published.read().state.clone()
    }

    /// Context for building sub-parts (indicators) on the host side
    pub fn context(&self) -> CarouselContext {
        self.published.read().context
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    // ============ Host surface events ============

    pub fn layout(&self, width: f64) {
        self.send(CarouselCommand::Layout { width });
    }

    pub fn drag_begin(&self) {
        self.send(CarouselCommand::DragBegin);
    }

    pub fn drag_end(&self) {
        self.send(CarouselCommand::DragEnd);
    }

    pub fn scroll_settled(&self, offset: f64) {
        self.send(CarouselCommand::ScrollSettled { offset });
    }

    pub fn item_press(&self, index: usize) {
        self.send(CarouselCommand::ItemPress { index });
    }

    // ============ Navigation ============

    pub fn go_to(&self, index: usize) {
        self.send(CarouselCommand::GoTo { index });
    }

    pub fn navigate(&self, delta: i64) {
        self.send(CarouselCommand::Navigate { delta });
    }

    pub fn indicator_press(&self, index: usize) {
        self.send(CarouselCommand::IndicatorPress { index });
    }

    // ============ Configuration ============

    /// Validated here so the caller learns about bad values synchronously
    pub fn reconfigure(&self, config: CarouselConfig) -> Result<()> {
        config.validate()?;
        self.command_tx
            .send(CarouselCommand::Reconfigure(Box::new(config)))
            .map_err(|_| CarouselError::Closed)
    }

    pub fn set_auto_scroll(&self, enabled: bool) {
        self.send(CarouselCommand::SetAutoScroll(enabled));
    }

    pub fn set_auto_scroll_interval(&self, interval: Duration) -> Result<()> {
        interval_millis(interval)?;
        self.command_tx
            .send(CarouselCommand::SetAutoScrollInterval(interval))
            .map_err(|_| CarouselError::Closed)
    }

    pub fn unmount(&self) {
        self.send(CarouselCommand::Unmount);
    }
}

/// Sleep until the scheduler deadline, or forever when there is none
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn dispatch_prefetches(
    coordinator: &mut Coordinator,
    done_tx: &mpsc::UnboundedSender<PrefetchDone>,
) {
    let images = coordinator.services().images.clone();
    for request in coordinator.take_prefetch_requests() {
        debug!(
            "Preload: prefetching index {} ({})",
            request.index, request.source
        );
        let future = images.prefetch(&request.source, &request.options);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = future.await;
            // Receiver gone means the carousel was unmounted
            let _ = done_tx.send(PrefetchDone {
                generation: request.generation,
                index: request.index,
                result,
            });
        });
    }
}

fn apply(coordinator: &mut Coordinator, command: CarouselCommand) {
    let now = Instant::now();
    match command {
        CarouselCommand::Layout { width } => coordinator.on_layout(width),
        CarouselCommand::DragBegin => coordinator.on_drag_begin(now),
        CarouselCommand::DragEnd => coordinator.on_drag_end(now),
        CarouselCommand::ScrollSettled { offset } => coordinator.on_scroll_settled(offset, now),
        CarouselCommand::ItemPress { index } => coordinator.on_item_press(index),
        CarouselCommand::GoTo { index } => {
            coordinator.go_to(index);
        }
        CarouselCommand::Navigate { delta } => {
            coordinator.navigate(delta);
        }
        CarouselCommand::IndicatorPress { index } => {
            coordinator.on_indicator_press(index);
        }
        CarouselCommand::Reconfigure(config) => {
            if let Err(e) = coordinator.reconfigure(*config, now) {
                coordinator.services().reporter.warn(&e.to_string());
            }
        }
        CarouselCommand::SetAutoScroll(enabled) => coordinator.set_auto_scroll(enabled, now),
        CarouselCommand::SetAutoScrollInterval(interval) => {
            if let Err(e) = coordinator.set_auto_scroll_interval(interval, now) {
                coordinator.services().reporter.warn(&e.to_string());
            }
        }
        CarouselCommand::Unmount => coordinator.unmount(),
    }
}

async fn run(
    mut coordinator: Coordinator,
    mut command_rx: mpsc::UnboundedReceiver<CarouselCommand>,
    published: SharedPublished,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<PrefetchDone>();

    while coordinator.is_mounted() {
        dispatch_prefetches(&mut coordinator, &done_tx);
        *published.write() = Published::from_coordinator(&coordinator);

        tokio::select! {
            // Host events first: a drag must pause the scheduler before a due tick runs
            biased;

            command = command_rx.recv() => match command {
                Some(command) => apply(&mut coordinator, command),
                None => coordinator.unmount(),
            },
            Some(done) = done_rx.recv() => {
                coordinator.prefetch_finished(done.generation, done.index, done.result);
            }
            _ = sleep_until_deadline(coordinator.next_deadline()) => {
                coordinator.tick(Instant::now());
            }
        }
    }

    *published.write() = Published::from_coordinator(&coordinator);
}
