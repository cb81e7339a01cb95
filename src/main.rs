//! Carousel demo - drives a coordinator against a simulated host
//!
//! Usage: `carousel-demo [config.json]`
//!
//! Without an argument the demo looks for the default config file and falls
//! back to a built-in five-slide dataset with auto-advance enabled.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::info;

use carousel_coordinator::carousel::{
    CarouselConfig, CarouselItem, ImageOptions, ImageSource, Indicators, ItemId, Priority,
    dataset,
};
use carousel_coordinator::services::{
    CarouselListener, Collaborators, HapticService, HapticStyle, HostSurface, ImageService,
};
use carousel_coordinator::{CarouselHandle, PrefetchError};

const VIEWPORT_WIDTH: f64 = 390.0;
const PREFETCH_FAILURE_RATE: f64 = 0.2;

/// Forwards scroll commands to the simulated host loop
struct SimulatedSurface {
    scroll_tx: mpsc::UnboundedSender<f64>,
}

impl HostSurface for SimulatedSurface {
    fn scroll_to(&self, offset: f64, animated: bool) {
        info!("Surface: scroll_to({}, animated={})", offset, animated);
        let _ = self.scroll_tx.send(offset);
    }
}

/// Image cache with random latency and the occasional failure
struct SimulatedImages;

impl ImageService for SimulatedImages {
    fn prefetch(
        &self,
        source: &ImageSource,
        options: &ImageOptions,
    ) -> BoxFuture<'static, Result<(), PrefetchError>> {
        let mut rng = rand::rng();
        let latency = Duration::from_millis(rng.random_range(50..400));
        let fails = rng.random_bool(PREFETCH_FAILURE_RATE);
        let source = source.clone();
        let cache_policy = options.cache_policy;

        async move {
            sleep(latency).await;
            if fails {
                Err(PrefetchError::new(format!("simulated timeout for {}", source)))
            } else {
                info!(
                    "Images: warmed {} in {:?} ({:?})",
                    source, latency, cache_policy
                );
                Ok(())
            }
        }
        .boxed()
    }
}

struct LoggingHaptics;

impl HapticService for LoggingHaptics {
    fn impact(&self, style: HapticStyle) {
        info!("Haptics: impact {:?}", style);
    }
}

struct LoggingListener;

impl CarouselListener for LoggingListener {
    fn on_image_change(&self, index: usize, item: &CarouselItem) {
        info!("App: now showing #{} ({})", index, item.key(index));
    }

    fn on_image_press(&self, index: usize, item: &CarouselItem) {
        info!("App: pressed #{} ({})", index, item.source);
    }
}

fn demo_config() -> CarouselConfig {
    let slides = (0..5).map(|i| {
        CarouselItem::new(format!("https://picsum.photos/seed/slide{}/800/450", i))
            .with_id(ItemId::Text(format!("slide-{}", i)))
            .with_placeholder("asset://placeholder.png")
            .with_priority(if i == 0 { Priority::High } else { Priority::Normal })
    });
    let mut config = CarouselConfig::new(dataset(slides))
        .with_auto_scroll(true)
        .with_interval(Duration::from_millis(2000));
    config.enable_haptics = true;
    config
}

fn load_config() -> anyhow::Result<CarouselConfig> {
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        return CarouselConfig::load_from_file(&path)
            .with_context(|| format!("failed to load carousel config from {}", path.display()));
    }
    match CarouselConfig::file_path() {
        Some(path) if path.exists() => CarouselConfig::load_from_file(&path)
            .with_context(|| format!("failed to load carousel config from {}", path.display())),
        _ => Ok(demo_config()),
    }
}

/// Plays the host scroll view: every scroll command settles after the transition
fn spawn_host(
    handle: CarouselHandle,
    mut scroll_rx: mpsc::UnboundedReceiver<f64>,
    transition: Duration,
) {
    tokio::spawn(async move {
        while let Some(offset) = scroll_rx.recv().await {
            sleep(transition).await;
            handle.scroll_settled(offset);
        }
    });
}

fn render_indicators(handle: &CarouselHandle) -> anyhow::Result<String> {
    let indicators = Indicators::from_context(Some(&handle.context()))?;
    Ok(indicators
        .dots()
        .iter()
        .map(|dot| if dot.active { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" "))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let transition = Duration::from_millis(config.image.transition_duration_ms);
    let interval = config.interval();

    let (scroll_tx, scroll_rx) = mpsc::unbounded_channel();
    let services = Collaborators::new(
        Arc::new(SimulatedSurface { scroll_tx }),
        Arc::new(SimulatedImages),
    )
    .with_haptics(Arc::new(LoggingHaptics))
    .with_listener(Arc::new(LoggingListener));

    let (handle, task) =
        carousel_coordinator::mount(config, services).context("failed to mount carousel")?;
    handle.layout(VIEWPORT_WIDTH);
    spawn_host(handle.clone(), scroll_rx, transition);

    // Let auto-advance run a couple of rounds
    sleep(interval * 3).await;
    info!("Indicators: {}", render_indicators(&handle)?);

    // User swipes back one page; auto-advance must hold off meanwhile
    info!("Demo: user starts dragging");
    handle.drag_begin();
    sleep(interval * 2).await;
    let back = handle
        .state()
        .active_index
        .map(|index| index.saturating_sub(1))
        .unwrap_or(0);
    handle.drag_end();
    handle.scroll_settled(back as f64 * VIEWPORT_WIDTH);
    handle.item_press(back);

    // Jump via the indicator strip and speed up
    handle.indicator_press(4);
    handle
        .set_auto_scroll_interval(interval / 2)
        .context("failed to change interval")?;
    sleep(interval * 2).await;
    info!("Indicators: {}", render_indicators(&handle)?);

    // Swap in a smaller dataset
    let replacement = dataset(["a", "b", "c"].map(|name| {
        CarouselItem::new(format!("https://picsum.photos/seed/{}/800/450", name))
    }));
    let mut config = CarouselConfig::new(replacement).with_auto_scroll(true);
    config.auto_scroll_interval_ms = 1000;
    handle.reconfigure(config).context("failed to reconfigure")?;
    sleep(Duration::from_millis(3500)).await;
    info!("Indicators: {}", render_indicators(&handle)?);

    info!("Final state: {:?}", handle.state());
    handle.unmount();
    task.await.context("carousel task panicked")?;
    Ok(())
}
