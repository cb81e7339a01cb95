//! Carousel configuration
//!
//! Construction-time options recognised by the coordinator, with JSON
//! load/save so the demo (and embedding apps) can keep presets on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::item::{CarouselItem, Dataset};
use crate::error::{CarouselError, Result};

/// Default auto-advance period
pub const DEFAULT_AUTO_SCROLL_INTERVAL_MS: u64 = 3000;

/// Longest accepted auto-advance period (one day)
pub const MAX_AUTO_SCROLL_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// Convert an auto-advance period to whole milliseconds.
///
/// Fails for zero and for anything above `MAX_AUTO_SCROLL_INTERVAL_MS`, so a
/// deadline computed from it can never overflow an `Instant`.
pub fn interval_millis(interval: Duration) -> Result<u64> {
    let ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    check_interval_millis(ms)?;
    Ok(ms)
}

fn check_interval_millis(ms: u64) -> Result<()> {
    if ms == 0 {
        return Err(CarouselError::InvalidConfig(
            "auto-scroll interval must be at least 1ms".to_string(),
        ));
    }
    if ms > MAX_AUTO_SCROLL_INTERVAL_MS {
        return Err(CarouselError::InvalidConfig(format!(
            "auto-scroll interval {}ms exceeds {}ms",
            ms, MAX_AUTO_SCROLL_INTERVAL_MS
        )));
    }
    Ok(())
}

/// Fixed carousel heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CarouselHeight {
    Small,
    #[default]
    Medium,
    Large,
    /// Sized by the host from the image aspect ratio
    Auto,
}

impl CarouselHeight {
    /// Height in logical pixels, `None` for `Auto`
    pub fn pixels(self) -> Option<u32> {
        match self {
            CarouselHeight::Small => Some(150),
            CarouselHeight::Medium => Some(250),
            CarouselHeight::Large => Some(350),
            CarouselHeight::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPosition {
    Top,
    #[default]
    Bottom,
    Overlay,
}

/// Target platform; haptics are skipped on the web
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Native,
    Web,
}

impl Platform {
    pub fn supports_haptics(self) -> bool {
        self != Platform::Web
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentFit {
    #[default]
    Cover,
    Contain,
    Fill,
    None,
    ScaleDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    None,
    Disk,
    Memory,
    #[default]
    MemoryDisk,
}

/// Options the coordinator hands to the image service without looking at them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    #[serde(default)]
    pub content_fit: ContentFit,
    #[serde(default)]
    pub cache_policy: CachePolicy,
    #[serde(default = "default_true")]
    pub enable_preloading: bool,
    #[serde(default = "default_true")]
    pub allow_downscaling: bool,
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            content_fit: ContentFit::default(),
            cache_policy: CachePolicy::default(),
            enable_preloading: true,
            allow_downscaling: true,
            transition_duration_ms: default_transition_duration_ms(),
        }
    }
}

/// Full carousel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Ordered dataset; replacing it resets the coordinator
    #[serde(default = "empty_dataset")]
    pub data: Dataset,
    #[serde(default)]
    pub height: CarouselHeight,
    #[serde(default)]
    pub indicator_position: IndicatorPosition,
    #[serde(default = "default_true")]
    pub show_indicators: bool,
    #[serde(default)]
    pub auto_scroll: bool,
    #[serde(default = "default_auto_scroll_interval_ms")]
    pub auto_scroll_interval_ms: u64,
    #[serde(default = "default_true")]
    pub paging_enabled: bool,
    #[serde(default)]
    pub enable_haptics: bool,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub image: ImageOptions,
}

fn default_true() -> bool {
    true
}

fn default_auto_scroll_interval_ms() -> u64 {
    DEFAULT_AUTO_SCROLL_INTERVAL_MS
}

fn default_transition_duration_ms() -> u64 {
    300
}

fn empty_dataset() -> Dataset {
    Vec::<CarouselItem>::new().into()
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            data: empty_dataset(),
            height: CarouselHeight::default(),
            indicator_position: IndicatorPosition::default(),
            show_indicators: true,
            auto_scroll: false,
            auto_scroll_interval_ms: DEFAULT_AUTO_SCROLL_INTERVAL_MS,
            paging_enabled: true,
            enable_haptics: false,
            platform: Platform::default(),
            image: ImageOptions::default(),
        }
    }
}

impl CarouselConfig {
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn with_auto_scroll(mut self, enabled: bool) -> Self {
        self.auto_scroll = enabled;
        self
    }

    /// Out-of-range periods saturate and are caught by `validate`
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.auto_scroll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_haptics(mut self, enabled: bool, platform: Platform) -> Self {
        self.enable_haptics = enabled;
        self.platform = platform;
        self
    }

    pub fn item_count(&self) -> usize {
        self.data.len()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.auto_scroll_interval_ms)
    }

    /// Haptics fire only when requested and the platform has a motor
    pub fn haptics_active(&self) -> bool {
        self.enable_haptics && self.platform.supports_haptics()
    }

    /// Reject option values the coordinator cannot run with
    pub fn validate(&self) -> Result<()> {
        check_interval_millis(self.auto_scroll_interval_ms)
    }

    /// Default location: `<config dir>/carousel-coordinator/carousel.json`
    pub fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("carousel-coordinator").join("carousel.json"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
