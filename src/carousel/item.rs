//! Carousel dataset entries

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identifier of an item; falls back to its position when absent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Opaque image reference understood by the image service (URI, asset key, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

impl ImageSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Loading priority hint forwarded with the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// One slide of the carousel. Immutable once handed to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub source: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<ImageSource>,
    #[serde(default)]
    pub priority: Priority,
}

impl CarouselItem {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            id: None,
            source: source.into(),
            placeholder: None,
            priority: Priority::Normal,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<ImageSource>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Explicit id, or the item's position in the dataset
    pub fn key(&self, position: usize) -> ItemId {
        self.id
            .clone()
            .unwrap_or(ItemId::Number(position as i64))
    }
}

/// Ordered, shared, immutable dataset.
///
/// Replacing the dataset means handing over a new `Arc`; two configs refer
/// to the same dataset only when their `Arc`s point at the same allocation.
pub type Dataset = Arc<[CarouselItem]>;

/// Build a dataset from any iterator of items
pub fn dataset<I>(items: I) -> Dataset
where
    I: IntoIterator<Item = CarouselItem>,
{
    items.into_iter().collect::<Vec<_>>().into()
}
