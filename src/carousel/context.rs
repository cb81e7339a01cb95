//! Shared context for carousel sub-parts
//!
//! Sub-parts (the page indicator strip) read the parent's state through a
//! `CarouselContext`. Building one without a context is a programming error
//! and is reported immediately instead of rendering an empty strip.

use super::config::IndicatorPosition;
use crate::error::{CarouselError, Result};

/// Read-only view of the parent carousel handed to its sub-parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselContext {
    pub item_count: usize,
    pub active_index: Option<usize>,
    pub show_indicators: bool,
    pub indicator_position: IndicatorPosition,
}

/// One page dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub active: bool,
}

/// Page indicator strip
#[derive(Debug, Clone, Copy)]
pub struct Indicators {
    context: CarouselContext,
}

impl Indicators {
    pub fn from_context(context: Option<&CarouselContext>) -> Result<Self> {
        let context = context.ok_or(CarouselError::MissingContext {
            part: "Carousel.Indicators",
        })?;
        Ok(Self { context: *context })
    }

    pub fn position(&self) -> IndicatorPosition {
        self.context.indicator_position
    }

    /// Whether anything should be drawn at all
    pub fn is_visible(&self) -> bool {
        self.context.show_indicators && self.context.item_count > 0
    }

    pub fn dots(&self) -> Vec<Dot> {
        if !self.is_visible() {
            return Vec::new();
        }
        (0..self.context.item_count)
            .map(|index| Dot {
                index,
                active: self.context.active_index == Some(index),
            })
            .collect()
    }
}
