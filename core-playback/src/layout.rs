//! Aspect-ratio container geometry.
//!
//! A player fills a box whose height follows its width. The outer box has zero
//! height and a bottom padding expressed as a percentage of its width; the
//! inner box is absolutely positioned over it.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width to height ratio parsed from `"W:H"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub fn parse(ratio: &str) -> Result<Self> {
        let invalid = || PlaybackError::InvalidAspectRatio(ratio.to_string());

        let (width, height) = ratio.split_once(':').ok_or_else(invalid)?;
        let width: f64 = width.trim().parse().map_err(|_| invalid())?;
        let height: f64 = height.trim().parse().map_err(|_| invalid())?;

        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(width) || !usable(height) {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }

    /// Bottom padding of the outer box, in percent of its width.
    pub fn padding_bottom_percent(&self) -> f64 {
        self.height / self.width * 100.0
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// A single CSS declaration.
pub type Declaration = (&'static str, String);

/// Style declarations for the outer and inner container boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLayout {
    pub outer: Vec<Declaration>,
    pub inner: Vec<Declaration>,
}

impl ContainerLayout {
    pub fn new(ratio: AspectRatio) -> Self {
        let outer = vec![
            ("position", "relative".to_string()),
            ("height", "0".to_string()),
            ("padding-bottom", format!("{}%", ratio.padding_bottom_percent())),
        ];
        let inner = ["top", "right", "bottom", "left"]
            .into_iter()
            .map(|edge| (edge, "0".to_string()));
        let inner = std::iter::once(("position", "absolute".to_string()))
            .chain(inner)
            .collect();

        Self { outer, inner }
    }

    pub fn outer_style(&self) -> String {
        to_style(&self.outer)
    }

    pub fn inner_style(&self) -> String {
        to_style(&self.inner)
    }
}

fn to_style(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}
