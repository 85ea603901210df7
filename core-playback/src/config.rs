//! # Player Configuration
//!
//! Initial options for a mounted player.
//!
//! ## Overview
//!
//! [`PlayerOptions`] carries the caller-facing properties a player is mounted
//! with. Every field has a default, so options can be deserialized from a
//! partial JSON object or assembled with [`PlayerOptionsBuilder`], which
//! validates fail-fast before a controller ever sees the values.
//!
//! ## Usage
//!
//! ```
//! use core_playback::config::PlayerOptions;
//!
//! let options = PlayerOptions::builder()
//!     .aspect_ratio("4:3")
//!     .volume(0.5)
//!     .time(30.0)
//!     .build()
//!     .expect("valid options");
//!
//! assert_eq!(options.volume, 0.5);
//! assert!(!options.play);
//! ```

use crate::error::{validate_time, validate_volume, PlaybackError, Result};
use crate::layout::AspectRatio;
use crate::traits::MediaSource;
use bridge_traits::EmbedOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Properties a player is mounted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerOptions {
    /// Container aspect ratio as `"W:H"`. Layout only.
    ///
    /// Default: `"16:9"`.
    pub aspect_ratio: String,

    /// Whether playback restarts at the end.
    #[serde(rename = "loop")]
    pub looping: bool,

    /// Whether playback is desired.
    pub play: bool,

    /// Seek target in seconds.
    pub time: f64,

    /// Volume in `0.0..=1.0`.
    ///
    /// Default: 1.0.
    pub volume: f64,

    /// Backend-specific passthrough, merged into embed constructor options.
    pub config: EmbedOptions,

    pub source: Option<MediaSource>,

    /// CSS length handed to embeds. Default: `"100%"`.
    pub width: String,

    /// CSS length handed to embeds. Default: `"100%"`.
    pub height: String,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            looping: false,
            play: false,
            time: 0.0,
            volume: 1.0,
            config: EmbedOptions::new(),
            source: None,
            width: default_dimension(),
            height: default_dimension(),
        }
    }
}

impl PlayerOptions {
    pub fn builder() -> PlayerOptionsBuilder {
        PlayerOptionsBuilder::default()
    }

    /// Parse and validate options from a JSON object. Missing keys take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|err| PlaybackError::InvalidConfig(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check every field a controller relies on.
    pub fn validate(&self) -> Result<()> {
        validate_volume(self.volume)?;
        validate_time(self.time)?;
        AspectRatio::parse(&self.aspect_ratio)?;

        if self.width.trim().is_empty() {
            return Err(PlaybackError::InvalidConfig("width must not be empty".to_string()));
        }
        if self.height.trim().is_empty() {
            return Err(PlaybackError::InvalidConfig("height must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn aspect(&self) -> Result<AspectRatio> {
        AspectRatio::parse(&self.aspect_ratio)
    }
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_dimension() -> String {
    "100%".to_string()
}

/// Builder for [`PlayerOptions`].
#[derive(Debug, Default)]
pub struct PlayerOptionsBuilder {
    options: PlayerOptions,
}

impl PlayerOptionsBuilder {
    pub fn aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.options.aspect_ratio = ratio.into();
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.options.looping = looping;
        self
    }

    pub fn play(mut self, play: bool) -> Self {
        self.options.play = play;
        self
    }

    pub fn time(mut self, seconds: f64) -> Self {
        self.options.time = seconds;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.options.volume = volume;
        self
    }

    pub fn source(mut self, source: MediaSource) -> Self {
        self.options.source = Some(source);
        self
    }

    /// Replace the whole passthrough object.
    pub fn config(mut self, config: EmbedOptions) -> Self {
        self.options.config = config;
        self
    }

    /// Add a single passthrough entry.
    pub fn config_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.config.insert(key.into(), value.into());
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.options.width = width.into();
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.options.height = height.into();
        self
    }

    /// Validate and return the options.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure: volume outside `[0, 1]`, a
    /// negative or non-finite time, a malformed aspect ratio or an empty
    /// dimension.
    pub fn build(self) -> Result<PlayerOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
