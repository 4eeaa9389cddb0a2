use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// An RGB color that serializes as a plain `[r, g, b]` triple.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn color(self) -> iced::Color {
        iced::Color::from_rgb8(self.0, self.1, self.2)
    }
}

/// Visual settings for the pile and the photo viewer.
///
/// Defaults mirror the classic photopile look. A `photopile.json` file in the
/// gallery folder may override any subset of fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Thumbnail overlap amount (px). Also used as pile padding.
    pub thumb_overlap: f32,
    /// Maximum thumbnail rotation (deg). Rotations are drawn from [-max, max].
    pub thumb_rotation: f32,
    /// Thumbnail border width (px).
    pub thumb_border: f32,
    /// Bounding box for generated thumbnails (px, square).
    pub thumb_size: u32,
    /// Number of layers in the pile (max stacking depth).
    pub num_layers: u8,
    /// Border width around the full-size photo (px).
    pub photo_border: f32,
    /// Speed at which the photo and thumbnails fade (ms).
    pub fade_duration_ms: u64,
    /// Speed at which the photo is picked up and put down (ms).
    pub pickup_duration_ms: u64,
    /// Minimum space between the open photo and the viewport edge (px).
    pub viewport_margin: f32,
    /// Thumbnail border color.
    pub thumb_border_color: Rgb,
    /// Thumbnail border color while hovered.
    pub thumb_border_hover: Rgb,
    /// Border color around the full-size photo.
    pub photo_border_color: Rgb,
    /// Gallery background color.
    pub backdrop_color: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thumb_overlap: 50.0,
            thumb_rotation: 45.0,
            thumb_border: 2.0,
            thumb_size: 160,
            num_layers: 5,
            photo_border: 10.0,
            fade_duration_ms: 200,
            pickup_duration_ms: 500,
            viewport_margin: 20.0,
            thumb_border_color: Rgb(255, 255, 255),
            thumb_border_hover: Rgb(109, 184, 255),
            photo_border_color: Rgb(255, 255, 255),
            backdrop_color: Rgb(24, 24, 26),
        }
    }
}

impl Config {
    /// Load settings from `photopile.json` inside the gallery folder,
    /// falling back to defaults when the file does not exist.
    pub fn load(gallery: &Path) -> Result<Self, Error> {
        let path = gallery.join("photopile.json");
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, &e))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Reject settings the widget cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_layers == 0 {
            return Err(Error::Config("num_layers must be at least 1".into()));
        }
        if self.thumb_size == 0 {
            return Err(Error::Config("thumb_size must be positive".into()));
        }
        if !(0.0..=180.0).contains(&self.thumb_rotation) {
            return Err(Error::Config(
                "thumb_rotation must lie within [0, 180] degrees".into(),
            ));
        }
        if self.thumb_overlap < 0.0 || self.thumb_overlap >= self.thumb_size as f32 {
            return Err(Error::Config(
                "thumb_overlap must be non-negative and smaller than thumb_size".into(),
            ));
        }
        if self.fade_duration_ms == 0 || self.pickup_duration_ms == 0 {
            return Err(Error::Config("animation durations must be positive".into()));
        }
        Ok(())
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    pub fn pickup_duration(&self) -> Duration {
        Duration::from_millis(self.pickup_duration_ms)
    }
}
