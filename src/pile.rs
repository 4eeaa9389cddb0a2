//! The thumbnail pile.
//!
//! Owns the thumbnail set: each item gets a uniformly random rotation and a
//! uniformly random stack layer at creation, then keeps both for life. The
//! pile also tracks hover and the single active flag, and computes the
//! overlapping flow layout plus the back-to-front draw order.

use std::path::{Path, PathBuf};

use iced::widget::image;
use iced::{Point, Rectangle, Size};
use rand::Rng;

use crate::config::Config;
use crate::viewer::geometry::{self, Placement};

/// Thumbnail pixels once the background load has finished.
#[derive(Debug, Clone)]
pub struct ThumbImage {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

/// One gallery item: a link to a full-size image, scattered into the pile.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Path of the full-size image this thumbnail links to.
    pub source: PathBuf,
    /// Rotation in degrees, fixed at creation. Stored outright so it never
    /// has to be recovered from a rendered transform.
    pub rotation: f32,
    /// Stack layer in `[1, num_layers]`.
    pub layer: u8,
    /// Decoded thumbnail, `None` until loaded.
    pub image: Option<ThumbImage>,
}

pub struct Pile {
    thumbs: Vec<Thumbnail>,
    active: Option<usize>,
    hovered: Option<usize>,
    thumb_size: f32,
    overlap: f32,
    border: f32,
}

impl Pile {
    /// Scatter `sources` into a pile using the thread RNG.
    pub fn new(sources: Vec<PathBuf>, config: &Config) -> Self {
        Self::with_rng(sources, config, &mut rand::thread_rng())
    }

    /// Scatter `sources` with a caller-provided RNG (deterministic in tests).
    pub fn with_rng<R: Rng>(sources: Vec<PathBuf>, config: &Config, rng: &mut R) -> Self {
        let max_rotation = config.thumb_rotation;
        let thumbs = sources
            .into_iter()
            .map(|source| Thumbnail {
                source,
                rotation: if max_rotation > 0.0 {
                    rng.gen_range(-max_rotation..=max_rotation)
                } else {
                    0.0
                },
                layer: rng.gen_range(1..=config.num_layers),
                image: None,
            })
            .collect();

        Self {
            thumbs,
            active: None,
            hovered: None,
            thumb_size: config.thumb_size as f32,
            overlap: config.thumb_overlap,
            border: config.thumb_border,
        }
    }

    pub fn len(&self) -> usize {
        self.thumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbs.is_empty()
    }

    pub fn thumbs(&self) -> &[Thumbnail] {
        &self.thumbs
    }

    pub fn path(&self, index: usize) -> &Path {
        &self.thumbs[index].source
    }

    pub fn set_image(&mut self, index: usize, image: ThumbImage) {
        if let Some(thumb) = self.thumbs.get_mut(index) {
            thumb.image = Some(image);
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.thumbs.iter().filter(|t| t.image.is_some()).count()
    }

    // ----- Active thumbnail -----

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Mark `index` active, replacing any previous selection.
    pub fn set_active(&mut self, index: usize) {
        debug_assert!(index < self.thumbs.len());
        self.active = Some(index);
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    // ----- Hover -----

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index;
    }

    // ----- Layout -----

    /// Per-thumbnail placements for a surface of `bounds` size.
    ///
    /// Items flow in rows; the step between cells is the cell size minus the
    /// overlap amount (the source's fixed negative margin), and the pile is
    /// padded by one overlap on every side.
    pub fn layout(&self, bounds: Size) -> Vec<Placement> {
        let cell = self.thumb_size;
        let step = cell - self.overlap;
        let padding = self.overlap;

        let usable = (bounds.width - 2.0 * padding - self.overlap).max(cell);
        let columns = ((usable / step).floor() as usize).max(1);

        self.thumbs
            .iter()
            .enumerate()
            .map(|(i, thumb)| {
                let col = i % columns;
                let row = i / columns;
                let slot = Rectangle {
                    x: padding + col as f32 * step,
                    y: padding + row as f32 * step,
                    width: cell,
                    height: cell,
                };
                // Thumbnails keep their aspect ratio inside the square cell.
                let size = thumb
                    .image
                    .as_ref()
                    .map(|img| fit_cell(img.width, img.height, cell))
                    .unwrap_or(Size::new(cell, cell));
                Placement {
                    rect: Rectangle {
                        x: slot.x + (cell - size.width) / 2.0,
                        y: slot.y + (cell - size.height) / 2.0,
                        width: size.width,
                        height: size.height,
                    },
                    rotation: thumb.rotation,
                    padding: self.border,
                }
            })
            .collect()
    }

    /// Indices in back-to-front draw order: by layer, with the hovered
    /// thumbnail raised above all layers.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.thumbs.len()).collect();
        order.sort_by_key(|&i| self.thumbs[i].layer);
        if let Some(hovered) = self.hovered {
            order.retain(|&i| i != hovered);
            order.push(hovered);
        }
        order
    }

    /// Topmost thumbnail under `cursor`, respecting rotation.
    pub fn hit_test(&self, slots: &[Placement], cursor: Point) -> Option<usize> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|&i| {
                let placement = &slots[i];
                geometry::contains_rotated(placement.outer(), placement.rotation, cursor)
            })
    }
}

fn fit_cell(width: u32, height: u32, cell: f32) -> Size {
    let natural = Size::new(width as f32, height as f32);
    if natural.width <= cell && natural.height <= cell {
        return natural;
    }
    let scale = (cell / natural.width).min(cell / natural.height);
    Size::new(natural.width * scale, natural.height * scale)
}
