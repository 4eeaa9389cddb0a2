//! The photo viewer overlay.
//!
//! A single overlay value reused for every selection, modeled as an explicit
//! state machine:
//!
//! ```text
//! Closed -> Opening (loading, then enlarging) -> Open -> Closing -> Closed
//! ```
//!
//! A pickup request that arrives while the overlay is up is queued (last
//! wins) and re-issued once the close sequence has fully completed, so no
//! frame ever shows a mixed state. In-flight image loads are cancelled
//! logically with a generation counter: results carrying a stale generation
//! are dropped.

pub mod anim;
pub mod geometry;

use std::time::{Duration, Instant};

use iced::widget::image;
use iced::Size;

use crate::config::Config;
use anim::{Animation, Fade};
use geometry::Placement;

/// A decoded full-size photo.
#[derive(Debug, Clone)]
pub struct Photo {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    pub fn natural_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Coarse viewer phase, used for interaction gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// What the surface should draw for the overlay right now.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub placement: Placement,
    pub opacity: f32,
    pub photo: Option<image::Handle>,
}

/// Emitted by `tick` when a transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The close sequence finished; the active selection must be cleared.
    /// Carries the queued pickup, if any.
    Closed { pending: Option<usize> },
}

enum State {
    Closed,
    Opening {
        index: usize,
        origin: Placement,
        stage: OpeningStage,
    },
    Open {
        index: usize,
        placement: Placement,
    },
    Closing {
        index: usize,
        stage: ClosingStage,
    },
}

enum OpeningStage {
    /// Overlay parked over the source thumbnail while the photo loads.
    Loading { fade: Fade },
    /// Photo arrived; animating up to the fitted placement.
    Enlarging { anim: Animation },
}

enum ClosingStage {
    /// Animating back down onto the active thumbnail.
    Lowering { anim: Animation },
    /// Geometry matches the thumbnail again; fading out.
    FadingOut { placement: Placement, fade: Fade },
}

pub struct Viewer {
    state: State,
    /// Queued pickup request, re-issued after the close sequence completes.
    pending: Option<usize>,
    /// Cancellation token for in-flight photo loads.
    generation: u64,
    photo: Option<Photo>,
    overlay: Option<Overlay>,
    /// Opacity of the active thumbnail (faded out while the overlay is up).
    active_alpha: f32,
    fade_duration: Duration,
    pickup_duration: Duration,
    photo_border: f32,
    viewport_margin: f32,
}

impl Viewer {
    pub fn new(config: &Config) -> Self {
        Self {
            state: State::Closed,
            pending: None,
            generation: 0,
            photo: None,
            overlay: None,
            active_alpha: 1.0,
            fade_duration: config.fade_duration(),
            pickup_duration: config.pickup_duration(),
            photo_border: config.photo_border,
            viewport_margin: config.viewport_margin,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Closed => Phase::Closed,
            State::Opening { .. } => Phase::Opening,
            State::Open { .. } => Phase::Open,
            State::Closing { .. } => Phase::Closing,
        }
    }

    /// The thumbnail the overlay is currently associated with.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            State::Closed => None,
            State::Opening { index, .. }
            | State::Open { index, .. }
            | State::Closing { index, .. } => Some(index),
        }
    }

    /// Whether tick messages are needed to make progress.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase(), Phase::Opening | Phase::Closing)
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Draw opacity for a thumbnail; the active one fades out under
    /// the overlay and snaps back once the viewer has closed.
    pub fn thumb_alpha(&self, index: usize) -> f32 {
        if self.index() == Some(index) {
            self.active_alpha
        } else {
            1.0
        }
    }

    /// Start picking up the thumbnail at `index`, whose current on-screen
    /// placement is `origin`. Only legal while `Closed`; callers route
    /// requests through `queue_pickup` otherwise.
    ///
    /// Returns the generation the resulting photo load must carry.
    pub fn begin_open(&mut self, index: usize, origin: Placement, now: Instant) -> u64 {
        debug_assert!(matches!(self.state, State::Closed));
        self.generation += 1;
        self.photo = None;
        self.state = State::Opening {
            index,
            origin,
            stage: OpeningStage::Loading {
                fade: Fade::new(0.0, 1.0, now, self.fade_duration),
            },
        };
        self.refresh(now);
        self.generation
    }

    /// Remember a pickup request that arrived mid-transition. Last wins.
    pub fn queue_pickup(&mut self, index: usize) {
        self.pending = Some(index);
    }

    /// Start putting the photo down. `target` is the active thumbnail's
    /// current placement. Invalidates any in-flight load.
    pub fn begin_close(&mut self, target: Placement, now: Instant) {
        let (index, current) = match &self.state {
            State::Open { index, placement } => (*index, *placement),
            State::Opening { index, origin, stage } => {
                let current = match stage {
                    OpeningStage::Loading { .. } => *origin,
                    OpeningStage::Enlarging { anim } => anim.at(now),
                };
                (*index, current)
            }
            _ => return,
        };

        self.generation += 1;
        self.state = State::Closing {
            index,
            stage: ClosingStage::Lowering {
                anim: Animation::new(current, target, now, self.pickup_duration),
            },
        };
        self.refresh(now);
    }

    /// Feed a completed photo load. Returns `false` when the result was
    /// stale (old generation, or the viewer is no longer opening) and has
    /// been dropped.
    pub fn photo_loaded(
        &mut self,
        generation: u64,
        photo: Photo,
        viewport: Size,
        now: Instant,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        let (index, origin) = match &self.state {
            State::Opening {
                index,
                origin,
                stage: OpeningStage::Loading { .. },
            } => (*index, *origin),
            _ => return false,
        };

        let fitted = geometry::fit_within(
            photo.natural_size(),
            viewport,
            self.viewport_margin + self.photo_border,
        );
        let target = Placement {
            rect: geometry::centered(fitted, viewport),
            rotation: 0.0,
            padding: self.photo_border,
        };

        self.photo = Some(photo);
        self.state = State::Opening {
            index,
            origin,
            stage: OpeningStage::Enlarging {
                anim: Animation::new(origin, target, now, self.pickup_duration),
            },
        };
        self.refresh(now);
        true
    }

    /// A photo load failed: abort the transition and restore `Closed` so the
    /// user can retry. Returns `false` when the failure was stale.
    pub fn abort_opening(&mut self, generation: u64) -> bool {
        if generation != self.generation || !matches!(self.state, State::Opening { .. }) {
            return false;
        }
        self.state = State::Closed;
        self.photo = None;
        self.pending = None;
        self.overlay = None;
        self.active_alpha = 1.0;
        true
    }

    /// Advance animations. Must be called with a monotonically
    /// non-decreasing clock.
    pub fn tick(&mut self, now: Instant) -> Option<Event> {
        let fade_duration = self.fade_duration;

        match &mut self.state {
            State::Closed | State::Open { .. } => return None,
            State::Opening {
                index,
                stage: OpeningStage::Enlarging { anim },
                ..
            } => {
                if anim.is_finished(now) {
                    let (index, placement) = (*index, anim.target());
                    self.state = State::Open { index, placement };
                }
            }
            // Still waiting for the photo; fades advance through `refresh`.
            State::Opening { .. } => {}
            State::Closing { stage, .. } => match stage {
                ClosingStage::Lowering { anim } => {
                    if anim.is_finished(now) {
                        let placement = anim.target();
                        *stage = ClosingStage::FadingOut {
                            placement,
                            fade: Fade::new(1.0, 0.0, now, fade_duration),
                        };
                    }
                }
                ClosingStage::FadingOut { fade, .. } => {
                    if fade.is_finished(now) {
                        self.state = State::Closed;
                        self.photo = None;
                        self.overlay = None;
                        self.active_alpha = 1.0;
                        return Some(Event::Closed {
                            pending: self.pending.take(),
                        });
                    }
                }
            },
        }

        self.refresh(now);
        None
    }

    /// Recompute the drawable overlay snapshot from the current state.
    fn refresh(&mut self, now: Instant) {
        let photo = self.photo.as_ref().map(|p| p.handle.clone());
        let (overlay, active_alpha) = match &self.state {
            State::Closed => (None, 1.0),
            State::Opening { origin, stage, .. } => match stage {
                OpeningStage::Loading { fade } => {
                    let opacity = fade.at(now);
                    (
                        Some(Overlay {
                            placement: *origin,
                            opacity,
                            photo,
                        }),
                        1.0 - opacity,
                    )
                }
                OpeningStage::Enlarging { anim } => (
                    Some(Overlay {
                        placement: anim.at(now),
                        opacity: 1.0,
                        photo,
                    }),
                    0.0,
                ),
            },
            State::Open { placement, .. } => (
                Some(Overlay {
                    placement: *placement,
                    opacity: 1.0,
                    photo,
                }),
                0.0,
            ),
            State::Closing { stage, .. } => match stage {
                ClosingStage::Lowering { anim } => (
                    Some(Overlay {
                        placement: anim.at(now),
                        opacity: 1.0,
                        photo,
                    }),
                    0.0,
                ),
                ClosingStage::FadingOut { placement, fade } => {
                    let opacity = fade.at(now);
                    (
                        Some(Overlay {
                            placement: *placement,
                            opacity,
                            photo,
                        }),
                        1.0 - opacity,
                    )
                }
            },
        };

        self.overlay = overlay;
        self.active_alpha = active_alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Rectangle};

    fn test_config() -> Config {
        Config::default()
    }

    fn thumb_placement(x: f32, y: f32) -> Placement {
        Placement {
            rect: Rectangle::new(Point::new(x, y), Size::new(120.0, 90.0)),
            rotation: -20.0,
            padding: 2.0,
        }
    }

    fn test_photo(width: u32, height: u32) -> Photo {
        Photo {
            handle: image::Handle::from_rgba(1, 1, vec![0u8; 4]),
            width,
            height,
        }
    }

    fn viewport() -> Size {
        Size::new(1000.0, 800.0)
    }

    /// Drive the viewer well past every animation in flight.
    fn settle(viewer: &mut Viewer, from: Instant) -> (Instant, Option<Event>) {
        let mut now = from;
        for _ in 0..200 {
            now += Duration::from_millis(16);
            if let Some(event) = viewer.tick(now) {
                return (now, Some(event));
            }
            if !viewer.is_animating() {
                break;
            }
        }
        (now, None)
    }

    #[test]
    fn pickup_from_closed_ends_open_with_fitted_placement() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();

        let generation = viewer.begin_open(0, thumb_placement(30.0, 40.0), start);
        assert_eq!(viewer.phase(), Phase::Opening);
        // Overlay parks exactly over the thumbnail, rotation included.
        let overlay = viewer.overlay().unwrap();
        assert_eq!(overlay.placement, thumb_placement(30.0, 40.0));
        assert_eq!(overlay.opacity, 0.0);

        assert!(viewer.photo_loaded(generation, test_photo(400, 300), viewport(), start));
        let (_, event) = settle(&mut viewer, start);
        assert_eq!(event, None);
        assert_eq!(viewer.phase(), Phase::Open);

        // 400x300 fits: shown at natural size, centered, rotation reset.
        let overlay = viewer.overlay().unwrap();
        assert_eq!(overlay.placement.rotation, 0.0);
        assert_eq!(overlay.placement.rect.width, 400.0);
        assert_eq!(overlay.placement.rect.height, 300.0);
        assert_eq!(overlay.placement.rect.x, 300.0);
        assert_eq!(overlay.placement.rect.y, 250.0);
    }

    #[test]
    fn oversized_photo_is_scaled_down() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        let generation = viewer.begin_open(0, thumb_placement(0.0, 0.0), start);
        assert!(viewer.photo_loaded(generation, test_photo(4000, 3000), viewport(), start));
        settle(&mut viewer, start);

        let rect = viewer.overlay().unwrap().placement.rect;
        let margin = test_config().viewport_margin + test_config().photo_border;
        assert!(rect.width <= viewport().width - 2.0 * margin + 0.5);
        assert!(rect.height <= viewport().height - 2.0 * margin + 0.5);
    }

    #[test]
    fn pickup_while_open_queues_and_closes_first() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        let generation = viewer.begin_open(0, thumb_placement(0.0, 0.0), start);
        assert!(viewer.photo_loaded(generation, test_photo(400, 300), viewport(), start));
        let (now, _) = settle(&mut viewer, start);
        assert_eq!(viewer.phase(), Phase::Open);

        // Request B mid-open: queue it, then run the close sequence.
        viewer.queue_pickup(3);
        viewer.begin_close(thumb_placement(200.0, 100.0), now);
        assert_eq!(viewer.phase(), Phase::Closing);

        // The close sequence completes fully before B is surfaced.
        let (_, event) = settle(&mut viewer, now);
        assert_eq!(event, Some(Event::Closed { pending: Some(3) }));
        assert_eq!(viewer.phase(), Phase::Closed);
        assert!(viewer.overlay().is_none());
    }

    #[test]
    fn closing_lowers_onto_thumbnail_before_fading() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        let generation = viewer.begin_open(0, thumb_placement(50.0, 60.0), start);
        assert!(viewer.photo_loaded(generation, test_photo(400, 300), viewport(), start));
        let (now, _) = settle(&mut viewer, start);

        let target = thumb_placement(50.0, 60.0);
        viewer.begin_close(target, now);

        // Just past the lowering animation the overlay matches the
        // thumbnail again and is still fully visible.
        let lowered = now + test_config().pickup_duration() + Duration::from_millis(16);
        viewer.tick(lowered);
        let overlay = viewer.overlay().unwrap();
        assert_eq!(overlay.placement, target);
        assert_eq!(overlay.opacity, 1.0);
        assert_eq!(viewer.phase(), Phase::Closing);
    }

    #[test]
    fn stale_photo_loads_are_dropped() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        let stale = viewer.begin_open(0, thumb_placement(0.0, 0.0), start);

        // A new selection interrupts the load.
        viewer.queue_pickup(1);
        viewer.begin_close(thumb_placement(0.0, 0.0), start);

        assert!(!viewer.photo_loaded(stale, test_photo(400, 300), viewport(), start));
        assert_eq!(viewer.phase(), Phase::Closing);
    }

    #[test]
    fn load_failure_restores_closed() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        let generation = viewer.begin_open(0, thumb_placement(0.0, 0.0), start);

        assert!(viewer.abort_opening(generation));
        assert_eq!(viewer.phase(), Phase::Closed);
        assert!(viewer.overlay().is_none());
        assert_eq!(viewer.thumb_alpha(0), 1.0);

        // A second failure report for the same load is ignored.
        assert!(!viewer.abort_opening(generation));
    }

    #[test]
    fn active_thumbnail_fades_out_while_overlay_fades_in() {
        let mut viewer = Viewer::new(&test_config());
        let start = Instant::now();
        viewer.begin_open(2, thumb_placement(0.0, 0.0), start);

        assert_eq!(viewer.thumb_alpha(2), 1.0);
        assert_eq!(viewer.thumb_alpha(0), 1.0);

        viewer.tick(start + test_config().fade_duration());
        assert_eq!(viewer.thumb_alpha(2), 0.0);
        assert_eq!(viewer.thumb_alpha(0), 1.0);
    }
}
