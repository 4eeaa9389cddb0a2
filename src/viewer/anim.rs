//! Time-sliced animation helpers driven by tick messages.

use std::time::{Duration, Instant};

use super::geometry::Placement;

/// Sinusoidal ease-in-out, `t` in [0, 1].
pub fn ease_in_out(t: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::PI * t).cos()
}

/// A geometry animation between two placements.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    from: Placement,
    to: Placement,
    started: Instant,
    duration: Duration,
}

impl Animation {
    pub fn new(from: Placement, to: Placement, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased placement at `now`.
    pub fn at(&self, now: Instant) -> Placement {
        Placement::lerp(&self.from, &self.to, ease_in_out(self.progress(now)))
    }

    pub fn target(&self) -> Placement {
        self.to
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// An opacity fade.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Fade {
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Rectangle, Size};

    fn placement(x: f32, size: f32) -> Placement {
        Placement {
            rect: Rectangle::new(Point::new(x, x), Size::new(size, size)),
            rotation: 0.0,
            padding: 2.0,
        }
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let value = ease_in_out(i as f32 / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn animation_starts_at_from_and_ends_at_to() {
        let start = Instant::now();
        let anim = Animation::new(
            placement(0.0, 100.0),
            placement(50.0, 600.0),
            start,
            Duration::from_millis(500),
        );

        assert_eq!(anim.at(start), placement(0.0, 100.0));
        assert!(!anim.is_finished(start));

        let end = start + Duration::from_millis(500);
        assert_eq!(anim.at(end), placement(50.0, 600.0));
        assert!(anim.is_finished(end));

        // Past the end the animation stays clamped at the target.
        let later = start + Duration::from_secs(3);
        assert_eq!(anim.at(later), placement(50.0, 600.0));
    }

    #[test]
    fn fade_interpolates_opacity() {
        let start = Instant::now();
        let fade = Fade::new(0.0, 1.0, start, Duration::from_millis(200));
        assert_eq!(fade.at(start), 0.0);
        assert_eq!(fade.at(start + Duration::from_millis(200)), 1.0);
        assert!(fade.is_finished(start + Duration::from_millis(200)));
        assert!(!fade.is_finished(start + Duration::from_millis(100)));
    }
}
