//! Placement math for the pile and the photo overlay.
//!
//! Rotation is always stored in degrees as a first-class value; nothing here
//! reconstructs an angle from a rendered transform.

use iced::{Point, Rectangle, Size};

/// On-screen geometry of a thumbnail or of the photo overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// The image rectangle, border excluded.
    pub rect: Rectangle,
    /// Rotation around the rectangle center (deg).
    pub rotation: f32,
    /// Border width drawn around the rectangle (px).
    pub padding: f32,
}

impl Placement {
    /// Interpolate between two placements, `t` in [0, 1].
    pub fn lerp(from: &Placement, to: &Placement, t: f32) -> Placement {
        Placement {
            rect: Rectangle {
                x: lerp(from.rect.x, to.rect.x, t),
                y: lerp(from.rect.y, to.rect.y, t),
                width: lerp(from.rect.width, to.rect.width, t),
                height: lerp(from.rect.height, to.rect.height, t),
            },
            rotation: lerp(from.rotation, to.rotation, t),
            padding: lerp(from.padding, to.padding, t),
        }
    }

    /// The rectangle including its border.
    pub fn outer(&self) -> Rectangle {
        Rectangle {
            x: self.rect.x - self.padding,
            y: self.rect.y - self.padding,
            width: self.rect.width + 2.0 * self.padding,
            height: self.rect.height + 2.0 * self.padding,
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Best-fit size for an image of `natural` size inside `viewport`, reserving
/// `margin` on every side and preserving aspect ratio.
///
/// The image is never scaled up: when it fits, it is shown at natural size.
/// When both axes are too small, the binding dimension is whichever still
/// lets the other axis fit.
pub fn fit_within(natural: Size, viewport: Size, margin: f32) -> Size {
    let available = Size::new(
        (viewport.width - 2.0 * margin).max(1.0),
        (viewport.height - 2.0 * margin).max(1.0),
    );
    let aspect = natural.height / natural.width;

    if available.width < natural.width && available.height < natural.height {
        if available.width * aspect > available.height {
            fit_height(natural, available.height)
        } else {
            fit_width(natural, available.width)
        }
    } else if available.width < natural.width {
        fit_width(natural, available.width)
    } else if available.height < natural.height {
        fit_height(natural, available.height)
    } else {
        natural
    }
}

fn fit_width(natural: Size, width: f32) -> Size {
    Size::new(width, width * natural.height / natural.width)
}

fn fit_height(natural: Size, height: f32) -> Size {
    Size::new(height * natural.width / natural.height, height)
}

/// Center `size` inside `viewport`.
pub fn centered(size: Size, viewport: Size) -> Rectangle {
    Rectangle {
        x: (viewport.width - size.width) / 2.0,
        y: (viewport.height - size.height) / 2.0,
        width: size.width,
        height: size.height,
    }
}

/// Corners of `rect` rotated by `degrees` around its center,
/// in drawing order.
pub fn rotated_corners(rect: Rectangle, degrees: f32) -> [Point; 4] {
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    let rotate = |x: f32, y: f32| {
        let dx = x - cx;
        let dy = y - cy;
        Point::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
    };

    [
        rotate(rect.x, rect.y),
        rotate(rect.x + rect.width, rect.y),
        rotate(rect.x + rect.width, rect.y + rect.height),
        rotate(rect.x, rect.y + rect.height),
    ]
}

/// Whether `point` lies inside `rect` rotated by `degrees` around its center.
pub fn contains_rotated(rect: Rectangle, degrees: f32, point: Point) -> bool {
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    // Rotate the point backwards instead of the rectangle forwards.
    let (sin, cos) = (-degrees.to_radians()).sin_cos();
    let dx = point.x - cx;
    let dy = point.y - cy;
    let local = Point::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos);
    rect.contains(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: f32 = 20.0;

    fn viewport() -> Size {
        Size::new(1000.0, 800.0)
    }

    #[test]
    fn natural_size_when_it_fits() {
        let fitted = fit_within(Size::new(400.0, 300.0), viewport(), MARGIN);
        assert_eq!(fitted, Size::new(400.0, 300.0));
    }

    #[test]
    fn scales_to_width_when_only_width_exceeds() {
        // Available: 960 x 760. Image 1920 x 400 only exceeds width.
        let fitted = fit_within(Size::new(1920.0, 400.0), viewport(), MARGIN);
        assert_eq!(fitted.width, 960.0);
        assert_eq!(fitted.height, 960.0 * 400.0 / 1920.0);
    }

    #[test]
    fn scales_to_height_when_only_height_exceeds() {
        // Image 500 x 1520 only exceeds height.
        let fitted = fit_within(Size::new(500.0, 1520.0), viewport(), MARGIN);
        assert_eq!(fitted.height, 760.0);
        assert_eq!(fitted.width, 760.0 * 500.0 / 1520.0);
    }

    #[test]
    fn binding_dimension_when_both_exceed() {
        // Tall image: scaling to width would still overflow height,
        // so height binds.
        let fitted = fit_within(Size::new(2000.0, 3000.0), viewport(), MARGIN);
        assert_eq!(fitted.height, 760.0);
        assert!(fitted.width <= 960.0);

        // Wide image: width binds.
        let fitted = fit_within(Size::new(3000.0, 2000.0), viewport(), MARGIN);
        assert_eq!(fitted.width, 960.0);
        assert!(fitted.height <= 760.0);
    }

    #[test]
    fn fitted_image_preserves_aspect_ratio() {
        let natural = Size::new(2731.0, 1313.0);
        let fitted = fit_within(natural, viewport(), MARGIN);
        let original = natural.height / natural.width;
        let result = fitted.height / fitted.width;
        assert!((original - result).abs() < 1e-4);
    }

    #[test]
    fn centered_rect_is_centered() {
        let rect = centered(Size::new(400.0, 200.0), viewport());
        assert_eq!(rect.x, 300.0);
        assert_eq!(rect.y, 300.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Placement {
            rect: Rectangle::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
            rotation: -30.0,
            padding: 2.0,
        };
        let b = Placement {
            rect: Rectangle::new(Point::new(50.0, 80.0), Size::new(600.0, 400.0)),
            rotation: 0.0,
            padding: 10.0,
        };
        assert_eq!(Placement::lerp(&a, &b, 0.0), a);
        assert_eq!(Placement::lerp(&a, &b, 1.0), b);
        let mid = Placement::lerp(&a, &b, 0.5);
        assert_eq!(mid.rotation, -15.0);
        assert_eq!(mid.rect.width, 350.0);
    }

    #[test]
    fn rotated_containment() {
        let rect = Rectangle::new(Point::new(100.0, 100.0), Size::new(100.0, 50.0));
        // Center is always inside, whatever the angle.
        assert!(contains_rotated(rect, 45.0, Point::new(150.0, 125.0)));
        // The unrotated corner leaves the rectangle once it spins 45 degrees.
        assert!(!contains_rotated(rect, 45.0, Point::new(101.0, 101.0)));
        // Zero rotation degenerates to plain containment.
        assert!(contains_rotated(rect, 0.0, Point::new(101.0, 101.0)));
    }

    #[test]
    fn corners_of_unrotated_rect() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), Size::new(30.0, 40.0));
        let corners = rotated_corners(rect, 0.0);
        assert_eq!(corners[0], Point::new(10.0, 20.0));
        assert_eq!(corners[2], Point::new(40.0, 60.0));
    }
}
