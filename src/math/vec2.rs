/// 2D point or direction in surface coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`, measured clockwise from +x on screen
    pub fn from_heading(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_up_points_to_negative_y() {
        let up = Vec2::from_heading(-90.0);
        assert!(up.x.abs() < 1e-12);
        assert!((up.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heading_is_unit_length() {
        for deg in [-180.0, -113.5, -90.0, 0.0, 22.0, 270.0] {
            let dir = Vec2::from_heading(deg);
            assert!((dir.x.hypot(dir.y) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lerp() {
        let a = Vec2::new(100.0, 200.0);
        let b = Vec2::new(100.0, 100.0);
        let mid = a.lerp(&b, 0.25);
        assert_eq!(mid, Vec2::new(100.0, 175.0));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

}
