// SPDX-License-Identifier: GPL-3.0-only

//! Geometry of the circular preview mask

/// A centred circle cut out of an otherwise covered rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl MaskGeometry {
    /// Circle centred in the bounds with radius `width * ratio`
    pub fn for_bounds(x: f32, y: f32, width: f32, height: f32, ratio: f32) -> Self {
        Self {
            center_x: x + width / 2.0,
            center_y: y + height / 2.0,
            radius: width * ratio,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_with_width_based_radius() {
        let mask = MaskGeometry::for_bounds(0.0, 0.0, 400.0, 800.0, 0.45);
        assert_eq!(mask.center_x, 200.0);
        assert_eq!(mask.center_y, 400.0);
        assert_eq!(mask.radius, 180.0);
    }

    #[test]
    fn offset_bounds() {
        let mask = MaskGeometry::for_bounds(10.0, 20.0, 100.0, 100.0, 0.45);
        assert_eq!((mask.center_x, mask.center_y), (60.0, 70.0));
        assert!(mask.contains(60.0, 70.0));
        assert!(mask.contains(60.0 + 44.0, 70.0));
        assert!(!mask.contains(10.0, 20.0));
    }
}
