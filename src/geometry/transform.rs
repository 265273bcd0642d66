use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A point or vector in the plane.
pub type Point2 = Vector2<f64>;

/// Immutable 2D affine map: a 2x2 linear component followed by a translation,
/// `p' = M * p + t`.
///
/// Every builder method returns a new transform; the receiver is never
/// mutated, so transforms can be shared freely.
///
/// Composition convention: `a.compose(&b)` applies `b` first, then `a`
/// (the matrix product `a * b`). Builder methods chain the other way round:
/// `t.rotate(angle)` applies `t` first and the rotation after, so
/// `AffineTransform::identity().translate(1.0, 0.0).rotate(PI / 2.0)`
/// maps the origin to (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    linear: Matrix2<f64>,
    translation: Vector2<f64>,
}

impl AffineTransform {
    /// The neutral transform: identity matrix, zero translation.
    pub fn identity() -> Self {
        Self {
            linear: Matrix2::identity(),
            translation: Vector2::zeros(),
        }
    }

    /// Build from the six SVG matrix parameters `matrix(a b c d e f)`,
    /// i.e. columns [a b], [c d] and translation [e f].
    pub fn from_parts(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            linear: Matrix2::new(a, c, b, d),
            translation: Vector2::new(e, f),
        }
    }

    /// Pure rotation by `angle` radians about the origin.
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            linear: Matrix2::new(c, -s, s, c),
            translation: Vector2::zeros(),
        }
    }

    /// Rotation by `angle` radians about the pivot (cx, cy).
    pub fn rotation_about(angle: f64, cx: f64, cy: f64) -> Self {
        Self::translation_by(-cx, -cy)
            .rotate(angle)
            .translate(cx, cy)
    }

    /// Pure translation.
    pub fn translation_by(dx: f64, dy: f64) -> Self {
        Self {
            linear: Matrix2::identity(),
            translation: Vector2::new(dx, dy),
        }
    }

    /// Pure (possibly non-uniform) scale.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            linear: Matrix2::new(sx, 0.0, 0.0, sy),
            translation: Vector2::zeros(),
        }
    }

    /// Pure shear.
    pub fn shearing(sx: f64, sy: f64) -> Self {
        Self {
            linear: Matrix2::new(1.0, sx, sy, 1.0),
            translation: Vector2::zeros(),
        }
    }

    /// Skew parallel to the x axis by `angle` radians.
    pub fn skewing_x(angle: f64) -> Self {
        Self::shearing(angle.tan(), 0.0)
    }

    /// Skew parallel to the y axis by `angle` radians.
    pub fn skewing_y(angle: f64) -> Self {
        Self::shearing(0.0, angle.tan())
    }

    /// Apply the linear component, then the translation.
    pub fn apply(&self, point: Point2) -> Point2 {
        self.linear * point + self.translation
    }

    /// Equivalent to applying `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// Receiver first, then a rotation by `angle` radians.
    pub fn rotate(&self, angle: f64) -> Self {
        Self::rotation(angle).compose(self)
    }

    /// Receiver first, then a rotation about the pivot (cx, cy).
    pub fn rotate_about(&self, angle: f64, cx: f64, cy: f64) -> Self {
        Self::rotation_about(angle, cx, cy).compose(self)
    }

    /// Receiver first, then a translation.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::translation_by(dx, dy).compose(self)
    }

    /// Receiver first, then a scale.
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::scaling(sx, sy).compose(self)
    }

    /// Receiver first, then a shear.
    pub fn shear(&self, sx: f64, sy: f64) -> Self {
        Self::shearing(sx, sy).compose(self)
    }

    /// Receiver first, then an x-axis skew.
    pub fn skew_x(&self, angle: f64) -> Self {
        Self::skewing_x(angle).compose(self)
    }

    /// Receiver first, then a y-axis skew.
    pub fn skew_y(&self, angle: f64) -> Self {
        Self::skewing_y(angle).compose(self)
    }

    /// Receiver first, then a reflection negating the x coordinate.
    pub fn reflect_x(&self) -> Self {
        self.scale(-1.0, 1.0)
    }

    /// Receiver first, then a reflection negating the y coordinate.
    pub fn reflect_y(&self) -> Self {
        self.scale(1.0, -1.0)
    }

    /// Inverse transform, or None when the linear component is singular.
    pub fn inverse(&self) -> Option<Self> {
        let inv = self.linear.try_inverse()?;
        Some(Self {
            linear: inv,
            translation: -(inv * self.translation),
        })
    }

    pub fn linear(&self) -> Matrix2<f64> {
        self.linear
    }

    pub fn translation(&self) -> Vector2<f64> {
        self.translation
    }

    /// The six SVG matrix parameters (a, b, c, d, e, f) in column order.
    pub fn parts(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.linear[(0, 0)],
            self.linear[(1, 0)],
            self.linear[(0, 1)],
            self.linear[(1, 1)],
            self.translation[0],
            self.translation[1],
        )
    }

    /// Render as an SVG transform attribute value, `matrix(a b c d e f)`.
    pub fn svg_matrix(&self) -> String {
        let (a, b, c, d, e, f) = self.parts();
        format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Normalize an angle into [-pi, pi). Rotation is periodic, so unwrapped
/// angles would drift without changing the transform they describe.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    // rem_euclid can land exactly on the open end of the interval
    if wrapped >= PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_point_eq(p: Point2, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            p.x,
            p.y
        );
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = AffineTransform::rotation(0.7).translate(3.0, -2.0);
        let id = AffineTransform::identity();
        assert_eq!(id.compose(&t), t);
        assert_eq!(t.compose(&id), t);
    }

    #[test]
    fn test_translate_then_rotate() {
        // Chained builder calls apply later: (0,0) -> (1,0) -> (0,1)
        let t = AffineTransform::identity()
            .translate(1.0, 0.0)
            .rotate(PI / 2.0);
        assert_point_eq(t.apply(Point2::new(0.0, 0.0)), 0.0, 1.0);
    }

    #[test]
    fn test_composition_is_associative() {
        let a = AffineTransform::rotation(0.3).translate(1.0, 2.0);
        let b = AffineTransform::scaling(2.0, 0.5).translate(-1.0, 0.0);
        let c = AffineTransform::shearing(0.2, 0.0);

        let left = a.compose(&b).compose(&c);
        let right = a.compose(&b.compose(&c));
        let p = Point2::new(1.3, -0.7);
        let d = left.apply(p) - right.apply(p);
        assert!(d.norm() < EPS);
    }

    #[test]
    fn test_composition_is_not_commutative() {
        let r = AffineTransform::rotation(PI / 2.0);
        let t = AffineTransform::translation_by(1.0, 0.0);
        let p = Point2::new(0.0, 0.0);
        let rt = r.compose(&t).apply(p);
        let tr = t.compose(&r).apply(p);
        assert!((rt - tr).norm() > 0.5);
    }

    #[test]
    fn test_from_parts_matches_svg_reference() {
        // Vectors from the MDN transform attribute documentation
        let t = AffineTransform::from_parts(3.0, 1.0, -1.0, 3.0, 30.0, 40.0);
        assert_point_eq(t.apply(Point2::new(10.0, 10.0)), 50.0, 80.0);
        assert_point_eq(t.apply(Point2::new(40.0, 10.0)), 140.0, 110.0);
        assert_point_eq(t.apply(Point2::new(10.0, 30.0)), 30.0, 140.0);
        assert_point_eq(t.apply(Point2::new(40.0, 30.0)), 120.0, 170.0);
    }

    #[test]
    fn test_rotation_about_pivot_fixes_pivot() {
        let t = AffineTransform::rotation_about(1.1, 4.0, -2.0);
        assert_point_eq(t.apply(Point2::new(4.0, -2.0)), 4.0, -2.0);
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = AffineTransform::identity()
            .rotate(0.9)
            .scale(1.5, 0.8)
            .translate(-2.0, 7.0);
        let inv = t.inverse().unwrap();
        let p = Point2::new(3.0, -4.5);
        let back = inv.apply(t.apply(p));
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        let t = AffineTransform::scaling(1.0, 0.0);
        assert!(t.inverse().is_none());
    }

    #[test]
    fn test_svg_matrix_format() {
        let t = AffineTransform::from_parts(3.0, 1.0, -1.0, 3.0, 30.0, 40.0);
        assert_eq!(t.svg_matrix(), "matrix(3 1 -1 3 30 40)");
    }

    #[test]
    fn test_reflections() {
        let p = Point2::new(2.0, 3.0);
        assert_point_eq(AffineTransform::identity().reflect_x().apply(p), -2.0, 3.0);
        assert_point_eq(AffineTransform::identity().reflect_y().apply(p), 2.0, -3.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0)).abs() < EPS);
        assert!((wrap_angle(2.0 * PI)).abs() < EPS);
        assert!((wrap_angle(3.0 * PI) - (-PI)).abs() < EPS);
        assert!((wrap_angle(-PI) - (-PI)).abs() < EPS);
        assert!((wrap_angle(PI) - (-PI)).abs() < EPS);
        assert!((wrap_angle(PI / 4.0 + 6.0 * PI) - PI / 4.0).abs() < 1e-9);
        let w = wrap_angle(123.456);
        assert!((-PI..PI).contains(&w));
    }
}
