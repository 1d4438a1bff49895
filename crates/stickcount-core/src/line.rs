use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A line hypothesis in (rho, theta) parameter space.
///
/// The line is the set of points satisfying `x * sin(theta) + y * cos(theta)
/// = rho`, with `x` the column and `y` the row of the edge mask. `theta` lies
/// in [0, π) and `rho` is signed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineCandidate {
    pub rho: f64,
    pub theta: f64,
}

impl LineCandidate {
    pub fn new(rho: f64, theta: f64) -> Self {
        Self { rho, theta }
    }

    /// Foot of the perpendicular from the origin onto the line.
    pub fn point_on_line(&self) -> Point2<f64> {
        let (s, c) = self.theta.sin_cos();
        Point2::new(self.rho * s, self.rho * c)
    }

    /// Unit direction along the line.
    pub fn direction(&self) -> Vector2<f64> {
        let (s, c) = self.theta.sin_cos();
        Vector2::new(c, -s)
    }

    /// Signed distance of `p` from the line, in the same units as `rho`.
    pub fn signed_distance(&self, p: Point2<f64>) -> f64 {
        let (s, c) = self.theta.sin_cos();
        p.x * s + p.y * c - self.rho
    }

    pub fn is_finite(&self) -> bool {
        self.rho.is_finite() && self.theta.is_finite()
    }
}

impl From<(f64, f64)> for LineCandidate {
    fn from((rho, theta): (f64, f64)) -> Self {
        Self { rho, theta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn horizontal_and_vertical_lines() {
        // theta = 0: the row y = rho.
        let row = LineCandidate::new(7.0, 0.0);
        assert_abs_diff_eq!(row.signed_distance(Point2::new(42.0, 7.0)), 0.0);
        assert_abs_diff_eq!(row.direction().y, 0.0);

        // theta = π/2: the column x = rho.
        let col = LineCandidate::new(3.0, FRAC_PI_2);
        assert_abs_diff_eq!(col.signed_distance(Point2::new(3.0, 19.0)), 0.0, epsilon = 1e-12);
        let p = col.point_on_line();
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn point_plus_direction_stays_on_line() {
        let line = LineCandidate::new(-12.5, 2.1);
        let p = line.point_on_line() + line.direction() * 40.0;
        assert_abs_diff_eq!(line.signed_distance(p), 0.0, epsilon = 1e-9);
    }
}
