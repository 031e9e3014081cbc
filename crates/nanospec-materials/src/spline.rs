//! Natural cubic spline through tabulated dielectric functions.
//!
//! Optical constants arrive at discrete, usually non-uniform wavelengths.
//! $\epsilon_1$ and $\epsilon_2$ share the same knots, so the spline carries
//! complex values and solves for both second-derivative sets in one
//! tridiagonal pass. The curvature vanishes at both ends.

use num_complex::Complex64;

/// Natural cubic spline of $\epsilon(\lambda)$.
#[derive(Debug, Clone)]
pub struct DielectricSpline {
    /// Strictly increasing wavelengths (nm).
    knots: Vec<f64>,
    values: Vec<Complex64>,
    /// Second derivatives at the knots.
    curvature: Vec<Complex64>,
}

impl DielectricSpline {
    /// Build from `(wavelength_nm, ε)` rows sorted by wavelength.
    ///
    /// # Panics
    /// Panics on fewer than 2 rows or non-increasing wavelengths. Every
    /// table in this crate is compiled in.
    pub fn new(rows: &[(f64, Complex64)]) -> Self {
        assert!(rows.len() >= 2, "Need at least 2 data points");
        assert!(
            rows.windows(2).all(|w| w[1].0 > w[0].0),
            "Spline knots must be strictly increasing"
        );

        let (knots, values): (Vec<f64>, Vec<Complex64>) = rows.iter().copied().unzip();
        let curvature = natural_curvature(&knots, &values);
        Self { knots, values, curvature }
    }

    /// Build from `(wavelength_nm, n, k)` rows sorted by wavelength.
    pub fn from_nk(table: &[(f64, f64, f64)]) -> Self {
        let rows: Vec<(f64, Complex64)> = table
            .iter()
            .map(|&(wl, n, k)| (wl, Complex64::new(n, k).powu(2)))
            .collect();
        Self::new(&rows)
    }

    /// First and last knot (nm).
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// $\epsilon$ at `wavelength_nm`, with $\epsilon_2$ clipped at zero so
    /// overshoot between knots never produces gain.
    ///
    /// Outside the knot range the end segment is extended.
    pub fn evaluate(&self, wavelength_nm: f64) -> Complex64 {
        let hi = self
            .knots
            .partition_point(|&knot| knot <= wavelength_nm)
            .clamp(1, self.knots.len() - 1);
        let lo = hi - 1;

        let h = self.knots[hi] - self.knots[lo];
        let left = self.knots[hi] - wavelength_nm;
        let right = wavelength_nm - self.knots[lo];
        let eps = (self.curvature[lo] * left.powi(3) + self.curvature[hi] * right.powi(3)) / (6.0 * h)
            + (self.values[lo] / h - self.curvature[lo] * (h / 6.0)) * left
            + (self.values[hi] / h - self.curvature[hi] * (h / 6.0)) * right;
        Complex64::new(eps.re, eps.im.max(0.0))
    }
}

/// Second derivatives with zero curvature at both ends (Thomas algorithm).
fn natural_curvature(knots: &[f64], values: &[Complex64]) -> Vec<Complex64> {
    let n = knots.len();
    let mut curvature = vec![Complex64::new(0.0, 0.0); n];
    if n < 3 {
        return curvature;
    }

    let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<Complex64> = values
        .windows(2)
        .zip(&h)
        .map(|(v, &h)| (v[1] - v[0]) / h)
        .collect();

    // Eliminated super-diagonal and right-hand side; row 0 is the fixed end.
    let mut upper = vec![0.0; n - 1];
    let mut rhs = vec![Complex64::new(0.0, 0.0); n - 1];
    for i in 1..n - 1 {
        let pivot = 2.0 * (h[i - 1] + h[i]) - h[i - 1] * upper[i - 1];
        upper[i] = h[i] / pivot;
        rhs[i] = ((slope[i] - slope[i - 1]) * 6.0 - rhs[i - 1] * h[i - 1]) / pivot;
    }
    for i in (1..n - 1).rev() {
        curvature[i] = rhs[i] - curvature[i + 1] * upper[i];
    }
    curvature
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn real_rows(points: &[(f64, f64)]) -> Vec<(f64, Complex64)> {
        points.iter().map(|&(x, y)| (x, Complex64::new(y, 0.0))).collect()
    }

    #[test]
    fn test_spline_passes_through_knots() {
        let rows: Vec<(f64, Complex64)> = [(300.0, -1.2, 6.1), (350.0, -2.0, 0.4), (410.0, -4.4, 0.2), (600.0, -15.0, 1.1)]
            .iter()
            .map(|&(wl, re, im)| (wl, Complex64::new(re, im)))
            .collect();
        let spline = DielectricSpline::new(&rows);
        for (wl, eps) in rows {
            let value = spline.evaluate(wl);
            assert_abs_diff_eq!(value.re, eps.re, epsilon = 1e-10);
            assert_abs_diff_eq!(value.im, eps.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_collinear_data_stays_linear() {
        let rows: Vec<(f64, Complex64)> = [200.0, 250.0, 400.0, 1000.0]
            .iter()
            .map(|&wl| (wl, Complex64::new(1.0 + (wl - 200.0) / 50.0, 0.5 + wl / 1000.0)))
            .collect();
        let spline = DielectricSpline::new(&rows);
        for wl in [210.0, 333.3, 612.0, 999.0] {
            let value = spline.evaluate(wl);
            assert_abs_diff_eq!(value.re, 1.0 + (wl - 200.0) / 50.0, epsilon = 1e-9);
            assert_abs_diff_eq!(value.im, 0.5 + wl / 1000.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_three_knot_curvature() {
        // Natural spline through (0, 0), (1, 1), (2, 0): the middle curvature is -3.
        let spline = DielectricSpline::new(&real_rows(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]));
        assert_abs_diff_eq!(spline.curvature[1].re, -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spline.evaluate(0.5).re, 0.6875, epsilon = 1e-12);
        assert_abs_diff_eq!(spline.evaluate(1.5).re, 0.6875, epsilon = 1e-12);
    }

    #[test]
    fn test_overshoot_never_gives_gain() {
        // ε₂ drops to zero abruptly, so the cubic dips below it between knots.
        let rows: Vec<(f64, Complex64)> = [(400.0, 2.0), (410.0, 2.0), (420.0, 0.0), (430.0, 0.0), (440.0, 0.0)]
            .iter()
            .map(|&(wl, im)| (wl, Complex64::new(1.0, im)))
            .collect();
        let spline = DielectricSpline::new(&rows);
        for step in 0..=40 {
            assert!(spline.evaluate(400.0 + step as f64).im >= 0.0);
        }
    }

    #[test]
    fn test_nk_rows_become_permittivity() {
        let spline = DielectricSpline::from_nk(&[(500.0, 0.5, 2.0), (600.0, 0.5, 2.0)]);
        assert_abs_diff_eq!(spline.evaluate(550.0).re, 0.25 - 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spline.evaluate(550.0).im, 2.0, epsilon = 1e-12);
        assert_eq!(spline.domain(), (500.0, 600.0));
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_unsorted_knots_panic() {
        DielectricSpline::new(&real_rows(&[(1.0, 0.0), (3.0, 0.0), (2.0, 0.0)]));
    }
}
