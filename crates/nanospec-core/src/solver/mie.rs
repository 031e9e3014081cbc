//! Multilayer Mie theory for concentric spheres.
//!
//! Efficiencies follow from the expansion coefficients
//! $a_n = \frac{\psi_n(x)}{\xi_n(x)} \frac{H^a_n - m_L D_n(x)}{H^a_n - m_L D^{(3)}_n(x)}$ and
//! $b_n = \frac{\psi_n(x)}{\xi_n(x)} \frac{m_L H^b_n - D_n(x)}{m_L H^b_n - D^{(3)}_n(x)}$,
//! where $H^a_n, H^b_n$ are carried from the core to the surface shell by
//! shell with the logarithmic-derivative recursion of Wu & Wang. Only ratios
//! of Riccati-Bessel functions appear, which keeps the recursion stable for
//! absorbing shells as long as $\mathrm{Im}(m)\,x$ stays moderate.
//!
//! # References
//! - Z. S. Wu and Y. P. Wang, *Radio Sci.* **26**, 1393 (1991).
//! - Bohren & Huffman, *Absorption and Scattering of Light by Small Particles* (1983).

use num_complex::Complex64;

use super::{check_finite, size_parameter, KernelError, LayerStack, ScatteringKernel, MIN_SIZE_PARAMETER};
use crate::types::Efficiencies;

const I: Complex64 = Complex64::new(0.0, 1.0);

/// Recursion becomes unreliable beyond this value of Im(m)·x.
const MAX_ABSORPTION_DEPTH: f64 = 20.0;

/// Coefficients below this magnitude end the series.
const SERIES_CUTOFF: f64 = 1.0e-40;

/// Added to a denominator that is exactly zero.
const TINY: f64 = 1.0e-30;

/// Full set of Mie efficiencies at one wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MieEfficiencies {
    pub extinction: f64,
    pub scattering: f64,
    pub absorption: f64,
    pub backscattering: f64,
    pub radiation_pressure: f64,
}

impl MieEfficiencies {
    /// Single-scattering albedo Q_sca / Q_ext.
    pub fn albedo(&self) -> f64 {
        self.scattering / self.extinction
    }

    /// Asymmetry parameter ⟨cos θ⟩ = (Q_ext − Q_pr) / Q_sca.
    pub fn asymmetry(&self) -> f64 {
        (self.extinction - self.radiation_pressure) / self.scattering
    }
}

impl From<MieEfficiencies> for Efficiencies {
    fn from(q: MieEfficiencies) -> Self {
        Efficiencies {
            extinction: q.extinction,
            scattering: q.scattering,
            absorption: q.absorption,
        }
    }
}

/// Exact solution for concentric spherical shells.
#[derive(Debug, Clone, Copy, Default)]
pub struct MieKernel;

impl MieKernel {
    /// All efficiencies, including backscattering and radiation pressure.
    ///
    /// Only the `z` component of each layer's outer radius is used.
    pub fn solve(
        &self,
        stack: &LayerStack,
        wavelength_nm: f64,
        medium_index: f64,
    ) -> Result<MieEfficiencies, KernelError> {
        let outer = stack.outermost()?;
        let x = size_parameter(outer.outer_radius[0], wavelength_nm, medium_index);
        if x < MIN_SIZE_PARAMETER {
            return Ok(MieEfficiencies::default());
        }

        // Relative refractive index and size parameter at each outer boundary.
        let m: Vec<Complex64> = stack
            .layers
            .iter()
            .map(|layer| layer.epsilon.sqrt() / medium_index)
            .collect();
        let xs: Vec<f64> = stack
            .layers
            .iter()
            .map(|layer| size_parameter(layer.outer_radius[0], wavelength_nm, medium_index))
            .collect();

        let coefficients = expansion_coefficients(&m, &xs)?;
        let q = efficiencies(x, &coefficients);
        check_finite(q.into())?;
        Ok(q)
    }
}

impl ScatteringKernel for MieKernel {
    fn scatter(
        &self,
        stack: &LayerStack,
        wavelength_nm: f64,
        medium_index: f64,
    ) -> Result<Efficiencies, KernelError> {
        self.solve(stack, wavelength_nm, medium_index).map(Efficiencies::from)
    }

    fn method_name(&self) -> &str {
        "Mie"
    }
}

/// Number of series terms needed for size parameter `x`.
fn series_length(x: f64) -> usize {
    if x < 1.0 {
        (7.5 * x + 9.0) as usize
    } else if x > 100.0 {
        (1.0625 * x + 28.5) as usize
    } else {
        (1.25 * x + 15.5) as usize
    }
}

/// $D_n(z) = \psi_n'(z)/\psi_n(z)$ for $n = 1..=len$ by downward recurrence.
fn log_derivative(z: Complex64, len: usize) -> Vec<Complex64> {
    let s = z.inv();
    let mut d = vec![Complex64::default(); len];
    d[len - 1] = (len as f64 + 1.0) * s;
    for n in (1..len).rev() {
        let s1 = (n as f64 + 1.0) * s;
        d[n - 1] = s1 - (d[n] + s1).inv();
    }
    d
}

/// Ratios of Riccati-Bessel functions at a complex argument, `n = 1..=len`.
struct ShellRatios {
    /// $\psi_n'/\psi_n$
    d1: Vec<Complex64>,
    /// $\chi_n'/\chi_n$
    d2: Vec<Complex64>,
    /// $\psi_n/\chi_n$
    bb: Vec<Complex64>,
}

impl ShellRatios {
    fn new(z: Complex64, len: usize) -> Self {
        let d1 = log_derivative(z, len);
        let zi = z.inv();

        let rxy = Complex64::new((2.0 * z.re).cos(), (2.0 * z.re).sin()) * (-2.0 * z.im).exp();
        let c0 = -(1.0 - rxy) / (2.0 * rxy);
        let b0 = I * (1.0 - rxy) / (1.0 + rxy);

        let mut d2 = Vec::with_capacity(len);
        let mut bb = Vec::with_capacity(len);

        let mut d3 = -zi + (zi - I).inv();
        let mut cc = c0 * (zi + d3) / (zi + d1[0]);
        d2.push((cc * d1[0] - d3) / (cc - 1.0));
        bb.push(b0 * (zi + d2[0]) / (zi + d1[0]));

        for n in 1..len {
            let r1 = (n as f64 + 1.0) * zi;
            d3 = -r1 + (r1 - d3).inv();
            cc = cc * (r1 + d3) / (r1 + d1[n]);
            d2.push((cc * d1[n] - d3) / (cc - 1.0));
            bb.push(bb[n - 1] * (r1 + d2[n]) / (r1 + d1[n]));
        }

        Self { d1, d2, bb }
    }
}

/// $D^{(3)}_n(x) = \xi_n'/\xi_n$ and $\psi_n/\xi_n$ at the real surface
/// size parameter.
///
/// The ratio chain starts from the closed form of $\psi_1/\xi_1$: seeding it
/// with $\psi_0/\xi_0$ gives 0/0 whenever $x$ is a multiple of π.
fn surface_ratios(x: f64, d1x: &[Complex64]) -> (Vec<Complex64>, Vec<Complex64>) {
    let len = d1x.len();
    let ax = 1.0 / x;
    let (sin, cos) = x.sin_cos();
    let psi1 = sin * ax - cos;
    let chi1 = cos * ax + sin;

    let mut d3x = Vec::with_capacity(len);
    let mut cx = Vec::with_capacity(len);
    d3x.push(-ax + (ax - I).inv());
    cx.push(Complex64::new(psi1, 0.0) / Complex64::new(psi1, -chi1));

    for n in 1..len {
        let a1 = (n as f64 + 1.0) * ax;
        d3x.push(-a1 + (a1 - d3x[n - 1]).inv());
        cx.push(cx[n - 1] * (a1 + d3x[n]) / (a1 + d1x[n]));
    }
    (d3x, cx)
}

fn guarded(den: Complex64) -> Complex64 {
    if den.norm() == 0.0 {
        den + TINY
    } else {
        den
    }
}

fn check_depth(boundary: usize, m: Complex64, x: f64) -> Result<(), KernelError> {
    let value = m.im * x;
    if value > MAX_ABSORPTION_DEPTH {
        return Err(KernelError::Unstable { boundary, value });
    }
    Ok(())
}

/// Expansion coefficients $(a_n, b_n)$, truncated once they become negligible.
fn expansion_coefficients(m: &[Complex64], xs: &[f64]) -> Result<Vec<(Complex64, Complex64)>, KernelError> {
    let n_layers = m.len();
    let x = xs[n_layers - 1];
    let num = series_length(x);

    let max_index = m.iter().map(|mj| mj.norm()).fold(0.0, f64::max);
    let num2 = series_length(max_index * x).max(num);

    let d1x: Vec<Complex64> = log_derivative(Complex64::from(x), num);
    let (d3x, cx) = surface_ratios(x, &d1x);

    check_depth(1, m[0], xs[0])?;
    let core = log_derivative(m[0] * xs[0], num2);

    // For each shell j ≥ 1: ratios at its inner and outer boundary.
    let mut inner = Vec::with_capacity(n_layers);
    let mut outer = Vec::with_capacity(n_layers);
    for j in 1..n_layers {
        check_depth(j, m[j], xs[j - 1])?;
        inner.push(ShellRatios::new(m[j] * xs[j - 1], num2));
        check_depth(j + 1, m[j], xs[j])?;
        outer.push(ShellRatios::new(m[j] * xs[j], num2));
    }

    let m_last = m[n_layers - 1];
    let mut coefficients = Vec::with_capacity(num);
    for n in 0..num {
        let mut ha = core[n];
        let mut hb = core[n];

        for j in 1..n_layers {
            let (mj, mp) = (m[j], m[j - 1]);
            let inner = &inner[j - 1];
            let outer = &outer[j - 1];

            let sa = inner.bb[n] * (mj * ha - mp * inner.d1[n]) / guarded(mj * ha - mp * inner.d2[n]);
            let sb = inner.bb[n] * (mp * hb - mj * inner.d1[n]) / guarded(mp * hb - mj * inner.d2[n]);

            ha = (outer.bb[n] * outer.d1[n] - sa * outer.d2[n]) / guarded(outer.bb[n] - sa);
            hb = (outer.bb[n] * outer.d1[n] - sb * outer.d2[n]) / guarded(outer.bb[n] - sb);
        }

        let a = cx[n] * (ha - m_last * d1x[n]) / (ha - m_last * d3x[n]);
        let b = cx[n] * (m_last * hb - d1x[n]) / (m_last * hb - d3x[n]);
        coefficients.push((a, b));

        if a.norm() + b.norm() < SERIES_CUTOFF {
            break;
        }
    }

    Ok(coefficients)
}

/// Efficiencies from the expansion coefficients. The last coefficient pair
/// only enters through the cross terms of the radiation pressure.
fn efficiencies(x: f64, coefficients: &[(Complex64, Complex64)]) -> MieEfficiencies {
    let b = 2.0 / (x * x);
    let mut ext = 0.0;
    let mut sca = 0.0;
    let mut back = Complex64::default();
    let mut cross = Complex64::default();

    for (i, pair) in coefficients.windows(2).enumerate() {
        let (an, bn) = pair[0];
        let (an1, bn1) = pair[1];
        let n = i as f64 + 1.0;
        let weight = 2.0 * n + 1.0;
        let sign = if i % 2 == 0 { -1.0 } else { 1.0 };

        back += (n + 0.5) * sign * (an - bn);
        cross += n * (n + 2.0) / (n + 1.0) * (an * an1.conj() + bn * bn1.conj())
            + weight / n / (n + 1.0) * (an * bn.conj());
        ext += weight * (an.re + bn.re);
        sca += weight * (an.norm_sqr() + bn.norm_sqr());
    }

    let extinction = b * ext;
    let scattering = b * sca;
    MieEfficiencies {
        extinction,
        scattering,
        absorption: extinction - scattering,
        backscattering: 2.0 * b * back.norm_sqr(),
        radiation_pressure: extinction - 2.0 * b * cross.re,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ShellLayer;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn homogeneous(n: Complex64, radius: f64) -> LayerStack {
        LayerStack::sphere(n * n, radius)
    }

    #[test]
    fn test_series_length() {
        assert_eq!(series_length(0.5), 12);
        assert_eq!(series_length(10.0), 28);
        assert_eq!(series_length(200.0), 241);
    }

    #[test]
    fn test_log_derivative_matches_closed_form() {
        // D_1(z) = -1/z + 1/(1/z - cot z)
        let z = Complex64::new(1.3, 0.4);
        let d = log_derivative(z, 30);
        let cot = z.cos() / z.sin();
        let expected = -z.inv() + (z.inv() - cot).inv();
        assert_abs_diff_eq!((d[0] - expected).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rayleigh_limit_for_small_dielectric_sphere() {
        // Q_sca → (8/3) x⁴ |(m²−1)/(m²+2)|² as x → 0.
        let m = Complex64::new(1.5, 0.0);
        let stack = homogeneous(m, 1.0);
        let wl = 600.0;
        let x = size_parameter(1.0, wl, 1.0);
        let q = MieKernel.solve(&stack, wl, 1.0).unwrap();
        let lorentz = (m * m - 1.0) / (m * m + 2.0);
        let rayleigh = 8.0 / 3.0 * x.powi(4) * lorentz.norm_sqr();
        assert_relative_eq!(q.scattering, rayleigh, max_relative = 1e-3);
        assert_abs_diff_eq!(q.absorption, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_small_absorbing_sphere_matches_dipole_absorption() {
        // Q_abs → 4x Im((ε−1)/(ε+2)).
        let eps = Complex64::new(-2.0, 0.5);
        let stack = LayerStack::sphere(eps, 0.5);
        let wl = 500.0;
        let x = size_parameter(0.5, wl, 1.0);
        let q = MieKernel.solve(&stack, wl, 1.0).unwrap();
        let expected = 4.0 * x * ((eps - 1.0) / (eps + 2.0)).im;
        assert_relative_eq!(q.absorption, expected, max_relative = 1e-3);
    }

    #[test]
    fn test_large_dielectric_sphere_approaches_extinction_paradox() {
        let stack = homogeneous(Complex64::new(1.33, 1e-3), 12000.0);
        let q = MieKernel.solve(&stack, 500.0, 1.0).unwrap();
        assert!((q.extinction - 2.0).abs() < 0.15, "Q_ext = {}", q.extinction);
    }

    #[test]
    fn test_size_parameter_at_multiples_of_pi() {
        // x = π and x = 2π, where ψ₀(x) vanishes. Bohren & Huffman BHMIE values.
        let stack = homogeneous(Complex64::new(1.5, 0.01), 100.0);
        let q = MieKernel.solve(&stack, 200.0, 1.0).unwrap();
        assert_relative_eq!(q.extinction, 3.437_239_205_797, max_relative = 1e-8);
        let q = MieKernel.solve(&stack, 100.0, 1.0).unwrap();
        assert_relative_eq!(q.extinction, 2.409_623_832_548, max_relative = 1e-8);
    }

    #[test]
    fn test_tiny_size_parameter_gives_zero() {
        let stack = homogeneous(Complex64::new(1.5, 0.1), 1.0e-8);
        assert_eq!(MieKernel.solve(&stack, 500.0, 1.0).unwrap(), MieEfficiencies::default());
    }

    #[test]
    fn test_shell_of_identical_material_equals_solid_sphere() {
        let eps = Complex64::new(-9.0, 0.3);
        let solid = LayerStack::sphere(eps, 25.0);
        let shelled = LayerStack::new(vec![
            ShellLayer { epsilon: eps, outer_radius: [10.0, 10.0] },
            ShellLayer { epsilon: eps, outer_radius: [25.0, 25.0] },
        ]);
        let a = MieKernel.solve(&solid, 520.0, 1.33).unwrap();
        let b = MieKernel.solve(&shelled, 520.0, 1.33).unwrap();
        assert_relative_eq!(a.extinction, b.extinction, max_relative = 1e-9);
        assert_relative_eq!(a.scattering, b.scattering, max_relative = 1e-9);
        assert_relative_eq!(a.backscattering, b.backscattering, max_relative = 1e-8);
    }

    #[test]
    fn test_medium_matched_sphere_is_invisible() {
        let n_medium = 1.45;
        let stack = homogeneous(Complex64::new(n_medium, 0.0), 40.0);
        let q = MieKernel.solve(&stack, 600.0, n_medium).unwrap();
        assert_abs_diff_eq!(q.extinction, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.scattering, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_small_particles_scatter_symmetrically() {
        let stack = homogeneous(Complex64::new(1.5, 0.0), 5.0);
        let q = MieKernel.solve(&stack, 700.0, 1.0).unwrap();
        assert_abs_diff_eq!(q.asymmetry(), 0.0, epsilon = 1e-3);
        assert_relative_eq!(q.albedo(), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_strongly_absorbing_thick_core_is_rejected() {
        let stack = homogeneous(Complex64::new(0.2, 4.0), 2000.0);
        let err = MieKernel.solve(&stack, 300.0, 1.0).unwrap_err();
        assert!(matches!(err, KernelError::Unstable { boundary: 1, .. }));
    }
}
