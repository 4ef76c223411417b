//! Classification traits and point-wise formulas of the XC models.
//!
//! A model is a zero-sized type. `KernelTraits` carries its compile-time
//! classification; exactly one of the family traits (`LdaKernel`,
//! `GgaKernel`, `MggaKernel`) carries its formulas at a single grid point.
//! The host helpers in `crate::helpers` lift those formulas to whole buffers.

use std::fmt;

use dwconsts::EPS15;

/// Enum representing the family of an XC functional.
/// This determines which evaluation entry points are valid to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XCFamily {
    /// Local Density Approximation
    LDA,
    /// Generalized Gradient Approximation
    GGA,
    /// Meta-Generalized Gradient Approximation
    MetaGGA,
}

impl fmt::Display for XCFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            XCFamily::LDA => "LDA",
            XCFamily::GGA => "GGA",
            XCFamily::MetaGGA => "meta-GGA",
        };

        f.write_str(s)
    }
}

/// Compile-time classification of a model.
///
/// Exactly one of `IS_LDA`, `IS_GGA`, `IS_MGGA` must be true. This is checked
/// when a `BuiltinKernel` is built from the model.
pub trait KernelTraits: 'static {
    const NAME: &'static str;

    const IS_LDA: bool = false;
    const IS_GGA: bool = false;
    const IS_MGGA: bool = false;
    const IS_HYB: bool = false;

    /// Fraction of exact exchange mixed in; only meaningful when `IS_HYB`.
    const EXX_COEFF: f64 = 0.0;

    /// Points whose total density does not exceed this produce zero output.
    const DENS_TOL: f64 = EPS15;
}

/// Point-wise LDA formulas. Potentials are `d(rho * eps)/d(rho)`.
pub trait LdaKernel: KernelTraits {
    /// `rho -> (eps, vrho)`
    fn eval_exc_vxc_unpolar(rho: f64) -> (f64, f64);

    /// `[rho_a, rho_b] -> (eps, [vrho_a, vrho_b])`
    fn eval_exc_vxc_polar(rho: [f64; 2]) -> (f64, [f64; 2]);

    #[inline]
    fn eval_exc_unpolar(rho: f64) -> f64 {
        Self::eval_exc_vxc_unpolar(rho).0
    }

    #[inline]
    fn eval_exc_polar(rho: [f64; 2]) -> f64 {
        Self::eval_exc_vxc_polar(rho).0
    }
}

/// Point-wise GGA formulas in terms of `sigma = |grad rho|^2`.
pub trait GgaKernel: KernelTraits {
    /// `(rho, sigma) -> (eps, vrho, vsigma)`
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64) -> (f64, f64, f64);

    /// `([rho_a, rho_b], [sigma_aa, sigma_ab, sigma_bb]) -> (eps, vrho, vsigma)`
    fn eval_exc_vxc_polar(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]);

    #[inline]
    fn eval_exc_unpolar(rho: f64, sigma: f64) -> f64 {
        Self::eval_exc_vxc_unpolar(rho, sigma).0
    }

    #[inline]
    fn eval_exc_polar(rho: [f64; 2], sigma: [f64; 3]) -> f64 {
        Self::eval_exc_vxc_polar(rho, sigma).0
    }
}

/// Result of a meta-GGA evaluation at one point; `N` is the number of spin
/// channels and `M` the number of sigma components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MggaPoint<const N: usize, const M: usize> {
    pub eps: f64,
    pub vrho: [f64; N],
    pub vsigma: [f64; M],
    pub vlapl: [f64; N],
    pub vtau: [f64; N],
}

impl<const N: usize, const M: usize> MggaPoint<N, M> {
    pub fn zero() -> Self {
        MggaPoint {
            eps: 0.0,
            vrho: [0.0; N],
            vsigma: [0.0; M],
            vlapl: [0.0; N],
            vtau: [0.0; N],
        }
    }
}

/// Point-wise meta-GGA formulas in terms of density, `sigma`, the density
/// Laplacian and the kinetic-energy density `tau`.
pub trait MggaKernel: KernelTraits {
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64, lapl: f64, tau: f64) -> MggaPoint<1, 1>;

    fn eval_exc_vxc_polar(
        rho: [f64; 2],
        sigma: [f64; 3],
        lapl: [f64; 2],
        tau: [f64; 2],
    ) -> MggaPoint<2, 3>;

    #[inline]
    fn eval_exc_unpolar(rho: f64, sigma: f64, lapl: f64, tau: f64) -> f64 {
        Self::eval_exc_vxc_unpolar(rho, sigma, lapl, tau).eps
    }

    #[inline]
    fn eval_exc_polar(rho: [f64; 2], sigma: [f64; 3], lapl: [f64; 2], tau: [f64; 2]) -> f64 {
        Self::eval_exc_vxc_polar(rho, sigma, lapl, tau).eps
    }
}

/// Binds a model to the family slot of `BuiltinKernel`.
///
/// Implemented as one line per model, e.g.
/// `fn family_kernel() -> FamilyKernel { FamilyKernel::lda::<Self>() }`;
/// the constructor used there only exists for models implementing the
/// matching point-wise trait.
pub trait BuiltinModel: KernelTraits {
    fn family_kernel() -> crate::builtin::FamilyKernel;
}
