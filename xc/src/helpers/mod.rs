//! Host helpers: lift the point-wise formulas of one model to flat buffers.
//!
//! Buffers are interleaved per point. With `n = polar.nspin()` and
//! `m = polar.nsigma()`, point `i` reads `rho[n*i..n*i+n]`,
//! `sigma[m*i..m*i+m]`, `lapl`/`tau` like `rho`, and writes `exc[i]` plus the
//! potentials in the layout of the matching input.

use crate::error::{Result, XCError};
use crate::spin::Spin;

pub mod gga;
pub mod lda;
pub mod mgga;

pub type LdaExcFn = fn(Spin, usize, &[f64], &mut [f64]) -> Result<()>;
pub type LdaExcVxcFn = fn(Spin, usize, &[f64], &mut [f64], &mut [f64]) -> Result<()>;

pub type GgaExcFn = fn(Spin, usize, &[f64], &[f64], &mut [f64]) -> Result<()>;
pub type GgaExcVxcFn =
    fn(Spin, usize, &[f64], &[f64], &mut [f64], &mut [f64], &mut [f64]) -> Result<()>;

pub type MggaExcFn = fn(Spin, usize, &[f64], &[f64], &[f64], &[f64], &mut [f64]) -> Result<()>;
pub type MggaExcVxcFn = fn(
    Spin,
    usize,
    &[f64],
    &[f64],
    &[f64],
    &[f64],
    &mut [f64],
    &mut [f64],
    &mut [f64],
    &mut [f64],
    &mut [f64],
) -> Result<()>;

/// Fails with `BufferSize` unless `len >= npts * width`. A product that
/// does not fit in `usize` is reported as `expected == usize::MAX`.
pub(crate) fn check_len(name: &'static str, len: usize, npts: usize, width: usize) -> Result<()> {
    let expected = npts.checked_mul(width).unwrap_or(usize::MAX);

    if len < expected {
        return Err(XCError::BufferSize {
            name,
            len,
            expected,
            npts,
        });
    }

    Ok(())
}

#[inline]
pub(crate) fn pair(v: &[f64]) -> [f64; 2] {
    [v[0].max(0.0), v[1].max(0.0)]
}

#[inline]
pub(crate) fn triple(v: &[f64]) -> [f64; 3] {
    [v[0].max(0.0), v[1], v[2].max(0.0)]
}

#[cfg(test)]
mod tests;
