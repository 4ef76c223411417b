//! The abstract XC kernel.
//!
//! Every evaluation entry point fails with `XCError::Unsupported` unless the
//! concrete kernel overrides it for its own functional family. Outputs are
//! written only by a successful call.

use std::fmt;

use crate::device::{DeviceBuffer, Stream};
use crate::error::{Result, XCError};
use crate::spin::Spin;
use crate::traits::XCFamily;

/// Evaluation modes a kernel can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub exc: bool,
    pub exc_vxc: bool,
    pub device: bool,
    pub device_async: bool,
}

pub(crate) fn unsupported(kernel: &'static str, op: &'static str, requested: XCFamily) -> XCError {
    XCError::Unsupported {
        op,
        requested,
        kernel,
    }
}

/// The core interface for any XC functional kernel.
/// Implementations are immutable after construction and thread-safe.
#[allow(clippy::too_many_arguments)]
pub trait XCKernel: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn family(&self) -> XCFamily;

    fn is_lda(&self) -> bool;
    fn is_gga(&self) -> bool;
    fn is_mgga(&self) -> bool;
    fn is_hyb(&self) -> bool;

    /// Fraction of exact exchange; 0 for non-hybrid kernels.
    fn hyb_exx(&self) -> f64;

    fn polar(&self) -> Spin;

    #[inline]
    fn is_polarized(&self) -> bool {
        self.polar() == Spin::Polarized
    }

    fn capabilities(&self) -> Capabilities;

    fn supports_device(&self) -> bool {
        self.capabilities().device
    }

    // LDA interface

    fn eval_exc_lda(&self, _npts: usize, _rho: &[f64], _exc: &mut [f64]) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc", XCFamily::LDA))
    }

    fn eval_exc_vxc_lda(
        &self,
        _npts: usize,
        _rho: &[f64],
        _exc: &mut [f64],
        _vrho: &mut [f64],
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc", XCFamily::LDA))
    }

    // GGA interface

    fn eval_exc_gga(&self, _npts: usize, _rho: &[f64], _sigma: &[f64], _exc: &mut [f64]) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc", XCFamily::GGA))
    }

    fn eval_exc_vxc_gga(
        &self,
        _npts: usize,
        _rho: &[f64],
        _sigma: &[f64],
        _exc: &mut [f64],
        _vrho: &mut [f64],
        _vsigma: &mut [f64],
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc", XCFamily::GGA))
    }

    // MGGA interface

    fn eval_exc_mgga(
        &self,
        _npts: usize,
        _rho: &[f64],
        _sigma: &[f64],
        _lapl: &[f64],
        _tau: &[f64],
        _exc: &mut [f64],
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc", XCFamily::MetaGGA))
    }

    fn eval_exc_vxc_mgga(
        &self,
        _npts: usize,
        _rho: &[f64],
        _sigma: &[f64],
        _lapl: &[f64],
        _tau: &[f64],
        _exc: &mut [f64],
        _vrho: &mut [f64],
        _vsigma: &mut [f64],
        _vlapl: &mut [f64],
        _vtau: &mut [f64],
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc", XCFamily::MetaGGA))
    }

    // LDA device interface

    fn eval_exc_lda_device(&self, _npts: usize, _rho: &DeviceBuffer, _exc: &DeviceBuffer) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device", XCFamily::LDA))
    }

    fn eval_exc_vxc_lda_device(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device", XCFamily::LDA))
    }

    fn eval_exc_lda_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device_async", XCFamily::LDA))
    }

    fn eval_exc_vxc_lda_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device_async", XCFamily::LDA))
    }

    // GGA device interface

    fn eval_exc_gga_device(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _exc: &DeviceBuffer,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device", XCFamily::GGA))
    }

    fn eval_exc_vxc_gga_device(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
        _vsigma: &DeviceBuffer,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device", XCFamily::GGA))
    }

    fn eval_exc_gga_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device_async", XCFamily::GGA))
    }

    fn eval_exc_vxc_gga_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
        _vsigma: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device_async", XCFamily::GGA))
    }

    // MGGA device interface

    fn eval_exc_mgga_device(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _lapl: &DeviceBuffer,
        _tau: &DeviceBuffer,
        _exc: &DeviceBuffer,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device", XCFamily::MetaGGA))
    }

    fn eval_exc_vxc_mgga_device(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _lapl: &DeviceBuffer,
        _tau: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
        _vsigma: &DeviceBuffer,
        _vlapl: &DeviceBuffer,
        _vtau: &DeviceBuffer,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device", XCFamily::MetaGGA))
    }

    fn eval_exc_mgga_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _lapl: &DeviceBuffer,
        _tau: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_device_async", XCFamily::MetaGGA))
    }

    fn eval_exc_vxc_mgga_device_async(
        &self,
        _npts: usize,
        _rho: &DeviceBuffer,
        _sigma: &DeviceBuffer,
        _lapl: &DeviceBuffer,
        _tau: &DeviceBuffer,
        _exc: &DeviceBuffer,
        _vrho: &DeviceBuffer,
        _vsigma: &DeviceBuffer,
        _vlapl: &DeviceBuffer,
        _vtau: &DeviceBuffer,
        _stream: &Stream,
    ) -> Result<()> {
        Err(unsupported(self.name(), "eval_exc_vxc_device_async", XCFamily::MetaGGA))
    }
}
