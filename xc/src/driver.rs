//! Driver for XC calculations.
//! Handles grid chunking, parallelization and energy integration.

use std::sync::Arc;

use control::Control;
use itertools::multizip;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::{Result, XCError};
use crate::helpers::check_len;
use crate::kernel::XCKernel;
use crate::traits::XCFamily;

/// Density inputs on the grid, interleaved per point as the kernels expect.
#[derive(Debug, Clone, Copy)]
pub struct XCInput<'a> {
    pub rho: &'a [f64],
    pub sigma: Option<&'a [f64]>,
    pub lapl: Option<&'a [f64]>,
    pub tau: Option<&'a [f64]>,
}

impl<'a> XCInput<'a> {
    pub fn lda(rho: &'a [f64]) -> Self {
        XCInput {
            rho,
            sigma: None,
            lapl: None,
            tau: None,
        }
    }

    pub fn gga(rho: &'a [f64], sigma: &'a [f64]) -> Self {
        XCInput {
            sigma: Some(sigma),
            ..XCInput::lda(rho)
        }
    }

    pub fn mgga(rho: &'a [f64], sigma: &'a [f64], lapl: &'a [f64], tau: &'a [f64]) -> Self {
        XCInput {
            rho,
            sigma: Some(sigma),
            lapl: Some(lapl),
            tau: Some(tau),
        }
    }
}

/// Output buffers. Without any potential buffer only `exc` is evaluated.
#[derive(Debug)]
pub struct XCOutput<'a> {
    pub exc: &'a mut [f64],
    pub vrho: Option<&'a mut [f64]>,
    pub vsigma: Option<&'a mut [f64]>,
    pub vlapl: Option<&'a mut [f64]>,
    pub vtau: Option<&'a mut [f64]>,
}

impl<'a> XCOutput<'a> {
    pub fn energy(exc: &'a mut [f64]) -> Self {
        XCOutput {
            exc,
            vrho: None,
            vsigma: None,
            vlapl: None,
            vtau: None,
        }
    }

    pub fn lda(exc: &'a mut [f64], vrho: &'a mut [f64]) -> Self {
        XCOutput {
            vrho: Some(vrho),
            ..XCOutput::energy(exc)
        }
    }

    pub fn gga(exc: &'a mut [f64], vrho: &'a mut [f64], vsigma: &'a mut [f64]) -> Self {
        XCOutput {
            vrho: Some(vrho),
            vsigma: Some(vsigma),
            ..XCOutput::energy(exc)
        }
    }

    pub fn mgga(
        exc: &'a mut [f64],
        vrho: &'a mut [f64],
        vsigma: &'a mut [f64],
        vlapl: &'a mut [f64],
        vtau: &'a mut [f64],
    ) -> Self {
        XCOutput {
            exc,
            vrho: Some(vrho),
            vsigma: Some(vsigma),
            vlapl: Some(vlapl),
            vtau: Some(vtau),
        }
    }

    pub fn is_energy_only(&self) -> bool {
        self.vrho.is_none() && self.vsigma.is_none() && self.vlapl.is_none() && self.vtau.is_none()
    }
}

/// Driver that executes an XC kernel on a grid.
#[derive(Debug, Clone)]
pub struct XCDriver {
    kernel: Arc<dyn XCKernel>,
    chunk_size: usize,
}

impl XCDriver {
    pub fn new(kernel: Arc<dyn XCKernel>) -> Self {
        XCDriver {
            kernel,
            chunk_size: control::DEFAULT_XC_CHUNK_SIZE,
        }
    }

    /// Number of grid points handed to the kernel per call; at least 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn from_control(kernel: Arc<dyn XCKernel>, control: &Control) -> Self {
        let driver = XCDriver::new(kernel).with_chunk_size(control.get_xc_chunk_size());

        debug!(
            kernel = driver.kernel.name(),
            family = %driver.kernel.family(),
            polar = %driver.kernel.polar(),
            chunk_size = driver.chunk_size,
            "xc driver ready"
        );

        driver
    }

    pub fn kernel(&self) -> &Arc<dyn XCKernel> {
        &self.kernel
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Evaluates the kernel on `npts` points.
    ///
    /// Every buffer is checked before any point is evaluated, so on error
    /// the outputs are left untouched. Chunks run in parallel; if any chunk
    /// fails, the error of one failing chunk is returned.
    pub fn compute(&self, npts: usize, input: &XCInput, output: &mut XCOutput) -> Result<()> {
        let family = self.kernel.family();
        let energy_only = output.is_energy_only();

        self.validate(npts, family, energy_only, input, output)?;

        if npts == 0 {
            return Ok(());
        }

        let polar = self.kernel.polar();
        let (ns, nsig) = (polar.nspin(), polar.nsigma());
        let cs = self.chunk_size;

        let inputs: Vec<XCInput> = multizip((
            input.rho[..npts * ns].chunks(cs.saturating_mul(ns)),
            split(input.sigma, npts, cs, nsig),
            split(input.lapl, npts, cs, ns),
            split(input.tau, npts, cs, ns),
        ))
        .map(|(rho, sigma, lapl, tau)| XCInput {
            rho,
            sigma,
            lapl,
            tau,
        })
        .collect();

        let outputs: Vec<XCOutput> = multizip((
            output.exc[..npts].chunks_mut(cs),
            split_mut(output.vrho.as_deref_mut(), npts, cs, ns),
            split_mut(output.vsigma.as_deref_mut(), npts, cs, nsig),
            split_mut(output.vlapl.as_deref_mut(), npts, cs, ns),
            split_mut(output.vtau.as_deref_mut(), npts, cs, ns),
        ))
        .map(|(exc, vrho, vsigma, vlapl, vtau)| XCOutput {
            exc,
            vrho,
            vsigma,
            vlapl,
            vtau,
        })
        .collect();

        trace!(npts, nchunks = inputs.len(), "xc driver dispatch");

        inputs
            .into_par_iter()
            .zip(outputs.into_par_iter())
            .try_for_each(|(x, mut y)| {
                let n = y.exc.len();

                trace!(n, "xc chunk");

                self.eval_chunk(n, family, energy_only, &x, &mut y)
            })
    }

    /// XC energy on the grid, `sum_i w_i * rho_i * exc_i`; the sum runs over
    /// the shortest of the three slices.
    pub fn integrate(weights: &[f64], rho_total: &[f64], exc: &[f64]) -> f64 {
        multizip((weights.iter(), rho_total.iter(), exc.iter()))
            .map(|(w, r, e)| w * r * e)
            .sum()
    }

    fn validate(
        &self,
        npts: usize,
        family: XCFamily,
        energy_only: bool,
        x: &XCInput,
        y: &XCOutput,
    ) -> Result<()> {
        let polar = self.kernel.polar();
        let (ns, nsig) = (polar.nspin(), polar.nsigma());

        let mut inputs = vec![("rho", Some(x.rho), ns)];
        let mut outputs = vec![("vrho", y.vrho.as_deref(), ns)];

        if family != XCFamily::LDA {
            inputs.push(("sigma", x.sigma, nsig));
            outputs.push(("vsigma", y.vsigma.as_deref(), nsig));
        }

        if family == XCFamily::MetaGGA {
            inputs.push(("lapl", x.lapl, ns));
            inputs.push(("tau", x.tau, ns));
            outputs.push(("vlapl", y.vlapl.as_deref(), ns));
            outputs.push(("vtau", y.vtau.as_deref(), ns));
        }

        if !energy_only {
            inputs.extend(outputs);
        }

        check_len("exc", y.exc.len(), npts, 1)?;

        for (name, buffer, width) in inputs {
            let buffer = required(buffer, name, family)?;

            check_len(name, buffer.len(), npts, width)?;
        }

        Ok(())
    }

    fn eval_chunk(
        &self,
        n: usize,
        family: XCFamily,
        energy_only: bool,
        x: &XCInput,
        y: &mut XCOutput,
    ) -> Result<()> {
        let k = &self.kernel;

        match family {
            XCFamily::LDA if energy_only => k.eval_exc_lda(n, x.rho, y.exc),

            XCFamily::LDA => {
                let vrho = required(y.vrho.as_deref_mut(), "vrho", family)?;

                k.eval_exc_vxc_lda(n, x.rho, y.exc, vrho)
            }

            XCFamily::GGA => {
                let sigma = required(x.sigma, "sigma", family)?;

                if energy_only {
                    return k.eval_exc_gga(n, x.rho, sigma, y.exc);
                }

                let vrho = required(y.vrho.as_deref_mut(), "vrho", family)?;
                let vsigma = required(y.vsigma.as_deref_mut(), "vsigma", family)?;

                k.eval_exc_vxc_gga(n, x.rho, sigma, y.exc, vrho, vsigma)
            }

            XCFamily::MetaGGA => {
                let sigma = required(x.sigma, "sigma", family)?;
                let lapl = required(x.lapl, "lapl", family)?;
                let tau = required(x.tau, "tau", family)?;

                if energy_only {
                    return k.eval_exc_mgga(n, x.rho, sigma, lapl, tau, y.exc);
                }

                let vrho = required(y.vrho.as_deref_mut(), "vrho", family)?;
                let vsigma = required(y.vsigma.as_deref_mut(), "vsigma", family)?;
                let vlapl = required(y.vlapl.as_deref_mut(), "vlapl", family)?;
                let vtau = required(y.vtau.as_deref_mut(), "vtau", family)?;

                k.eval_exc_vxc_mgga(n, x.rho, sigma, lapl, tau, y.exc, vrho, vsigma, vlapl, vtau)
            }
        }
    }
}

fn required<T>(buffer: Option<T>, name: &'static str, family: XCFamily) -> Result<T> {
    buffer.ok_or(XCError::MissingBuffer { name, family })
}

fn nchunks(npts: usize, cs: usize) -> usize {
    npts.div_ceil(cs)
}

// Buffers the kernel family does not read may be absent or short; they are
// passed on as `None`.

fn split(buffer: Option<&[f64]>, npts: usize, cs: usize, width: usize) -> Vec<Option<&[f64]>> {
    match buffer.and_then(|b| npts.checked_mul(width).and_then(|n| b.get(..n))) {
        Some(b) => b.chunks(cs.saturating_mul(width)).map(Some).collect(),
        None => vec![None; nchunks(npts, cs)],
    }
}

fn split_mut(
    buffer: Option<&mut [f64]>,
    npts: usize,
    cs: usize,
    width: usize,
) -> Vec<Option<&mut [f64]>> {
    match buffer.and_then(|b| npts.checked_mul(width).and_then(|n| b.get_mut(..n))) {
        Some(b) => b.chunks_mut(cs.saturating_mul(width)).map(Some).collect(),
        None => (0..nchunks(npts, cs)).map(|_| None).collect(),
    }
}

#[cfg(test)]
mod tests;
