//! Built-in kernels: one `BuiltinKernel` per model type.
//!
//! `FamilyKernel` is the closed family tag of a kernel. Its single populated
//! slot holds the two host helpers monomorphized for the model, so a kernel
//! forwards exactly the entry points of its own family and fails the others
//! the same way the `XCKernel` defaults do.

use std::fmt;
use std::sync::Arc;

use control::Control;
use enum_as_inner::EnumAsInner;
use tracing::debug;

use crate::device::{DeviceBackend, DeviceBuffer, HostDevice, Stream};
use crate::error::{Result, XCError};
use crate::helpers::{self, GgaExcFn, GgaExcVxcFn, LdaExcFn, LdaExcVxcFn, MggaExcFn, MggaExcVxcFn};
use crate::kernel::{unsupported, Capabilities, XCKernel};
use crate::spin::Spin;
use crate::traits::{BuiltinModel, GgaKernel, KernelTraits, LdaKernel, MggaKernel, XCFamily};

#[derive(Clone, Copy)]
pub struct LdaEntry {
    pub exc: LdaExcFn,
    pub exc_vxc: LdaExcVxcFn,
}

#[derive(Clone, Copy)]
pub struct GgaEntry {
    pub exc: GgaExcFn,
    pub exc_vxc: GgaExcVxcFn,
}

#[derive(Clone, Copy)]
pub struct MggaEntry {
    pub exc: MggaExcFn,
    pub exc_vxc: MggaExcVxcFn,
}

#[derive(Clone, Copy, EnumAsInner)]
pub enum FamilyKernel {
    Lda(LdaEntry),
    Gga(GgaEntry),
    Mgga(MggaEntry),
}

impl FamilyKernel {
    pub fn lda<K: LdaKernel>() -> Self {
        FamilyKernel::Lda(LdaEntry {
            exc: helpers::lda::host_eval_exc_helper::<K>,
            exc_vxc: helpers::lda::host_eval_exc_vxc_helper::<K>,
        })
    }

    pub fn gga<K: GgaKernel>() -> Self {
        FamilyKernel::Gga(GgaEntry {
            exc: helpers::gga::host_eval_exc_helper::<K>,
            exc_vxc: helpers::gga::host_eval_exc_vxc_helper::<K>,
        })
    }

    pub fn mgga<K: MggaKernel>() -> Self {
        FamilyKernel::Mgga(MggaEntry {
            exc: helpers::mgga::host_eval_exc_helper::<K>,
            exc_vxc: helpers::mgga::host_eval_exc_vxc_helper::<K>,
        })
    }

    pub fn family(&self) -> XCFamily {
        match self {
            FamilyKernel::Lda(_) => XCFamily::LDA,
            FamilyKernel::Gga(_) => XCFamily::GGA,
            FamilyKernel::Mgga(_) => XCFamily::MetaGGA,
        }
    }
}

impl fmt::Debug for FamilyKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FamilyKernel({})", self.family())
    }
}

/// Classification values copied out of a model's `KernelTraits`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelInfo {
    pub name: &'static str,
    pub is_lda: bool,
    pub is_gga: bool,
    pub is_mgga: bool,
    pub is_hyb: bool,
    pub exx_coeff: f64,
}

impl KernelInfo {
    pub fn of<K: KernelTraits>() -> Self {
        KernelInfo {
            name: K::NAME,
            is_lda: K::IS_LDA,
            is_gga: K::IS_GGA,
            is_mgga: K::IS_MGGA,
            is_hyb: K::IS_HYB,
            exx_coeff: K::EXX_COEFF,
        }
    }

    /// The single family selected by the flags.
    pub fn family(&self) -> Result<XCFamily> {
        let flagged: Vec<XCFamily> = [
            (self.is_lda, XCFamily::LDA),
            (self.is_gga, XCFamily::GGA),
            (self.is_mgga, XCFamily::MetaGGA),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, family)| *family)
        .collect();

        match flagged.as_slice() {
            [family] => Ok(*family),
            [] => Err(self.misconfigured("no family flag is set".to_string())),
            _ => Err(self.misconfigured(format!("several family flags are set: {:?}", flagged))),
        }
    }

    fn misconfigured(&self, reason: String) -> XCError {
        XCError::TraitMisconfigured {
            model: self.name,
            reason,
        }
    }
}

/// Concrete kernel bound to one model type.
#[derive(Debug, Clone)]
pub struct BuiltinKernel {
    polar: Spin,
    info: KernelInfo,
    family: FamilyKernel,
    device: Option<Arc<dyn DeviceBackend>>,
}

impl BuiltinKernel {
    /// Builds the kernel of model `K`.
    ///
    /// Fails with `TraitMisconfigured` unless exactly one family flag of `K`
    /// is set and it names the family `K` is bound to, or when `K` is a
    /// hybrid without exact exchange.
    pub fn new<K: BuiltinModel>(polar: Spin) -> Result<Self> {
        let info = KernelInfo::of::<K>();
        let family = K::family_kernel();

        let flagged = info.family()?;

        if flagged != family.family() {
            return Err(info.misconfigured(format!(
                "classified as {} but bound to {} helpers",
                flagged,
                family.family()
            )));
        }

        if info.is_hyb && info.exx_coeff == 0.0 {
            return Err(info.misconfigured("hybrid with a zero exact-exchange fraction".to_string()));
        }

        debug!(
            kernel = info.name,
            family = %flagged,
            polar = %polar,
            hyb = info.is_hyb,
            "built xc kernel"
        );

        Ok(BuiltinKernel {
            polar,
            info,
            family,
            device: None,
        })
    }

    /// Builds the kernel of model `K` with the spin scheme of `control`,
    /// attaching a `HostDevice` when `xc_device` is set.
    pub fn from_control<K: BuiltinModel>(control: &Control) -> Result<Self> {
        let kernel = BuiltinKernel::new::<K>(Spin::from(control))?;

        if control.get_xc_device() {
            Ok(kernel.with_device(Arc::new(HostDevice)))
        } else {
            Ok(kernel)
        }
    }

    /// Attaches a device backend, enabling the device entry points.
    pub fn with_device(mut self, backend: Arc<dyn DeviceBackend>) -> Self {
        debug!(kernel = self.info.name, backend = backend.name(), "attached device backend");

        self.device = Some(backend);
        self
    }

    pub fn info(&self) -> &KernelInfo {
        &self.info
    }

    pub fn family_kernel(&self) -> &FamilyKernel {
        &self.family
    }

    fn lda(&self, op: &'static str) -> Result<LdaEntry> {
        self.family
            .as_lda()
            .copied()
            .ok_or_else(|| unsupported(self.info.name, op, XCFamily::LDA))
    }

    fn gga(&self, op: &'static str) -> Result<GgaEntry> {
        self.family
            .as_gga()
            .copied()
            .ok_or_else(|| unsupported(self.info.name, op, XCFamily::GGA))
    }

    fn mgga(&self, op: &'static str) -> Result<MggaEntry> {
        self.family
            .as_mgga()
            .copied()
            .ok_or_else(|| unsupported(self.info.name, op, XCFamily::MetaGGA))
    }

    fn device(&self) -> Result<&Arc<dyn DeviceBackend>> {
        self.device.as_ref().ok_or(XCError::DeviceUnavailable {
            kernel: self.info.name,
        })
    }

    fn launch(&self, stream: &Stream, job: impl FnOnce() -> Result<()> + Send + 'static) -> Result<()> {
        self.device()?.launch(stream, Box::new(job))
    }

    /// Runs `submit` on a private stream and waits for it.
    fn blocking(&self, submit: impl FnOnce(&Stream) -> Result<()>) -> Result<()> {
        let stream = self.device()?.create_stream()?;

        submit(&stream)?;

        stream.synchronize()
    }
}

#[allow(clippy::too_many_arguments)]
impl XCKernel for BuiltinKernel {
    fn name(&self) -> &'static str {
        self.info.name
    }

    fn family(&self) -> XCFamily {
        self.family.family()
    }

    fn is_lda(&self) -> bool {
        self.info.is_lda
    }

    fn is_gga(&self) -> bool {
        self.info.is_gga
    }

    fn is_mgga(&self) -> bool {
        self.info.is_mgga
    }

    fn is_hyb(&self) -> bool {
        self.info.is_hyb
    }

    fn hyb_exx(&self) -> f64 {
        if self.info.is_hyb {
            self.info.exx_coeff
        } else {
            0.0
        }
    }

    fn polar(&self) -> Spin {
        self.polar
    }

    fn capabilities(&self) -> Capabilities {
        let device = self.device.is_some();

        Capabilities {
            exc: true,
            exc_vxc: true,
            device,
            device_async: device,
        }
    }

    // LDA interface

    fn eval_exc_lda(&self, npts: usize, rho: &[f64], exc: &mut [f64]) -> Result<()> {
        (self.lda("eval_exc")?.exc)(self.polar, npts, rho, exc)
    }

    fn eval_exc_vxc_lda(&self, npts: usize, rho: &[f64], exc: &mut [f64], vrho: &mut [f64]) -> Result<()> {
        (self.lda("eval_exc_vxc")?.exc_vxc)(self.polar, npts, rho, exc, vrho)
    }

    // GGA interface

    fn eval_exc_gga(&self, npts: usize, rho: &[f64], sigma: &[f64], exc: &mut [f64]) -> Result<()> {
        (self.gga("eval_exc")?.exc)(self.polar, npts, rho, sigma, exc)
    }

    fn eval_exc_vxc_gga(
        &self,
        npts: usize,
        rho: &[f64],
        sigma: &[f64],
        exc: &mut [f64],
        vrho: &mut [f64],
        vsigma: &mut [f64],
    ) -> Result<()> {
        (self.gga("eval_exc_vxc")?.exc_vxc)(self.polar, npts, rho, sigma, exc, vrho, vsigma)
    }

    // MGGA interface

    fn eval_exc_mgga(
        &self,
        npts: usize,
        rho: &[f64],
        sigma: &[f64],
        lapl: &[f64],
        tau: &[f64],
        exc: &mut [f64],
    ) -> Result<()> {
        (self.mgga("eval_exc")?.exc)(self.polar, npts, rho, sigma, lapl, tau, exc)
    }

    fn eval_exc_vxc_mgga(
        &self,
        npts: usize,
        rho: &[f64],
        sigma: &[f64],
        lapl: &[f64],
        tau: &[f64],
        exc: &mut [f64],
        vrho: &mut [f64],
        vsigma: &mut [f64],
        vlapl: &mut [f64],
        vtau: &mut [f64],
    ) -> Result<()> {
        (self.mgga("eval_exc_vxc")?.exc_vxc)(
            self.polar, npts, rho, sigma, lapl, tau, exc, vrho, vsigma, vlapl, vtau,
        )
    }

    // LDA device interface

    fn eval_exc_lda_device(&self, npts: usize, rho: &DeviceBuffer, exc: &DeviceBuffer) -> Result<()> {
        self.lda("eval_exc_device")?;

        self.blocking(|stream| self.eval_exc_lda_device_async(npts, rho, exc, stream))
    }

    fn eval_exc_vxc_lda_device(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
    ) -> Result<()> {
        self.lda("eval_exc_vxc_device")?;

        self.blocking(|stream| self.eval_exc_vxc_lda_device_async(npts, rho, exc, vrho, stream))
    }

    fn eval_exc_lda_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        exc: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.lda("eval_exc_device_async")?.exc;
        let polar = self.polar;
        let (rho, exc) = (rho.clone(), exc.clone());

        self.launch(stream, move || {
            let rho_h = rho.to_host();
            let mut exc_h = exc.to_host();

            f(polar, npts, &rho_h, &mut exc_h)?;

            exc.store(exc_h);

            Ok(())
        })
    }

    fn eval_exc_vxc_lda_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.lda("eval_exc_vxc_device_async")?.exc_vxc;
        let polar = self.polar;
        let (rho, exc, vrho) = (rho.clone(), exc.clone(), vrho.clone());

        self.launch(stream, move || {
            let rho_h = rho.to_host();
            let mut exc_h = exc.to_host();
            let mut vrho_h = vrho.to_host();

            f(polar, npts, &rho_h, &mut exc_h, &mut vrho_h)?;

            exc.store(exc_h);
            vrho.store(vrho_h);

            Ok(())
        })
    }

    // GGA device interface

    fn eval_exc_gga_device(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        exc: &DeviceBuffer,
    ) -> Result<()> {
        self.gga("eval_exc_device")?;

        self.blocking(|stream| self.eval_exc_gga_device_async(npts, rho, sigma, exc, stream))
    }

    fn eval_exc_vxc_gga_device(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
        vsigma: &DeviceBuffer,
    ) -> Result<()> {
        self.gga("eval_exc_vxc_device")?;

        self.blocking(|stream| {
            self.eval_exc_vxc_gga_device_async(npts, rho, sigma, exc, vrho, vsigma, stream)
        })
    }

    fn eval_exc_gga_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        exc: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.gga("eval_exc_device_async")?.exc;
        let polar = self.polar;
        let (rho, sigma, exc) = (rho.clone(), sigma.clone(), exc.clone());

        self.launch(stream, move || {
            let rho_h = rho.to_host();
            let sigma_h = sigma.to_host();
            let mut exc_h = exc.to_host();

            f(polar, npts, &rho_h, &sigma_h, &mut exc_h)?;

            exc.store(exc_h);

            Ok(())
        })
    }

    fn eval_exc_vxc_gga_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
        vsigma: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.gga("eval_exc_vxc_device_async")?.exc_vxc;
        let polar = self.polar;
        let (rho, sigma) = (rho.clone(), sigma.clone());
        let (exc, vrho, vsigma) = (exc.clone(), vrho.clone(), vsigma.clone());

        self.launch(stream, move || {
            let rho_h = rho.to_host();
            let sigma_h = sigma.to_host();
            let mut exc_h = exc.to_host();
            let mut vrho_h = vrho.to_host();
            let mut vsigma_h = vsigma.to_host();

            f(polar, npts, &rho_h, &sigma_h, &mut exc_h, &mut vrho_h, &mut vsigma_h)?;

            exc.store(exc_h);
            vrho.store(vrho_h);
            vsigma.store(vsigma_h);

            Ok(())
        })
    }

    // MGGA device interface

    fn eval_exc_mgga_device(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        lapl: &DeviceBuffer,
        tau: &DeviceBuffer,
        exc: &DeviceBuffer,
    ) -> Result<()> {
        self.mgga("eval_exc_device")?;

        self.blocking(|stream| {
            self.eval_exc_mgga_device_async(npts, rho, sigma, lapl, tau, exc, stream)
        })
    }

    fn eval_exc_vxc_mgga_device(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        lapl: &DeviceBuffer,
        tau: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
        vsigma: &DeviceBuffer,
        vlapl: &DeviceBuffer,
        vtau: &DeviceBuffer,
    ) -> Result<()> {
        self.mgga("eval_exc_vxc_device")?;

        self.blocking(|stream| {
            self.eval_exc_vxc_mgga_device_async(
                npts, rho, sigma, lapl, tau, exc, vrho, vsigma, vlapl, vtau, stream,
            )
        })
    }

    fn eval_exc_mgga_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        lapl: &DeviceBuffer,
        tau: &DeviceBuffer,
        exc: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.mgga("eval_exc_device_async")?.exc;
        let polar = self.polar;
        let (rho, sigma, lapl, tau) = (rho.clone(), sigma.clone(), lapl.clone(), tau.clone());
        let exc = exc.clone();

        self.launch(stream, move || {
            let (rho_h, sigma_h) = (rho.to_host(), sigma.to_host());
            let (lapl_h, tau_h) = (lapl.to_host(), tau.to_host());
            let mut exc_h = exc.to_host();

            f(polar, npts, &rho_h, &sigma_h, &lapl_h, &tau_h, &mut exc_h)?;

            exc.store(exc_h);

            Ok(())
        })
    }

    fn eval_exc_vxc_mgga_device_async(
        &self,
        npts: usize,
        rho: &DeviceBuffer,
        sigma: &DeviceBuffer,
        lapl: &DeviceBuffer,
        tau: &DeviceBuffer,
        exc: &DeviceBuffer,
        vrho: &DeviceBuffer,
        vsigma: &DeviceBuffer,
        vlapl: &DeviceBuffer,
        vtau: &DeviceBuffer,
        stream: &Stream,
    ) -> Result<()> {
        let f = self.mgga("eval_exc_vxc_device_async")?.exc_vxc;
        let polar = self.polar;
        let (rho, sigma, lapl, tau) = (rho.clone(), sigma.clone(), lapl.clone(), tau.clone());
        let (exc, vrho, vsigma) = (exc.clone(), vrho.clone(), vsigma.clone());
        let (vlapl, vtau) = (vlapl.clone(), vtau.clone());

        self.launch(stream, move || {
            let (rho_h, sigma_h) = (rho.to_host(), sigma.to_host());
            let (lapl_h, tau_h) = (lapl.to_host(), tau.to_host());
            let (mut exc_h, mut vrho_h, mut vsigma_h) = (exc.to_host(), vrho.to_host(), vsigma.to_host());
            let (mut vlapl_h, mut vtau_h) = (vlapl.to_host(), vtau.to_host());

            f(
                polar,
                npts,
                &rho_h,
                &sigma_h,
                &lapl_h,
                &tau_h,
                &mut exc_h,
                &mut vrho_h,
                &mut vsigma_h,
                &mut vlapl_h,
                &mut vtau_h,
            )?;

            exc.store(exc_h);
            vrho.store(vrho_h);
            vsigma.store(vsigma_h);
            vlapl.store(vlapl_h);
            vtau.store(vtau_h);

            Ok(())
        })
    }
}
