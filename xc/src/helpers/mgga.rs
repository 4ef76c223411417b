use super::{check_len, pair, triple};
use crate::error::Result;
use crate::spin::Spin;
use crate::traits::{MggaKernel, MggaPoint};

fn check_inputs(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    sigma: &[f64],
    lapl: &[f64],
    tau: &[f64],
    exc: &[f64],
) -> Result<()> {
    let ns = polar.nspin();

    check_len("rho", rho.len(), npts, ns)?;
    check_len("sigma", sigma.len(), npts, polar.nsigma())?;
    check_len("lapl", lapl.len(), npts, ns)?;
    check_len("tau", tau.len(), npts, ns)?;
    check_len("exc", exc.len(), npts, 1)
}

#[inline]
fn unpolar_point<K: MggaKernel>(rho: f64, sigma: f64, lapl: f64, tau: f64) -> MggaPoint<1, 1> {
    if rho <= K::DENS_TOL {
        MggaPoint::zero()
    } else {
        K::eval_exc_vxc_unpolar(rho, sigma.max(0.0), lapl, tau.max(0.0))
    }
}

#[inline]
fn polar_point<K: MggaKernel>(rho: &[f64], sigma: &[f64], lapl: &[f64], tau: &[f64]) -> MggaPoint<2, 3> {
    let r = pair(rho);

    if r[0] + r[1] <= K::DENS_TOL {
        MggaPoint::zero()
    } else {
        K::eval_exc_vxc_polar(r, triple(sigma), [lapl[0], lapl[1]], pair(tau))
    }
}

pub fn host_eval_exc_helper<K: MggaKernel>(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    sigma: &[f64],
    lapl: &[f64],
    tau: &[f64],
    exc: &mut [f64],
) -> Result<()> {
    check_inputs(polar, npts, rho, sigma, lapl, tau, exc)?;

    for (i, e) in exc[..npts].iter_mut().enumerate() {
        *e = match polar {
            Spin::Unpolarized => unpolar_point::<K>(rho[i], sigma[i], lapl[i], tau[i]).eps,
            Spin::Polarized => {
                polar_point::<K>(
                    &rho[2 * i..2 * i + 2],
                    &sigma[3 * i..3 * i + 3],
                    &lapl[2 * i..2 * i + 2],
                    &tau[2 * i..2 * i + 2],
                )
                .eps
            }
        };
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn host_eval_exc_vxc_helper<K: MggaKernel>(
    polar: Spin,
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
    check_inputs(polar, npts, rho, sigma, lapl, tau, exc)?;

    let ns = polar.nspin();
    let nsig = polar.nsigma();

    check_len("vrho", vrho.len(), npts, ns)?;
    check_len("vsigma", vsigma.len(), npts, nsig)?;
    check_len("vlapl", vlapl.len(), npts, ns)?;
    check_len("vtau", vtau.len(), npts, ns)?;

    for i in 0..npts {
        let (a, b) = (ns * i, ns * i + ns);
        let (c, d) = (nsig * i, nsig * i + nsig);

        match polar {
            Spin::Unpolarized => {
                let p = unpolar_point::<K>(rho[i], sigma[i], lapl[i], tau[i]);

                exc[i] = p.eps;
                vrho[i] = p.vrho[0];
                vsigma[i] = p.vsigma[0];
                vlapl[i] = p.vlapl[0];
                vtau[i] = p.vtau[0];
            }

            Spin::Polarized => {
                let p = polar_point::<K>(&rho[a..b], &sigma[c..d], &lapl[a..b], &tau[a..b]);

                exc[i] = p.eps;
                vrho[a..b].copy_from_slice(&p.vrho);
                vsigma[c..d].copy_from_slice(&p.vsigma);
                vlapl[a..b].copy_from_slice(&p.vlapl);
                vtau[a..b].copy_from_slice(&p.vtau);
            }
        }
    }

    Ok(())
}
