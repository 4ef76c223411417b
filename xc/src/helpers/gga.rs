use itertools::multizip;

use super::{check_len, pair, triple};
use crate::error::Result;
use crate::spin::Spin;
use crate::traits::GgaKernel;

pub fn host_eval_exc_helper<K: GgaKernel>(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    sigma: &[f64],
    exc: &mut [f64],
) -> Result<()> {
    let ns = polar.nspin();
    let nsig = polar.nsigma();

    check_len("rho", rho.len(), npts, ns)?;
    check_len("sigma", sigma.len(), npts, nsig)?;
    check_len("exc", exc.len(), npts, 1)?;

    let rho = &rho[..npts * ns];
    let sigma = &sigma[..npts * nsig];
    let exc = &mut exc[..npts];

    match polar {
        Spin::Unpolarized => {
            for (r, s, e) in multizip((rho.iter(), sigma.iter(), exc.iter_mut())) {
                *e = if *r <= K::DENS_TOL {
                    0.0
                } else {
                    K::eval_exc_unpolar(*r, s.max(0.0))
                };
            }
        }

        Spin::Polarized => {
            for (r, s, e) in multizip((rho.chunks_exact(2), sigma.chunks_exact(3), exc.iter_mut())) {
                let r = pair(r);

                *e = if r[0] + r[1] <= K::DENS_TOL {
                    0.0
                } else {
                    K::eval_exc_polar(r, triple(s))
                };
            }
        }
    }

    Ok(())
}

pub fn host_eval_exc_vxc_helper<K: GgaKernel>(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    sigma: &[f64],
    exc: &mut [f64],
    vrho: &mut [f64],
    vsigma: &mut [f64],
) -> Result<()> {
    let ns = polar.nspin();
    let nsig = polar.nsigma();

    check_len("rho", rho.len(), npts, ns)?;
    check_len("sigma", sigma.len(), npts, nsig)?;
    check_len("exc", exc.len(), npts, 1)?;
    check_len("vrho", vrho.len(), npts, ns)?;
    check_len("vsigma", vsigma.len(), npts, nsig)?;

    let rho = &rho[..npts * ns];
    let sigma = &sigma[..npts * nsig];
    let exc = &mut exc[..npts];
    let vrho = &mut vrho[..npts * ns];
    let vsigma = &mut vsigma[..npts * nsig];

    match polar {
        Spin::Unpolarized => {
            for (r, s, e, vr, vs) in multizip((
                rho.iter(),
                sigma.iter(),
                exc.iter_mut(),
                vrho.iter_mut(),
                vsigma.iter_mut(),
            )) {
                let (eps, v1, v2) = if *r <= K::DENS_TOL {
                    (0.0, 0.0, 0.0)
                } else {
                    K::eval_exc_vxc_unpolar(*r, s.max(0.0))
                };

                *e = eps;
                *vr = v1;
                *vs = v2;
            }
        }

        Spin::Polarized => {
            for (r, s, e, vr, vs) in multizip((
                rho.chunks_exact(2),
                sigma.chunks_exact(3),
                exc.iter_mut(),
                vrho.chunks_exact_mut(2),
                vsigma.chunks_exact_mut(3),
            )) {
                let r = pair(r);

                let (eps, v1, v2) = if r[0] + r[1] <= K::DENS_TOL {
                    (0.0, [0.0; 2], [0.0; 3])
                } else {
                    K::eval_exc_vxc_polar(r, triple(s))
                };

                *e = eps;
                vr.copy_from_slice(&v1);
                vs.copy_from_slice(&v2);
            }
        }
    }

    Ok(())
}
