//! Property-based checks of the kernel interface.

use std::sync::Arc;

use proptest::prelude::*;

use xc::{
    BuiltinKernel, DeviceBuffer, HostDevice, MVSExchange, PBECorrelation, PBEExchange, SlaterExchange, Spin, Stream,
    XCDriver, XCError, XCFamily, XCInput, XCKernel, XCOutput, PBE0, PW92, PZ81,
};

fn lda_kernels(polar: Spin) -> Vec<BuiltinKernel> {
    vec![
        BuiltinKernel::new::<SlaterExchange>(polar).unwrap(),
        BuiltinKernel::new::<PZ81>(polar).unwrap(),
        BuiltinKernel::new::<PW92>(polar).unwrap(),
    ]
}

fn all_kernels(polar: Spin) -> Vec<BuiltinKernel> {
    let mut kernels = lda_kernels(polar);

    kernels.push(BuiltinKernel::new::<PBEExchange>(polar).unwrap());
    kernels.push(BuiltinKernel::new::<PBECorrelation>(polar).unwrap());
    kernels.push(BuiltinKernel::new::<PBE0>(polar).unwrap());
    kernels.push(BuiltinKernel::new::<MVSExchange>(polar).unwrap());

    kernels
}

fn spin() -> impl Strategy<Value = Spin> {
    prop_oneof![Just(Spin::Unpolarized), Just(Spin::Polarized)]
}

const SENTINEL: f64 = -7.0;

/// Op names in the order `call_other_families` issues them per family.
const OPS: [&str; 6] = [
    "eval_exc",
    "eval_exc_vxc",
    "eval_exc_device",
    "eval_exc_vxc_device",
    "eval_exc_device_async",
    "eval_exc_vxc_device_async",
];

/// Calls every entry point of the families other than `k.family()` and
/// returns `(requested family, op, result)` per call. Output buffers start at
/// `SENTINEL` and must still hold it afterwards.
fn call_other_families(
    k: &dyn XCKernel,
    npts: usize,
) -> Vec<(XCFamily, &'static str, Result<(), XCError>)> {
    let polar = k.polar();
    let (ns, nsig) = (polar.nspin(), polar.nsigma());

    let rho = vec![0.5; npts * ns];
    let sigma = vec![0.1; npts * nsig];
    let lapl = vec![0.2; npts * ns];
    let tau = vec![0.8; npts * ns];

    let mut out = [
        vec![SENTINEL; npts],
        vec![SENTINEL; npts * ns],
        vec![SENTINEL; npts * nsig],
        vec![SENTINEL; npts * ns],
        vec![SENTINEL; npts * ns],
    ];

    let d_in: Vec<DeviceBuffer> = [&rho, &sigma, &lapl, &tau]
        .iter()
        .map(|v| DeviceBuffer::from_host(v))
        .collect();
    let d_out: Vec<DeviceBuffer> = out.iter().map(|v| DeviceBuffer::from_host(v)).collect();
    let (d_rho, d_sigma, d_lapl, d_tau) = (&d_in[0], &d_in[1], &d_in[2], &d_in[3]);
    let (d_exc, d_vrho, d_vsigma, d_vlapl, d_vtau) =
        (&d_out[0], &d_out[1], &d_out[2], &d_out[3], &d_out[4]);

    let stream = Stream::new().unwrap();
    let mut results = Vec::new();

    let families = [XCFamily::LDA, XCFamily::GGA, XCFamily::MetaGGA];

    for family in families.iter().copied().filter(|f| *f != k.family()) {
        let [exc, vrho, vsigma, vlapl, vtau] = &mut out;

        let calls = match family {
            XCFamily::LDA => vec![
                k.eval_exc_lda(npts, &rho, exc),
                k.eval_exc_vxc_lda(npts, &rho, exc, vrho),
                k.eval_exc_lda_device(npts, d_rho, d_exc),
                k.eval_exc_vxc_lda_device(npts, d_rho, d_exc, d_vrho),
                k.eval_exc_lda_device_async(npts, d_rho, d_exc, &stream),
                k.eval_exc_vxc_lda_device_async(npts, d_rho, d_exc, d_vrho, &stream),
            ],

            XCFamily::GGA => vec![
                k.eval_exc_gga(npts, &rho, &sigma, exc),
                k.eval_exc_vxc_gga(npts, &rho, &sigma, exc, vrho, vsigma),
                k.eval_exc_gga_device(npts, d_rho, d_sigma, d_exc),
                k.eval_exc_vxc_gga_device(npts, d_rho, d_sigma, d_exc, d_vrho, d_vsigma),
                k.eval_exc_gga_device_async(npts, d_rho, d_sigma, d_exc, &stream),
                k.eval_exc_vxc_gga_device_async(
                    npts, d_rho, d_sigma, d_exc, d_vrho, d_vsigma, &stream,
                ),
            ],

            XCFamily::MetaGGA => vec![
                k.eval_exc_mgga(npts, &rho, &sigma, &lapl, &tau, exc),
                k.eval_exc_vxc_mgga(
                    npts, &rho, &sigma, &lapl, &tau, exc, vrho, vsigma, vlapl, vtau,
                ),
                k.eval_exc_mgga_device(npts, d_rho, d_sigma, d_lapl, d_tau, d_exc),
                k.eval_exc_vxc_mgga_device(
                    npts, d_rho, d_sigma, d_lapl, d_tau, d_exc, d_vrho, d_vsigma, d_vlapl, d_vtau,
                ),
                k.eval_exc_mgga_device_async(npts, d_rho, d_sigma, d_lapl, d_tau, d_exc, &stream),
                k.eval_exc_vxc_mgga_device_async(
                    npts, d_rho, d_sigma, d_lapl, d_tau, d_exc, d_vrho, d_vsigma, d_vlapl, d_vtau,
                    &stream,
                ),
            ],
        };

        results.extend(OPS.iter().zip(calls).map(|(op, r)| (family, *op, r)));
    }

    stream.synchronize().unwrap();

    for v in out.iter().cloned().chain(d_out.iter().map(DeviceBuffer::to_host)) {
        assert!(v.iter().all(|x| *x == SENTINEL));
    }

    results
}

proptest! {
    #[test]
    fn test_classification_is_consistent(polar in spin()) {
        for k in all_kernels(polar) {
            let flags = [k.is_lda(), k.is_gga(), k.is_mgga()];

            prop_assert_eq!(flags.iter().filter(|f| **f).count(), 1);
            prop_assert_eq!(k.polar(), polar);

            prop_assert_eq!(k.hyb_exx() != 0.0, k.is_hyb());
        }
    }

    #[test]
    fn test_non_lda_kernels_reject_lda_calls(polar in spin(), npts in 0usize..16) {
        let rho = vec![0.5; npts * polar.nspin()];

        for k in all_kernels(polar).iter().filter(|k| !k.is_lda()) {
            let mut exc = vec![1.5; npts];

            let err = k.eval_exc_lda(npts, &rho, &mut exc).unwrap_err();

            let is_unsupported = matches!(
                err,
                XCError::Unsupported { requested: XCFamily::LDA, .. }
            );
            prop_assert!(is_unsupported);
            prop_assert!(exc.iter().all(|e| *e == 1.5));
        }
    }

    #[test]
    fn test_lda_exc_matches_exc_vxc(
        rho in prop::collection::vec(-0.1f64..20.0, 2..64),
    ) {
        let npts = rho.len() / 2;

        for k in lda_kernels(Spin::Polarized) {
            let mut exc = vec![0.0; npts];
            let mut exc2 = vec![0.0; npts];
            let mut vrho = vec![0.0; 2 * npts];

            k.eval_exc_lda(npts, &rho, &mut exc).unwrap();
            k.eval_exc_vxc_lda(npts, &rho, &mut exc2, &mut vrho).unwrap();

            prop_assert_eq!(&exc, &exc2);
            prop_assert!(vrho.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_vanishing_density_gives_zero(
        rho in prop::collection::vec(0.0f64..1.0E-16, 1..32),
        sigma in 0.0f64..1.0,
    ) {
        let npts = rho.len();
        let sigma = vec![sigma; npts];

        for k in all_kernels(Spin::Unpolarized).iter().filter(|k| k.is_gga()) {
            let mut exc = vec![1.0; npts];
            let mut vrho = vec![1.0; npts];
            let mut vsigma = vec![1.0; npts];

            k.eval_exc_vxc_gga(npts, &rho, &sigma, &mut exc, &mut vrho, &mut vsigma).unwrap();

            prop_assert!(exc.iter().chain(vrho.iter()).chain(vsigma.iter()).all(|v| *v == 0.0));
        }
    }

    #[test]
    fn test_driver_result_independent_of_chunk_size(
        rho in prop::collection::vec(1.0E-4f64..5.0, 1..200),
        chunk_size in 1usize..64,
    ) {
        let npts = rho.len();
        let sigma: Vec<f64> = rho.iter().map(|r| 0.3 * r * r).collect();

        let k: Arc<dyn XCKernel> =
            Arc::new(BuiltinKernel::new::<PBE0>(Spin::Unpolarized).unwrap());

        let mut exc = vec![0.0; npts];
        let mut vrho = vec![0.0; npts];
        let mut vsigma = vec![0.0; npts];

        XCDriver::new(k.clone())
            .with_chunk_size(chunk_size)
            .compute(
                npts,
                &XCInput::gga(&rho, &sigma),
                &mut XCOutput::gga(&mut exc, &mut vrho, &mut vsigma),
            )
            .unwrap();

        let mut exc_ref = vec![0.0; npts];
        let mut vrho_ref = vec![0.0; npts];
        let mut vsigma_ref = vec![0.0; npts];

        k.eval_exc_vxc_gga(npts, &rho, &sigma, &mut exc_ref, &mut vrho_ref, &mut vsigma_ref)
            .unwrap();

        prop_assert_eq!(exc, exc_ref);
        prop_assert_eq!(vrho, vrho_ref);
        prop_assert_eq!(vsigma, vsigma_ref);
    }

    #[test]
    fn test_every_other_family_entry_point_is_unsupported(
        polar in spin(),
        npts in 0usize..8,
        device in any::<bool>(),
    ) {
        for k in all_kernels(polar) {
            let k = if device { k.with_device(Arc::new(HostDevice)) } else { k };

            let results = call_other_families(&k, npts);

            // six entry points for each of the two other families
            prop_assert_eq!(results.len(), 12);

            for (family, op, result) in results {
                prop_assert_eq!(
                    result,
                    Err(XCError::Unsupported {
                        op,
                        requested: family,
                        kernel: k.name(),
                    })
                );
            }
        }
    }
}
