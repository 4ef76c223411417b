use super::*;
use crate::builtin::BuiltinKernel;
use crate::correlation::{PBECorrelation, PW92};
use crate::exchange::MVSExchange;
use crate::spin::Spin;

fn density(npts: usize, ns: usize) -> Vec<f64> {
    (0..npts * ns).map(|i| 0.05 + 0.01 * (i % 37) as f64).collect()
}

fn kernel<K: crate::traits::BuiltinModel>(polar: Spin) -> Arc<dyn XCKernel> {
    Arc::new(BuiltinKernel::new::<K>(polar).unwrap())
}

#[test]
fn test_chunked_lda_matches_single_call() {
    let k = kernel::<PW92>(Spin::Polarized);
    let npts = 1000;
    let rho = density(npts, 2);

    let mut exc = vec![0.0; npts];
    let mut vrho = vec![0.0; 2 * npts];

    XCDriver::new(k.clone())
        .with_chunk_size(7)
        .compute(npts, &XCInput::lda(&rho), &mut XCOutput::lda(&mut exc, &mut vrho))
        .unwrap();

    let mut exc_ref = vec![0.0; npts];
    let mut vrho_ref = vec![0.0; 2 * npts];
    k.eval_exc_vxc_lda(npts, &rho, &mut exc_ref, &mut vrho_ref).unwrap();

    assert_eq!(exc, exc_ref);
    assert_eq!(vrho, vrho_ref);
}

#[test]
fn test_chunked_mgga_matches_single_call() {
    let k = kernel::<MVSExchange>(Spin::Unpolarized);
    let npts = 130;

    let rho = density(npts, 1);
    let sigma: Vec<f64> = rho.iter().map(|r| 0.1 * r * r).collect();
    let lapl = vec![0.0; npts];
    let tau: Vec<f64> = rho.iter().map(|r| 3.0 * r).collect();

    let mut out = vec![vec![0.0; npts]; 5];
    let mut reference = vec![vec![0.0; npts]; 5];

    if let [exc, vrho, vsigma, vlapl, vtau] = out.as_mut_slice() {
        XCDriver::new(k.clone())
            .with_chunk_size(16)
            .compute(
                npts,
                &XCInput::mgga(&rho, &sigma, &lapl, &tau),
                &mut XCOutput::mgga(exc, vrho, vsigma, vlapl, vtau),
            )
            .unwrap();
    }

    if let [exc, vrho, vsigma, vlapl, vtau] = reference.as_mut_slice() {
        k.eval_exc_vxc_mgga(npts, &rho, &sigma, &lapl, &tau, exc, vrho, vsigma, vlapl, vtau)
            .unwrap();
    }

    assert_eq!(out, reference);
}

#[test]
fn test_energy_only() {
    let k = kernel::<PBECorrelation>(Spin::Unpolarized);
    let npts = 50;
    let rho = density(npts, 1);
    let sigma = vec![0.01; npts];

    let mut exc = vec![0.0; npts];
    XCDriver::new(k.clone())
        .with_chunk_size(8)
        .compute(npts, &XCInput::gga(&rho, &sigma), &mut XCOutput::energy(&mut exc))
        .unwrap();

    let mut exc_ref = vec![0.0; npts];
    k.eval_exc_gga(npts, &rho, &sigma, &mut exc_ref).unwrap();

    assert_eq!(exc, exc_ref);
}

#[test]
fn test_missing_buffers() {
    let k = kernel::<PBECorrelation>(Spin::Unpolarized);
    let driver = XCDriver::new(k);

    let rho = vec![0.1; 4];
    let mut exc = vec![0.0; 4];

    assert_eq!(
        driver.compute(4, &XCInput::lda(&rho), &mut XCOutput::energy(&mut exc)),
        Err(XCError::MissingBuffer {
            name: "sigma",
            family: XCFamily::GGA
        })
    );

    let sigma = vec![0.0; 4];
    let mut vrho = vec![0.0; 4];

    assert_eq!(
        driver.compute(4, &XCInput::gga(&rho, &sigma), &mut XCOutput::lda(&mut exc, &mut vrho)),
        Err(XCError::MissingBuffer {
            name: "vsigma",
            family: XCFamily::GGA
        })
    );
}

#[test]
fn test_short_buffer_leaves_outputs_untouched() {
    let k = kernel::<PW92>(Spin::Unpolarized);

    let rho = vec![0.1; 10];
    let mut exc = vec![3.0; 10];
    let mut vrho = vec![3.0; 9];

    let err = XCDriver::new(k)
        .with_chunk_size(2)
        .compute(10, &XCInput::lda(&rho), &mut XCOutput::lda(&mut exc, &mut vrho))
        .unwrap_err();

    assert!(matches!(err, XCError::BufferSize { name: "vrho", .. }));
    assert_eq!(exc, vec![3.0; 10]);
}

#[test]
fn test_from_control_chunk_size() {
    let mut control = Control::new();
    control.parse("xc_chunk_size = 256").unwrap();

    let driver = XCDriver::from_control(kernel::<PW92>(Spin::Unpolarized), &control);

    assert_eq!(driver.chunk_size(), 256);
    assert_eq!(driver.kernel().name(), "pw92");
    assert_eq!(XCDriver::new(kernel::<PW92>(Spin::Unpolarized)).with_chunk_size(0).chunk_size(), 1);
}

#[test]
fn test_integrate() {
    let w = vec![0.5, 0.5, 1.0];
    let rho = vec![1.0, 2.0, 4.0];
    let exc = vec![-1.0, -0.5, 0.25];

    assert_eq!(XCDriver::integrate(&w, &rho, &exc), -0.5 - 0.5 + 1.0);
}

#[test]
fn test_huge_point_count_is_a_buffer_error() {
    let k = kernel::<PBECorrelation>(Spin::Polarized);

    let rho = vec![0.1; 2];
    let sigma = vec![0.0; 3];
    let mut exc = vec![0.0];

    let err = XCDriver::new(k)
        .with_chunk_size(usize::MAX)
        .compute(usize::MAX / 2 + 1, &XCInput::gga(&rho, &sigma), &mut XCOutput::energy(&mut exc))
        .unwrap_err();

    assert!(matches!(err, XCError::BufferSize { .. }));
    assert_eq!(exc, vec![0.0]);
}
