use super::*;
use crate::correlation::PBECorrelation;
use crate::exchange::{MVSExchange, SlaterExchange};
use crate::traits::{KernelTraits, LdaKernel};

// eps = rho_total, so e = rho_total^2 and vrho = 2 rho_total in every channel
struct Square;

impl KernelTraits for Square {
    const NAME: &'static str = "square";
    const IS_LDA: bool = true;
    const DENS_TOL: f64 = 1.0E-3;
}

impl LdaKernel for Square {
    fn eval_exc_vxc_unpolar(rho: f64) -> (f64, f64) {
        (rho, 2.0 * rho)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2]) -> (f64, [f64; 2]) {
        let rt = rho[0] + rho[1];
        (rt, [2.0 * rt; 2])
    }
}

#[test]
fn test_lda_helper_unpolarized() {
    let rho = vec![1.0, 2.0, 3.0];
    let mut exc = vec![0.0; 3];
    let mut vrho = vec![0.0; 3];

    lda::host_eval_exc_vxc_helper::<Square>(Spin::Unpolarized, 3, &rho, &mut exc, &mut vrho).unwrap();

    assert_eq!(exc, vec![1.0, 2.0, 3.0]);
    assert_eq!(vrho, vec![2.0, 4.0, 6.0]);
}

#[test]
fn test_lda_helper_polarized_layout() {
    let rho = vec![1.0, 0.5, 0.25, 0.25];
    let mut exc = vec![0.0; 2];
    let mut vrho = vec![0.0; 4];

    lda::host_eval_exc_vxc_helper::<Square>(Spin::Polarized, 2, &rho, &mut exc, &mut vrho).unwrap();

    assert_eq!(exc, vec![1.5, 0.5]);
    assert_eq!(vrho, vec![3.0, 3.0, 1.0, 1.0]);
}

#[test]
fn test_lda_helper_zeroes_points_below_tolerance() {
    let rho = vec![1.0e-4, 1.0, 0.0];
    let mut exc = vec![9.0; 3];
    let mut vrho = vec![9.0; 3];

    lda::host_eval_exc_vxc_helper::<Square>(Spin::Unpolarized, 3, &rho, &mut exc, &mut vrho).unwrap();

    assert_eq!(exc, vec![0.0, 1.0, 0.0]);
    assert_eq!(vrho, vec![0.0, 2.0, 0.0]);
}

#[test]
fn test_lda_helper_clamps_negative_spin_density() {
    let rho = vec![1.0, -0.5];
    let mut exc = vec![0.0];

    lda::host_eval_exc_helper::<Square>(Spin::Polarized, 1, &rho, &mut exc).unwrap();

    assert_eq!(exc, vec![1.0]);
}

#[test]
fn test_helper_leaves_tail_untouched() {
    let rho = vec![1.0, 2.0, 3.0, 4.0];
    let mut exc = vec![-1.0; 4];

    lda::host_eval_exc_helper::<Square>(Spin::Unpolarized, 2, &rho, &mut exc).unwrap();

    assert_eq!(exc, vec![1.0, 2.0, -1.0, -1.0]);
}

#[test]
fn test_helper_rejects_short_buffers() {
    let rho = vec![1.0; 3];
    let mut exc = vec![0.0; 2];

    let err = lda::host_eval_exc_helper::<Square>(Spin::Polarized, 2, &rho, &mut exc).unwrap_err();

    assert_eq!(
        err,
        XCError::BufferSize {
            name: "rho",
            len: 3,
            expected: 4,
            npts: 2
        }
    );

    let sigma = vec![0.1; 2];
    let mut vrho = vec![0.0; 2];
    let mut vsigma = vec![0.0; 1];

    let err = gga::host_eval_exc_vxc_helper::<PBECorrelation>(
        Spin::Unpolarized,
        2,
        &rho,
        &sigma,
        &mut exc,
        &mut vrho,
        &mut vsigma,
    )
    .unwrap_err();

    assert!(matches!(err, XCError::BufferSize { name: "vsigma", .. }));
}

#[test]
fn test_helper_accepts_zero_points() {
    let mut exc: Vec<f64> = Vec::new();
    let mut vrho: Vec<f64> = Vec::new();

    assert!(lda::host_eval_exc_vxc_helper::<SlaterExchange>(Spin::Polarized, 0, &[], &mut exc, &mut vrho).is_ok());
}

#[test]
fn test_gga_helper_clamps_negative_sigma() {
    let rho = vec![0.5];
    let mut exc_neg = vec![0.0];
    let mut exc_zero = vec![0.0];

    gga::host_eval_exc_helper::<PBECorrelation>(Spin::Unpolarized, 1, &rho, &[-0.2], &mut exc_neg).unwrap();
    gga::host_eval_exc_helper::<PBECorrelation>(Spin::Unpolarized, 1, &rho, &[0.0], &mut exc_zero).unwrap();

    assert_eq!(exc_neg, exc_zero);
}

#[test]
fn test_mgga_helper_zero_density_point() {
    let rho = vec![0.0, 0.0, 0.3, 0.2];
    let sigma = vec![0.0, 0.0, 0.0, 0.01, 0.002, 0.02];
    let lapl = vec![0.0, 0.0, 0.1, 0.1];
    let tau = vec![0.0, 0.0, 0.2, 0.3];

    let mut exc = vec![1.0; 2];
    let mut vrho = vec![1.0; 4];
    let mut vsigma = vec![1.0; 6];
    let mut vlapl = vec![1.0; 4];
    let mut vtau = vec![1.0; 4];

    mgga::host_eval_exc_vxc_helper::<MVSExchange>(
        Spin::Polarized,
        2,
        &rho,
        &sigma,
        &lapl,
        &tau,
        &mut exc,
        &mut vrho,
        &mut vsigma,
        &mut vlapl,
        &mut vtau,
    )
    .unwrap();

    assert_eq!(exc[0], 0.0);
    assert_eq!(&vrho[..2], &[0.0, 0.0]);
    assert_eq!(&vsigma[..3], &[0.0, 0.0, 0.0]);
    assert_eq!(&vtau[..2], &[0.0, 0.0]);

    assert!(exc[1] < 0.0);
    // exchange has no opposite-spin gradient term and MVS ignores the Laplacian
    assert_eq!(vsigma[4], 0.0);
    assert_eq!(&vlapl[2..], &[0.0, 0.0]);
}

#[test]
fn test_helper_rejects_point_count_overflowing_buffer_size() {
    let npts = usize::MAX / 2 + 1;
    let mut exc = vec![0.0];

    let err = lda::host_eval_exc_helper::<SlaterExchange>(Spin::Polarized, npts, &[0.1, 0.2], &mut exc)
        .unwrap_err();

    assert_eq!(
        err,
        XCError::BufferSize {
            name: "rho",
            len: 2,
            expected: usize::MAX,
            npts
        }
    );
    assert_eq!(exc, vec![0.0]);

    let mut vrho = vec![0.0; 3];
    let err = gga::host_eval_exc_vxc_helper::<PBECorrelation>(
        Spin::Polarized,
        npts,
        &[0.1, 0.2],
        &[0.0; 3],
        &mut exc,
        &mut vrho,
        &mut [0.0; 3],
    )
    .unwrap_err();

    assert!(matches!(err, XCError::BufferSize { expected: usize::MAX, .. }));
}
