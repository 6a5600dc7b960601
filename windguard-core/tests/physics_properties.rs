//! Property tests for the per-record physics

use proptest::prelude::*;
use windguard_core::{
    iec_ad, iec_corr, iec_turb, AirDensityEstimator, AnalysisError, DewPointHumidityEstimator,
};

proptest! {
    #[test]
    fn dry_air_density_positive_and_decreasing(
        t in -50.0f64..50.0,
        dt in 0.1f64..20.0,
        p in 500.0f64..1100.0,
    ) {
        let est = AirDensityEstimator::default();
        let cold = est.dry_air_density(t, p).unwrap();
        let warm = est.dry_air_density(t + dt, p).unwrap();
        prop_assert!(cold > 0.0);
        prop_assert!(warm > 0.0);
        prop_assert!(warm < cold);
    }

    #[test]
    fn moist_density_never_negative(
        t in -40.0f64..45.0,
        p in 0.0f64..1100.0,
        rh in -50.0f64..150.0,
    ) {
        let est = AirDensityEstimator::default().estimate(t, p, Some(rh)).unwrap();
        prop_assert!(est.density >= 0.0);
    }

    #[test]
    fn saturation_when_dew_point_equals_temperature(t in -40.0f64..50.0) {
        let rh = DewPointHumidityEstimator::default().relative_humidity(t, t).unwrap();
        prop_assert!((rh - 100.0).abs() < 1e-9);
    }

    #[test]
    fn identity_at_reference_conditions(ws in 0.01f64..40.0) {
        prop_assert_eq!(iec_corr(ws, 0.0, 1.225), Ok(ws));
        prop_assert_eq!(iec_ad(ws, 1.225), Ok(ws));
        prop_assert_eq!(iec_turb(ws, 0.0), Ok(ws));
    }

    #[test]
    fn density_adjustment_preserves_energy_flux(ws in 0.0f64..40.0, rho in 0.8f64..1.5) {
        let adjusted = iec_ad(ws, rho).unwrap();
        let flux = rho * ws.powi(3);
        let reference_flux = 1.225 * adjusted.powi(3);
        prop_assert!((flux - reference_flux).abs() <= 1e-9 * flux.max(1.0));
    }

    #[test]
    fn turbulence_never_lowers_speed(ws in 0.01f64..40.0, sigma in 0.0f64..10.0) {
        prop_assert!(iec_turb(ws, sigma).unwrap() >= ws);
    }

    #[test]
    fn calm_is_always_degenerate(sigma in 0.0f64..5.0, rho in 0.8f64..1.5) {
        let degenerate = matches!(
            iec_corr(0.0, sigma, rho),
            Err(AnalysisError::NumericDegeneracy { .. })
        );
        prop_assert!(degenerate);
    }
}
