use labkit_calc::beer_lambert::{self, BeerLambertInput, BeerLambertMode};
use labkit_calc::thermodynamics::{self, ThermodynamicsInput, ThermodynamicsMode};
use proptest::prelude::*;

fn beer_lambert_mode() -> impl Strategy<Value = BeerLambertMode> {
    prop::sample::select(BeerLambertMode::ALL.to_vec())
}

fn thermodynamics_mode() -> impl Strategy<Value = ThermodynamicsMode> {
    prop::sample::select(ThermodynamicsMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn beer_lambert_is_deterministic(
        epsilon in -10.0f64..1.0e5,
        path_length in -1.0f64..10.0,
        concentration in -1.0f64..1.0,
        absorbance in -1.0f64..3.0,
        mode in beer_lambert_mode(),
    ) {
        let input = BeerLambertInput { epsilon, path_length, concentration, absorbance };
        let first = beer_lambert::solve(&input, mode);
        for _ in 0..3 {
            prop_assert_eq!(beer_lambert::solve(&input, mode), first.clone());
        }
    }

    #[test]
    fn absorbance_matches_product_on_valid_domain(
        epsilon in 0.0f64..1.0e5,
        path_length in 0.0f64..10.0,
        concentration in 0.0f64..1.0,
    ) {
        let a = beer_lambert::absorbance(epsilon, path_length, concentration).unwrap();
        prop_assert_eq!(a, epsilon * path_length * concentration);
    }

    #[test]
    fn thermodynamics_is_deterministic(
        delta_g in -100.0f64..100.0,
        delta_h in -200.0f64..200.0,
        delta_s in -500.0f64..500.0,
        temperature in -10.0f64..400.0,
        equilibrium_constant in -1.0f64..1.0e3,
        mode in thermodynamics_mode(),
    ) {
        let input = ThermodynamicsInput { delta_g, delta_h, delta_s, temperature, equilibrium_constant };
        let first = thermodynamics::solve(&input, mode);
        let second = thermodynamics::solve(&input, mode);
        prop_assert_eq!(first, second);
    }
}
