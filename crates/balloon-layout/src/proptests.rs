use super::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn preset() -> impl Strategy<Value = StylePreset> {
    prop_oneof![Just(StylePreset::Standard), Just(StylePreset::Energetic)]
}

fn variant() -> impl Strategy<Value = RadialVariant> {
    prop_oneof![
        Just(RadialVariant::Radial5),
        Just(RadialVariant::Radial6),
        Just(RadialVariant::Radial7),
    ]
}

// Property: every side layout yields valid ovals on all four sides
proptest! {
    #[test]
    fn prop_side_layout_is_valid(
        seed in any::<u64>(),
        half_w in 5.0f64..600.0,
        half_h in 5.0f64..600.0,
        preset in preset(),
    ) {
        let style = StyleConfig::from_preset(preset);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ovals = layout_rect(Point::new(0.0, 0.0), half_w, half_h, &style, &mut rng);

        prop_assert!(ovals.len() >= 4);
        prop_assert!(ovals.iter().all(|o| o.is_valid()));
        prop_assert!(corner_pairs(&ovals).is_some());
    }
}

// Property: corner neighbors overlap on both axes after the corner pass
proptest! {
    #[test]
    fn prop_corners_overlap(
        seed in any::<u64>(),
        half_w in 10.0f64..400.0,
        half_h in 10.0f64..400.0,
        preset in preset(),
    ) {
        let style = StyleConfig::from_preset(preset);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ovals = layout_rect(Point::new(250.0, 250.0), half_w, half_h, &style, &mut rng);

        if let Some(pairs) = corner_pairs(&ovals) {
            for (a, b) in pairs {
                let (a, b) = (&ovals[a], &ovals[b]);
                prop_assert!(a.rx + b.rx - (a.x - b.x).abs() >= style.corner_margin - 1e-6);
                prop_assert!(a.ry + b.ry - (a.y - b.y).abs() >= style.corner_margin - 1e-6);
            }
        }
    }
}

// Property: radial layouts are valid and reproducible from the seed
proptest! {
    #[test]
    fn prop_radial_is_deterministic(
        seed in any::<u64>(),
        radius in 5.0f64..400.0,
        variant in variant(),
        preset in preset(),
    ) {
        let center = Point::new(500.0, 500.0);
        let mut rng_a = ChaCha8Rng::seed_from_u64(seed);
        let mut rng_b = ChaCha8Rng::seed_from_u64(seed);
        let a = generate_radial_ovals(center, radius, variant, preset, &mut rng_a);
        let b = generate_radial_ovals(center, radius, variant, preset, &mut rng_b);

        prop_assert_eq!(a.len(), variant.profile().count);
        prop_assert!(a.iter().all(|o| o.is_valid()));
        prop_assert_eq!(a, b);
    }
}
