use super::*;
use crate::text::tests::MockMeasurer;
use crate::verify::sample_points;
use balloon_core::{point_in_any, BaseShape, Oval, OvalOrigin, Point, RadialVariant};
use proptest::prelude::*;

fn words() -> impl Strategy<Value = String> {
    proptest::collection::vec("[A-Z]{1,9}", 1..7).prop_map(|w| w.join(" "))
}

// Property: whenever verification passes, every text sample is free
proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]
    #[test]
    fn prop_verified_text_is_contained(
        text in words(),
        width in 160u32..1000,
        height in 160u32..1000,
        seed in any::<u64>(),
        wrap in any::<bool>(),
        circle in any::<bool>(),
    ) {
        let (plan, density) = if circle {
            let mut params = CircleFitParams::default();
            params.base.canvas_size = (width, height);
            params.base.seed = seed;
            params.base.wrap = wrap;
            let plan = plan_circle_bubble(&text, &params, &MockMeasurer).unwrap();
            (plan, params.tuning.verify_density)
        } else {
            let mut params = RectFitParams::default();
            params.base.canvas_size = (width, height);
            params.base.seed = seed;
            params.base.wrap = wrap;
            let plan = plan_rect_bubble(&text, &params, &MockMeasurer).unwrap();
            (plan, params.tuning.verify_density)
        };

        prop_assert!(plan.metadata.adjust_iterations <= 8);
        prop_assert!(plan.ovals.iter().all(Oval::is_valid));
        if plan.metadata.text_verified {
            let placed = plan.placed_lines();
            for p in sample_points(&placed, density) {
                prop_assert!(plan.shape.contains(p));
                prop_assert!(!point_in_any(&plan.ovals, p));
            }
        }
    }
}

// Property: same inputs, same plan
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn prop_plans_are_deterministic(text in words(), seed in any::<u64>()) {
        let mut params = CircleFitParams::default();
        params.base.seed = seed;
        params.variant = RadialVariant::Radial6;
        let a = plan_circle_bubble(&text, &params, &MockMeasurer).unwrap();
        let b = plan_circle_bubble(&text, &params, &MockMeasurer).unwrap();
        prop_assert_eq!(a, b);
    }
}

// Property: scaling shape and ovals together never shrinks the free area
proptest! {
    #[test]
    fn prop_sampler_is_monotonic_under_scaling(
        radius in 20.0f64..200.0,
        factor in 1.0f64..3.0,
        offsets in proptest::collection::vec(
            (-1.5f64..1.5, -1.5f64..1.5, 0.2f64..0.9, 0.2f64..0.9),
            1..6,
        ),
    ) {
        let center = Point::new(0.0, 0.0);
        let build = |r: f64| -> (BaseShape, Vec<Oval>) {
            let ovals = offsets
                .iter()
                .enumerate()
                .map(|(i, &(dx, dy, rx, ry))| {
                    Oval::new(dx * r, dy * r, rx * r, ry * r, OvalOrigin::Radial { index: i })
                })
                .collect();
            (BaseShape::circle(center, r), ovals)
        };
        let (small, small_ovals) = build(radius);
        let (large, large_ovals) = build(radius * factor);
        let a = find_free_region(&small, &small_ovals, 60);
        let b = find_free_region(&large, &large_ovals, 60);
        prop_assert!(b.area() >= a.area() * (1.0 - 1e-9) - 1e-9);
    }
}
