//! Property tests for the odontogram, clamp rules and plan totals.

use proptest::prelude::*;

use dental_chart_core::catalog::{clamp_minutes, clamp_money, parse_amount};
use dental_chart_core::config::EngineConfig;
use dental_chart_core::models::{Odontogram, PlanFilter, Surface, ToothStatus};
use dental_chart_core::plan;
use dental_chart_core::store::PatientStore;

fn surface_strategy() -> impl Strategy<Value = Surface> {
    prop::sample::select(Surface::ALL.to_vec())
}

fn tooth_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["11", "12", "16", "21", "26", "36", "41", "46", "48"])
        .prop_map(String::from)
}

fn filter_strategy() -> impl Strategy<Value = PlanFilter> {
    prop::sample::select(vec![
        PlanFilter::All,
        PlanFilter::AlertsOnly,
        PlanFilter::TreatedOnly,
    ])
}

proptest! {
    #[test]
    fn test_three_cycles_return_to_start(
        tooth in tooth_strategy(),
        surface in surface_strategy(),
        warmup in 0usize..3,
    ) {
        let mut odontogram = Odontogram::new();
        for _ in 0..warmup {
            odontogram.cycle(&tooth, surface);
        }
        let start = odontogram.status(&tooth, surface);

        let first = odontogram.cycle(&tooth, surface);
        prop_assert_eq!(first, start.next());
        odontogram.cycle(&tooth, surface);
        let third = odontogram.cycle(&tooth, surface);
        prop_assert_eq!(third, start);
    }

    #[test]
    fn test_untouched_surface_reads_normal(tooth in "[0-9A-Za-z]{1,4}", surface in surface_strategy()) {
        let odontogram = Odontogram::new();
        prop_assert_eq!(odontogram.status(&tooth, surface), ToothStatus::Normal);
    }

    #[test]
    fn test_clamp_money_is_finite_and_non_negative(n in prop::num::f64::ANY) {
        let clamped = clamp_money(n);
        prop_assert!(clamped.is_finite());
        prop_assert!(clamped >= 0.0);
    }

    #[test]
    fn test_clamp_minutes_rounds(n in -1.0e6f64..1.0e6) {
        let clamped = clamp_minutes(n);
        if n <= 0.0 {
            prop_assert_eq!(clamped, 0);
        } else {
            prop_assert_eq!(clamped, n.round() as u32);
        }
    }

    #[test]
    fn test_parse_amount_never_panics(text in "\\PC{0,12}") {
        let amount = parse_amount(&text);
        let fee = clamp_money(amount);
        prop_assert!(fee.is_finite() && fee >= 0.0);
        if text.trim().is_empty() {
            prop_assert_eq!(amount, 0.0);
        }
    }

    #[test]
    fn test_totals_cover_only_the_view(
        cycles in prop::collection::vec((tooth_strategy(), surface_strategy()), 1..24),
        overrides in prop::collection::vec((tooth_strategy(), surface_strategy(), 0.0f64..2000.0, 0.0f64..240.0), 0..6),
        filter in filter_strategy(),
    ) {
        let mut store = PatientStore::new(EngineConfig {
            seed_demo_patients: false,
            ..EngineConfig::default()
        });
        store.add_patient("Ana", 29, "", "");

        for (tooth, surface) in &cycles {
            store.cycle_surface(tooth, *surface);
        }
        for (tooth, surface, fee, minutes) in &overrides {
            store.set_cost_override(tooth, *surface, *fee, *minutes);
        }
        store.set_plan_filter(filter);

        let view = store.treatment_plan_view();
        prop_assert!(view.iter().all(|item| filter.admits(item.status)));

        let totals = store.treatment_plan_totals();
        let minutes: u32 = view.iter().map(|item| item.cost_minutes).sum();
        let fee: f64 = view.iter().map(|item| item.cost_fee).sum();
        prop_assert_eq!(totals.total_minutes, clamp_minutes(minutes as f64));
        prop_assert_eq!(totals.total_fee, clamp_money(fee));
        prop_assert_eq!(totals, plan::totals(&view));
    }
}
