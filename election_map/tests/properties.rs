use std::collections::BTreeMap;
use std::time::Duration;

use election_map::animator::CountUp;
use election_map::detail::filter_by_category;
use election_map::style::region_style;
use election_map::*;
use proptest::prelude::*;

fn impact_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Local".to_string()),
        Just("State".to_string()),
        Just("House".to_string()),
        Just("Senate".to_string()),
        Just("Referendum".to_string()),
        Just("".to_string()),
        "[A-Za-z ]{1,12}",
    ]
}

fn election_strategy() -> impl Strategy<Value = ElectionRecord> {
    (
        "[A-Za-z ]{1,16}",
        impact_strategy(),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(title, impact, competitive)| ElectionRecord {
            title,
            date: "2024-11-05".to_string(),
            kind: "General".to_string(),
            chamber_impact: ChamberImpact::from(impact),
            stakes: None,
            competitive,
            candidates: None,
        })
}

fn region_strategy() -> impl Strategy<Value = RegionRecord> {
    (
        "[A-Z][a-z]{2,10}",
        proptest::option::of(any::<bool>()),
        proptest::collection::vec(election_strategy(), 0..6),
    )
        .prop_map(|(state_name, elections_over, elections)| RegionRecord {
            state_name,
            elections_over,
            elections,
            ..RegionRecord::default()
        })
}

fn dataset_strategy() -> impl Strategy<Value = ElectionDataset> {
    proptest::collection::btree_map("[A-Z]{2}", region_strategy(), 0..12).prop_map(
        |election_data: BTreeMap<String, RegionRecord>| ElectionDataset {
            last_updated: None,
            contact_email: None,
            election_data,
        },
    )
}

proptest! {
    #[test]
    fn category_counts_sum_to_total(ds in dataset_strategy()) {
        let stats = compute_stats(&ds);
        let sum: u64 = stats.counts_by_category.values().sum();
        prop_assert_eq!(sum, stats.total_elections);
        prop_assert_eq!(stats.counts_by_category.len(), 5);
    }

    #[test]
    fn every_region_is_tracked(ds in dataset_strategy()) {
        let stats = compute_stats(&ds);
        prop_assert_eq!(stats.regions_tracked, ds.election_data.len() as u64);
    }

    #[test]
    fn filtered_views_match_counts(ds in dataset_strategy()) {
        let stats = compute_stats(&ds);
        for c in Category::ALL.iter() {
            let view = filter_by_category(&ds, *c);
            prop_assert_eq!(view.election_count() as u64, stats.count(*c));
            prop_assert!(view.regions.iter().all(|r| !r.elections.is_empty()));
        }
    }

    #[test]
    fn styles_are_deterministic(region in region_strategy()) {
        let policy = StylePolicy::default();
        prop_assert_eq!(region_style(&region, &policy), region_style(&region.clone(), &policy));
    }

    #[test]
    fn count_up_is_bounded_and_monotonic(
        target in 0u64..1_000_000,
        duration_ms in 1u64..5000,
        steps in proptest::collection::vec(0u64..6000, 1..40),
    ) {
        let a = CountUp::new(target, Duration::from_millis(duration_ms));
        prop_assert_eq!(a.value_at(Duration::ZERO), 0);
        prop_assert_eq!(a.value_at(Duration::from_millis(duration_ms)), target);
        let mut steps = steps;
        steps.sort_unstable();
        let mut last = 0;
        for ms in steps {
            let v = a.value_at(Duration::from_millis(ms));
            prop_assert!(v >= last);
            prop_assert!(v <= target);
            last = v;
        }
    }
}
