mod config;
mod dataset;

pub mod animator;
pub mod builder;
pub mod detail;
pub mod html;
pub mod interaction;
pub mod manual;
pub mod style;

use std::collections::BTreeMap;

use log::{debug, info};

pub use crate::config::*;
pub use crate::dataset::*;

/// Aggregates the counts shown in the summary bar.
///
/// Every election is counted once in the total and once in the bucket of its
/// category. Regions without elections still count as tracked.
pub fn compute_stats(dataset: &ElectionDataset) -> DatasetStats {
    let mut counts_by_category: BTreeMap<Category, u64> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut total_elections: u64 = 0;
    let mut competitive_races: u64 = 0;
    let mut concluded_regions: u64 = 0;

    for (code, region) in dataset.election_data.iter() {
        debug!(
            "compute_stats: {}: {} elections",
            code,
            region.elections.len()
        );
        if region.is_concluded() {
            concluded_regions += 1;
        }
        for e in region.elections.iter() {
            total_elections += 1;
            *counts_by_category.entry(e.category()).or_insert(0) += 1;
            if e.is_competitive() {
                competitive_races += 1;
            }
        }
    }

    let stats = DatasetStats {
        regions_tracked: dataset.election_data.len() as u64,
        total_elections,
        counts_by_category,
        competitive_races,
        concluded_regions,
    };
    info!(
        "compute_stats: {} regions, {} elections",
        stats.regions_tracked, stats.total_elections
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;
    use crate::detail::filter_by_category;

    fn test_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn empty_dataset() {
        test_init();
        let ds = DatasetBuilder::new().build().unwrap();
        let stats = compute_stats(&ds);
        assert_eq!(stats.regions_tracked, 0);
        assert_eq!(stats.total_elections, 0);
        assert_eq!(stats.counts_by_category.len(), 5);
        assert!(stats.counts_by_category.values().all(|v| *v == 0));
    }

    #[test]
    fn region_without_elections() {
        test_init();
        let ds = DatasetBuilder::new()
            .region("ND", "North Dakota")
            .region("SD", "South Dakota")
            .election("Mayor", Category::Local)
            .build()
            .unwrap();
        let stats = compute_stats(&ds);
        assert_eq!(stats.regions_tracked, 2);
        assert_eq!(stats.total_elections, 1);
        assert_eq!(stats.count(Category::Local), 1);
    }

    #[test]
    fn california_scenario() {
        test_init();
        let ds = ElectionDataset::from_json_str(
            r#"{"lastUpdated":"2024-09-01T00:00:00Z",
                "electionData":{"CA":{"stateName":"California",
                  "elections":[{"title":"Governor","date":"2026-11-03","type":"General","chamberImpact":"State"}]}}}"#,
        )
        .unwrap();
        let stats = compute_stats(&ds);
        assert_eq!(stats.count(Category::State), 1);
        assert_eq!(stats.total_elections, 1);
        let view = filter_by_category(&ds, Category::State);
        let names: Vec<&str> = view.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["California"]);
    }

    #[test]
    fn unknown_categories_and_extras() {
        test_init();
        let ds = ElectionDataset::from_json_str(
            r#"{"electionData":{
                "OH":{"stateName":"Ohio","electionsOver":true,"elections":[
                  {"title":"Issue 1","date":"","type":"","chamberImpact":"Ballot Measure"},
                  {"title":"Senate","date":"","type":"","chamberImpact":"Senate","competitive":true}]}}}"#,
        )
        .unwrap();
        let stats = compute_stats(&ds);
        assert_eq!(stats.count(Category::Other), 1);
        assert_eq!(stats.count(Category::Senate), 1);
        assert_eq!(stats.competitive_races, 1);
        assert_eq!(stats.concluded_regions, 1);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["regionsTracked"], 1);
        assert_eq!(json["countsByCategory"]["Other"], 1);
    }
}
