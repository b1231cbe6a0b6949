use std::collections::BTreeMap;

use log::debug;

use crate::config::*;
use crate::dataset::*;

/// Computes the style of one region.
///
/// The rules of the policy are evaluated in order and the first one whose
/// condition holds wins. The result only depends on the record and the policy.
pub fn region_style(region: &RegionRecord, policy: &StylePolicy) -> RegionStyle {
    match policy.rules.iter().find(|r| condition_holds(&r.when, region)) {
        Some(rule) => RegionStyle {
            fill: rule.fill.clone(),
            hover: rule.hover.clone(),
            label_fill: rule.label_fill.clone().unwrap_or_else(|| rule.fill.clone()),
            label_hover: rule.label_hover.clone().unwrap_or_else(|| rule.hover.clone()),
        },
        None => swatch_style(&policy.default),
    }
}

/// The style of regions that have no record in the dataset.
pub fn base_style(policy: &StylePolicy) -> RegionStyle {
    swatch_style(&policy.base)
}

/// Styles for every region of the dataset, keyed by region code.
pub fn dataset_styles(
    dataset: &ElectionDataset,
    policy: &StylePolicy,
) -> BTreeMap<String, RegionStyle> {
    let res: BTreeMap<String, RegionStyle> = dataset
        .election_data
        .iter()
        .map(|(code, region)| (code.clone(), region_style(region, policy)))
        .collect();
    debug!("dataset_styles: styled {} regions", res.len());
    res
}

fn swatch_style(swatch: &Swatch) -> RegionStyle {
    RegionStyle {
        fill: swatch.fill.clone(),
        hover: swatch.hover.clone(),
        label_fill: swatch.fill.clone(),
        label_hover: swatch.hover.clone(),
    }
}

fn condition_holds(condition: &Condition, region: &RegionRecord) -> bool {
    let es = &region.elections;
    match condition {
        Condition::CompetitiveSenate => es
            .iter()
            .any(|e| e.category() == Category::Senate && e.is_competitive()),
        Condition::Senate => es.iter().any(|e| e.category() == Category::Senate),
        Condition::Competitive => es.iter().any(|e| e.is_competitive()),
        Condition::AnyElection => !es.is_empty(),
        Condition::ElectionsOver => region.is_concluded(),
        Condition::Category(c) => es.iter().any(|e| e.category() == *c),
        Condition::MinElections(n) => es.len() >= *n,
    }
}
