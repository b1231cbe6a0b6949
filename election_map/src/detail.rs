//! Pure data-to-structure transformations for the overlay, the filtered
//! lists and the hover tooltip. Nothing in here produces markup: see
//! [`crate::html`] for that.

use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::dataset::*;

pub const NO_DATA_MESSAGE: &str = "No information available for this state.";
pub const NO_ELECTIONS_MESSAGE: &str = "No tracked elections in this state at this time.";
pub const NO_FILTER_MATCH_MESSAGE: &str = "No states currently have this type of election.";

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Badge {
    pub label: String,
    pub css_class: &'static str,
    pub icon: &'static str,
}

impl Badge {
    pub fn for_impact(impact: &ChamberImpact) -> Badge {
        let (css_class, icon) = match impact.category() {
            Category::Local => ("local", "\u{1F3DB}\u{FE0F}"),
            Category::State => ("state", "\u{1F3E2}"),
            Category::House => ("house", "\u{1F3DB}\u{FE0F}"),
            Category::Senate => ("senate", "\u{2696}\u{FE0F}"),
            Category::Other => ("ref", "\u{1F4CB}"),
        };
        Badge {
            label: impact.label().to_string(),
            css_class,
            icon,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct CandidateEntry {
    pub name: String,
    pub party: String,
    pub party_class: &'static str,
    pub incumbent: bool,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ElectionEntry {
    pub title: String,
    pub date: String,
    pub kind: String,
    pub category: Category,
    pub badge: Badge,
    pub stakes: Option<String>,
    pub competitive: bool,
    /// The region's cycle is over.
    pub concluded: bool,
    pub candidates: Vec<CandidateEntry>,
}

impl ElectionEntry {
    pub fn new(election: &ElectionRecord, concluded: bool) -> ElectionEntry {
        let candidates = election
            .candidates
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|c| CandidateEntry {
                name: c.name.clone(),
                party: c.party.label().to_string(),
                party_class: c.party.css_class(),
                incumbent: c.is_incumbent(),
            })
            .collect();
        ElectionEntry {
            title: election.title.clone(),
            date: election.date.clone(),
            kind: election.kind.clone(),
            category: election.category(),
            badge: Badge::for_impact(&election.chamber_impact),
            stakes: election
                .stakes
                .clone()
                .filter(|s| !s.trim().is_empty()),
            competitive: election.is_competitive(),
            concluded,
            candidates,
        }
    }

    /// The candidates as one line: `A (Party), Incumbent vs. B (Party)`.
    pub fn matchup(&self) -> Option<String> {
        if self.candidates.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .candidates
            .iter()
            .map(|c| {
                if c.incumbent {
                    format!("{} ({}), Incumbent", c.name, c.party)
                } else {
                    format!("{} ({})", c.name, c.party)
                }
            })
            .collect();
        Some(parts.join(" vs. "))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RegistrationBlock {
    pub deadline: Option<String>,
    pub website: Option<String>,
}

impl RegistrationBlock {
    fn from_region(region: &RegionRecord) -> Option<RegistrationBlock> {
        if region.has_registration_info() {
            Some(RegistrationBlock {
                deadline: region.registration_deadline.clone(),
                website: region.registration_website.clone(),
            })
        } else {
            None
        }
    }
}

/// One block of the overlay, in display order.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "camelCase")]
pub enum DetailSection {
    /// The region's cycle is over.
    Concluded { state_name: String },
    Registration(RegistrationBlock),
    ElectionCount { count: usize },
    Election(ElectionEntry),
    NoElections,
    NoData,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct DetailView {
    pub title: String,
    pub sections: Vec<DetailSection>,
}

impl DetailView {
    pub fn is_no_data(&self) -> bool {
        self.sections.iter().any(|s| matches!(s, DetailSection::NoData))
    }

    pub fn is_no_elections(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s, DetailSection::NoElections))
    }

    pub fn registration(&self) -> Option<&RegistrationBlock> {
        self.sections.iter().find_map(|s| match s {
            DetailSection::Registration(r) => Some(r),
            _ => None,
        })
    }

    pub fn elections(&self) -> impl Iterator<Item = &ElectionEntry> {
        self.sections.iter().filter_map(|s| match s {
            DetailSection::Election(e) => Some(e),
            _ => None,
        })
    }
}

/// Builds the overlay content for one region.
///
/// `name` is what the host knows about the region (its code, usually). When a
/// record is present its state name is used as title instead.
pub fn region_detail(name: &str, region: Option<&RegionRecord>) -> DetailView {
    let region = match region {
        Some(r) => r,
        None => {
            debug!("region_detail: no record for {:?}", name);
            return DetailView {
                title: name.to_string(),
                sections: vec![DetailSection::NoData],
            };
        }
    };

    let concluded = region.is_concluded();
    let mut sections: Vec<DetailSection> = Vec::new();
    if concluded {
        sections.push(DetailSection::Concluded {
            state_name: region.state_name.clone(),
        });
    }
    let registration = RegistrationBlock::from_region(region);
    if region.elections.is_empty() {
        sections.push(DetailSection::NoElections);
        sections.extend(registration.map(DetailSection::Registration));
    } else {
        sections.extend(registration.map(DetailSection::Registration));
        sections.push(DetailSection::ElectionCount {
            count: region.elections.len(),
        });
        for e in region.elections.iter() {
            sections.push(DetailSection::Election(ElectionEntry::new(e, concluded)));
        }
    }
    DetailView {
        title: region.state_name.clone(),
        sections,
    }
}

pub fn filter_label(category: Category) -> &'static str {
    match category {
        Category::Local => "Local Elections",
        Category::State => "State Elections",
        Category::House => "U.S. House Elections",
        Category::Senate => "U.S. Senate Elections",
        Category::Other => "Referendums",
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct FilteredRegion {
    pub code: String,
    pub name: String,
    pub elections: Vec<ElectionEntry>,
    pub registration_website: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct FilteredView {
    pub category: Category,
    pub label: &'static str,
    pub regions: Vec<FilteredRegion>,
}

impl FilteredView {
    /// `N states with <label>`, or `None` when nothing matched.
    pub fn summary(&self) -> Option<String> {
        match self.regions.len() {
            0 => None,
            1 => Some(format!("1 state with {}", self.label)),
            n => Some(format!("{} states with {}", n, self.label)),
        }
    }

    /// Number of elections across all listed regions.
    pub fn election_count(&self) -> usize {
        self.regions.iter().map(|r| r.elections.len()).sum()
    }
}

/// Collects the regions that have at least one election of `category`, sorted
/// by state name.
pub fn filter_by_category(dataset: &ElectionDataset, category: Category) -> FilteredView {
    let mut regions: Vec<FilteredRegion> = dataset
        .election_data
        .iter()
        .filter_map(|(code, region)| {
            let elections: Vec<ElectionEntry> = region
                .elections
                .iter()
                .filter(|e| e.category() == category)
                .map(|e| ElectionEntry::new(e, region.is_concluded()))
                .collect();
            if elections.is_empty() {
                None
            } else {
                Some(FilteredRegion {
                    code: code.clone(),
                    name: region.state_name.clone(),
                    elections,
                    registration_website: region.registration_website.clone(),
                })
            }
        })
        .collect();
    regions.sort_by(|a, b| display_order(&a.name, &b.name).then_with(|| a.code.cmp(&b.code)));
    debug!(
        "filter_by_category: {:?} matched {} regions",
        category,
        regions.len()
    );
    FilteredView {
        category,
        label: filter_label(category),
        regions,
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct TooltipLine {
    pub title: String,
    pub incumbent_running: bool,
    pub competitive: bool,
}

/// The condensed summary shown while hovering a region.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct TooltipView {
    pub name: String,
    pub election_count: usize,
    /// Badge labels, without duplicates, in order of first appearance.
    pub categories: Vec<String>,
    pub lines: Vec<TooltipLine>,
}

pub fn region_tooltip(name: &str, region: Option<&RegionRecord>) -> TooltipView {
    match region {
        None => TooltipView {
            name: name.to_string(),
            election_count: 0,
            categories: vec![],
            lines: vec![],
        },
        Some(r) => {
            let mut categories: Vec<String> = Vec::new();
            for e in r.elections.iter() {
                let label = e.chamber_impact.label();
                if !categories.iter().any(|c| c == label) {
                    categories.push(label.to_string());
                }
            }
            TooltipView {
                name: r.state_name.clone(),
                election_count: r.elections.len(),
                categories,
                lines: r
                    .elections
                    .iter()
                    .map(|e| TooltipLine {
                        title: e.title.clone(),
                        incumbent_running: e.has_incumbent(),
                        competitive: e.is_competitive(),
                    })
                    .collect(),
            }
        }
    }
}

/// Orders display names the way a reader expects: case and accents are
/// ignored first, and only break ties. Spaces sort before punctuation, which
/// sorts before digits and letters, so `O'Brien` comes before `Oak`.
pub fn display_order(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> Vec<(u8, char)> {
    s.chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_accent)
        .map(|c| {
            let weight = if c.is_whitespace() {
                0
            } else if c.is_alphabetic() {
                3
            } else if c.is_numeric() {
                2
            } else {
                1
            };
            (weight, c)
        })
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ś' | 'š' => 's',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}
