// ******** Output data structures *********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dataset::Category;

/// Aggregated counts over a whole dataset.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    #[serde(rename = "regionsTracked")]
    pub regions_tracked: u64,
    #[serde(rename = "totalElections")]
    pub total_elections: u64,
    /// Always holds the five categories, including the empty ones.
    #[serde(rename = "countsByCategory")]
    pub counts_by_category: BTreeMap<Category, u64>,
    #[serde(rename = "competitiveRaces")]
    pub competitive_races: u64,
    #[serde(rename = "concludedRegions")]
    pub concluded_regions: u64,
}

impl DatasetStats {
    pub fn count(&self, category: Category) -> u64 {
        self.counts_by_category.get(&category).cloned().unwrap_or(0)
    }
}

/// A CSS color, such as `#7b2cbf`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(s: &str) -> Result<Color, ConfigError> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ConfigError::InvalidColor(s.to_string()))?;
        if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Color(s.to_ascii_lowercase()))
        } else {
            Err(ConfigError::InvalidColor(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The visual state of one region on the map.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegionStyle {
    pub fill: Color,
    pub hover: Color,
    #[serde(rename = "labelFill")]
    pub label_fill: Color,
    #[serde(rename = "labelHover")]
    pub label_hover: Color,
}

// ********* Configuration **********

/// A condition evaluated against one region record.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// At least one Senate election flagged as competitive.
    CompetitiveSenate,
    Senate,
    Competitive,
    AnyElection,
    ElectionsOver,
    Category(Category),
    MinElections(usize),
}

/// One row of the palette table: the first rule whose condition holds
/// decides the colors of a region.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StyleRule {
    pub when: Condition,
    pub fill: Color,
    pub hover: Color,
    #[serde(rename = "labelFill", default)]
    pub label_fill: Option<Color>,
    #[serde(rename = "labelHover", default)]
    pub label_hover: Option<Color>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Swatch {
    pub fill: Color,
    pub hover: Color,
}

/// The palette and its priority-ordered rules.
///
/// `base` styles regions with no record at all, `default` styles tracked
/// regions that no rule matched.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StylePolicy {
    pub base: Swatch,
    pub rules: Vec<StyleRule>,
    pub default: Swatch,
}

impl Default for StylePolicy {
    fn default() -> Self {
        let c = |s: &str| Color(s.to_string());
        let rule = |when: Condition, fill: &str, hover: &str| StyleRule {
            when,
            fill: c(fill),
            hover: c(hover),
            label_fill: None,
            label_hover: None,
        };
        StylePolicy {
            base: Swatch {
                fill: c("#d3d3d3"),
                hover: c("#b0b0b0"),
            },
            rules: vec![
                rule(Condition::CompetitiveSenate, "#dc2626", "#ef4444"),
                rule(Condition::Senate, "#2563eb", "#3b82f6"),
                rule(Condition::Competitive, "#f59e0b", "#fbbf24"),
                rule(Condition::AnyElection, "#7b2cbf", "#457b9d"),
            ],
            default: Swatch {
                fill: c("#8a817c"),
                hover: c("#457b9d"),
            },
        }
    }
}

/// Where the tooltip is drawn relative to the pointer.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TooltipOffset {
    pub dx: i32,
    pub dy: i32,
}

impl Default for TooltipOffset {
    fn default() -> Self {
        TooltipOffset { dx: 10, dy: -40 }
    }
}

/// A numeric display element of the summary bar.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StatWidget {
    RegionsTracked,
    TotalElections,
    Category(Category),
}

impl StatWidget {
    /// The element id used by the page for this widget.
    pub fn element_id(&self) -> &'static str {
        match self {
            StatWidget::RegionsTracked => "sum-states",
            StatWidget::TotalElections => "sum-elections",
            StatWidget::Category(Category::Local) => "sum-local",
            StatWidget::Category(Category::State) => "sum-state",
            StatWidget::Category(Category::House) => "sum-house",
            StatWidget::Category(Category::Senate) => "sum-senate",
            StatWidget::Category(Category::Other) => "sum-ref",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatWidget::RegionsTracked => "States Tracked",
            StatWidget::TotalElections => "Elections",
            StatWidget::Category(Category::Local) => "Local",
            StatWidget::Category(Category::State) => "State",
            StatWidget::Category(Category::House) => "U.S. House",
            StatWidget::Category(Category::Senate) => "U.S. Senate",
            StatWidget::Category(Category::Other) => "Referendums",
        }
    }

    /// Value of this widget for the given statistics.
    pub fn value(&self, stats: &DatasetStats) -> u64 {
        match self {
            StatWidget::RegionsTracked => stats.regions_tracked,
            StatWidget::TotalElections => stats.total_elections,
            StatWidget::Category(c) => stats.count(*c),
        }
    }
}

/// Start delay and duration of the count-up of one widget.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct AnimationTiming {
    pub widget: StatWidget,
    pub delay: Duration,
    pub duration: Duration,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnimationSettings {
    pub timings: Vec<AnimationTiming>,
}

impl Default for AnimationSettings {
    /// Staggered by 100ms: the two totals over 1.2s, the categories over 1s.
    fn default() -> Self {
        let mut timings = vec![
            AnimationTiming {
                widget: StatWidget::RegionsTracked,
                delay: Duration::from_millis(0),
                duration: Duration::from_millis(1200),
            },
            AnimationTiming {
                widget: StatWidget::TotalElections,
                delay: Duration::from_millis(100),
                duration: Duration::from_millis(1200),
            },
        ];
        for (idx, c) in Category::ALL.iter().enumerate() {
            timings.push(AnimationTiming {
                widget: StatWidget::Category(*c),
                delay: Duration::from_millis(200 + 100 * idx as u64),
                duration: Duration::from_millis(1000),
            });
        }
        AnimationSettings { timings }
    }
}

/// Invalid configuration values.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ConfigError {
    InvalidColor(String),
}

impl Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidColor(s) => write!(f, "invalid color {:?}", s),
        }
    }
}

impl StylePolicy {
    /// Checks every color of the policy. Colors deserialized from a file are
    /// not validated until this is called.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut colors: Vec<&Color> = vec![
            &self.base.fill,
            &self.base.hover,
            &self.default.fill,
            &self.default.hover,
        ];
        for r in self.rules.iter() {
            colors.push(&r.fill);
            colors.push(&r.hover);
            colors.extend(r.label_fill.iter());
            colors.extend(r.label_hover.iter());
        }
        for c in colors {
            Color::new(c.as_str())?;
        }
        Ok(())
    }
}
