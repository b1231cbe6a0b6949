// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};

use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// The root document, as published in `elections.json`.
///
/// The dataset is read once and never patched afterwards: every consumer
/// receives a shared reference to the same immutable value.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionDataset {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,
    #[serde(rename = "contactEmail", default)]
    pub contact_email: Option<String>,
    /// Regions keyed by their two-letter code. Duplicate codes are rejected
    /// while parsing.
    #[serde(
        rename = "electionData",
        default,
        deserialize_with = "deserialize_unique_regions"
    )]
    pub election_data: BTreeMap<String, RegionRecord>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(rename = "stateName")]
    pub state_name: String,
    #[serde(rename = "registrationDeadline", default)]
    pub registration_deadline: Option<String>,
    #[serde(rename = "registrationWebsite", default)]
    pub registration_website: Option<String>,
    /// Marks the region's cycle as concluded.
    #[serde(rename = "electionsOver", default)]
    pub elections_over: Option<bool>,
    /// Display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub elections: Vec<ElectionRecord>,
}

impl RegionRecord {
    pub fn is_concluded(&self) -> bool {
        self.elections_over.unwrap_or(false)
    }

    pub fn has_registration_info(&self) -> bool {
        self.registration_deadline.is_some() || self.registration_website.is_some()
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(
        rename = "chamberImpact",
        default,
        deserialize_with = "null_as_default"
    )]
    pub chamber_impact: ChamberImpact,
    #[serde(default)]
    pub stakes: Option<String>,
    #[serde(default)]
    pub competitive: Option<bool>,
    #[serde(default)]
    pub candidates: Option<Vec<CandidateRecord>>,
}

impl ElectionRecord {
    pub fn category(&self) -> Category {
        self.chamber_impact.category()
    }

    pub fn is_competitive(&self) -> bool {
        self.competitive.unwrap_or(false)
    }

    pub fn has_incumbent(&self) -> bool {
        self.candidates
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .any(|c| c.is_incumbent())
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub party: Party,
    #[serde(default)]
    pub incumbent: Option<bool>,
}

impl CandidateRecord {
    pub fn is_incumbent(&self) -> bool {
        self.incumbent.unwrap_or(false)
    }
}

/// The closed set of categories used for counting, coloring and filtering.
///
/// Every value of `chamberImpact` outside the four known labels lands in
/// `Other`, and all consumers go through `ChamberImpact::category` so that the
/// fallback is applied in exactly one place.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    Local,
    State,
    House,
    Senate,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Local,
        Category::State,
        Category::House,
        Category::Senate,
        Category::Other,
    ];

    /// Parses a filter name. Matching is case-insensitive and `ref`,
    /// `referendum` and `referendums` are accepted for `Other`.
    pub fn from_filter(s: &str) -> Option<Category> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Category::Local),
            "state" => Some(Category::State),
            "house" => Some(Category::House),
            "senate" => Some(Category::Senate),
            "other" | "ref" | "referendum" | "referendums" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Local => "Local",
            Category::State => "State",
            Category::House => "House",
            Category::Senate => "Senate",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw `chamberImpact` value.
///
/// Unknown labels are kept verbatim (they are displayed on badges) but always
/// report `Category::Other`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChamberImpact {
    Local,
    State,
    House,
    Senate,
    Other(String),
}

impl ChamberImpact {
    pub fn category(&self) -> Category {
        match self {
            ChamberImpact::Local => Category::Local,
            ChamberImpact::State => Category::State,
            ChamberImpact::House => Category::House,
            ChamberImpact::Senate => Category::Senate,
            ChamberImpact::Other(_) => Category::Other,
        }
    }

    /// The text shown on badges.
    pub fn label(&self) -> &str {
        match self {
            ChamberImpact::Other(s) if s.trim().is_empty() => "Other",
            ChamberImpact::Other(s) => s.as_str(),
            known => known.category().as_str(),
        }
    }
}

impl Default for ChamberImpact {
    fn default() -> Self {
        ChamberImpact::Other(String::new())
    }
}

impl From<String> for ChamberImpact {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Local" => ChamberImpact::Local,
            "State" => ChamberImpact::State,
            "House" => ChamberImpact::House,
            "Senate" => ChamberImpact::Senate,
            _ => ChamberImpact::Other(s),
        }
    }
}

impl From<ChamberImpact> for String {
    fn from(c: ChamberImpact) -> Self {
        match c {
            ChamberImpact::Other(s) => s,
            known => known.category().as_str().to_string(),
        }
    }
}

impl From<Category> for ChamberImpact {
    fn from(c: Category) -> Self {
        match c {
            Category::Local => ChamberImpact::Local,
            Category::State => ChamberImpact::State,
            Category::House => ChamberImpact::House,
            Category::Senate => ChamberImpact::Senate,
            Category::Other => ChamberImpact::Other("Referendum".to_string()),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Party {
    Republican,
    Democratic,
    /// Any other affiliation, rendered as independent.
    Other(String),
}

impl Party {
    pub fn css_class(&self) -> &'static str {
        match self {
            Party::Republican => "republican",
            Party::Democratic => "democratic",
            Party::Other(_) => "independent",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Party::Republican => "Republican",
            Party::Democratic => "Democratic",
            Party::Other(s) if s.trim().is_empty() => "Independent",
            Party::Other(s) => s.as_str(),
        }
    }
}

impl Default for Party {
    fn default() -> Self {
        Party::Other(String::new())
    }
}

impl From<String> for Party {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Republican" => Party::Republican,
            "Democratic" => Party::Democratic,
            _ => Party::Other(s),
        }
    }
}

impl From<Party> for String {
    fn from(p: Party) -> Self {
        match p {
            Party::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// Errors that prevent a dataset from being handed to the rest of the page.
///
/// No partial dataset is ever exposed when one of these is returned.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LoadFailure {
    /// The resource could not be retrieved.
    Transport(String),
    /// The resource was retrieved but is not a valid dataset.
    Malformed(String),
}

impl Error for LoadFailure {}

impl Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadFailure::Transport(msg) => write!(f, "could not retrieve election data: {}", msg),
            LoadFailure::Malformed(msg) => write!(f, "malformed election data: {}", msg),
        }
    }
}

impl ElectionDataset {
    /// Parses a dataset from its JSON text.
    pub fn from_json_str(contents: &str) -> Result<ElectionDataset, LoadFailure> {
        let dataset: ElectionDataset = serde_json::from_str(contents)
            .map_err(|e| LoadFailure::Malformed(e.to_string()))?;
        debug!(
            "from_json_str: parsed {} regions",
            dataset.election_data.len()
        );
        Ok(dataset)
    }

    pub fn from_json_slice(contents: &[u8]) -> Result<ElectionDataset, LoadFailure> {
        let dataset: ElectionDataset = serde_json::from_slice(contents)
            .map_err(|e| LoadFailure::Malformed(e.to_string()))?;
        debug!(
            "from_json_slice: parsed {} regions",
            dataset.election_data.len()
        );
        Ok(dataset)
    }

    pub fn region(&self, code: &str) -> Option<&RegionRecord> {
        self.election_data.get(code)
    }

    /// All elections of the dataset, with the code of their region.
    pub fn elections(&self) -> impl Iterator<Item = (&str, &ElectionRecord)> {
        self.election_data
            .iter()
            .flat_map(|(code, r)| r.elections.iter().map(move |e| (code.as_str(), e)))
    }
}

/// A `null` value reads as the default of the field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_unique_regions<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, RegionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueRegions;

    impl<'de> Visitor<'de> for UniqueRegions {
        type Value = BTreeMap<String, RegionRecord>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map from region codes to region records")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(BTreeMap::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(BTreeMap::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(UniqueRegions)
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut res: BTreeMap<String, RegionRecord> = BTreeMap::new();
            while let Some((code, record)) = access.next_entry::<String, RegionRecord>()? {
                if res.contains_key(&code) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate region code {:?}",
                        code
                    )));
                }
                res.insert(code, record);
            }
            Ok(res)
        }
    }

    deserializer.deserialize_option(UniqueRegions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let ds = ElectionDataset::from_json_str(
            r#"{"lastUpdated":"2024-09-01T12:00:00Z",
                "electionData":{"CA":{"stateName":"California",
                  "elections":[{"title":"Governor","date":"2024-11-05","type":"General","chamberImpact":"State"}]}}}"#,
        )
        .unwrap();
        let ca = ds.region("CA").unwrap();
        assert_eq!(ca.state_name, "California");
        assert_eq!(ca.elections[0].category(), Category::State);
        assert_eq!(ds.contact_email, None);
    }

    #[test]
    fn missing_elections_defaults_to_empty() {
        let ds = ElectionDataset::from_json_str(
            r#"{"electionData":{"TX":{"stateName":"Texas","registrationDeadline":"2024-10-07"}}}"#,
        )
        .unwrap();
        let tx = ds.region("TX").unwrap();
        assert!(tx.elections.is_empty());
        assert!(tx.has_registration_info());
        assert!(!tx.is_concluded());
    }

    #[test]
    fn unknown_chamber_impact_falls_back_to_other() {
        let ds = ElectionDataset::from_json_str(
            r#"{"electionData":{"OH":{"stateName":"Ohio","elections":[
                {"title":"Issue 1","chamberImpact":"Ballot Measure"},
                {"title":"No impact given"}]}}}"#,
        )
        .unwrap();
        let es = &ds.region("OH").unwrap().elections;
        assert_eq!(es[0].category(), Category::Other);
        assert_eq!(es[0].chamber_impact.label(), "Ballot Measure");
        assert_eq!(es[1].category(), Category::Other);
        assert_eq!(es[1].chamber_impact.label(), "Other");
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let ds = ElectionDataset::from_json_str(
            r#"{"electionData":{
                "OH":{"stateName":"Ohio","elections":[
                  {"title":"Issue 2","date":null,"type":null,"chamberImpact":null,
                   "candidates":[{"name":"Pat","party":null}]}]},
                "ID":{"stateName":"Idaho","elections":null}}}"#,
        )
        .unwrap();
        let e = &ds.region("OH").unwrap().elections[0];
        assert_eq!(e.chamber_impact, ChamberImpact::Other(String::new()));
        assert_eq!(e.category(), Category::Other);
        assert_eq!(e.date, "");
        assert_eq!(e.kind, "");
        let party = &e.candidates.as_ref().unwrap()[0].party;
        assert_eq!(party, &Party::Other(String::new()));
        assert_eq!(party.css_class(), "independent");
        assert!(ds.region("ID").unwrap().elections.is_empty());

        let ds = ElectionDataset::from_json_str(r#"{"electionData":null}"#).unwrap();
        assert!(ds.election_data.is_empty());
    }

    #[test]
    fn party_classes() {
        assert_eq!(Party::from("Republican".to_string()).css_class(), "republican");
        assert_eq!(Party::from("Democratic".to_string()).css_class(), "democratic");
        assert_eq!(Party::from("Green".to_string()).css_class(), "independent");
        assert_eq!(Party::from("Green".to_string()).label(), "Green");
    }

    #[test]
    fn duplicate_region_codes_are_malformed() {
        let res = ElectionDataset::from_json_str(
            r#"{"electionData":{"CA":{"stateName":"California"},"CA":{"stateName":"Again"}}}"#,
        );
        match res {
            Err(LoadFailure::Malformed(msg)) => assert!(msg.contains("duplicate region code")),
            x => panic!("expected a malformed document, got {:?}", x),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            ElectionDataset::from_json_str("<html>404</html>"),
            Err(LoadFailure::Malformed(_))
        ));
    }

    #[test]
    fn filter_names() {
        assert_eq!(Category::from_filter("house"), Some(Category::House));
        assert_eq!(Category::from_filter("Referendums"), Some(Category::Other));
        assert_eq!(Category::from_filter("Governor"), None);
    }

    #[test]
    fn chamber_impact_serializes_back_to_label() {
        let s: String = ChamberImpact::from("Senate".to_string()).into();
        assert_eq!(s, "Senate");
        let s: String = ChamberImpact::from("Recall".to_string()).into();
        assert_eq!(s, "Recall");
    }
}
