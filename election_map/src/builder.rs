pub use crate::dataset::*;

/// A builder for assembling a dataset in code.
///
/// Elections and candidates attach to the most recently added region and
/// election respectively.
///
/// ```
/// use election_map::builder::DatasetBuilder;
/// use election_map::{Category, LoadFailure};
///
/// let dataset = DatasetBuilder::new()
///     .last_updated("2024-09-01T12:00:00Z")
///     .region("CA", "California")
///     .registration(Some("2024-10-21"), Some("https://registertovote.ca.gov/"))
///     .election("Governor", Category::State)
///     .date("2024-11-05")
///     .candidate("Alice", "Democratic", true)
///     .candidate("Bob", "Republican", false)
///     .build()?;
///
/// assert_eq!(dataset.election_data.len(), 1);
/// # Ok::<(), LoadFailure>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    _last_updated: Option<String>,
    _contact_email: Option<String>,
    _regions: Vec<(String, RegionRecord)>,
    _errors: Vec<String>,
}

impl DatasetBuilder {
    pub fn new() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn last_updated(mut self, ts: &str) -> DatasetBuilder {
        self._last_updated = Some(ts.to_string());
        self
    }

    pub fn contact_email(mut self, email: &str) -> DatasetBuilder {
        self._contact_email = Some(email.to_string());
        self
    }

    /// Starts a new region.
    pub fn region(mut self, code: &str, state_name: &str) -> DatasetBuilder {
        self._regions.push((
            code.to_string(),
            RegionRecord {
                state_name: state_name.to_string(),
                ..RegionRecord::default()
            },
        ));
        self
    }

    pub fn registration(mut self, deadline: Option<&str>, website: Option<&str>) -> DatasetBuilder {
        if let Some(r) = self.current_region("registration") {
            r.registration_deadline = deadline.map(|s| s.to_string());
            r.registration_website = website.map(|s| s.to_string());
        }
        self
    }

    pub fn concluded(mut self) -> DatasetBuilder {
        if let Some(r) = self.current_region("concluded") {
            r.elections_over = Some(true);
        }
        self
    }

    /// Adds an election to the current region.
    pub fn election(self, title: &str, category: Category) -> DatasetBuilder {
        self.election_record(ElectionRecord {
            title: title.to_string(),
            date: String::new(),
            kind: String::new(),
            chamber_impact: ChamberImpact::from(category),
            stakes: None,
            competitive: None,
            candidates: None,
        })
    }

    pub fn election_record(mut self, election: ElectionRecord) -> DatasetBuilder {
        if let Some(r) = self.current_region("election") {
            r.elections.push(election);
        }
        self
    }

    pub fn date(self, date: &str) -> DatasetBuilder {
        self.update_election("date", |e| e.date = date.to_string())
    }

    pub fn kind(self, kind: &str) -> DatasetBuilder {
        self.update_election("kind", |e| e.kind = kind.to_string())
    }

    pub fn stakes(self, stakes: &str) -> DatasetBuilder {
        self.update_election("stakes", |e| e.stakes = Some(stakes.to_string()))
    }

    pub fn competitive(self) -> DatasetBuilder {
        self.update_election("competitive", |e| e.competitive = Some(true))
    }

    pub fn candidate(self, name: &str, party: &str, incumbent: bool) -> DatasetBuilder {
        self.update_election("candidate", |e| {
            e.candidates
                .get_or_insert_with(Vec::new)
                .push(CandidateRecord {
                    name: name.to_string(),
                    party: Party::from(party.to_string()),
                    incumbent: Some(incumbent),
                })
        })
    }

    /// Finishes the dataset.
    ///
    /// Fails if a region code was used twice, or if an election detail was
    /// given before any region or election.
    pub fn build(self) -> Result<ElectionDataset, LoadFailure> {
        if let Some(msg) = self._errors.first() {
            return Err(LoadFailure::Malformed(msg.clone()));
        }
        let mut dataset = ElectionDataset {
            last_updated: self._last_updated,
            contact_email: self._contact_email,
            election_data: Default::default(),
        };
        for (code, region) in self._regions {
            if dataset.election_data.contains_key(&code) {
                return Err(LoadFailure::Malformed(format!(
                    "duplicate region code {:?}",
                    code
                )));
            }
            dataset.election_data.insert(code, region);
        }
        Ok(dataset)
    }

    fn current_region(&mut self, what: &str) -> Option<&mut RegionRecord> {
        if self._regions.is_empty() {
            self._errors.push(format!("{} given before any region", what));
        }
        self._regions.last_mut().map(|(_, r)| r)
    }

    fn update_election<F>(mut self, what: &str, f: F) -> DatasetBuilder
    where
        F: FnOnce(&mut ElectionRecord),
    {
        if self._regions.is_empty() {
            self._errors.push(format!("{} given before any region", what));
            return self;
        }
        match self
            ._regions
            .last_mut()
            .and_then(|(_, r)| r.elections.last_mut())
        {
            Some(e) => f(e),
            None => self._errors.push(format!("{} given before any election", what)),
        }
        self
    }
}
