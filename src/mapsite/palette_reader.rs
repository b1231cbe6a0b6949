use std::fs;

use crate::mapsite::*;

/// Reads a palette file. Every color is checked before the policy is returned.
pub fn read_palette(path: &str) -> MapResult<StylePolicy> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let policy: StylePolicy = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    policy.validate().context(InvalidPaletteSnafu { path })?;
    debug!("read_palette: {} rules from {:?}", policy.rules.len(), path);
    Ok(policy)
}
