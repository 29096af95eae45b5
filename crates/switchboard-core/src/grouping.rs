//! Listing group projection.
//!
//! Groups agent records by their provenance label, treated as an opaque
//! key. The human-readable group label is a presentation-only transform
//! that extracts a trailing digit run; it is best-effort and can collide
//! across keys, which the listing accepts.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::agent::AgentRecord;

/// Sentinel group for records without a provenance label.
pub const UNGROUPED: &str = "Ungrouped";

static TRAILING_DIGITS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})$").expect("trailing digits regex should be valid"));

/// One listing group: the opaque key, its display label, and member
/// positions into the agent slice the projection was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentGroup {
    pub key: String,
    pub label: String,
    pub members: Vec<usize>,
}

/// Project the agent cache into groups, preserving first-seen group
/// order. Records with no label (or an empty one) fall into the
/// `Ungrouped` sentinel. Pure; recomputed whenever the cache changes.
pub fn group_agents(agents: &[AgentRecord]) -> Vec<AgentGroup> {
    let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (index, agent) in agents.iter().enumerate() {
        let key = agent
            .group_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(UNGROUPED);
        groups.entry(key).or_default().push(index);
    }

    groups
        .into_iter()
        .map(|(key, members)| AgentGroup {
            label: display_label(key),
            key: key.to_string(),
            members,
        })
        .collect()
}

/// Display label for a group key. The sentinel renders verbatim; other
/// keys drop a trailing `.json` and render their last 4 digits, if any,
/// as `Grouped Agent <digits>`.
pub fn display_label(key: &str) -> String {
    if key == UNGROUPED {
        return UNGROUPED.to_string();
    }
    let stem = key.strip_suffix(".json").unwrap_or(key);
    let digits = TRAILING_DIGITS_REGEX
        .captures(stem)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    format!("Grouped Agent {digits}")
}
