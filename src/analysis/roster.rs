use crate::players::{PlayerDirectory, Position};
use crate::tiers::matcher::{MatchMode, Tier};
use crate::tiers::source::LeagueTiers;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Sleeper fills empty lineup slots with this id.
const EMPTY_SLOT: &str = "0";

#[derive(Debug, Clone, PartialEq)]
pub struct TierEntry {
    pub name: String,
    pub tier: u32,
}

/// Players of one lineup group (starters or bench) resolved against tier lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSummary {
    pub by_position: BTreeMap<Position, Vec<TierEntry>>,
    pub unranked: Vec<String>,
}

impl GroupSummary {
    pub fn ranked_count(&self) -> usize {
        self.by_position.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_count() == 0 && self.unranked.is_empty()
    }

    /// Mean tier over ranked players; `None` when nobody is ranked.
    pub fn average(&self) -> Option<f64> {
        let count = self.ranked_count();
        if count == 0 {
            return None;
        }
        let sum: u32 = self
            .by_position
            .values()
            .flat_map(|entries| entries.iter().map(|e| e.tier))
            .sum();
        Some(sum as f64 / count as f64)
    }
}

/// Roster pool minus starters, in pool order, without duplicates.
pub fn bench(players: &[String], starters: &[String]) -> Vec<String> {
    let starting: HashSet<&str> = starters.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    players
        .iter()
        .filter(|id| id.as_str() != EMPTY_SLOT && !starting.contains(id.as_str()))
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

pub fn summarize(
    ids: &[String],
    directory: &PlayerDirectory,
    tiers: &LeagueTiers,
    mode: MatchMode,
) -> GroupSummary {
    let mut summary = GroupSummary::default();

    for id in ids.iter().filter(|id| id.as_str() != EMPTY_SLOT) {
        let Some(player) = directory.get(id) else {
            debug!(id = %id, "player id missing from directory");
            continue;
        };
        let name = player.full_name();
        let tier = tiers
            .get(player.position)
            .map(|list| list.find_tier(&name, mode))
            .unwrap_or(Tier::Unranked);

        match tier {
            Tier::Ranked(n) => summary
                .by_position
                .entry(player.position)
                .or_default()
                .push(TierEntry { name, tier: n }),
            Tier::Unranked => summary.unranked.push(name),
        }
    }

    // stable: ties keep roster order
    for entries in summary.by_position.values_mut() {
        entries.sort_by_key(|e| e.tier);
    }

    summary
}
