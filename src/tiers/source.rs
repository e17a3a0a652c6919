use crate::api::client::fetch_text;
use crate::error::AppError;
use crate::players::Position;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

use super::matcher::TierList;

/// League reception scoring, which picks the RB/WR/TE tier file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMode {
    Standard,
    Half,
    Ppr,
}

impl ScoringMode {
    /// Buckets `scoring_settings.rec` to the nearest supported mode.
    pub fn from_rec(rec: Option<f64>) -> Self {
        match rec {
            Some(r) if r >= 0.75 => ScoringMode::Ppr,
            Some(r) if r >= 0.25 => ScoringMode::Half,
            _ => ScoringMode::Standard,
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            ScoringMode::Standard => "",
            ScoringMode::Half => "-HALF",
            ScoringMode::Ppr => "-PPR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::Standard => "Standard",
            ScoringMode::Half => "Half PPR",
            ScoringMode::Ppr => "PPR",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn tier_url(base: &str, position: Position, scoring: ScoringMode) -> String {
    let suffix = if position.scoring_sensitive() {
        scoring.file_suffix()
    } else {
        ""
    };
    format!("{}/text_{}{}.txt", base, position.tier_key(), suffix)
}

/// Where raw tier text comes from.
pub trait TierSource {
    fn fetch(&self, position: Position, scoring: ScoringMode) -> Result<String, AppError>;
}

pub struct HttpTierSource {
    base: String,
}

impl HttpTierSource {
    pub fn new(base: &str) -> Self {
        HttpTierSource {
            base: base.to_string(),
        }
    }
}

impl TierSource for HttpTierSource {
    fn fetch(&self, position: Position, scoring: ScoringMode) -> Result<String, AppError> {
        fetch_text(&tier_url(&self.base, position, scoring))
    }
}

/// Tier lists fetched during one run, shared by leagues with the same scoring.
#[derive(Default)]
pub struct TierBook {
    lists: HashMap<(Position, ScoringMode), TierList>,
}

impl TierBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        source: &dyn TierSource,
        position: Position,
        scoring: ScoringMode,
    ) -> Result<&TierList, AppError> {
        // QB/K/DST lists are the same file in every scoring mode
        let key_scoring = if position.scoring_sensitive() {
            scoring
        } else {
            ScoringMode::Standard
        };
        let key = (position, key_scoring);

        if !self.lists.contains_key(&key) {
            let text = source.fetch(position, key_scoring)?;
            let list = TierList::from_text(&text);
            info!(%position, scoring = %key_scoring, tiers = list.len(), "loaded tier list");
            self.lists.insert(key, list);
        }
        Ok(&self.lists[&key])
    }

    /// Every position's list for one league's scoring mode.
    pub fn league(
        &mut self,
        source: &dyn TierSource,
        scoring: ScoringMode,
    ) -> Result<LeagueTiers, AppError> {
        let mut lists = HashMap::new();
        for position in Position::ALL {
            lists.insert(position, self.get(source, position, scoring)?.clone());
        }
        Ok(LeagueTiers { scoring, lists })
    }
}

#[derive(Debug, Clone)]
pub struct LeagueTiers {
    pub scoring: ScoringMode,
    lists: HashMap<Position, TierList>,
}

impl LeagueTiers {
    pub fn new(scoring: ScoringMode, lists: HashMap<Position, TierList>) -> Self {
        LeagueTiers { scoring, lists }
    }

    pub fn get(&self, position: Position) -> Option<&TierList> {
        self.lists.get(&position)
    }
}
