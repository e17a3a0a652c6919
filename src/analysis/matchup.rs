use crate::api::models::{MatchupDto, RosterDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Ahead,
    Behind,
    Even,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Lower average tier is better. Averages are compared as displayed (2 decimals).
pub fn compare(mine: f64, theirs: f64) -> Comparison {
    let (mine, theirs) = (round2(mine), round2(theirs));
    if mine < theirs {
        Comparison::Ahead
    } else if mine > theirs {
        Comparison::Behind
    } else {
        Comparison::Even
    }
}

pub fn find_user_roster<'a>(rosters: &'a [RosterDto], user_id: &str) -> Option<&'a RosterDto> {
    rosters
        .iter()
        .find(|r| r.owner_id.as_deref() == Some(user_id))
}

/// The other side of `roster_id`'s matchup this week, if it has one.
pub fn find_opponent(matchups: &[MatchupDto], roster_id: u32) -> Option<&MatchupDto> {
    let matchup_id = matchups
        .iter()
        .find(|m| m.roster_id == roster_id)?
        .matchup_id?;

    matchups
        .iter()
        .find(|m| m.matchup_id == Some(matchup_id) && m.roster_id != roster_id)
}
