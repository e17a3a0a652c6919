pub mod matchup;
pub mod roster;
