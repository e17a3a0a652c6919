use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// GET /user/{username}; the API answers `null` for unknown names
#[derive(Debug, Deserialize, Clone)]
pub struct UserDto {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScoringSettings {
    /// Points per reception.
    #[serde(default)]
    pub rec: Option<f64>,
}

// GET /user/{user_id}/leagues/{sport}/{season}
#[derive(Debug, Deserialize, Clone)]
pub struct LeagueDto {
    pub league_id: String,
    pub name: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub scoring_settings: ScoringSettings,
}

// GET /league/{league_id}/rosters
#[derive(Debug, Deserialize, Clone)]
pub struct RosterDto {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub players: Vec<String>,
}

// GET /league/{league_id}/matchups/{week}
#[derive(Debug, Deserialize, Clone)]
pub struct MatchupDto {
    pub roster_id: u32,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub players: Vec<String>,
}

// GET /state/{sport}
#[derive(Debug, Deserialize, Clone)]
pub struct SportStateDto {
    pub week: u32,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub season_type: Option<String>,
}

// One entry of GET /players/nfl, keyed by player id
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerDto {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

pub type PlayersDto = HashMap<String, PlayerDto>;

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ids: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(ids.unwrap_or_default().into_iter().flatten().collect())
}
