use crate::api::models::{PlayerDto, PlayersDto};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Fantasy positions covered by the tier source, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DEF,
    ];

    /// Name used by the tier source and in reports. Sleeper says DEF, the tiers say DST.
    pub fn tier_key(self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DST",
        }
    }

    /// Whether the tier file depends on reception scoring.
    pub fn scoring_sensitive(self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tier_key())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "K" => Ok(Position::K),
            "DEF" | "DST" => Ok(Position::DEF),
            other => Err(format!("unsupported position {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub team: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    fn from_dto(id: String, dto: PlayerDto) -> Option<Self> {
        let position = dto.position.as_deref()?.parse().ok()?;
        Some(Player {
            id,
            first_name: dto.first_name.unwrap_or_default(),
            last_name: dto.last_name.unwrap_or_default(),
            position,
            team: dto.team,
        })
    }
}

/// Read-only lookup of players by Sleeper id.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: HashMap<String, Player>,
}

impl PlayerDirectory {
    /// Players without a supported position are dropped.
    pub fn from_dto(dto: PlayersDto) -> Self {
        let players = dto
            .into_iter()
            .filter_map(|(id, p)| Player::from_dto(id.clone(), p).map(|player| (id, player)))
            .collect();
        PlayerDirectory { players }
    }

    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        PlayerDirectory {
            players: players.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
