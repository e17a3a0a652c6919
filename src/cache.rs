use crate::api::client::SleeperApi;
use crate::api::models::PlayersDto;
use crate::error::AppError;
use crate::players::PlayerDirectory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct CachedPlayers {
    pub fetched_at: DateTime<Utc>,
    pub players: PlayersDto,
}

impl CachedPlayers {
    pub fn new(players: PlayersDto) -> Self {
        CachedPlayers {
            fetched_at: Utc::now(),
            players,
        }
    }

    pub fn is_stale_at(&self, max_age_hours: u64, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.num_minutes() > (max_age_hours as i64) * 60
    }

    pub fn is_stale(&self, max_age_hours: u64) -> bool {
        self.is_stale_at(max_age_hours, Utc::now())
    }
}

/// On-disk copy of the Sleeper player dataset. The full dataset is several
/// megabytes, so it is only re-downloaded once it goes stale.
pub struct PlayerCache {
    dir: PathBuf,
    sport: String,
}

impl PlayerCache {
    pub fn new(dir: PathBuf, sport: &str) -> Self {
        PlayerCache {
            dir,
            sport: sport.to_string(),
        }
    }

    pub fn get_cache_path(&self) -> PathBuf {
        self.dir.join(format!("players_{}.json", self.sport))
    }

    pub fn load(&self) -> Result<Option<CachedPlayers>, AppError> {
        let path = self.get_cache_path();

        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map(Some).map_err(|e| {
                AppError::JsonError(format!("Failed to parse player cache: {}", e))
            }),
            // Cache doesn't exist yet
            Err(_) => Ok(None),
        }
    }

    pub fn save(&self, cached: &CachedPlayers) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(cached).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize player cache: {}", e))
        })?;
        fs::write(self.get_cache_path(), json)?;
        Ok(())
    }

    /// Returns the cached dataset, downloading a fresh one when it is missing,
    /// unreadable, older than `max_age_hours`, or `force` is set.
    pub fn load_or_refresh(
        &self,
        api: &dyn SleeperApi,
        max_age_hours: u64,
        force: bool,
    ) -> Result<PlayerDirectory, AppError> {
        let cached = match self.load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "discarding unreadable player cache");
                None
            }
        };

        if let Some(cached) = cached {
            if !force && !cached.is_stale(max_age_hours) {
                info!(fetched_at = %cached.fetched_at, "using cached player dataset");
                return Ok(PlayerDirectory::from_dto(cached.players));
            }
        }

        info!("downloading player dataset");
        let fresh = CachedPlayers::new(api.get_players()?);
        if let Err(e) = self.save(&fresh) {
            warn!(error = %e, "failed to write player cache");
        }
        Ok(PlayerDirectory::from_dto(fresh.players))
    }
}
