//! The fetch → match → aggregate pipeline behind one report.
//!
//! Everything network-facing goes through [`SleeperApi`] and [`TierSource`],
//! so the whole run can be driven from in-memory data.

use crate::analysis::matchup::{find_opponent, find_user_roster};
use crate::analysis::roster::{bench, summarize, GroupSummary};
use crate::api::client::SleeperApi;
use crate::api::models::LeagueDto;
use crate::error::AppError;
use crate::players::PlayerDirectory;
use crate::tiers::matcher::MatchMode;
use crate::tiers::source::{ScoringMode, TierBook, TierSource};
use crate::week::{calendar_season, calendar_week};
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub week: Option<u32>,
    pub season: Option<String>,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone)]
pub struct SleeperUser {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct LeagueReport {
    pub league_id: String,
    pub name: String,
    pub scoring: ScoringMode,
    pub starters: GroupSummary,
    pub bench: GroupSummary,
    pub opponent: Option<GroupSummary>,
}

impl LeagueReport {
    pub fn average(&self) -> Option<f64> {
        self.starters.average()
    }

    pub fn opponent_average(&self) -> Option<f64> {
        self.opponent.as_ref().and_then(GroupSummary::average)
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub username: String,
    pub week: u32,
    pub season: String,
    pub leagues: Vec<LeagueReport>,
}

/// Looks the username up; an unknown name is the one error reported as such.
pub fn resolve_user(api: &dyn SleeperApi, username: &str) -> Result<SleeperUser, AppError> {
    // "." and ".." survive percent-encoding and would be collapsed as dot segments
    if username.trim().is_empty() || username.chars().all(|c| c == '.') {
        return Err(AppError::InvalidUsername(username.to_string()));
    }
    let Some(user) = api.get_user(username)? else {
        return Err(AppError::InvalidUsername(username.to_string()));
    };
    let Some(user_id) = user.user_id else {
        return Err(AppError::InvalidUsername(username.to_string()));
    };

    Ok(SleeperUser {
        user_id,
        username: user.username.unwrap_or_else(|| username.to_string()),
    })
}

/// Explicit options win, then Sleeper's sport state, then the calendar.
pub fn resolve_week_and_season(
    api: &dyn SleeperApi,
    options: &ReportOptions,
    today: NaiveDate,
) -> (u32, String) {
    let state = if options.week.is_some() && options.season.is_some() {
        None
    } else {
        match api.get_state() {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "sport state unavailable, falling back to calendar");
                None
            }
        }
    };

    let week = options
        .week
        .or_else(|| state.as_ref().map(|s| s.week.max(1)))
        .unwrap_or_else(|| calendar_week(today));
    let season = options
        .season
        .clone()
        .or_else(|| state.and_then(|s| s.season))
        .unwrap_or_else(|| calendar_season(today));

    (week, season)
}

#[allow(clippy::too_many_arguments)]
pub fn build_report(
    api: &dyn SleeperApi,
    source: &dyn TierSource,
    directory: &PlayerDirectory,
    user: &SleeperUser,
    week: u32,
    season: &str,
    options: &ReportOptions,
    mut on_league: impl FnMut(&LeagueDto),
) -> Result<Report, AppError> {
    let leagues = api.get_leagues(&user.user_id, season)?;
    info!(count = leagues.len(), season, "fetched leagues");
    if leagues.is_empty() {
        return Err(AppError::NoLeagues {
            username: user.username.clone(),
            season: season.to_string(),
        });
    }

    let mut book = TierBook::new();
    let mut reports = Vec::with_capacity(leagues.len());

    for league in &leagues {
        on_league(league);
        match build_league_report(api, source, &mut book, directory, user, league, week, options)? {
            Some(report) => reports.push(report),
            None => warn!(league = %league.name, "no roster owned by user, skipping"),
        }
    }

    Ok(Report {
        username: user.username.clone(),
        week,
        season: season.to_string(),
        leagues: reports,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_league_report(
    api: &dyn SleeperApi,
    source: &dyn TierSource,
    book: &mut TierBook,
    directory: &PlayerDirectory,
    user: &SleeperUser,
    league: &LeagueDto,
    week: u32,
    options: &ReportOptions,
) -> Result<Option<LeagueReport>, AppError> {
    let rosters = api.get_rosters(&league.league_id)?;
    let Some(roster) = find_user_roster(&rosters, &user.user_id) else {
        return Ok(None);
    };

    let scoring = ScoringMode::from_rec(league.scoring_settings.rec);
    let tiers = book.league(source, scoring)?;
    let mode = options.match_mode;

    let starters = summarize(&roster.starters, directory, &tiers, mode);
    let bench_ids = bench(&roster.players, &roster.starters);
    let bench = summarize(&bench_ids, directory, &tiers, mode);

    let matchups = api.get_matchups(&league.league_id, week)?;
    let opponent = find_opponent(&matchups, roster.roster_id)
        .map(|opp| summarize(&opp.starters, directory, &tiers, mode));

    info!(
        league = %league.name,
        %scoring,
        starters = starters.ranked_count(),
        bench = bench.ranked_count(),
        has_opponent = opponent.is_some(),
        "league summarized"
    );

    Ok(Some(LeagueReport {
        league_id: league.league_id.clone(),
        name: league.name.clone(),
        scoring,
        starters,
        bench,
        opponent,
    }))
}
