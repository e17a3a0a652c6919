use chrono::NaiveDate;
use sleeper_tiers::api::client::SleeperApi;
use sleeper_tiers::api::models::*;
use sleeper_tiers::display::report::{render, ReportFormat};
use sleeper_tiers::error::AppError;
use sleeper_tiers::pipeline::{
    build_report, resolve_user, resolve_week_and_season, ReportOptions, SleeperUser,
};
use sleeper_tiers::players::{PlayerDirectory, Position};
use sleeper_tiers::tiers::matcher::MatchMode;
use sleeper_tiers::tiers::source::{ScoringMode, TierSource};
use std::cell::RefCell;
use std::collections::HashMap;

struct FakeSleeper {
    leagues: Vec<LeagueDto>,
    rosters: HashMap<String, Vec<RosterDto>>,
    matchups: HashMap<String, Vec<MatchupDto>>,
    state: Option<SportStateDto>,
    matchup_weeks: RefCell<Vec<u32>>,
}

impl SleeperApi for FakeSleeper {
    fn get_user(&self, username: &str) -> Result<Option<UserDto>, AppError> {
        Ok(match username {
            "kiajon" => Some(UserDto {
                user_id: Some("u1".into()),
                username: Some("kiajon".into()),
                display_name: None,
            }),
            "ghost" => Some(UserDto {
                user_id: None,
                username: None,
                display_name: None,
            }),
            _ => None,
        })
    }

    fn get_leagues(&self, user_id: &str, _season: &str) -> Result<Vec<LeagueDto>, AppError> {
        assert_eq!(user_id, "u1");
        Ok(self.leagues.clone())
    }

    fn get_rosters(&self, league_id: &str) -> Result<Vec<RosterDto>, AppError> {
        Ok(self.rosters.get(league_id).cloned().unwrap_or_default())
    }

    fn get_matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupDto>, AppError> {
        self.matchup_weeks.borrow_mut().push(week);
        Ok(self.matchups.get(league_id).cloned().unwrap_or_default())
    }

    fn get_state(&self) -> Result<SportStateDto, AppError> {
        self.state
            .clone()
            .ok_or_else(|| AppError::HttpError("state unavailable".into()))
    }

    fn get_players(&self) -> Result<PlayersDto, AppError> {
        Ok(players())
    }
}

struct FakeTiers;

impl TierSource for FakeTiers {
    fn fetch(&self, position: Position, scoring: ScoringMode) -> Result<String, AppError> {
        let text = match (position, scoring) {
            (Position::QB, _) => "Tier 1: Josh Allen\nTier 2: Jalen Hurts\nTier 3: Joe Burrow",
            (Position::RB, ScoringMode::Ppr) => {
                "Tier 1: Christian McCaffrey\nTier 2: Bijan Robinson\nTier 3: Jeff Wilson Jr."
            }
            (Position::RB, _) => "Tier 1: Bijan Robinson\nTier 2: Christian McCaffrey",
            (Position::WR, _) => "Tier 1: CeeDee Lamb\nTier 2: D.K. Metcalf",
            (Position::TE, _) => "Tier 1: Travis Kelce",
            (Position::K, _) => "Tier 1: Justin Tucker",
            (Position::DEF, _) => "Tier 1: San Francisco 49ers\nTier 2: Buffalo Bills",
        };
        Ok(text.to_string())
    }
}

fn player(first: &str, last: &str, position: &str) -> PlayerDto {
    PlayerDto {
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        position: Some(position.into()),
        team: None,
    }
}

fn players() -> PlayersDto {
    let mut p = PlayersDto::new();
    p.insert("qb1".into(), player("Josh", "Allen", "QB"));
    p.insert("qb3".into(), player("Joe", "Burrow", "QB"));
    p.insert("rb1".into(), player("Christian", "McCaffrey", "RB"));
    p.insert("rb2".into(), player("Bijan", "Robinson", "RB"));
    p.insert("rb3".into(), player("Jeffery", "Wilson", "RB"));
    p.insert("wr2".into(), player("DK", "Metcalf", "WR"));
    p.insert("wrx".into(), player("Undrafted", "Rookie", "WR"));
    p.insert("te1".into(), player("Travis", "Kelce", "TE"));
    p.insert("buf".into(), player("Buffalo", "Bills", "DEF"));
    p
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn league(id: &str, name: &str, rec: Option<f64>) -> LeagueDto {
    LeagueDto {
        league_id: id.into(),
        name: name.into(),
        season: Some("2024".into()),
        scoring_settings: ScoringSettings { rec },
    }
}

fn roster(roster_id: u32, owner: &str, starters: &[&str], players: &[&str]) -> RosterDto {
    RosterDto {
        roster_id,
        owner_id: Some(owner.into()),
        starters: ids(starters),
        players: ids(players),
    }
}

fn matchup(roster_id: u32, matchup_id: Option<u32>, starters: &[&str]) -> MatchupDto {
    MatchupDto {
        roster_id,
        matchup_id,
        starters: ids(starters),
        players: vec![],
    }
}

fn fake() -> FakeSleeper {
    let mut rosters = HashMap::new();
    rosters.insert(
        "ppr".to_string(),
        vec![
            roster(1, "u1", &["qb1", "rb3", "wr2", "buf"], &["qb1", "rb3", "wr2", "buf", "rb1", "wrx"]),
            roster(2, "u2", &["qb3", "rb2"], &["qb3", "rb2"]),
        ],
    );
    rosters.insert(
        "std".to_string(),
        vec![roster(7, "u1", &["rb1", "te1"], &["rb1", "te1", "qb3"])],
    );
    rosters.insert("other".to_string(), vec![roster(3, "someone", &[], &[])]);

    let mut matchups = HashMap::new();
    matchups.insert(
        "ppr".to_string(),
        vec![matchup(1, Some(4), &[]), matchup(2, Some(4), &["qb3", "rb2"])],
    );
    matchups.insert("std".to_string(), vec![matchup(7, None, &[])]);

    FakeSleeper {
        leagues: vec![
            league("ppr", "Full PPR Friends", Some(1.0)),
            league("std", "Old School", Some(0.0)),
            league("other", "Not Mine", Some(0.5)),
        ],
        rosters,
        matchups,
        state: Some(SportStateDto {
            week: 9,
            season: Some("2024".into()),
            season_type: Some("regular".into()),
        }),
        matchup_weeks: RefCell::new(vec![]),
    }
}

fn user() -> SleeperUser {
    SleeperUser {
        user_id: "u1".into(),
        username: "kiajon".into(),
    }
}

#[test]
fn unknown_username_is_reported() {
    let api = fake();
    assert!(matches!(
        resolve_user(&api, "nobody"),
        Err(AppError::InvalidUsername(name)) if name == "nobody"
    ));
    assert!(matches!(
        resolve_user(&api, "ghost"),
        Err(AppError::InvalidUsername(_))
    ));
    assert_eq!(resolve_user(&api, "kiajon").unwrap().user_id, "u1");
}

#[test]
fn blank_or_dot_usernames_never_reach_the_api() {
    let api = fake();
    for name in ["", "  ", ".", ".."] {
        assert!(
            matches!(resolve_user(&api, name), Err(AppError::InvalidUsername(_))),
            "{:?} should be rejected",
            name
        );
    }
}

#[test]
fn week_and_season_resolution_order() {
    let today = NaiveDate::from_ymd_opt(2024, 11, 13).unwrap();
    let mut api = fake();

    let (week, season) = resolve_week_and_season(&api, &ReportOptions::default(), today);
    assert_eq!((week, season.as_str()), (9, "2024"));

    let explicit = ReportOptions {
        week: Some(3),
        season: Some("2023".into()),
        ..ReportOptions::default()
    };
    let (week, season) = resolve_week_and_season(&api, &explicit, today);
    assert_eq!((week, season.as_str()), (3, "2023"));

    api.state = None;
    let (week, season) = resolve_week_and_season(&api, &ReportOptions::default(), today);
    assert_eq!((week, season.as_str()), (10, "2024"));
}

#[test]
fn builds_report_for_owned_leagues() {
    let api = fake();
    let directory = PlayerDirectory::from_dto(players());
    let mut visited = vec![];

    let report = build_report(
        &api,
        &FakeTiers,
        &directory,
        &user(),
        9,
        "2024",
        &ReportOptions::default(),
        |l| visited.push(l.name.clone()),
    )
    .unwrap();

    assert_eq!(visited.len(), 3);
    assert_eq!(report.leagues.len(), 2, "league without a user roster is skipped");
    assert_eq!(*api.matchup_weeks.borrow(), vec![9, 9]);

    let ppr = &report.leagues[0];
    assert_eq!(ppr.scoring, ScoringMode::Ppr);
    // QB 1, RB 3 (alias), WR 2 (alias), DST 2
    assert_eq!(ppr.starters.by_position[&Position::RB][0].tier, 3);
    assert_eq!(ppr.starters.by_position[&Position::WR][0].tier, 2);
    assert_eq!(ppr.average(), Some(2.0));
    assert_eq!(ppr.bench.by_position[&Position::RB][0].name, "Christian McCaffrey");
    assert_eq!(ppr.bench.unranked, vec!["Undrafted Rookie".to_string()]);
    // opponent: Burrow 3 + Robinson 2
    assert_eq!(ppr.opponent_average(), Some(2.5));

    let standard = &report.leagues[1];
    assert_eq!(standard.scoring, ScoringMode::Standard);
    assert_eq!(standard.starters.by_position[&Position::RB][0].tier, 2);
    assert!(standard.opponent.is_none());
    assert_eq!(standard.bench.by_position[&Position::QB][0].name, "Joe Burrow");

    let html = render(&report, ReportFormat::Html, None);
    assert!(html.contains("League: Full PPR Friends (PPR) | Starters"));
    assert!(html.contains("&#127942; Average Tier 2.00"));
    assert!(html.contains("&#128201; Opponent Average Tier 2.50"));
    assert!(html.contains("League: Old School (Standard) | Starters"));
}

#[test]
fn exact_matching_mode_flows_through() {
    let api = fake();
    let directory = PlayerDirectory::from_dto(players());
    let options = ReportOptions {
        match_mode: MatchMode::Exact,
        ..ReportOptions::default()
    };

    let report = build_report(&api, &FakeTiers, &directory, &user(), 9, "2024", &options, |_| {})
        .unwrap();
    assert_eq!(report.leagues[0].average(), Some(2.0));
}

#[test]
fn no_leagues_is_an_error() {
    let mut api = fake();
    api.leagues.clear();
    let directory = PlayerDirectory::from_dto(players());

    let result = build_report(
        &api,
        &FakeTiers,
        &directory,
        &user(),
        1,
        "2024",
        &ReportOptions::default(),
        |_| {},
    );
    assert!(matches!(result, Err(AppError::NoLeagues { .. })));
}

#[test]
fn unranked_starters_do_not_count_toward_the_average() {
    let mut api = fake();
    let ppr = api.rosters.get_mut("ppr").unwrap();
    ppr[0].starters.push("wrx".into());
    let directory = PlayerDirectory::from_dto(players());

    let report = build_report(
        &api,
        &FakeTiers,
        &directory,
        &user(),
        9,
        "2024",
        &ReportOptions::default(),
        |_| {},
    )
    .unwrap();

    let league = &report.leagues[0];
    assert_eq!(league.starters.unranked, vec!["Undrafted Rookie".to_string()]);
    assert!(league.bench.unranked.is_empty());
    // (1 + 3 + 2 + 2) / 4, the unranked starter is left out
    assert_eq!(league.average(), Some(2.0));
    assert_eq!(league.opponent_average(), Some(2.5));

    let html = render(&report, ReportFormat::Html, None);
    assert!(html.contains("&#127942; Average Tier 2.00"));
    assert!(html.contains("&#128201; Opponent Average Tier 2.50"));
}
