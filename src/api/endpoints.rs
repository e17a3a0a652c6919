// Sleeper REST endpoint builders, relative to the configured API base

/// The username is a single path segment, so it is percent-encoded.
pub fn user(base: &str, username: &str) -> String {
    format!("{}/user/{}", base, urlencoding::encode(username))
}

pub fn leagues(base: &str, user_id: &str, sport: &str, season: &str) -> String {
    format!("{}/user/{}/leagues/{}/{}", base, user_id, sport, season)
}

pub fn rosters(base: &str, league_id: &str) -> String {
    format!("{}/league/{}/rosters", base, league_id)
}

pub fn matchups(base: &str, league_id: &str, week: u32) -> String {
    format!("{}/league/{}/matchups/{}", base, league_id, week)
}

pub fn players(base: &str, sport: &str) -> String {
    format!("{}/players/{}", base, sport)
}

pub fn state(base: &str, sport: &str) -> String {
    format!("{}/state/{}", base, sport)
}
