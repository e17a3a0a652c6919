use crate::config::Config;
use crate::error::AppError;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::models::*;

const USER_AGENT: &str = concat!("sleeper_tiers/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: u32 = 3;

/// Read side of the Sleeper API used by the report pipeline.
pub trait SleeperApi {
    /// `None` when Sleeper does not know the username.
    fn get_user(&self, username: &str) -> Result<Option<UserDto>, AppError>;
    fn get_leagues(&self, user_id: &str, season: &str) -> Result<Vec<LeagueDto>, AppError>;
    fn get_rosters(&self, league_id: &str) -> Result<Vec<RosterDto>, AppError>;
    fn get_matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupDto>, AppError>;
    fn get_state(&self) -> Result<SportStateDto, AppError>;
    fn get_players(&self) -> Result<PlayersDto, AppError>;
}

pub struct SleeperClient {
    base: String,
    sport: String,
}

impl SleeperClient {
    pub fn new(config: &Config) -> Self {
        SleeperClient {
            base: config.api_base.clone(),
            sport: config.sport.clone(),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        fetch_json(url)
    }
}

impl SleeperApi for SleeperClient {
    fn get_user(&self, username: &str) -> Result<Option<UserDto>, AppError> {
        self.get_json(&endpoints::user(&self.base, username))
    }

    fn get_leagues(&self, user_id: &str, season: &str) -> Result<Vec<LeagueDto>, AppError> {
        let url = endpoints::leagues(&self.base, user_id, &self.sport, season);
        let leagues: Option<Vec<LeagueDto>> = self.get_json(&url)?;
        Ok(leagues.unwrap_or_default())
    }

    fn get_rosters(&self, league_id: &str) -> Result<Vec<RosterDto>, AppError> {
        self.get_json(&endpoints::rosters(&self.base, league_id))
    }

    fn get_matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupDto>, AppError> {
        let matchups: Option<Vec<MatchupDto>> =
            self.get_json(&endpoints::matchups(&self.base, league_id, week))?;
        Ok(matchups.unwrap_or_default())
    }

    fn get_state(&self) -> Result<SportStateDto, AppError> {
        self.get_json(&endpoints::state(&self.base, &self.sport))
    }

    fn get_players(&self) -> Result<PlayersDto, AppError> {
        self.get_json(&endpoints::players(&self.base, &self.sport))
    }
}

/// Blocking GET returning the body as text. Meant for small payloads such as tier lists.
pub fn fetch_text(url: &str) -> Result<String, AppError> {
    send(url)?
        .into_string()
        .map_err(|e| AppError::HttpError(format!("{}: {}", url, e)))
}

/// Blocking GET decoding a JSON body straight from the response stream, so
/// large payloads like the player dataset are not size capped.
pub fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, AppError> {
    let reader = send(url)?.into_reader();
    serde_json::from_reader(reader).map_err(|e| AppError::JsonError(format!("{}: {}", url, e)))
}

/// Retries on 429 with linear backoff.
fn send(url: &str) -> Result<ureq::Response, AppError> {
    let mut retry_count = 0;

    loop {
        debug!(url, "GET");
        let response = ureq::get(url).set("User-Agent", USER_AGENT).call();

        match response {
            Ok(resp) => return Ok(resp),
            Err(ureq::Error::Status(429, _)) => {
                if retry_count >= MAX_RETRIES {
                    return Err(AppError::HttpError(format!("{}: rate limited", url)));
                }
                let wait_ms = 2000 * (retry_count + 1) as u64;
                warn!(url, wait_ms, "rate limited, backing off");
                thread::sleep(Duration::from_millis(wait_ms));
                retry_count += 1;
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(AppError::HttpError(format!("{} returned {}", url, code)));
            }
            Err(e) => {
                return Err(AppError::HttpError(format!("{}: {}", url, e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serves `body` once over HTTP/1.1 and returns the base URL.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            let _ = stream.write_all(&body);
        });
        format!("http://{}", addr)
    }

    #[test]
    fn decodes_json_bodies_over_ten_megabytes() {
        let filler = "x".repeat(11 * 1024 * 1024);
        let body = format!(r#"{{"4046":{{"first_name":"{}"}}}}"#, filler).into_bytes();
        let base = serve_once("200 OK", body);

        let players: PlayersDto = fetch_json(&format!("{}/players/nfl", base)).unwrap();
        assert_eq!(
            players["4046"].first_name.as_deref().map(str::len),
            Some(filler.len())
        );
    }

    #[test]
    fn error_status_is_an_http_error() {
        let base = serve_once("404 Not Found", b"null".to_vec());
        let result: Result<PlayersDto, AppError> = fetch_json(&format!("{}/players/nfl", base));
        assert!(matches!(result, Err(AppError::HttpError(msg)) if msg.contains("404")));
    }
}
