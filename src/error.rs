use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Sorry, invalid Sleeper username. Please try again. ({0})")]
    InvalidUsername(String),

    #[error("No leagues found for {username} in the {season} season")]
    NoLeagues { username: String, season: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
