use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sleeper_tiers::api::client::SleeperClient;
use sleeper_tiers::cache::PlayerCache;
use sleeper_tiers::config::Config;
use sleeper_tiers::display::output::{display_error, display_info, display_success, display_summary};
use sleeper_tiers::display::report::{render, write_report, ReportFormat};
use sleeper_tiers::error::AppError;
use sleeper_tiers::logging::setup_logging;
use sleeper_tiers::pipeline::{build_report, resolve_user, resolve_week_and_season, ReportOptions};
use sleeper_tiers::tiers::matcher::MatchMode;
use sleeper_tiers::tiers::source::HttpTierSource;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sleeper_tiers")]
#[command(about = "Boris Chen tiers for every roster of a Sleeper user", long_about = None)]
struct Args {
    /// Sleeper username
    username: String,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Html)]
    format: ReportFormat,

    /// Directory receiving tiers_<username>.<html|txt>
    #[arg(short, long, default_value = "tiers")]
    output_dir: PathBuf,

    /// HTML template; the report goes at `<!-- tiers -->` or is appended
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// NFL week (default: current week from Sleeper)
    #[arg(short, long)]
    week: Option<u32>,

    /// Season year (default: current season from Sleeper)
    #[arg(long)]
    season: Option<String>,

    /// How player names are matched against tier lines
    #[arg(long = "match", value_enum, default_value_t = MatchMode::Substring)]
    match_mode: MatchMode,

    /// Re-download the player dataset even if the cached copy is fresh
    #[arg(long)]
    refresh: bool,

    /// Print the report instead of writing it to the output directory
    #[arg(long)]
    stdout: bool,

    /// Mirror log output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = Config::from_env()?;

    let _log_guard = match setup_logging(&config.log_dir, args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            display_error(&format!("logging disabled: {}", e));
            None
        }
    };

    let template = match &args.template {
        Some(path) if args.format == ReportFormat::Html => Some(fs::read_to_string(path)?),
        Some(_) => {
            display_info("--template only applies to HTML reports, ignoring it");
            None
        }
        None => None,
    };

    let options = ReportOptions {
        week: args.week,
        season: args.season.clone(),
        match_mode: args.match_mode,
    };
    let client = SleeperClient::new(&config);

    // Step 1: username -> user id
    display_info(&format!("Looking up Sleeper user {}...", args.username));
    let user = resolve_user(&client, &args.username)?;
    info!(username = %user.username, user_id = %user.user_id, "resolved user");

    // Step 2: week and season
    let (week, season) = resolve_week_and_season(&client, &options, Local::now().date_naive());
    display_success(&format!("Season {}, week {}", season, week));

    // Step 3: player dataset (cached)
    display_info("Loading player dataset...");
    let cache = PlayerCache::new(config.cache_dir.clone(), &config.sport);
    let directory = cache.load_or_refresh(&client, config.players_max_age_hours, args.refresh)?;
    display_success(&format!("{} players available", directory.len()));

    // Step 4: leagues, rosters, matchups and tiers
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let source = HttpTierSource::new(&config.tiers_base);
    let report = build_report(
        &client,
        &source,
        &directory,
        &user,
        week,
        &season,
        &options,
        |league| pb.set_message(format!("Matching tiers for {}", league.name)),
    );
    pb.finish_and_clear();
    let report = report?;
    display_success(&format!("{} leagues processed", report.leagues.len()));

    // Step 5: render and write
    let rendered = render(&report, args.format, template.as_deref());
    if args.stdout {
        println!("{}", rendered);
        display_summary(&report, None);
    } else {
        let path = write_report(&args.output_dir, &args.username, args.format, &rendered)?;
        info!(path = %path.display(), "report written");
        display_summary(&report, Some(&path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn exactly_one_username_is_required() {
        assert!(Args::try_parse_from(["sleeper_tiers"]).is_err());
        assert!(Args::try_parse_from(["sleeper_tiers", "a", "b"]).is_err());

        let args = Args::try_parse_from(["sleeper_tiers", "kiajon"]).unwrap();
        assert_eq!(args.username, "kiajon");
        assert_eq!(args.format, ReportFormat::Html);
        assert_eq!(args.match_mode, MatchMode::Substring);
        assert_eq!(args.output_dir, PathBuf::from("tiers"));
    }

    #[test]
    fn parses_format_and_match_flags() {
        let args = Args::try_parse_from([
            "sleeper_tiers",
            "kiajon",
            "-f",
            "text",
            "--match",
            "exact",
            "-w",
            "7",
        ])
        .unwrap();
        assert_eq!(args.format, ReportFormat::Text);
        assert_eq!(args.match_mode, MatchMode::Exact);
        assert_eq!(args.week, Some(7));
    }
}
