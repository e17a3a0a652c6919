use crate::analysis::matchup::{compare, Comparison};
use crate::display::report::format_average;
use crate::pipeline::Report;
use colored::*;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct LeagueRow {
    league: String,
    scoring: String,
    starters: String,
    average: String,
    opponent: String,
}

/// Console recap printed after the report file is written.
pub fn display_summary(report: &Report, written_to: Option<&Path>) {
    println!(
        "\n{}",
        format!("🏈 Tiers for {} (Week {}, {})", report.username, report.week, report.season)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if report.leagues.is_empty() {
        println!("{}", "No leagues with a roster for this user".yellow());
        return;
    }

    let mut rows = vec![];
    for league in &report.leagues {
        let mine = league.average();
        let theirs = league.opponent_average();
        let average = match (mine, theirs) {
            (Some(m), Some(t)) => match compare(m, t) {
                Comparison::Ahead => format_average(mine).green().to_string(),
                Comparison::Behind => format_average(mine).red().to_string(),
                Comparison::Even => format_average(mine).yellow().to_string(),
            },
            _ => format_average(mine),
        };
        let opponent = if league.opponent.is_some() {
            format_average(theirs)
        } else {
            "-".to_string()
        };

        rows.push(LeagueRow {
            league: league.name.clone(),
            scoring: league.scoring.label().to_string(),
            starters: format!(
                "{} ranked / {} unranked",
                league.starters.ranked_count(),
                league.starters.unranked.len()
            ),
            average,
            opponent,
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!("• Average: mean tier of ranked starters (lower is better)\n");

    if let Some(path) = written_to {
        display_success(&format!("Report written to {}", path.display()));
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
