use crate::analysis::matchup::{compare, round2, Comparison};
use crate::analysis::roster::GroupSummary;
use crate::error::AppError;
use crate::pipeline::{LeagueReport, Report};
use clap::ValueEnum;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Where a template wants the report body; without it the body is appended.
pub const TEMPLATE_MARKER: &str = "<!-- tiers -->";

const TROPHY: &str = "&#127942;";
const DOWN: &str = "&#128201;";
const NEUTRAL: &str = "&#128528;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Html,
    Text,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
        }
    }
}

pub fn render(report: &Report, format: ReportFormat, template: Option<&str>) -> String {
    match format {
        ReportFormat::Html => wrap_html(&render_html_body(report), template),
        ReportFormat::Text => render_text(report),
    }
}

/// `<dir>/tiers_<username>.<ext>`, with anything but `[A-Za-z0-9_-]` in the name replaced.
pub fn report_path(dir: &Path, username: &str, format: ReportFormat) -> PathBuf {
    let safe: String = username
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!("tiers_{}.{}", safe, format.extension()))
}

/// Replaces any previous report in one write, so a failed run never leaves half a file.
pub fn write_report(
    dir: &Path,
    username: &str,
    format: ReportFormat,
    contents: &str,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;
    let path = report_path(dir, username, format);
    fs::write(&path, contents)?;
    Ok(path)
}

pub fn wrap_html(body: &str, template: Option<&str>) -> String {
    match template {
        Some(t) if t.contains(TEMPLATE_MARKER) => t.replacen(TEMPLATE_MARKER, body, 1),
        Some(t) => format!("{}\n{}</body>\n</html>\n", t, body),
        None => format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Tiers</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        ),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Display form of an average, "-" when there is nothing to average.
pub fn format_average(avg: Option<f64>) -> String {
    avg.map(|a| format!("{:.2}", round2(a)))
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_html_body(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<h5>Username: {} - Week {}</h5>",
        escape_html(&report.username),
        report.week
    );
    out.push_str("<div class=\"flex-container container\">\n");
    for league in &report.leagues {
        html_league(&mut out, league);
    }
    out.push_str("</div>\n<br>\n");
    out
}

fn html_league(out: &mut String, league: &LeagueReport) {
    out.push_str("<table class=\"table-fill\">\n");
    let _ = writeln!(
        out,
        "<tr><th class=\"league-title\" colspan=\"2\">League: {} ({}) | Starters</th></tr>",
        escape_html(&league.name),
        league.scoring.label()
    );
    html_group(out, &league.starters);

    for (glyph, label, value) in average_lines(league) {
        let prefix = glyph.map(|g| format!("{} ", g)).unwrap_or_default();
        let _ = writeln!(
            out,
            "<tr><td colspan=\"2\" style=\"text-align: center\">{}{} {}</td></tr>",
            prefix, label, value
        );
    }

    out.push_str("<tr><th colspan=\"2\" style=\"text-align:center;\">Bench</th></tr>\n");
    html_group(out, &league.bench);
    out.push_str("</table>\n");
}

fn html_group(out: &mut String, group: &GroupSummary) {
    for (position, entries) in &group.by_position {
        let _ = writeln!(out, "<tr><th>{}</th><th>Tier</th></tr>", position);
        for entry in entries {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&entry.name),
                entry.tier
            );
        }
    }

    if !group.unranked.is_empty() {
        out.push_str("<tr><th colspan=\"2\" style=\"text-align: center\">Not Ranked</th></tr>\n");
        for name in &group.unranked {
            let _ = writeln!(out, "<tr><td colspan=\"2\">{}</td></tr>", escape_html(name));
        }
    }
}

/// (glyph, label, value) per line; glyphs only appear when both sides have an average.
fn average_lines(league: &LeagueReport) -> Vec<(Option<&'static str>, &'static str, String)> {
    let mine = league.average();
    let theirs = league.opponent_average();

    match (mine, theirs) {
        (Some(m), Some(t)) => {
            let (my_glyph, their_glyph) = match compare(m, t) {
                Comparison::Ahead => (TROPHY, DOWN),
                Comparison::Behind => (DOWN, TROPHY),
                Comparison::Even => (NEUTRAL, NEUTRAL),
            };
            vec![
                (Some(my_glyph), "Average Tier", format_average(mine)),
                (Some(their_glyph), "Opponent Average Tier", format_average(theirs)),
            ]
        }
        _ if league.opponent.is_some() => vec![
            (None, "Average Tier", format_average(mine)),
            (None, "Opponent Average Tier", format_average(theirs)),
        ],
        _ => vec![(None, "Average Tier", format_average(mine))],
    }
}

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Pos")]
    position: String,
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Tier")]
    tier: String,
}

fn text_rows(group: &GroupSummary) -> Vec<TierRow> {
    let ranked = group.by_position.iter().flat_map(|(position, entries)| {
        entries.iter().map(move |e| TierRow {
            position: position.to_string(),
            player: e.name.clone(),
            tier: e.tier.to_string(),
        })
    });
    let unranked = group.unranked.iter().map(|name| TierRow {
        position: "?".to_string(),
        player: name.clone(),
        tier: "Not Ranked".to_string(),
    });
    ranked.chain(unranked).collect()
}

fn text_table(group: &GroupSummary) -> String {
    let rows = text_rows(group);
    if rows.is_empty() {
        return "(none)".to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn text_glyph(html_glyph: &str) -> &'static str {
    match html_glyph {
        TROPHY => "🏆",
        DOWN => "📉",
        _ => "😐",
    }
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Username: {} - Week {}", report.username, report.week);

    for league in &report.leagues {
        let title = format!("League: {} ({})", league.name, league.scoring.label());
        let _ = writeln!(out, "\n{}\n{}", title, "=".repeat(title.chars().count()));
        let _ = writeln!(out, "Starters\n{}", text_table(&league.starters));
        for (glyph, label, value) in average_lines(league) {
            match glyph {
                Some(g) => {
                    let _ = writeln!(out, "{} {} {}", text_glyph(g), label, value);
                }
                None => {
                    let _ = writeln!(out, "{} {}", label, value);
                }
            }
        }
        let _ = writeln!(out, "\nBench\n{}", text_table(&league.bench));
    }
    out
}
