use clap::ValueEnum;

/// Spelling differences between the tier source (left) and Sleeper (right).
pub const NAME_ALIASES: &[(&str, &str)] = &[
    ("D.K. Metcalf", "DK Metcalf"),
    ("Jeff Wilson Jr.", "Jeffery Wilson"),
    ("JaMycal Hasty", "Jamycal Hasty"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Ranked(u32),
    Unranked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MatchMode {
    /// First line containing the name, case-sensitive. "Mike Williams" also
    /// matches a line listing "Mike Williamson".
    #[default]
    Substring,
    /// Compare normalized comma-separated entries of each line.
    Exact,
}

/// Ordered tier lines for a single position; line N is tier N.
#[derive(Debug, Clone, Default)]
pub struct TierList {
    lines: Vec<String>,
}

impl TierList {
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|l| l.as_ref().trim_end().to_string())
            .filter(|l| !l.is_empty())
            .map(|l| apply_aliases(&l))
            .collect();
        TierList { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find_tier(&self, full_name: &str, mode: MatchMode) -> Tier {
        if full_name.trim().is_empty() {
            return Tier::Unranked;
        }

        let found = match mode {
            MatchMode::Substring => self.lines.iter().position(|l| l.contains(full_name)),
            MatchMode::Exact => {
                let wanted = normalize_name(full_name);
                self.lines.iter().position(|l| {
                    line_entries(l).any(|entry| normalize_name(entry) == wanted)
                })
            }
        };

        match found {
            Some(idx) => Tier::Ranked(idx as u32 + 1),
            None => Tier::Unranked,
        }
    }
}

fn apply_aliases(line: &str) -> String {
    NAME_ALIASES
        .iter()
        .fold(line.to_string(), |acc, (from, to)| acc.replace(from, to))
}

// "Tier 3: A, B, C" -> ["A", "B", "C"]
fn line_entries(line: &str) -> impl Iterator<Item = &str> {
    let body = match line.strip_prefix("Tier ") {
        Some(rest) => rest.split_once(':').map(|(_, names)| names).unwrap_or(rest),
        None => line,
    };
    body.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Lowercases, drops punctuation and generational suffixes, collapses spaces.
pub fn normalize_name(name: &str) -> String {
    let mut name = name.trim().to_lowercase().replace(&['.', ','][..], "");
    for suffix in [" jr", " sr", " ii", " iii", " iv", " v"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
    }
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
