use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Header and footer lines printed on every page of the guide.
pub const DEFAULT_BOILERPLATE: [&str; 4] = [
    "Nature Farm Presentation",
    "Guia de Plantas",
    "Festival de Flores para",
    "Vendedores e Colaboradores",
];

static PAGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("hardcoded page number regex is valid"));
static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("hardcoded whitespace regex is valid"));
static LEADING_NUMBERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+\s+)+").expect("hardcoded leading numbers regex is valid")
});

/// Fixed set of header lines that never carry a plant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
    lines: BTreeSet<String>,
}

impl Boilerplate {
    #[must_use]
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines = DEFAULT_BOILERPLATE
            .iter()
            .map(|line| (*line).to_string())
            .collect::<BTreeSet<_>>();
        lines.extend(
            extra
                .into_iter()
                .map(Into::into)
                .map(|line: String| line.trim().to_string())
                .filter(|line| !line.is_empty()),
        );
        Self { lines }
    }

    /// True for denylisted lines and bare page numbers.
    #[must_use]
    pub fn is_noise(&self, line: &str) -> bool {
        self.lines.contains(line) || PAGE_NUMBER_RE.is_match(line)
    }

    /// Non-empty, trimmed lines of `header` that survive the denylist.
    #[must_use]
    pub fn header_lines<'a>(&self, header: &'a str) -> Vec<&'a str> {
        header
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !self.is_noise(line))
            .collect()
    }
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

/// Two-stage plant name recovery from the header lines of an entry page.
///
/// The primary heuristic joins the last two header lines (the guide often
/// wraps a name over two lines). When that yields something shorter than
/// `min_chars`, the header is scanned bottom-up for the first line that is
/// long enough and does not contain any of `fallback_excludes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecovery {
    pub min_chars: usize,
    pub fallback_excludes: Vec<String>,
}

impl Default for NameRecovery {
    fn default() -> Self {
        Self {
            min_chars: 3,
            fallback_excludes: vec!["Nature".to_string(), "Guia".to_string()],
        }
    }
}

impl NameRecovery {
    #[must_use]
    pub fn primary(&self, lines: &[&str]) -> String {
        match lines {
            [] => String::new(),
            [only] => only.trim().to_string(),
            [.., second_last, last] => format!("{second_last} {last}"),
        }
    }

    #[must_use]
    pub fn fallback_accepts(&self, line: &str) -> bool {
        line.chars().count() >= self.min_chars
            && !self
                .fallback_excludes
                .iter()
                .any(|excluded| line.contains(excluded.as_str()))
    }

    #[must_use]
    pub fn fallback<'a>(&self, lines: &[&'a str]) -> Option<&'a str> {
        lines
            .iter()
            .rev()
            .copied()
            .find(|line| self.fallback_accepts(line))
    }

    /// Best-effort name candidate, not yet normalized.
    #[must_use]
    pub fn recover(&self, lines: &[&str]) -> String {
        let candidate = self.primary(lines);
        if candidate.chars().count() >= self.min_chars {
            return candidate;
        }

        self.fallback(lines)
            .map_or(candidate, ToString::to_string)
    }
}

/// Collapses inner whitespace runs, trims `. : ; -` and whitespace from both
/// ends, and drops leading numeric tokens such as stray page numbers.
#[must_use]
pub fn normalize_plant_name(raw: &str) -> String {
    let collapsed = MULTI_SPACE_RE.replace_all(raw, " ");
    let trimmed = collapsed.trim_matches(is_name_edge);
    let without_numbers = LEADING_NUMBERS_RE.replace(trimmed, "");
    without_numbers.trim_matches(is_name_edge).to_string()
}

fn is_name_edge(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '.' | ':' | ';' | '-')
}
