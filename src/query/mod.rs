//! Query translation: time-range resolution, sort whitelisting and the
//! filter predicate builder.
//!
//! User-supplied values only ever reach the database as positional
//! parameters. Clause text is fixed at compile time and the sort field and
//! direction are closed enums, so nothing request-controlled can enter the
//! query text itself.

use crate::domain::HistoryFilters;

/// Time-range token used when a stats request doesn't name one.
pub const DEFAULT_TIME_RANGE: &str = "7d";

/// Inclusive `[start, end]` bound on `last_visited_time`, in epoch seconds.
///
/// A window is always fully bound; "no time constraint" is `None` at the
/// call site, never a half-open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Resolve a time-range token against `now`.
    ///
    /// An empty token and the literal `all` mean no constraint. A token with
    /// exactly one `-` is a custom `start-end` epoch pair; if either half
    /// fails to parse the token degrades to no constraint rather than
    /// erroring. Everything else is matched against the preset windows
    /// (`1d`, `7d`, `30d`, `90d`); unknown tokens degrade the same way.
    pub fn resolve(token: &str, now: i64) -> Option<Self> {
        if token.is_empty() || token == "all" {
            return None;
        }

        let parts: Vec<&str> = token.split('-').collect();
        if parts.len() == 2 {
            return match (parts[0].parse(), parts[1].parse()) {
                (Ok(start), Ok(end)) => Some(Self { start, end }),
                _ => None,
            };
        }

        let secs = match token {
            "1d" => 86_400,
            "7d" => 604_800,
            "30d" => 2_592_000,
            "90d" => 7_776_000,
            _ => return None,
        };

        Some(Self {
            start: now - secs,
            end: now,
        })
    }
}

/// Sortable columns. Tokens outside the whitelist silently fall back to
/// [`SortField::LastVisitedTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Title,
    #[default]
    LastVisitedTime,
    NumVisits,
}

impl SortField {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("title") => Self::Title,
            Some("lastVisitedTime") => Self::LastVisitedTime,
            Some("numVisits") => Self::NumVisits,
            _ => Self::LastVisitedTime,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::LastVisitedTime => "last_visited_time",
            Self::NumVisits => "num_visits",
        }
    }
}

/// Sort direction. An omitted token is the request default and sorts
/// descending; any explicit token other than exactly `desc` sorts
/// ascending — including `DESC` and the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            None | Some("desc") => Self::Desc,
            Some(_) => Self::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A positional query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// An ordered AND-conjunction of conditions plus the parameter list matching
/// its placeholders: the Nth `?` in the rendered clause binds the Nth
/// parameter.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    clauses: Vec<&'static str>,
    params: Vec<SqlParam>,
}

impl Predicate {
    pub fn push(&mut self, clause: &'static str, params: impl IntoIterator<Item = SqlParam>) {
        self.clauses.push(clause);
        self.params.extend(params);
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render as a ` WHERE ...` fragment, or an empty string when no
    /// conditions apply (matches all records).
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Build the record filter for a set of criteria.
    ///
    /// Keyword matching is a substring match over `title` and `url` via
    /// SQLite `LIKE`: case-insensitive for ASCII, case-sensitive beyond.
    /// Locale is exact equality; the time range is resolved via
    /// [`TimeWindow::resolve`] and contributes nothing when unresolved.
    pub fn from_filters(filters: &HistoryFilters, now: i64) -> Self {
        let mut predicate = Self::default();

        if let Some(keyword) = filters.keyword.as_deref().filter(|k| !k.is_empty()) {
            let pattern = format!("%{keyword}%");
            predicate.push(
                "(title LIKE ? OR url LIKE ?)",
                [SqlParam::Text(pattern.clone()), SqlParam::Text(pattern)],
            );
        }

        if let Some(locale) = filters.locale.as_deref().filter(|l| !l.is_empty()) {
            predicate.push("locale = ?", [SqlParam::Text(locale.to_string())]);
        }

        if let Some(window) = filters
            .time_range
            .as_deref()
            .and_then(|token| TimeWindow::resolve(token, now))
        {
            predicate.push(
                "last_visited_time BETWEEN ? AND ?",
                [SqlParam::Int(window.start), SqlParam::Int(window.end)],
            );
        }

        predicate
    }
}
