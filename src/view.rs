//! What the lists page shows: status filter, per-list search, deadline labels.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::models::{Todo, TodoList};

pub const DEADLINE_NOT_SET: &str = "not set";

const DEADLINE_FORMAT: &str = "%d.%m.%Y %H:%M";
const DEADLINE_PLACEHOLDER: &str = "deadline";
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [Self::All, Self::Completed, Self::Incomplete];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Completed => todo.completed,
            Self::Incomplete => !todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Done",
            Self::Incomplete => "In progress",
        }
    }
}

/// Search text per list, keyed by list id. Lists without an entry match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct SearchQueries(HashMap<String, String>);

impl SearchQueries {
    pub fn get(&self, list_id: &str) -> &str {
        self.0.get(list_id).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, list_id: &str, query: &str) {
        if query.is_empty() {
            self.0.remove(list_id);
        } else {
            self.0.insert(list_id.to_string(), query.to_string());
        }
    }
}

/// Tasks of `list` that pass the status filter and then the list's search query.
pub fn visible_todos<'a>(
    list: &'a TodoList,
    filter: StatusFilter,
    queries: &SearchQueries,
) -> Vec<&'a Todo> {
    filter_todos(list.todos(), filter, queries.get(&list.id))
}

pub fn filter_todos<'a>(todos: &'a [Todo], filter: StatusFilter, query: &str) -> Vec<&'a Todo> {
    let query = query.to_lowercase();
    todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .filter(|todo| matches_query(todo, &query))
        .collect()
}

fn matches_query(todo: &Todo, query: &str) -> bool {
    todo.title.to_lowercase().contains(query)
        || todo
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(query))
}

/// Deadline label in local time.
pub fn format_deadline(deadline: Option<&str>) -> String {
    format_deadline_in(deadline, &Local)
}

pub fn format_deadline_in<Tz>(deadline: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    deadline
        .filter(|raw| !raw.is_empty() && !raw.starts_with(DEADLINE_PLACEHOLDER))
        .and_then(|raw| parse_deadline(raw, tz))
        .map(|at| at.format(DEADLINE_FORMAT).to_string())
        .unwrap_or_else(|| DEADLINE_NOT_SET.to_string())
}

fn parse_deadline<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    let zoned = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .or_else(|| {
            // %z does not take a Zulu suffix
            let raw = match raw.strip_suffix(['Z', 'z']) {
                Some(rest) => format!("{rest}+00:00"),
                None => raw.to_string(),
            };
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(&raw, format).ok())
        });
    if let Some(at) = zoned {
        return Some(at.with_timezone(tz));
    }
    // date-time values without an offset mean wall-clock time
    if let Some(naive) = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return tz.from_local_datetime(&naive).earliest();
    }
    // date-only values (YYYY, YYYY-MM, YYYY-MM-DD) mean midnight UTC
    let date = match raw.len() {
        4 => format!("{raw}-01-01"),
        7 => format!("{raw}-01"),
        10 => raw.to_string(),
        _ => return None,
    };
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
}
