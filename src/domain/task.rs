//! Task domain model.
//!
//! This module contains the task entity together with its value objects.
//! Parsing of the permissive due-date input lives here so that every
//! adapter (HTTP, tests, storage) shares one definition.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Short due-date input form: date plus hour and minute, no seconds or offset.
const SHORT_DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Fixed-width prefix shared by both accepted forms; `d` stands for a digit.
const DATE_TIME_SHAPE: &[u8; 16] = b"dddd-dd-ddTdd:dd";

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// Assigned by the store on creation and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(i32);

impl TaskId {
    /// Creates a `TaskId` from a raw integer.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse().map(Self)
    }
}

/// Errors produced while parsing a due date.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DueDateError {
    /// The due date was absent or empty.
    #[error("due_date is required")]
    Missing,

    /// The due date matched none of the accepted formats.
    #[error("invalid due_date format: {0}")]
    InvalidFormat(String),
}

/// The instant a task is due, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    /// Creates a `DueDate` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parses a due date from its textual input form.
    ///
    /// Two formats are accepted, both with zero-padded fields and a literal
    /// `T` between date and time:
    ///
    /// 1. RFC 3339 with an offset, e.g. `2023-01-01T10:00:00Z` or
    ///    `2023-01-01T12:00:00+02:00`. The offset is folded into UTC.
    /// 2. `YYYY-MM-DDTHH:MM`, e.g. `2023-01-01T10:00`, read as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`DueDateError::Missing`] for an empty input and
    /// [`DueDateError::InvalidFormat`] when neither format matches.
    pub fn parse(raw: &str) -> Result<Self, DueDateError> {
        if raw.is_empty() {
            return Err(DueDateError::Missing);
        }

        let invalid = || DueDateError::InvalidFormat(raw.to_string());

        if !has_date_time_shape(raw) {
            return Err(invalid());
        }

        if raw.len() == DATE_TIME_SHAPE.len() {
            return NaiveDateTime::parse_from_str(raw, SHORT_DUE_DATE_FORMAT)
                .map(|naive| Self(naive.and_utc()))
                .map_err(|_| invalid());
        }

        DateTime::parse_from_rfc3339(raw)
            .map(|datetime| Self(datetime.with_timezone(&Utc)))
            .map_err(|_| invalid())
    }

    /// Renders the due date as a full RFC 3339 timestamp with a `Z` suffix.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// Checks the zero-padded `YYYY-MM-DDTHH:MM` prefix with a literal `T`.
///
/// chrono alone accepts unpadded fields and a space separator, neither of
/// which is a valid input here.
fn has_date_time_shape(raw: &str) -> bool {
    raw.len() >= DATE_TIME_SHAPE.len()
        && raw
            .bytes()
            .zip(DATE_TIME_SHAPE)
            .all(|(byte, &expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                _ => byte == expected,
            })
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.to_rfc3339())
    }
}

// =============================================================================
// Task
// =============================================================================

/// A task that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Title of the task. Never empty once validated.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Free-form status. Never empty once validated.
    pub status: String,
    /// When the task is due.
    pub due_date: DueDate,
}

impl NewTask {
    /// Attaches a store-assigned id, producing a full [`Task`].
    #[must_use]
    pub fn with_id(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
        }
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Title of the task.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Free-form status.
    pub status: String,
    /// When the task is due.
    pub due_date: DueDate,
}

// =============================================================================
// Tests
// =============================================================================
