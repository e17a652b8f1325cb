//! # Array Values: Decoded Dataset Payloads
//!
//! The checks only need one thing from an entity's values: the sign of the
//! difference between adjacent elements. [`ArrayValues`] keeps the decoded
//! elements in one of three kinds and exposes exactly that.

use chrono::{DateTime, Duration, Utc};

/// Element type of a dataset entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Numeric,
    /// Calendar instants (`datetime64`).
    Time,
    /// Time deltas (`timedelta64`).
    Duration,
}

impl ElementKind {
    /// Classify a dtype name such as `float32`, `datetime64[ns]` or
    /// `timedelta64[ns]`.
    pub fn from_dtype(dtype: &str) -> Self {
        if dtype.starts_with("datetime64") {
            Self::Time
        } else if dtype.starts_with("timedelta64") {
            Self::Duration
        } else {
            Self::Numeric
        }
    }

    /// Time and duration values carry their units implicitly.
    pub fn has_implicit_units(&self) -> bool {
        matches!(self, Self::Time | Self::Duration)
    }
}

/// Decoded values of a dataset entity, flattened in storage order.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    Numeric(Vec<f64>),
    Time(Vec<DateTime<Utc>>),
    Duration(Vec<Duration>),
}

/// Sign of the difference between two adjacent elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ascending,
    Flat,
    Descending,
    /// The difference is not comparable (NaN).
    Unordered,
}

impl ArrayValues {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Numeric(_) => ElementKind::Numeric,
            Self::Time(_) => ElementKind::Time,
            Self::Duration(_) => ElementKind::Duration,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Time(v) => v.len(),
            Self::Duration(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Classify each successive difference `v[i + 1] - v[i]` against the
    /// zero of the element kind.
    pub fn steps(&self) -> Vec<Step> {
        match self {
            Self::Numeric(v) => v
                .windows(2)
                .map(|w| classify_f64(w[1] - w[0]))
                .collect(),
            Self::Time(v) => v
                .windows(2)
                .map(|w| classify_duration(w[1].signed_duration_since(w[0])))
                .collect(),
            Self::Duration(v) => v
                .windows(2)
                .map(|w| classify_duration(w[1] - w[0]))
                .collect(),
        }
    }
}

fn classify_f64(diff: f64) -> Step {
    if diff > 0.0 {
        Step::Ascending
    } else if diff < 0.0 {
        Step::Descending
    } else if diff == 0.0 {
        Step::Flat
    } else {
        Step::Unordered
    }
}

fn classify_duration(diff: Duration) -> Step {
    let zero = Duration::zero();
    if diff > zero {
        Step::Ascending
    } else if diff < zero {
        Step::Descending
    } else {
        Step::Flat
    }
}
