//! Rule-evaluation engine.
//!
//! A validator inspects one item and reports a [`ValidatorResult`]: a status
//! on the {OK, WARNING, CRITICAL} lattice, the diagnostics explaining any
//! failure, and how many atomic checks ran. Results are combined with two
//! operators:
//!
//! - [`combine_and`]: CRITICAL dominates WARNING dominates OK; diagnostics
//!   concatenate and check counts add up.
//! - [`combine_or`]: the first OK result wins outright and drops every
//!   diagnostic; otherwise WARNING beats CRITICAL and everything is kept.
//!
//! The combinators in [`combinators`] and the atomic checks in [`checks`]
//! are the vocabulary the classification rules are written in.

pub mod checks;
pub mod combinators;

pub use combinators::{
    AllOf, AllSatisfy, BoxedValidator, IsContainer, IsNotCharPtr, Not, OneOf, OneSatisfies,
    SingleCheck,
};

use serde::Serialize;
use std::fmt;

use crate::model::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Warning,
    Critical,
}

impl CheckStatus {
    /// Conjunction: the more severe status wins.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Critical, _) | (_, Self::Critical) => Self::Critical,
            (Self::Warning, _) | (_, Self::Warning) => Self::Warning,
            _ => Self::Ok,
        }
    }

    /// Disjunction: the less severe status wins.
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Ok, _) | (_, Self::Ok) => Self::Ok,
            (Self::Warning, _) | (_, Self::Warning) => Self::Warning,
            _ => Self::Critical,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One human-readable finding, optionally pinned to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorResult {
    pub status: CheckStatus,
    pub errors: Vec<Diagnostic>,
    pub total_checks: usize,
}

impl ValidatorResult {
    pub fn new(status: CheckStatus, errors: Vec<Diagnostic>, total_checks: usize) -> Self {
        Self {
            status,
            errors,
            total_checks,
        }
    }

    pub fn ok(total_checks: usize) -> Self {
        Self::new(CheckStatus::Ok, Vec::new(), total_checks)
    }

    pub fn failure(status: CheckStatus, diagnostic: Diagnostic, total_checks: usize) -> Self {
        Self::new(status, vec![diagnostic], total_checks)
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Diagnostics per atomic check; zero when nothing was checked.
    pub fn fail_rate(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            self.errors.len() as f64 / self.total_checks as f64
        }
    }

    /// Put `diagnostic` in front of the existing ones.
    pub fn prepend(mut self, diagnostic: Diagnostic) -> Self {
        self.errors.insert(0, diagnostic);
        self
    }
}

/// Anything that can judge an item.
pub trait Validator<T: ?Sized> {
    fn satisfies(&self, item: &T) -> ValidatorResult;
}

impl<T: ?Sized, V: Validator<T> + ?Sized> Validator<T> for Box<V> {
    fn satisfies(&self, item: &T) -> ValidatorResult {
        (**self).satisfies(item)
    }
}

pub fn combine_and<I>(results: I) -> ValidatorResult
where
    I: IntoIterator<Item = ValidatorResult>,
{
    results
        .into_iter()
        .fold(ValidatorResult::ok(0), |mut acc, result| {
            acc.status = acc.status.and(result.status);
            acc.errors.extend(result.errors);
            acc.total_checks += result.total_checks;
            acc
        })
}

/// Stops at the first OK result; with no results at all the outcome is
/// CRITICAL with nothing checked.
pub fn combine_or<I>(results: I) -> ValidatorResult
where
    I: IntoIterator<Item = ValidatorResult>,
{
    let mut combined = ValidatorResult::new(CheckStatus::Critical, Vec::new(), 0);
    for result in results {
        if result.is_ok() {
            return ValidatorResult::ok(result.total_checks);
        }
        combined.status = combined.status.or(result.status);
        combined.errors.extend(result.errors);
        combined.total_checks += result.total_checks;
    }
    combined
}

/// Yields results until (and including) the first non-OK one when
/// `stop_on_failure` is set; otherwise passes everything through.
///
/// The underlying iterator is lazy, so validators after the stopping point
/// are never run.
pub struct ShortCircuit<I> {
    inner: I,
    stop_on_failure: bool,
    done: bool,
}

impl<I: Iterator<Item = ValidatorResult>> Iterator for ShortCircuit<I> {
    type Item = ValidatorResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.inner.next()?;
        if self.stop_on_failure && !result.is_ok() {
            self.done = true;
        }
        Some(result)
    }
}

pub fn short_circuit<I>(results: I, stop_on_failure: bool) -> ShortCircuit<I::IntoIter>
where
    I: IntoIterator<Item = ValidatorResult>,
{
    ShortCircuit {
        inner: results.into_iter(),
        stop_on_failure,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn result(status: CheckStatus, message: &str, checks: usize) -> ValidatorResult {
        let errors = if status.is_ok() {
            vec![]
        } else {
            vec![Diagnostic::new(message, None)]
        };
        ValidatorResult::new(status, errors, checks)
    }

    #[test]
    fn test_and_is_dominated_by_critical() {
        let combined = combine_and(vec![
            result(CheckStatus::Ok, "", 1),
            result(CheckStatus::Warning, "w", 1),
            result(CheckStatus::Critical, "c", 2),
        ]);
        assert_eq!(combined.status, CheckStatus::Critical);
        assert_eq!(combined.errors.len(), 2);
        assert_eq!(combined.total_checks, 4);
    }

    #[test]
    fn test_and_of_oks_is_ok_without_errors() {
        let combined = combine_and(vec![
            result(CheckStatus::Ok, "", 1),
            result(CheckStatus::Ok, "", 1),
        ]);
        assert_eq!(combined, ValidatorResult::ok(2));
    }

    #[test]
    fn test_or_takes_first_ok_and_drops_errors() {
        let combined = combine_or(vec![
            result(CheckStatus::Critical, "c", 3),
            result(CheckStatus::Ok, "", 2),
            result(CheckStatus::Warning, "w", 1),
        ]);
        assert_eq!(combined, ValidatorResult::ok(2));
    }

    #[test]
    fn test_or_without_ok_prefers_warning() {
        let combined = combine_or(vec![
            result(CheckStatus::Warning, "w", 1),
            result(CheckStatus::Critical, "c", 1),
        ]);
        assert_eq!(combined.status, CheckStatus::Warning);
        let messages: Vec<&str> = combined.errors.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["w", "c"]);
        assert_eq!(combined.total_checks, 2);
    }

    #[test]
    fn test_or_of_nothing_is_critical() {
        let combined = combine_or(Vec::new());
        assert_eq!(combined.status, CheckStatus::Critical);
        assert_eq!(combined.total_checks, 0);
    }

    #[test]
    fn test_short_circuit_stops_after_first_failure() {
        let evaluated = Cell::new(0);
        let statuses = [CheckStatus::Ok, CheckStatus::Warning, CheckStatus::Ok];
        let results = statuses.iter().map(|s| {
            evaluated.set(evaluated.get() + 1);
            result(*s, "x", 1)
        });

        let combined = combine_and(short_circuit(results, true));
        assert_eq!(evaluated.get(), 2);
        assert_eq!(combined.status, CheckStatus::Warning);
        assert_eq!(combined.total_checks, 2);
    }

    #[test]
    fn test_fail_rate() {
        assert_eq!(ValidatorResult::ok(0).fail_rate(), 0.0);
        let failing = combine_and(vec![
            result(CheckStatus::Warning, "a", 2),
            result(CheckStatus::Ok, "", 2),
        ]);
        assert_eq!(failing.fail_rate(), 0.25);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CheckStatus::Critical.to_string(), "CRITICAL");
        assert_eq!(CheckStatus::Ok.to_string(), "OK");
    }
}
