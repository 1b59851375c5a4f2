//! Session parameters collected by the front end for one foraging run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ForageError;

/// Everything the player chose for a single forage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub environment: String,
    pub season: String,
    #[serde(default)]
    pub selected_tags: BTreeSet<String>,
    pub score: i64,
    pub hours: i64,
    #[serde(default)]
    pub critical_success: bool,
    #[serde(default)]
    pub critical_failure: bool,
}

impl SessionContext {
    #[must_use]
    pub fn new(
        environment: impl Into<String>,
        season: impl Into<String>,
        score: i64,
        hours: i64,
    ) -> Self {
        Self {
            environment: environment.into(),
            season: season.into(),
            selected_tags: BTreeSet::new(),
            score,
            hours,
            critical_success: false,
            critical_failure: false,
        }
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selected_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_critical_success(mut self, enabled: bool) -> Self {
        self.critical_success = enabled;
        self
    }

    #[must_use]
    pub const fn with_critical_failure(mut self, enabled: bool) -> Self {
        self.critical_failure = enabled;
        self
    }

    /// Reject non-positive score or hours instead of coercing them.
    ///
    /// # Errors
    ///
    /// Returns [`ForageError::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<(), ForageError> {
        if self.score < 1 {
            return Err(ForageError::invalid("score", self.score));
        }
        if self.hours < 1 {
            return Err(ForageError::invalid("hours", self.hours));
        }
        Ok(())
    }
}

/// Parse a form field that must hold a whole number of at least 1.
///
/// # Errors
///
/// Returns [`ForageError::InvalidInput`] when the text is not an integer or is below 1.
pub fn parse_form_int(field: &'static str, raw: &str) -> Result<i64, ForageError> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ForageError::invalid(field, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_non_positive_inputs() {
        assert!(SessionContext::new("forest", "spring", 1, 1).validate().is_ok());
        assert_eq!(
            SessionContext::new("forest", "spring", 0, 2).validate(),
            Err(ForageError::InvalidInput {
                field: "score",
                value: "0".into()
            })
        );
        assert!(matches!(
            SessionContext::new("forest", "spring", 4, -1).validate(),
            Err(ForageError::InvalidInput { field: "hours", .. })
        ));
    }

    #[test]
    fn form_ints_require_positive_whole_numbers() {
        assert_eq!(parse_form_int("score", " 12 "), Ok(12));
        assert!(parse_form_int("score", "0").is_err());
        assert!(parse_form_int("hours", "two").is_err());
        assert!(parse_form_int("hours", "1.5").is_err());
        assert!(parse_form_int("hours", "").is_err());
    }

    #[test]
    fn builder_sets_tags_and_flags() {
        let ctx = SessionContext::new("cave", "winter", 8, 3)
            .with_tags(["moss", "night"])
            .with_critical_success(true);
        assert!(ctx.selected_tags.contains("night"));
        assert!(ctx.critical_success);
        assert!(!ctx.critical_failure);
    }
}
