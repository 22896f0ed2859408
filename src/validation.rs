//! Input validation, number parsing and range checks
//!
//! Every channel, mix, matrix, scene and DCA number a processor embeds in a
//! command passes through a `validate_*` check here first, and every parsed
//! level is clamped into the configured dB window.

use crate::terms;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref MINUS_DB: Regex =
        Regex::new(r"(?i)(?:minus|negative|-)\s*(\d+(?:\.\d+)?)\s*(?:db|decibels?)?").unwrap();
    static ref PLUS_DB: Regex =
        Regex::new(r"(?i)(?:plus|positive|\+)?\s*(\d+(?:\.\d+)?)\s*(?:db|decibels?)?").unwrap();
}

/// Console limits the engine validates against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_channel: u32,
    pub max_mix: u32,
    pub max_matrix: u32,
    pub max_scene: u32,
    pub max_dca: u32,
    /// Lowest settable level in dB (above -inf)
    pub min_db: f64,
    /// Highest settable level in dB
    pub max_db: f64,
    /// Longest accepted utterance, in characters
    pub max_input_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_channel: 40,
            max_mix: 20,
            max_matrix: 8,
            max_scene: 100,
            max_dca: 8,
            min_db: -60.0,
            max_db: 10.0,
            max_input_length: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Accept an utterance no longer than `max_input_length` characters
    pub fn validate_input(&self, text: &str) -> bool {
        text.chars().count() <= self.limits.max_input_length
    }

    /// Parse "7" or "seven"; `None` when neither form applies
    pub fn parse_number(&self, text: &str) -> Option<u32> {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            return Some(n);
        }
        terms::number_word(trimmed)
    }

    /// Parse a level phrase into dB x 100.
    ///
    /// Keywords are tried first ("unity", "hot", "off"). Otherwise the first
    /// signed number is taken, truncated to an integer after scaling, and
    /// clamped into `[min_db, max_db]`. The -inf sentinel from the keyword
    /// table is returned as-is.
    pub fn parse_db_value(&self, text: &str) -> Option<i32> {
        if let Some(value) = terms::db_keyword(text) {
            return Some(value);
        }

        let (caps, negative) = match MINUS_DB.captures(text) {
            Some(caps) => (caps, true),
            None => (PLUS_DB.captures(text)?, false),
        };
        let magnitude: f64 = caps.get(1)?.as_str().parse().ok()?;
        let db = if negative { -magnitude } else { magnitude };
        Some(self.clamp_db((db * 100.0) as i32))
    }

    /// Clamp a dB x 100 value into the configured window
    pub fn clamp_db(&self, value: i32) -> i32 {
        let low = (self.limits.min_db * 100.0) as i32;
        let high = (self.limits.max_db * 100.0) as i32;
        value.clamp(low, high)
    }

    pub fn validate_channel(&self, n: u32) -> bool {
        (1..=self.limits.max_channel).contains(&n)
    }

    pub fn validate_mix(&self, n: u32) -> bool {
        (1..=self.limits.max_mix).contains(&n)
    }

    pub fn validate_matrix(&self, n: u32) -> bool {
        (1..=self.limits.max_matrix).contains(&n)
    }

    pub fn validate_scene(&self, n: u32) -> bool {
        (1..=self.limits.max_scene).contains(&n)
    }

    pub fn validate_dca(&self, n: u32) -> bool {
        (1..=self.limits.max_dca).contains(&n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::NEG_INF_LEVEL;

    fn validator() -> Validator {
        Validator::new(ValidationLimits::default())
    }

    #[test]
    fn test_parse_number() {
        let v = validator();
        assert_eq!(v.parse_number("12"), Some(12));
        assert_eq!(v.parse_number(" eight "), Some(8));
        assert_eq!(v.parse_number("Twenty-Two"), Some(22));
        assert_eq!(v.parse_number("the"), None);
        assert_eq!(v.parse_number(""), None);
    }

    #[test]
    fn test_parse_db_keywords_before_numbers() {
        let v = validator();
        assert_eq!(v.parse_db_value("unity"), Some(0));
        assert_eq!(v.parse_db_value("hot"), Some(300));
        assert_eq!(v.parse_db_value("off"), Some(NEG_INF_LEVEL));
    }

    #[test]
    fn test_parse_db_signed_numbers() {
        let v = validator();
        assert_eq!(v.parse_db_value("-10 db"), Some(-1000));
        assert_eq!(v.parse_db_value("minus 6"), Some(-600));
        assert_eq!(v.parse_db_value("negative 3.5 decibels"), Some(-350));
        assert_eq!(v.parse_db_value("plus 4 db"), Some(400));
        assert_eq!(v.parse_db_value("+2.5"), Some(250));
        assert_eq!(v.parse_db_value("5"), Some(500));
        assert_eq!(v.parse_db_value("nowhere"), None);
    }

    #[test]
    fn test_parse_db_clamps_to_limits() {
        let v = validator();
        assert_eq!(v.parse_db_value("plus 25 db"), Some(1000));
        assert_eq!(v.parse_db_value("minus 80 db"), Some(-6000));
        assert_eq!(v.parse_db_value("minus 200 db"), Some(-6000));
    }

    #[test]
    fn test_range_checks_are_inclusive() {
        let v = validator();
        assert!(!v.validate_channel(0));
        assert!(v.validate_channel(1));
        assert!(v.validate_channel(40));
        assert!(!v.validate_channel(41));
        assert!(v.validate_mix(20));
        assert!(!v.validate_mix(21));
        assert!(v.validate_scene(100));
        assert!(!v.validate_dca(9));
        assert!(v.validate_matrix(8));
    }

    #[test]
    fn test_validate_input_counts_chars() {
        let limits = ValidationLimits {
            max_input_length: 5,
            ..ValidationLimits::default()
        };
        let v = Validator::new(limits);
        assert!(v.validate_input("héllo"));
        assert!(!v.validate_input("hello!"));
    }
}
