//! Ordered pattern rules shared by all processors
//!
//! Each processor keeps a static `Vec<Rule<Action>>`. Processing walks the
//! list in order and every rule whose pattern matches contributes through the
//! processor's resolver; list order is the tie-break for output order.
//! Patterns are always compiled case-insensitively so label payloads keep the
//! speaker's casing.

use crate::error::{MixerError, Result};
use regex::{Captures, Regex};

/// Channel keyword and separator ("channel 3", "ch3", "track #3")
pub const CHANNEL: &str = r"(?:channel|chan|ch|input|track)\s*#?\s*";

/// Mix-style destination keyword ("mix 2", "aux two", "monitor 4")
pub const MIX: &str = r"(?:mix|aux|auxiliary|bus|monitor|mon)\s*#?\s*";

/// DCA keyword
pub const DCA: &str = r"(?:dca|vca)\s*#?\s*";

/// Optional leading article before a target
pub const ARTICLE: &str = r"(?:(?:the|my|our|some)\s+)?";

/// Optional "to LEVEL" / "by AMOUNT" tail
pub const LEVEL_TAIL: &str = r"(?:\s+(?:to\s+(?P<level>.+)|by\s+(?P<amount>.+)))?";

/// Bare relative amount ("6", "minus 3 db", "two decibels")
pub const AMOUNT: &str = r"(?P<amount>(?:plus\s+|minus\s+|[+-])?[\w.]+(?:\s*(?:db|decibels?))?)";

/// Named capture for a numeric or spoken number ("12", "seven", "twenty one")
pub fn num(name: &str) -> String {
    format!(
        r"(?P<{}>\d+|[a-z]+(?:[\s-](?:one|two|three|four|five|six|seven|eight|nine)\b)?)",
        name
    )
}

/// "the channel N" with the number captured as `name`
pub fn channel(name: &str) -> String {
    format!(r"{}{}{}", ARTICLE, CHANNEL, num(name))
}

/// "the mix N" with the number captured as `name`
pub fn mix(name: &str) -> String {
    format!(r"{}{}{}", ARTICLE, MIX, num(name))
}

/// "the dca N" with the number captured as `name`
pub fn dca(name: &str) -> String {
    format!(r"{}{}{}", ARTICLE, DCA, num(name))
}

lazy_static::lazy_static! {
    static ref RESERVED_LEAD: Regex = Regex::new(
        r"(?i)^(?:channel|chan|ch|input|track|dca|vca|mix|aux|auxiliary|bus|monitor|mon|matrix|mtx|group|subgroup|scene|it|that|this|them)\b"
    ).unwrap();

    static ref NON_INSTRUMENT: Regex = Regex::new(
        r"(?i)\b(?:reverb|verb|delay|echo|compressor|compression|comp|limiter|gate|eq|hpf|high[\s-]?pass|lows|highs|mids|low end|top end|mix|aux|bus|monitor|matrix|mtx|wedge|iems?|ears|foldback|sends?|scene|dca|vca|group|subgroup)\b"
    ).unwrap();

    static ref LEADING_FILLER: Regex =
        Regex::new(r"(?i)^(?:(?:the|my|our|some|a|an)\s+)+").unwrap();

    static ref TRAILING_FILLER: Regex =
        Regex::new(r"(?i)\s+(?:fader|channel|mic|level|input|please)$").unwrap();
}

/// One entry of an ordered rule list
pub struct Rule<A> {
    pub name: &'static str,
    pub action: A,
    pub confidence: f32,
    pattern: Regex,
}

impl<A: Copy> Rule<A> {
    /// Compile a static rule; patterns are case-insensitive
    pub fn new(name: &'static str, pattern: &str, action: A, confidence: f32) -> Self {
        let pattern = Regex::new(&format!("(?i){}", pattern))
            .unwrap_or_else(|e| panic!("invalid pattern for rule '{}': {}", name, e));
        Self {
            name,
            action,
            confidence,
            pattern,
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// A rule that matched, with its captures
pub struct RuleMatch<'r, 't, A> {
    pub rule: &'r Rule<A>,
    caps: Captures<'t>,
}

impl<'r, 't, A> RuleMatch<'r, 't, A> {
    /// Required capture group; absence is a rule table defect
    pub fn group(&self, name: &str) -> Result<&'t str> {
        self.caps
            .name(name)
            .map(|m| m.as_str())
            .ok_or_else(|| MixerError::MissingCapture {
                rule: self.rule.name.to_string(),
                group: name.to_string(),
            })
    }

    /// Optional capture group
    pub fn optional(&self, name: &str) -> Option<&'t str> {
        self.caps.name(name).map(|m| m.as_str())
    }

    /// Full matched span
    pub fn span(&self) -> &'t str {
        self.caps.get(0).map(|m| m.as_str()).unwrap_or_default()
    }
}

/// Every rule that matches `text`, in list order
pub fn matching<'r, 't, A: Copy>(
    rules: &'r [Rule<A>],
    text: &'t str,
) -> impl Iterator<Item = RuleMatch<'r, 't, A>> + 'r
where
    't: 'r,
{
    rules.iter().filter_map(move |rule| {
        rule.pattern
            .captures(text)
            .map(|caps| RuleMatch { rule, caps })
    })
}

/// Strip articles and trailing filler from a captured target
pub fn clean_target(target: &str) -> String {
    let lowered = target.trim().to_lowercase();
    let stripped = LEADING_FILLER.replace(&lowered, "");
    TRAILING_FILLER.replace(&stripped, "").trim().to_string()
}

/// Whether a captured phrase may name an instrument at all.
///
/// Phrases that start with a console keyword ("channel 3", "dca 2") or
/// mention a processing/routing object ("reverb on the vocals") are left to
/// the rules that handle those forms.
pub fn is_instrument_candidate(target: &str) -> bool {
    let target = target.trim();
    !target.is_empty() && !mentions_console_object(target)
}

/// Whether a phrase starts with or mentions a console object rather than a
/// level, position or instrument
pub fn mentions_console_object(text: &str) -> bool {
    let text = text.trim();
    RESERVED_LEAD.is_match(text) || NON_INSTRUMENT.is_match(text)
}
