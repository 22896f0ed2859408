//! Engine coordinator
//!
//! `Engine::process_command` takes one utterance through:
//!
//! 1. length check (oversize input yields no commands)
//! 2. normalization (politeness, whitespace, trailing punctuation)
//! 3. compound splitting, with the first clause's target carried into the
//!    clauses after it
//! 4. per-clause dispatch through every processor in a fixed order, then a
//!    context pass that rewrites stored labels to their numbers
//! 5. deduplication by command string, first occurrence kept
//!
//! A processor that returns an error is logged and skipped; the others still
//! run.

use crate::channels::{self, ChannelProcessor};
use crate::command::{dedup_commands, ProtocolCommand};
use crate::config::EngineConfig;
use crate::effects::{self, EffectsProcessor};
use crate::error::Result;
use crate::routing::{self, RoutingProcessor};
use crate::rules::num;
use crate::scenes::{self, SceneProcessor};
use crate::session::{LabelTable, Session};
use crate::terms;
use crate::validation::{ValidationLimits, Validator};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Longest instrument phrase tried during context extraction, in words,
/// counting a leading article
const MAX_CONTEXT_WORDS: usize = 4;

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s.!?;,]+$").unwrap();
    static ref POLITE_PREFIX: Regex = Regex::new(
        r"(?i)^(?:(?:please|hey|ok|okay|can\s+you|could\s+you|would\s+you|will\s+you)[\s,]+)+"
    )
    .unwrap();
    static ref POLITE_SUFFIX: Regex = Regex::new(r"(?i)[\s,]+please$").unwrap();

    /// Split points, highest precedence first
    static ref CONJUNCTIONS: Vec<Regex> = [
        r"(?i)\s+and\s+then\s+",
        r"(?i)\s*,\s*then\s+",
        r"(?i)\s+then\s+",
        r"(?i)\s+as\s+well\s+as\s+",
        r"(?i)\s+and\s+also\s+",
        r"(?i)\s+and\s+",
        r"(?i)\s+also\s+",
        r"(?i)\s+plus\s+",
        r"\s*,\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref CONTEXT_CHANNEL: Regex = Regex::new(&format!(
        r"(?i)\b(?:channel|chan|ch|input)\s*#?\s*{}", num("n")
    ))
    .unwrap();
    static ref CONTEXT_TRACK: Regex =
        Regex::new(&format!(r"(?i)\btrack\s*#?\s*{}", num("n"))).unwrap();

    /// Leading action verb of a clause, with an optional particle
    static ref ACTION_VERB: Regex = Regex::new(
        r"(?i)^(?P<verb>(?:send|route|assign|feed|pan|set|mute|unmute|solo|unsolo|compress|gate|limit|bring|turn|push|pull|raise|lower|boost|cut|kill|put|move|take|drop|crank|bury|spread|remove|make|give|add|bump|nudge|ride|trim|gain|park|center|centre|high\s+pass|hpf)(?:\s+(?:up|down|off|on))?)\b(?P<rest>.*)$"
    )
    .unwrap();

    /// First word of a clause remainder that still lacks a target
    static ref TARGETLESS_REST: Regex = Regex::new(
        r"(?i)^(?:to|by|up|down|in|into|on|at|off|hard|left|right|center|centre|half|slightly|pre|post|more|less|heavily|louder|quieter|softer|hotter|brighter|darker|warmer)\b"
    )
    .unwrap();

    static ref PRONOUN: Regex = Regex::new(r"(?i)\b(?:it|that|this|them)\b").unwrap();
}

/// Collapse whitespace and strip politeness and trailing punctuation
pub fn normalize(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let stripped = TRAILING_PUNCTUATION.replace(&collapsed, "");
    let stripped = POLITE_SUFFIX.replace(&stripped, "");
    let stripped = POLITE_PREFIX.replace(&stripped, "");
    TRAILING_PUNCTUATION.replace(&stripped, "").trim().to_string()
}

/// Split positions of `pattern` in `text`; "plus" before a number is a level, not a conjunction
fn split_points(pattern: &Regex, text: &str) -> Vec<(usize, usize)> {
    pattern
        .find_iter(text)
        .filter(|m| {
            let joins_number = m.as_str().trim().eq_ignore_ascii_case("plus")
                && text[m.end()..].starts_with(|c: char| c.is_ascii_digit());
            !joins_number
        })
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Whether the text joins more than one instruction
pub fn is_compound_command(text: &str) -> bool {
    CONJUNCTIONS
        .iter()
        .any(|pattern| !split_points(pattern, text).is_empty())
}

/// Split on the highest-precedence conjunction present; empty clauses are dropped
pub fn split_compound_command(text: &str) -> Vec<String> {
    for pattern in CONJUNCTIONS.iter() {
        let points = split_points(pattern, text);
        if points.is_empty() {
            continue;
        }
        let mut clauses = Vec::with_capacity(points.len() + 1);
        let mut start = 0;
        for (begin, end) in points {
            clauses.push(&text[start..begin]);
            start = end;
        }
        clauses.push(&text[start..]);
        return clauses
            .into_iter()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
    }
    vec![text.trim().to_string()]
}

/// Target carried from the first clause of a compound utterance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundCommandContext {
    pub channel: Option<u32>,
    pub track: Option<u32>,
    pub instrument: Option<String>,
}

impl CompoundCommandContext {
    /// Text substituted into later clauses
    pub fn target(&self) -> Option<String> {
        if let Some(ch) = self.channel {
            return Some(format!("channel {}", ch));
        }
        if let Some(track) = self.track {
            return Some(format!("track {}", track));
        }
        self.instrument.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_none() && self.track.is_none() && self.instrument.is_none()
    }
}

/// Whether a clause names its own channel or track
fn has_explicit_target(clause: &str) -> bool {
    CONTEXT_CHANNEL.is_match(clause) || CONTEXT_TRACK.is_match(clause)
}

/// Rewrite a later clause with the inherited target.
///
/// Pronouns are replaced first. A clause that still has no channel or track
/// and starts with an action verb whose remainder is empty or targetless
/// ("pan hard left", "send to mix 2") gets the target after the verb.
pub fn apply_context(clause: &str, context: &CompoundCommandContext) -> String {
    let Some(target) = context.target() else {
        return clause.to_string();
    };

    let substituted = PRONOUN.replace_all(clause, target.as_str()).into_owned();
    if has_explicit_target(&substituted) || substituted != clause {
        return substituted;
    }

    let Some(caps) = ACTION_VERB.captures(&substituted) else {
        return substituted;
    };
    let verb = caps.name("verb").map_or("", |m| m.as_str());
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
    if rest.is_empty() {
        format!("{} {}", verb, target)
    } else if TARGETLESS_REST.is_match(rest) {
        format!("{} {} {}", verb, target, rest)
    } else {
        substituted
    }
}

/// Snapshot of the engine's limits and table sizes
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub limits: ValidationLimits,
    pub channel_label_count: usize,
    pub dca_label_count: usize,
    pub rule_counts: BTreeMap<&'static str, usize>,
    pub term_counts: BTreeMap<&'static str, usize>,
}

/// Voice-command translation engine for one mixing session
#[derive(Debug, Clone)]
pub struct Engine {
    validator: Validator,
    channels: ChannelProcessor,
    routing: RoutingProcessor,
    effects: EffectsProcessor,
    scenes: SceneProcessor,
    session: Session,
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(ValidationLimits::default(), Session::new())
    }
}

impl Engine {
    /// Engine with a validated configuration and an empty session
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_session(config, Session::new())
    }

    /// Engine continuing an existing session
    pub fn with_session(config: EngineConfig, session: Session) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config.limits, session))
    }

    fn build(limits: ValidationLimits, session: Session) -> Self {
        let validator = Validator::new(limits);
        info!(
            max_channel = limits.max_channel,
            max_mix = limits.max_mix,
            max_dca = limits.max_dca,
            "engine ready"
        );
        Self {
            validator,
            channels: ChannelProcessor::new(validator),
            routing: RoutingProcessor::new(validator),
            effects: EffectsProcessor::new(validator),
            scenes: SceneProcessor::new(validator),
            session,
        }
    }

    /// Translate one utterance into console commands
    pub fn process_command(&mut self, text: &str) -> Vec<ProtocolCommand> {
        if !self.validator.validate_input(text) {
            warn!(
                length = text.chars().count(),
                max = self.validator.limits().max_input_length,
                "input rejected: too long"
            );
            return Vec::new();
        }

        let text = normalize(text);
        if text.is_empty() {
            return Vec::new();
        }

        let clauses = if is_compound_command(&text) {
            split_compound_command(&text)
        } else {
            vec![text]
        };

        let results = if clauses.len() > 1 {
            self.process_clauses(&clauses)
        } else {
            self.dispatch(&clauses[0])
        };

        dedup_commands(results)
    }

    fn process_clauses(&mut self, clauses: &[String]) -> Vec<ProtocolCommand> {
        let context = self.extract_context(&clauses[0]);
        debug!(clauses = clauses.len(), ?context, "compound command");

        let mut results = self.dispatch(&clauses[0]);
        for clause in &clauses[1..] {
            let rewritten = apply_context(clause, &context);
            if rewritten != *clause {
                debug!(clause = %clause, rewritten = %rewritten, "clause inherited target");
            }
            results.extend(self.dispatch(&rewritten));
        }
        results
    }

    /// Channel, track or instrument named in a clause
    pub fn extract_context(&self, clause: &str) -> CompoundCommandContext {
        let mut context = CompoundCommandContext::default();

        let explicit = |re: &Regex| {
            re.captures(clause)
                .and_then(|caps| caps.name("n"))
                .and_then(|m| self.validator.parse_number(m.as_str()))
                .filter(|&n| self.validator.validate_channel(n))
        };
        context.channel = explicit(&*CONTEXT_CHANNEL);
        if context.channel.is_some() {
            return context;
        }
        context.track = explicit(&*CONTEXT_TRACK);
        if context.track.is_some() {
            return context;
        }

        let rest = ACTION_VERB
            .captures(clause)
            .and_then(|caps| caps.name("rest"))
            .map_or(clause, |m| m.as_str());
        let words: Vec<&str> = rest.split_whitespace().collect();
        for len in 1..=words.len().min(MAX_CONTEXT_WORDS) {
            let phrase = words[..len].join(" ");
            let cleaned = crate::rules::clean_target(&phrase);
            if cleaned.is_empty() {
                continue;
            }
            if self
                .channels
                .resolve_instrument(&cleaned, &self.session.channel_labels)
                .is_some()
            {
                context.instrument = Some(cleaned);
                break;
            }
        }
        context
    }

    /// Run every processor over one clause
    fn dispatch(&mut self, text: &str) -> Vec<ProtocolCommand> {
        let mut results = Vec::new();
        let Session {
            channel_labels,
            dca_labels,
        } = &mut self.session;

        collect(&mut results, "channel_fader", self.channels.process_channel_fader(text, channel_labels));
        collect(&mut results, "channel_mute", self.channels.process_channel_mute(text, channel_labels));
        collect(&mut results, "channel_label", self.channels.process_channel_label(text, channel_labels));
        collect(&mut results, "send_to_mix", self.routing.process_send_to_mix(text, channel_labels));
        collect(&mut results, "pan", self.routing.process_pan_commands(text, channel_labels));
        collect(&mut results, "scene", self.scenes.process_scene_recall(text));
        collect(&mut results, "dca", self.scenes.process_dca_commands(text, dca_labels));
        collect(&mut results, "effects", self.effects.process_effects(text, channel_labels));
        collect(&mut results, "dynamics", self.effects.process_dynamics(text, channel_labels));

        results.extend(self.process_with_labels(text));
        results
    }

    /// Rewrite stored labels to "channel N" / "dca N" and run the processors
    /// that take numbers
    fn process_with_labels(&mut self, text: &str) -> Vec<ProtocolCommand> {
        let mut results = Vec::new();
        let lowered = text.to_lowercase();

        let channel_hits = label_rewrites(&self.session.channel_labels, &lowered, "channel");
        for rewritten in channel_hits {
            debug!(text = %rewritten, "channel label context");
            let labels = &self.session.channel_labels;
            collect(&mut results, "channel_fader", self.channels.process_channel_fader(&rewritten, labels));
            collect(&mut results, "channel_mute", self.channels.process_channel_mute(&rewritten, labels));
            collect(&mut results, "send_to_mix", self.routing.process_send_to_mix(&rewritten, labels));
            collect(&mut results, "pan", self.routing.process_pan_commands(&rewritten, labels));
        }

        let dca_hits = label_rewrites(&self.session.dca_labels, &lowered, "dca");
        for rewritten in dca_hits {
            debug!(text = %rewritten, "dca label context");
            collect(
                &mut results,
                "dca",
                self.scenes.process_dca_commands(&rewritten, &mut self.session.dca_labels),
            );
        }

        results
    }

    pub fn channel_labels(&self) -> &BTreeMap<String, u32> {
        self.session.channel_labels.as_map()
    }

    pub fn dca_labels(&self) -> &BTreeMap<String, u32> {
        self.session.dca_labels.as_map()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Forget every channel and DCA label
    pub fn reset_session(&mut self) {
        self.session.clear();
        info!("session reset");
    }

    pub fn limits(&self) -> &ValidationLimits {
        self.validator.limits()
    }

    pub fn get_system_info(&self) -> SystemInfo {
        let rule_counts = channels::rule_counts()
            .into_iter()
            .chain(routing::rule_counts())
            .chain(scenes::rule_counts())
            .chain(effects::rule_counts())
            .collect();
        SystemInfo {
            limits: *self.validator.limits(),
            channel_label_count: self.session.channel_labels.len(),
            dca_label_count: self.session.dca_labels.len(),
            rule_counts,
            term_counts: terms::table_sizes().into_iter().collect(),
        }
    }
}

fn collect(results: &mut Vec<ProtocolCommand>, stage: &str, outcome: Result<Vec<ProtocolCommand>>) {
    match outcome {
        Ok(commands) => results.extend(commands),
        Err(e) => warn!(stage, error = %e, "processor failed"),
    }
}

/// `text` with each label found in it replaced by "<kind> N", one rewrite per label
fn label_rewrites(labels: &LabelTable, text: &str, kind: &str) -> Vec<String> {
    labels
        .iter()
        .filter_map(|(label, n)| {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(label))).ok()?;
            pattern
                .is_match(text)
                .then(|| pattern.replace_all(text, format!("{} {}", kind, n).as_str()).into_owned())
        })
        .collect()
}
