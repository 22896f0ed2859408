//! Input channel fader, mute and label commands
//!
//! Also home of instrument resolution, which the routing and effects
//! processors borrow: a spoken instrument is looked up against the session's
//! channel labels first, then through the alias table, then by partial match
//! against existing labels, and finally in the default house patch.

use crate::command::{format_level, rcp, relative_move, ProtocolCommand, RELATIVE_CONFIDENCE};
use crate::error::Result;
use crate::rules::{
    self, channel, clean_target, is_instrument_candidate, Rule, RuleMatch, AMOUNT, CHANNEL,
    LEVEL_TAIL,
};
use crate::session::LabelTable;
use crate::terms::{self, NEG_INF_LEVEL};
use crate::validation::Validator;
use regex::Regex;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaderAction {
    Set,
    BringUp,
    BringDown,
    Hot,
    Bury,
    Quiet,
    /// Small move from the current level
    BumpUp,
    BumpDown,
    /// Set when a level is given, otherwise hand the fader to the engineer
    Ride,
    /// Head amp gain rather than the fader
    Gain,
}

impl FaderAction {
    /// Level used when the utterance gives none (dB x 100)
    pub fn default_level(self) -> Option<i32> {
        match self {
            FaderAction::BringUp => Some(300),
            FaderAction::BringDown => Some(-600),
            FaderAction::Hot => Some(300),
            FaderAction::Bury => Some(-1500),
            FaderAction::Quiet => Some(-1000),
            FaderAction::Set | FaderAction::BumpUp | FaderAction::BumpDown => None,
            FaderAction::Ride | FaderAction::Gain => None,
        }
    }

    /// Direction applied to a spoken "by N" amount
    fn signed(self, amount: i32) -> i32 {
        match self {
            FaderAction::BringDown
            | FaderAction::Bury
            | FaderAction::Quiet
            | FaderAction::BumpDown => -amount.abs(),
            _ => amount.abs(),
        }
    }
}

/// Default step for bump and nudge (dB x 100)
const BUMP_STEP: i32 = 300;

/// Resolved fader intent for one rule match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaderMove {
    To(i32),
    By(i32),
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteAction {
    Mute,
    Unmute,
    /// On/off taken from the `state` capture
    Switch,
    Solo,
    Unsolo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    Name,
}

lazy_static::lazy_static! {
    static ref FADER_RULES: Vec<Rule<FaderAction>> = {
        let ch = channel("ch");
        vec![
            // Slang
            Rule::new("crank_channel", &format!(r"\bcrank\s+(?:up\s+)?{}\b", ch), FaderAction::Hot, 0.9),
            Rule::new("hot_channel", &format!(r"\bmake\s+{}\s+(?:hot|hotter)\b", ch), FaderAction::Hot, 0.9),
            Rule::new("bury_channel", &format!(r"\bbury\s+{}\b", ch), FaderAction::Bury, 0.9),
            Rule::new("quiet_channel", &format!(r"\bmake\s+{}\s+(?:quiet|quieter|softer)\b", ch), FaderAction::Quiet, 0.9),
            Rule::new("quiet_down_channel", &format!(r"\bquiet\s+(?:down\s+)?{}\b", ch), FaderAction::Quiet, 0.9),
            Rule::new("louder_channel", &format!(r"\bmake\s+{}\s+louder\b", ch), FaderAction::BringUp, 0.9),
            // Standard
            Rule::new(
                "set_channel",
                &format!(
                    r"^(?:(?:set|put|move|bring|take|push|pull|dial\s+in|park)\s+)?{}\s+(?:fader\s+|level\s+|volume\s+)?(?:to|at)\s+(?P<level>.+)$",
                    ch
                ),
                FaderAction::Set,
                1.0,
            ),
            Rule::new("bring_up_channel", &format!(r"\b(?:bring|turn|push|raise)\s+up\s+{}\b{}", ch, LEVEL_TAIL), FaderAction::BringUp, 1.0),
            Rule::new("channel_up", &format!(r"\b(?:bring|turn|push|raise)\s+{}\s+up\b{}", ch, LEVEL_TAIL), FaderAction::BringUp, 1.0),
            Rule::new("boost_channel", &format!(r"\b(?:raise|boost|increase)\s+{}\b{}", ch, LEVEL_TAIL), FaderAction::BringUp, 1.0),
            Rule::new("bring_down_channel", &format!(r"\b(?:bring|turn|pull|take|push)\s+down\s+{}\b{}", ch, LEVEL_TAIL), FaderAction::BringDown, 1.0),
            Rule::new("channel_down", &format!(r"\b(?:bring|turn|pull|take)\s+{}\s+down\b{}", ch, LEVEL_TAIL), FaderAction::BringDown, 1.0),
            Rule::new("lower_channel", &format!(r"\b(?:lower|reduce|decrease|drop|dip)\s+{}\b{}", ch, LEVEL_TAIL), FaderAction::BringDown, 1.0),
            Rule::new("channel_up_by", &format!(r"^{}\s+up\s+(?:by\s+)?{}$", ch, AMOUNT), FaderAction::BringUp, 0.8),
            Rule::new("channel_down_by", &format!(r"^{}\s+down\s+(?:by\s+)?{}$", ch, AMOUNT), FaderAction::BringDown, 0.8),
            Rule::new("bump_up_channel", &format!(r"\b(?:bump|nudge)\s+up\s+{}(?:\s+(?:by\s+)?{})?$", ch, AMOUNT), FaderAction::BumpUp, 0.8),
            Rule::new("bump_channel_up", &format!(r"\b(?:bump|nudge)\s+{}\s+up(?:\s+(?:by\s+)?{})?$", ch, AMOUNT), FaderAction::BumpUp, 0.8),
            Rule::new("bump_down_channel", &format!(r"\b(?:bump|nudge)\s+down\s+{}(?:\s+(?:by\s+)?{})?$", ch, AMOUNT), FaderAction::BumpDown, 0.8),
            Rule::new("bump_channel_down", &format!(r"\b(?:bump|nudge)\s+{}\s+down(?:\s+(?:by\s+)?{})?$", ch, AMOUNT), FaderAction::BumpDown, 0.8),
            Rule::new("ride_channel", &format!(r"\bride\s+{}(?:\s+(?:at|to)\s+(?P<level>.+))?$", ch), FaderAction::Ride, 0.9),
            Rule::new("gain_channel", &format!(r"\b(?:gain|trim|preamp)\s+(?:on\s+)?{}(?:\s+(?:to|at)\s+(?P<level>.+))?$", ch), FaderAction::Gain, 0.7),
            Rule::new("channel_gain", &format!(r"^(?:set\s+)?{}\s+(?:gain|trim|preamp)\s+(?:to\s+|at\s+)?(?P<level>.+)$", ch), FaderAction::Gain, 0.7),
            // Instrument
            Rule::new(
                "set_instrument",
                r"^(?:set|put|move|bring|take|dial\s+in|park)\s+(?P<target>.+?)\s+(?:fader\s+|level\s+|volume\s+)?(?:to|at)\s+(?P<level>.+)$",
                FaderAction::Set,
                0.9,
            ),
            Rule::new("bring_up_instrument", &format!(r"\b(?:bring|turn|push|raise)\s+up\s+(?P<target>.+?){}$", LEVEL_TAIL), FaderAction::BringUp, 0.9),
            Rule::new("instrument_up", &format!(r"\b(?:bring|turn|push|raise)\s+(?P<target>.+?)\s+up{}$", LEVEL_TAIL), FaderAction::BringUp, 0.9),
            Rule::new("bring_down_instrument", &format!(r"\b(?:bring|turn|pull|take|push)\s+down\s+(?P<target>.+?){}$", LEVEL_TAIL), FaderAction::BringDown, 0.9),
            Rule::new("instrument_down", &format!(r"\b(?:bring|turn|pull|take)\s+(?P<target>.+?)\s+down{}$", LEVEL_TAIL), FaderAction::BringDown, 0.9),
            Rule::new("lower_instrument", &format!(r"\b(?:lower|reduce|drop)\s+(?P<target>.+?){}$", LEVEL_TAIL), FaderAction::BringDown, 0.9),
            Rule::new("bump_up_instrument", &format!(r"\b(?:bump|nudge)\s+up\s+(?P<target>.+?)(?:\s+by\s+{})?$", AMOUNT), FaderAction::BumpUp, 0.8),
            Rule::new("bump_instrument_up", &format!(r"\b(?:bump|nudge)\s+(?P<target>.+?)\s+up(?:\s+by\s+{})?$", AMOUNT), FaderAction::BumpUp, 0.8),
            Rule::new("bump_down_instrument", &format!(r"\b(?:bump|nudge)\s+down\s+(?P<target>.+?)(?:\s+by\s+{})?$", AMOUNT), FaderAction::BumpDown, 0.8),
            Rule::new("bump_instrument_down", &format!(r"\b(?:bump|nudge)\s+(?P<target>.+?)\s+down(?:\s+by\s+{})?$", AMOUNT), FaderAction::BumpDown, 0.8),
            Rule::new("ride_instrument", r"\bride\s+(?P<target>.+?)(?:\s+(?:at|to)\s+(?P<level>.+))?$", FaderAction::Ride, 0.85),
            Rule::new("bury_instrument", r"\bbury\s+(?P<target>.+)$", FaderAction::Bury, 0.85),
            Rule::new("crank_instrument", r"\bcrank\s+(?:up\s+)?(?P<target>.+?)(?:\s+up)?$", FaderAction::Hot, 0.85),
            Rule::new("hot_instrument", r"\bmake\s+(?P<target>.+?)\s+(?:hot|hotter)$", FaderAction::Hot, 0.85),
            Rule::new("louder_instrument", r"\bmake\s+(?P<target>.+?)\s+louder$", FaderAction::BringUp, 0.85),
            Rule::new("quiet_instrument", r"\bmake\s+(?P<target>.+?)\s+(?:quiet|quieter|softer)$", FaderAction::Quiet, 0.85),
        ]
    };

    static ref MUTE_RULES: Vec<Rule<MuteAction>> = {
        let ch = channel("ch");
        vec![
            Rule::new("mute_channel", &format!(r"\b(?:mute|kill|cut|silence|disable|deactivate)\s+{}\s*$", ch), MuteAction::Mute, 1.0),
            Rule::new("lose_channel", &format!(r"\b(?:lose|ditch|dump)\s+{}\s*$", ch), MuteAction::Mute, 0.9),
            Rule::new("unmute_channel", &format!(r"\b(?:unmute|restore|open|enable|activate)\s+{}\s*$", ch), MuteAction::Unmute, 1.0),
            Rule::new("turn_channel_state", &format!(r"\bturn\s+{}\s+(?P<state>on|off)\s*$", ch), MuteAction::Switch, 1.0),
            Rule::new("turn_state_channel", &format!(r"\bturn\s+(?P<state>on|off)\s+{}\s*$", ch), MuteAction::Switch, 1.0),
            Rule::new("channel_state", &format!(r"^{}\s+(?P<state>on|off|muted|unmuted|mute|unmute)\s*$", ch), MuteAction::Switch, 0.9),
            Rule::new("solo_channel", &format!(r"\bsolo\s+{}\s*$", ch), MuteAction::Solo, 0.5),
            Rule::new("unsolo_channel", &format!(r"\bunsolo\s+{}\s*$", ch), MuteAction::Unsolo, 0.5),
            Rule::new("mute_instrument", r"\b(?:mute|kill|cut|silence|disable)\s+(?P<target>.+)$", MuteAction::Mute, 0.9),
            Rule::new("unmute_instrument", r"\b(?:unmute|restore|enable)\s+(?P<target>.+)$", MuteAction::Unmute, 0.9),
            Rule::new("turn_state_instrument", r"\bturn\s+(?P<state>on|off)\s+(?P<target>.+)$", MuteAction::Switch, 0.9),
            Rule::new("turn_instrument_state", r"\bturn\s+(?P<target>.+?)\s+(?P<state>on|off)$", MuteAction::Switch, 0.9),
            Rule::new("solo_instrument", r"\bsolo\s+(?P<target>.+)$", MuteAction::Solo, 0.5),
            Rule::new("unsolo_instrument", r"\bunsolo\s+(?P<target>.+)$", MuteAction::Unsolo, 0.5),
        ]
    };

    static ref CHANNEL_ONLY: Regex = Regex::new(&format!(
        r"(?i)^(?:the\s+)?{}(?P<n>\d+|[a-z]+(?:[\s-][a-z]+)?)$",
        CHANNEL
    ))
    .unwrap();

    static ref LABEL_RULES: Vec<Rule<LabelAction>> = {
        let ch = channel("ch");
        vec![
            Rule::new("name_channel", &format!(r"\b(?:name|label|call|tag|rename)\s+{}\s+(?:as\s+|to\s+)?(?P<label>.+)$", ch), LabelAction::Name, 1.0),
            Rule::new("channel_is", &format!(r"^{}\s+is\s+(?:now\s+)?(?P<label>.+)$", ch), LabelAction::Name, 0.9),
            Rule::new("label_is_on_channel", &format!(r"^(?P<label>.+?)\s+is\s+(?:on\s+|in\s+)?{}$", ch), LabelAction::Name, 0.9),
        ]
    };
}

/// Number of rules per list, for diagnostics
pub fn rule_counts() -> [(&'static str, usize); 3] {
    [
        ("channel_fader", FADER_RULES.len()),
        ("channel_mute", MUTE_RULES.len()),
        ("channel_label", LABEL_RULES.len()),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelProcessor {
    validator: Validator,
}

impl ChannelProcessor {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Resolve an instrument name to a channel.
    ///
    /// Lookup order: exact label, alias (canonical name as a label, or any
    /// label that is itself an alias of the same instrument), partial match
    /// against labels in either direction, default patch. First hit wins.
    pub fn get_channel_for_instrument(&self, name: &str, labels: &LabelTable) -> Option<u32> {
        let name = clean_target(name);
        if name.is_empty() {
            return None;
        }

        if let Some(n) = labels.get(&name) {
            return Some(n);
        }

        if let Some(canonical) = terms::canonical_instrument(&name) {
            if let Some(n) = labels.get(canonical) {
                return Some(n);
            }
            let alias_hit = labels
                .iter()
                .find(|(label, _)| terms::canonical_instrument(label) == Some(canonical));
            if let Some((_, n)) = alias_hit {
                return Some(n);
            }
        }

        let partial = labels
            .iter()
            .find(|(label, _)| name.contains(label) || label.contains(name.as_str()));
        if let Some((_, n)) = partial {
            return Some(n);
        }

        terms::default_channel(&name)
    }

    /// Channel for a captured instrument phrase, if it is one and in range
    pub fn resolve_instrument(&self, target: &str, labels: &LabelTable) -> Option<u32> {
        let target = clean_target(target);
        if !is_instrument_candidate(&target) {
            return None;
        }
        self.get_channel_for_instrument(&target, labels)
            .filter(|&n| self.validator.validate_channel(n))
    }

    /// Channel for a captured source phrase: explicit "channel N" or an
    /// instrument. The flag is true when the number was explicit.
    pub fn resolve_target(&self, target: &str, labels: &LabelTable) -> Option<(u32, bool)> {
        let target = target.trim();
        if let Some(caps) = CHANNEL_ONLY.captures(target) {
            return self
                .validator
                .parse_number(&caps["n"])
                .filter(|&n| self.validator.validate_channel(n))
                .map(|n| (n, true));
        }
        self.resolve_instrument(target, labels).map(|n| (n, false))
    }

    /// Channel from either the `ch` or the `target` capture of a rule match
    fn resolve_match<A>(&self, m: &RuleMatch<'_, '_, A>, labels: &LabelTable) -> Result<Option<u32>> {
        if let Some(raw) = m.optional("ch") {
            return Ok(self
                .validator
                .parse_number(raw)
                .filter(|&n| self.validator.validate_channel(n)));
        }
        let target = m.group("target")?;
        Ok(self.resolve_instrument(target, labels))
    }

    /// Fader level commands for input channels, plus head amp gain
    pub fn process_channel_fader(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&FADER_RULES, text) {
            let Some(ch) = self.resolve_match(&m, labels)? else {
                continue;
            };

            if m.rule.action == FaderAction::Gain {
                results.extend(self.gain_command(ch, &m));
                continue;
            }

            let Some(change) = self.fader_move(m.rule.action, &m) else {
                continue;
            };
            debug!(rule = m.rule.name, channel = ch, ?change, "fader rule matched");

            let cmd = match change {
                FaderMove::To(level) => ProtocolCommand::new(
                    rcp::set_single(rcp::INCH_FADER_LEVEL, ch, level),
                    format!("Set channel {} fader to {}", ch, format_level(level)),
                    m.rule.confidence,
                ),
                FaderMove::By(delta) => ProtocolCommand::advisory(
                    relative_move(&format!("channel {}", ch), delta),
                    format!("Move channel {} fader by {}", ch, format_level(delta)),
                    m.rule.confidence.min(RELATIVE_CONFIDENCE),
                ),
                FaderMove::Manual => ProtocolCommand::advisory(
                    format!("Manual adjustment mode for channel {}", ch),
                    format!("Ride channel {}", ch),
                    m.rule.confidence,
                ),
            };
            results.push(cmd);
        }

        Ok(results)
    }

    /// What a fader match asks for.
    ///
    /// "to LEVEL" is absolute. "by AMOUNT" is relative, except -inf which
    /// closes the fader whatever it was. Otherwise the action default applies.
    fn fader_move<A>(&self, action: FaderAction, m: &RuleMatch<'_, '_, A>) -> Option<FaderMove> {
        if let Some(level) = m.optional("level") {
            if rules::mentions_console_object(level) {
                return None;
            }
            return self.validator.parse_db_value(level).map(FaderMove::To);
        }
        if let Some(amount) = m.optional("amount") {
            let value = self.validator.parse_db_value(amount)?;
            if value == NEG_INF_LEVEL {
                return Some(FaderMove::To(value));
            }
            return Some(FaderMove::By(action.signed(value)));
        }
        match action {
            FaderAction::BumpUp => Some(FaderMove::By(BUMP_STEP)),
            FaderAction::BumpDown => Some(FaderMove::By(-BUMP_STEP)),
            FaderAction::Ride => Some(FaderMove::Manual),
            other => other.default_level().map(FaderMove::To),
        }
    }

    /// Head amp gain has no mapped parameter yet, so it is advisory
    fn gain_command<A>(&self, ch: u32, m: &RuleMatch<'_, '_, A>) -> Option<ProtocolCommand> {
        let Some(level) = m.optional("level") else {
            return Some(ProtocolCommand::advisory(
                format!("Adjust gain/trim for channel {}", ch),
                format!("Adjust gain on channel {}", ch),
                m.rule.confidence,
            ));
        };
        let gain = self.validator.parse_db_value(level)?;
        debug!(rule = m.rule.name, channel = ch, gain, "gain rule matched");
        Some(ProtocolCommand::advisory(
            rcp::set_single(rcp::INCH_HEAD_GAIN, ch, gain),
            format!("Set channel {} gain to {}", ch, format_level(gain)),
            m.rule.confidence,
        ))
    }

    /// Mute, unmute and solo commands for input channels
    pub fn process_channel_mute(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&MUTE_RULES, text) {
            let Some(ch) = self.resolve_match(&m, labels)? else {
                continue;
            };

            let action = match m.rule.action {
                MuteAction::Switch => match m.group("state")?.to_lowercase().as_str() {
                    "on" | "unmuted" | "unmute" => MuteAction::Unmute,
                    _ => MuteAction::Mute,
                },
                other => other,
            };

            debug!(rule = m.rule.name, channel = ch, ?action, "mute rule matched");
            let cmd = match action {
                MuteAction::Mute => ProtocolCommand::new(
                    rcp::set_single(rcp::INCH_FADER_ON, ch, 0),
                    format!("Mute channel {}", ch),
                    m.rule.confidence,
                ),
                MuteAction::Unmute => ProtocolCommand::new(
                    rcp::set_single(rcp::INCH_FADER_ON, ch, 1),
                    format!("Unmute channel {}", ch),
                    m.rule.confidence,
                ),
                MuteAction::Solo => ProtocolCommand::advisory(
                    format!("solo channel {} (cue on)", ch),
                    format!("Solo channel {}", ch),
                    m.rule.confidence,
                ),
                MuteAction::Unsolo => ProtocolCommand::advisory(
                    format!("unsolo channel {} (cue off)", ch),
                    format!("Unsolo channel {}", ch),
                    m.rule.confidence,
                ),
                MuteAction::Switch => continue,
            };
            results.push(cmd);
        }

        Ok(results)
    }

    /// Channel naming; updates the label table as a side effect
    pub fn process_channel_label(&self, text: &str, labels: &mut LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&LABEL_RULES, text) {
            let Some(ch) = self
                .validator
                .parse_number(m.group("ch")?)
                .filter(|&n| self.validator.validate_channel(n))
            else {
                continue;
            };
            let label = clean_label(m.group("label")?);
            if label.is_empty() {
                continue;
            }

            labels.assign(&label, ch);
            info!(channel = ch, label = %label, "channel labelled");
            results.push(ProtocolCommand::new(
                rcp::set_single(rcp::INCH_LABEL, ch, rcp::quoted(&label)),
                format!("Label channel {} as '{}'", ch, label),
                m.rule.confidence,
            ));
        }

        Ok(results)
    }
}

/// Label payload: trimmed, unquoted, without a leading article
pub fn clean_label(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == ',')
        .trim();
    let lowered = trimmed.to_lowercase();
    let without_article = if lowered.starts_with("the ") {
        &trimmed[4..]
    } else {
        trimmed
    };
    without_article.trim().to_string()
}
