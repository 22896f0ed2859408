//! Send, matrix, group and pan routing
//!
//! Sources are either explicit ("channel 4", "track two") or instruments
//! resolved through the channel processor. Enabling a send with a level
//! always emits the enable line before the level line; a level line is never
//! emitted on its own.
//!
//! Monitor idioms ("the drummer's wedge", "in my ears") carry a fixed
//! destination mix because the utterance does not name one:
//!
//! | idiom                     | mix |
//! |---------------------------|-----|
//! | singer's wedge, foldback  | 1   |
//! | drummer's wedge           | 2   |
//! | IEMs / ears               | 3   |
//! | bass player's wedge       | 4   |
//! | guitarist's wedge         | 5   |
//! | keys player's wedge       | 6   |

use crate::channels::ChannelProcessor;
use crate::command::{format_level, format_pan, rcp, ProtocolCommand};
use crate::error::Result;
use crate::rules::{self, channel, mix, num, Rule, RuleMatch};
use crate::session::LabelTable;
use crate::terms::{self, PAN_LIMIT};
use crate::validation::Validator;
use regex::Regex;
use tracing::debug;

/// Level for "more X in the mix"
const MORE_LEVEL: i32 = 300;
/// Level for "less X in the mix"
const LESS_LEVEL: i32 = -600;
/// Confidence factor applied when the source was an instrument, not a number
const INSTRUMENT_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendAction {
    On,
    Off,
    /// Enable plus explicit level from the `level` capture
    Level,
    /// Enable plus "more"/"less" level from the `bump` capture
    Bump,
    /// Fixed destination mix; "more"/"less" in the span adds a level
    Idiom(u32),
    PrePost,
    Matrix,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanAction {
    Direct,
    SendPan,
    /// Stereo pair: source hard left, next channel hard right
    Spread,
}

/// Verb lead-in for idiom rules; "more"/"less" alone also counts
const IDIOM_LEAD: &str =
    r"\b(?:(?:send|give|put|feed|route|add)\s+(?:me\s+)?(?:some\s+|a\s+bit\s+(?:more|less)\s+|more\s+|less\s+)?|more\s+|less\s+)";

/// Monitor destinations that imply a mix: (rule name, phrase, mix)
static IDIOMS: &[(&str, &str, u32)] = &[
    ("singer_wedge", r"(?:the\s+)?(?:lead\s+)?(?:singer|vocalist)'?s\s+(?:wedge|monitor|mix)", 1),
    ("drummer_wedge", r"(?:the\s+)?drummer'?s\s+(?:wedge|monitor|mix)", 2),
    ("iem", r"(?:the\s+|my\s+|his\s+|her\s+|their\s+)?(?:iems?|in[\s-]?ears?|ears)", 3),
    ("bass_wedge", r"(?:the\s+)?(?:bass\s+player|bassist)'?s\s+(?:wedge|monitor|mix)", 4),
    ("guitar_wedge", r"(?:the\s+)?(?:guitar\s+player|guitarist)'?s\s+(?:wedge|monitor|mix)", 5),
    ("keys_wedge", r"(?:the\s+)?(?:keys\s+player|keyboard\s+player|keyboardist|pianist)'?s\s+(?:wedge|monitor|mix)", 6),
    ("foldback", r"(?:the\s+)?foldback", 1),
];

lazy_static::lazy_static! {
    static ref SEND_RULES: Vec<Rule<SendAction>> = {
        let ch = channel("ch");
        let dest = mix("mix");
        let mut rules = vec![
            Rule::new(
                "send_level",
                &format!(r"\b(?:send|route|assign|put|feed|give)\s+(?:me\s+)?(?P<target>.+?)\s+(?:to|into|in)\s+{}\s+(?:at|to|@)\s+(?P<level>.+)$", dest),
                SendAction::Level,
                1.0,
            ),
            Rule::new(
                "channel_send_level",
                &format!(r"^(?:set\s+)?{}\s+(?:send\s+)?(?:to|in|on)\s+{}\s+(?:send\s+)?(?:at|to)\s+(?P<level>.+)$", ch, dest),
                SendAction::Level,
                1.0,
            ),
            Rule::new(
                "mix_send_level_for",
                &format!(r"^set\s+{}\s+(?:send\s+)?(?:for|on|from)\s+(?P<target>.+?)\s+(?:to|at)\s+(?P<level>.+)$", dest),
                SendAction::Level,
                1.0,
            ),
            Rule::new(
                "send_on",
                &format!(r"\b(?:send|route|assign|put|feed|add)\s+(?P<target>.+?)\s+(?:to|into|in)\s+{}\b", dest),
                SendAction::On,
                1.0,
            ),
            Rule::new(
                "enable_send",
                &format!(r"\b(?:turn\s+on|enable|unmute|open)\s+(?P<target>.+?)\s+(?:send\s+)?(?:to|in|on)\s+{}\b", dest),
                SendAction::On,
                1.0,
            ),
            Rule::new(
                "enable_mix_for",
                &format!(r"\b(?:turn\s+on|enable|unmute|open)\s+{}\s+(?:send\s+)?(?:for|on|from)\s+(?P<target>.+)$", dest),
                SendAction::On,
                1.0,
            ),
            Rule::new(
                "remove_from_mix",
                &format!(r"\b(?:remove|unroute|unassign|take|pull|drop|get)\s+(?P<target>.+?)\s+(?:out\s+of|from|off(?:\s+of)?)\s+{}\b", dest),
                SendAction::Off,
                1.0,
            ),
            Rule::new(
                "mute_send",
                &format!(r"\b(?:turn\s+off|disable|kill|mute|cut)\s+(?P<target>.+?)\s+(?:send\s+)?(?:to|in|on|from)\s+{}\b", dest),
                SendAction::Off,
                1.0,
            ),
            Rule::new(
                "disable_mix_for",
                &format!(r"\b(?:turn\s+off|disable|mute|kill)\s+{}\s+(?:send\s+)?(?:for|on|from)\s+(?P<target>.+)$", dest),
                SendAction::Off,
                1.0,
            ),
            Rule::new(
                "more_less_in_mix",
                &format!(r"\b(?:(?:give|send)\s+(?:me\s+)?)?(?:a\s+(?:bit|little)\s+)?(?P<bump>more|less)\s+(?P<target>.+?)\s+(?:in|to|into|on)\s+{}$", dest),
                SendAction::Bump,
                0.85,
            ),
        ];

        for &(name, phrase, mix) in IDIOMS {
            rules.push(Rule::new(
                name,
                &format!(r"{}(?P<target>.+?)\s+(?:to|in|into|on)\s+{}$", IDIOM_LEAD, phrase),
                SendAction::Idiom(mix),
                0.8,
            ));
        }

        rules.extend(vec![
            Rule::new(
                "pre_post_send",
                &format!(r"^(?:(?:make|set|put|send|route)\s+)?(?P<target>.+?)\s+(?:send\s+)?(?:to|in|on)\s+{}\s+(?:send\s+)?(?:to\s+)?(?P<prepost>pre|post)(?:[\s-]*fader)?\b", dest),
                SendAction::PrePost,
                0.9,
            ),
            Rule::new(
                "mix_pre_post_for",
                &format!(r"^(?:set|make)\s+{}\s+(?:send\s+)?(?P<prepost>pre|post)(?:[\s-]*fader)?\s+(?:for|on)\s+(?P<target>.+)$", dest),
                SendAction::PrePost,
                0.9,
            ),
            Rule::new(
                "matrix_send",
                &format!(r"\b(?:send|route|assign|put|feed)\s+(?P<target>.+?)\s+(?:to|into)\s+(?:the\s+)?(?:matrix|mtx)\s*#?\s*{}(?:\s+(?:at|to)\s+(?P<level>.+))?$", num("mtx")),
                SendAction::Matrix,
                0.9,
            ),
            Rule::new(
                "group_assign",
                &format!(r"\b(?:assign|route|send|add|put)\s+(?P<target>.+?)\s+(?:to|into|in)\s+(?:the\s+)?(?:sub\s*group|group|dca|vca)\s*#?\s*{}\b", num("group")),
                SendAction::Group,
                0.6,
            ),
        ]);
        rules
    };

    static ref PAN_RULES: Vec<Rule<PanAction>> = {
        let dest = mix("mix");
        vec![
            Rule::new(
                "send_pan",
                &format!(r"\bpan\s+(?P<target>.+?)\s+(?:in|on)\s+{}\s+(?:to\s+(?:the\s+)?)?{}$", dest, POSITION),
                PanAction::SendPan,
                1.0,
            ),
            Rule::new(
                "pan",
                &format!(r"\bpan\s+(?P<target>.+?)\s+(?:to\s+(?:the\s+)?)?{}$", POSITION),
                PanAction::Direct,
                1.0,
            ),
            Rule::new(
                "put_on_side",
                &format!(r"\b(?:put|place|move)\s+(?P<target>.+?)\s+(?:on|to|in)\s+(?:the\s+)?{}(?:\s+side)?$", POSITION_WORDS),
                PanAction::Direct,
                0.9,
            ),
            Rule::new(
                "channel_position",
                &format!(r"^{}\s+(?:pan(?:ned)?\s+)?(?:to\s+(?:the\s+)?)?{}$", channel("ch"), POSITION_WORDS),
                PanAction::Direct,
                0.9,
            ),
            Rule::new(
                "pan_side_first",
                &format!(r"\bpan\s+{}\s+(?:on\s+)?(?P<target>.+)$", POSITION_WORDS),
                PanAction::Direct,
                1.0,
            ),
            Rule::new(
                "hard_side",
                r"^(?P<pos>(?:hard|full)\s+(?:left|right))\s+(?:on\s+)?(?P<target>.+)$",
                PanAction::Direct,
                0.9,
            ),
            Rule::new("side_on", r"^(?P<pos>left|right)\s+on\s+(?P<target>.+)$", PanAction::Direct, 0.85),
            Rule::new("center_target", r"^(?P<pos>cent(?:er|re))\s+(?P<target>.+)$", PanAction::Direct, 0.9),
            Rule::new(
                "spread",
                r"\bspread\s+(?P<target>.+?)(?:\s+(?:wide|out|apart|across))?$",
                PanAction::Spread,
                0.85,
            ),
        ]
    };

    static ref MIX_SOURCE: Regex = Regex::new(
        r"(?i)^(?:the\s+)?(?:mix|aux|bus)\s*#?\s*(?P<n>\d+|[a-z]+(?:[\s-][a-z]+)?)$"
    )
    .unwrap();

    static ref SIDE_NUMBER: Regex =
        Regex::new(r"(?i)^(?P<side>left|right|l|r)\s*(?P<n>\d+)$").unwrap();

    static ref MORE_WORD: Regex = Regex::new(r"(?i)\bmore\b").unwrap();
    static ref LESS_WORD: Regex = Regex::new(r"(?i)\bless\b").unwrap();
}

/// Pan position phrase or number, captured as `pos`
const POSITION: &str = r"(?P<pos>(?:(?:hard|full|far|dead|all\s+the\s+way|halfway|half|slightly|a\s+little|a\s+bit|little)\s+)?(?:to\s+the\s+)?(?:left|right|cent(?:er|re)d?|middle)|(?:left|right|l|r)\s*\d+|-?\d+)";

/// Pan position phrase only (no bare numbers), captured as `pos`
const POSITION_WORDS: &str = r"(?P<pos>(?:(?:hard|full|far|dead|all\s+the\s+way|halfway|half|slightly|a\s+little|a\s+bit|little)\s+)?(?:to\s+the\s+)?(?:left|right|cent(?:er|re)d?|middle))";

/// Number of rules per list, for diagnostics
pub fn rule_counts() -> [(&'static str, usize); 2] {
    [("send_to_mix", SEND_RULES.len()), ("pan", PAN_RULES.len())]
}

/// Pan value for a position phrase: table phrase, "left 20", or signed number
pub fn pan_value(text: &str) -> Option<i32> {
    let text = text.trim().to_lowercase().replace("to the ", "");
    if let Some(caps) = SIDE_NUMBER.captures(&text) {
        let amount: i32 = caps["n"].parse().ok()?;
        let signed = if caps["side"].starts_with('l') { -amount } else { amount };
        return Some(signed.clamp(-PAN_LIMIT, PAN_LIMIT));
    }
    if let Some(value) = terms::pan_position(&text) {
        return Some(value);
    }
    text.parse::<i32>()
        .ok()
        .map(|v| v.clamp(-PAN_LIMIT, PAN_LIMIT))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingProcessor {
    validator: Validator,
    channels: ChannelProcessor,
}

impl RoutingProcessor {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            channels: ChannelProcessor::new(validator),
        }
    }

    /// Channel for a captured source: explicit "channel N" or an instrument.
    /// The flag is true when the number was explicit.
    pub fn resolve_source(&self, target: &str, labels: &LabelTable) -> Option<(u32, bool)> {
        self.channels.resolve_target(target, labels)
    }

    /// Source channel for a match via its `ch` or `target` capture
    fn source<A>(&self, m: &RuleMatch<'_, '_, A>, labels: &LabelTable) -> Result<Option<(u32, bool)>> {
        if let Some(raw) = m.optional("ch") {
            return Ok(self
                .validator
                .parse_number(raw)
                .filter(|&n| self.validator.validate_channel(n))
                .map(|n| (n, true)));
        }
        Ok(self.resolve_source(m.group("target")?, labels))
    }

    fn mix_number<A>(&self, m: &RuleMatch<'_, '_, A>) -> Result<Option<u32>> {
        Ok(self
            .validator
            .parse_number(m.group("mix")?)
            .filter(|&n| self.validator.validate_mix(n)))
    }

    fn level<A>(&self, m: &RuleMatch<'_, '_, A>) -> Result<Option<i32>> {
        let level = m.group("level")?;
        if rules::mentions_console_object(level) {
            return Ok(None);
        }
        Ok(self.validator.parse_db_value(level))
    }

    /// Send enable/disable/level, idioms, pre/post, matrix and group routing
    pub fn process_send_to_mix(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&SEND_RULES, text) {
            // Matrix sources may be mixes rather than channels
            if m.rule.action == SendAction::Matrix {
                results.extend(self.matrix_send(&m, labels)?);
                continue;
            }

            let Some((ch, explicit)) = self.source(&m, labels)? else {
                continue;
            };
            let confidence = if explicit {
                m.rule.confidence
            } else {
                m.rule.confidence * INSTRUMENT_FACTOR
            };

            let destination = match m.rule.action {
                SendAction::Idiom(mix) => Some(mix).filter(|&n| self.validator.validate_mix(n)),
                SendAction::Group => None,
                _ => self.mix_number(&m)?,
            };

            debug!(rule = m.rule.name, channel = ch, ?destination, "send rule matched");
            match (m.rule.action, destination) {
                (SendAction::On, Some(mix)) => {
                    results.push(send_on(ch, mix, true, confidence));
                }
                (SendAction::Off, Some(mix)) => {
                    results.push(send_on(ch, mix, false, confidence));
                }
                (SendAction::Level, Some(mix)) => {
                    if let Some(level) = self.level(&m)? {
                        results.push(send_on(ch, mix, true, confidence));
                        results.push(send_level(ch, mix, level, confidence));
                    }
                }
                (SendAction::Bump, Some(mix)) => {
                    let level = if m.group("bump")?.eq_ignore_ascii_case("less") {
                        LESS_LEVEL
                    } else {
                        MORE_LEVEL
                    };
                    results.push(send_on(ch, mix, true, confidence));
                    results.push(send_level(ch, mix, level, confidence));
                }
                (SendAction::Idiom(_), Some(mix)) => {
                    results.push(send_on(ch, mix, true, confidence));
                    let span = m.span();
                    if MORE_WORD.is_match(span) {
                        results.push(send_level(ch, mix, MORE_LEVEL, confidence));
                    } else if LESS_WORD.is_match(span) {
                        results.push(send_level(ch, mix, LESS_LEVEL, confidence));
                    }
                }
                (SendAction::PrePost, Some(mix)) => {
                    let pre = m.group("prepost")?.eq_ignore_ascii_case("pre");
                    results.push(ProtocolCommand::new(
                        rcp::set(rcp::INCH_TO_MIX_PREPOST, ch, mix, u8::from(pre)),
                        format!(
                            "Set channel {} send to mix {} {}-fader",
                            ch,
                            mix,
                            if pre { "pre" } else { "post" }
                        ),
                        confidence,
                    ));
                }
                (SendAction::Group, _) => {
                    let Some(group) = self
                        .validator
                        .parse_number(m.group("group")?)
                        .filter(|&n| self.validator.validate_dca(n))
                    else {
                        continue;
                    };
                    results.push(ProtocolCommand::advisory(
                        format!("assign channel {} to group {}", ch, group),
                        format!("Assign channel {} to group {}", ch, group),
                        confidence,
                    ));
                }
                _ => {}
            }
        }

        Ok(results)
    }

    fn matrix_send<A>(&self, m: &RuleMatch<'_, '_, A>, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let Some(mtx) = self
            .validator
            .parse_number(m.group("mtx")?)
            .filter(|&n| self.validator.validate_matrix(n))
        else {
            return Ok(Vec::new());
        };
        let level = match m.optional("level") {
            Some(_) => match self.level(m)? {
                Some(level) => Some(level),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let target = m.group("target")?.trim();
        let (on_path, level_path, source, kind, confidence) =
            if let Some(caps) = MIX_SOURCE.captures(target) {
                let Some(mix) = self
                    .validator
                    .parse_number(&caps["n"])
                    .filter(|&n| self.validator.validate_mix(n))
                else {
                    return Ok(Vec::new());
                };
                (rcp::MIX_TO_MTRX_ON, rcp::MIX_TO_MTRX_LEVEL, mix, "mix", m.rule.confidence)
            } else {
                let Some((ch, explicit)) = self.resolve_source(target, labels) else {
                    return Ok(Vec::new());
                };
                let confidence = if explicit {
                    m.rule.confidence
                } else {
                    m.rule.confidence * INSTRUMENT_FACTOR
                };
                (rcp::INCH_TO_MTRX_ON, rcp::INCH_TO_MTRX_LEVEL, ch, "channel", confidence)
            };

        debug!(rule = m.rule.name, source, matrix = mtx, kind, "matrix rule matched");
        let mut results = vec![ProtocolCommand::new(
            rcp::set(on_path, source, mtx, 1),
            format!("Send {} {} to matrix {}", kind, source, mtx),
            confidence,
        )];
        if let Some(level) = level {
            results.push(ProtocolCommand::new(
                rcp::set(level_path, source, mtx, level),
                format!(
                    "Set {} {} send to matrix {} at {}",
                    kind,
                    source,
                    mtx,
                    format_level(level)
                ),
                confidence,
            ));
        }
        Ok(results)
    }

    /// Stereo and per-send pan commands
    pub fn process_pan_commands(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&PAN_RULES, text) {
            let Some((ch, explicit)) = self.source(&m, labels)? else {
                continue;
            };
            let confidence = if explicit {
                m.rule.confidence
            } else {
                m.rule.confidence * INSTRUMENT_FACTOR
            };

            match m.rule.action {
                PanAction::Direct => {
                    let Some(pan) = pan_value(m.group("pos")?) else {
                        continue;
                    };
                    debug!(rule = m.rule.name, channel = ch, pan, "pan rule matched");
                    results.push(stereo_pan(ch, pan, confidence));
                }
                PanAction::SendPan => {
                    let Some(mix) = self.mix_number(&m)? else {
                        continue;
                    };
                    let Some(pan) = pan_value(m.group("pos")?) else {
                        continue;
                    };
                    debug!(rule = m.rule.name, channel = ch, mix, pan, "send pan rule matched");
                    results.push(ProtocolCommand::new(
                        rcp::set(rcp::INCH_TO_MIX_PAN, ch, mix, pan),
                        format!("Pan channel {} in mix {} to {}", ch, mix, format_pan(pan)),
                        confidence,
                    ));
                }
                PanAction::Spread => {
                    // Assumes the pair sits on adjacent channels
                    let pair = ch + 1;
                    debug!(rule = m.rule.name, left = ch, right = pair, "spread rule matched");
                    results.push(stereo_pan(ch, -PAN_LIMIT, confidence));
                    if self.validator.validate_channel(pair) {
                        results.push(stereo_pan(pair, PAN_LIMIT, confidence));
                    }
                }
            }
        }

        Ok(results)
    }
}

fn send_on(ch: u32, mix: u32, on: bool, confidence: f32) -> ProtocolCommand {
    let description = if on {
        format!("Send channel {} to mix {}", ch, mix)
    } else {
        format!("Remove channel {} from mix {}", ch, mix)
    };
    ProtocolCommand::new(
        rcp::set(rcp::INCH_TO_MIX_ON, ch, mix, u8::from(on)),
        description,
        confidence,
    )
}

fn send_level(ch: u32, mix: u32, level: i32, confidence: f32) -> ProtocolCommand {
    ProtocolCommand::new(
        rcp::set(rcp::INCH_TO_MIX_LEVEL, ch, mix, level),
        format!(
            "Set channel {} send to mix {} at {}",
            ch,
            mix,
            format_level(level)
        ),
        confidence,
    )
}

fn stereo_pan(ch: u32, pan: i32, confidence: f32) -> ProtocolCommand {
    ProtocolCommand::new(
        rcp::set_single(rcp::INCH_TO_ST_PAN, ch, pan),
        format!("Pan channel {} to {}", ch, format_pan(pan)),
        confidence,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationLimits;

    fn processor() -> RoutingProcessor {
        RoutingProcessor::new(Validator::new(ValidationLimits::default()))
    }

    fn sends(text: &str) -> Vec<String> {
        crate::command::dedup_commands(
            processor()
                .process_send_to_mix(text, &LabelTable::new())
                .unwrap(),
        )
        .iter()
        .map(|c| c.command().to_string())
        .collect()
    }

    fn pans(text: &str) -> Vec<String> {
        processor()
            .process_pan_commands(text, &LabelTable::new())
            .unwrap()
            .iter()
            .map(|c| c.command().to_string())
            .collect()
    }

    #[test]
    fn test_send_channel_to_mix() {
        assert_eq!(
            sends("send channel 3 to mix 2"),
            vec!["set MIXER:Current/InCh/ToMix/On 2 1 1"]
        );
    }

    #[test]
    fn test_send_level_pairs_enable_with_level() {
        assert_eq!(
            sends("send channel 3 to aux two at -10 db"),
            vec![
                "set MIXER:Current/InCh/ToMix/On 2 1 1",
                "set MIXER:Current/InCh/ToMix/Level 2 1 -1000",
            ]
        );
    }

    #[test]
    fn test_unparsable_level_emits_nothing_for_level_rule() {
        let results = processor()
            .process_send_to_mix("set channel 3 send to mix 2 to somewhere", &LabelTable::new())
            .unwrap();
        assert!(results.iter().all(|c| !c.command().contains("ToMix/Level")));
    }

    #[test]
    fn test_remove_from_mix() {
        assert_eq!(
            sends("take channel 5 out of monitor 4"),
            vec!["set MIXER:Current/InCh/ToMix/On 4 3 0"]
        );
    }

    #[test]
    fn test_instrument_send_has_lower_confidence() {
        let results = processor()
            .process_send_to_mix("send the vocals to mix 1", &LabelTable::new())
            .unwrap();
        assert_eq!(results[0].command(), "set MIXER:Current/InCh/ToMix/On 0 0 1");
        assert!(results[0].confidence() < 1.0);
    }

    #[test]
    fn test_out_of_range_mix_is_skipped() {
        assert!(sends("send channel 3 to mix 21").is_empty());
    }

    #[test]
    fn test_iem_idiom_uses_mix_three() {
        assert_eq!(
            sends("feed the vocals to the ears"),
            vec!["set MIXER:Current/InCh/ToMix/On 0 2 1"]
        );
    }

    #[test]
    fn test_more_in_drummer_wedge() {
        assert_eq!(
            sends("more kick in the drummer's wedge"),
            vec![
                "set MIXER:Current/InCh/ToMix/On 1 1 1",
                "set MIXER:Current/InCh/ToMix/Level 1 1 300",
            ]
        );
    }

    #[test]
    fn test_less_in_numbered_mix() {
        assert_eq!(
            sends("less guitar in monitor 5"),
            vec![
                "set MIXER:Current/InCh/ToMix/On 5 4 1",
                "set MIXER:Current/InCh/ToMix/Level 5 4 -600",
            ]
        );
    }

    #[test]
    fn test_pre_fader_send() {
        let results = sends("make channel 7 send to mix 3 pre fader");
        assert!(results.contains(&"set MIXER:Current/InCh/ToMix/PrePost 6 2 1".to_string()));
    }

    #[test]
    fn test_matrix_from_channel_and_mix() {
        assert_eq!(
            sends("route channel 2 to matrix 1"),
            vec!["set MIXER:Current/InCh/ToMtrx/On 1 0 1"]
        );
        assert_eq!(
            sends("send mix 4 to matrix 2 at unity"),
            vec![
                "set MIXER:Current/Mix/ToMtrx/On 3 1 1",
                "set MIXER:Current/Mix/ToMtrx/Level 3 1 0",
            ]
        );
        assert!(sends("send channel 2 to matrix 9").is_empty());
    }

    #[test]
    fn test_group_assign_is_advisory() {
        let results = processor()
            .process_send_to_mix("assign channel 4 to group 2", &LabelTable::new())
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_advisory());
    }

    #[test]
    fn test_pan_hard_left() {
        assert_eq!(
            pans("Pan channel 8 hard left"),
            vec!["set MIXER:Current/InCh/ToSt/Pan 7 0 -63"]
        );
    }

    #[test]
    fn test_pan_numeric_and_side_amount() {
        assert_eq!(pans("pan channel 2 to 20"), vec!["set MIXER:Current/InCh/ToSt/Pan 1 0 20"]);
        assert_eq!(pans("pan channel 2 left 90"), vec!["set MIXER:Current/InCh/ToSt/Pan 1 0 -63"]);
    }

    #[test]
    fn test_pan_instrument_on_side() {
        let results = pans("put the acoustic guitar on the right");
        assert_eq!(results, vec!["set MIXER:Current/InCh/ToSt/Pan 7 0 32"]);
    }

    #[test]
    fn test_send_pan() {
        let results = pans("pan channel 4 in mix 2 half left");
        assert_eq!(results, vec!["set MIXER:Current/InCh/ToMix/Pan 3 1 -32"]);
    }

    #[test]
    fn test_spread_overheads() {
        assert_eq!(
            pans("spread the overheads"),
            vec![
                "set MIXER:Current/InCh/ToSt/Pan 9 0 -63",
                "set MIXER:Current/InCh/ToSt/Pan 10 0 63",
            ]
        );
    }

    #[test]
    fn test_spread_at_last_channel_pans_left_half() {
        assert_eq!(
            pans("spread channel 40"),
            vec!["set MIXER:Current/InCh/ToSt/Pan 39 0 -63"]
        );
    }

    #[test]
    fn test_position_before_target() {
        assert_eq!(pans("Center channel 5"), vec!["set MIXER:Current/InCh/ToSt/Pan 4 0 0"]);
        assert_eq!(pans("centre track 6"), vec!["set MIXER:Current/InCh/ToSt/Pan 5 0 0"]);
        assert_eq!(pans("pan hard left channel 3"), vec!["set MIXER:Current/InCh/ToSt/Pan 2 0 -63"]);
        assert_eq!(pans("pan right channel 3"), vec!["set MIXER:Current/InCh/ToSt/Pan 2 0 32"]);
        assert_eq!(pans("hard right channel 12"), vec!["set MIXER:Current/InCh/ToSt/Pan 11 0 63"]);
    }

    #[test]
    fn test_position_before_instrument() {
        assert_eq!(pans("hard left on the snare"), vec!["set MIXER:Current/InCh/ToSt/Pan 2 0 -63"]);
        assert_eq!(pans("right on the piano"), vec!["set MIXER:Current/InCh/ToSt/Pan 6 0 32"]);
        assert_eq!(pans("center the vocals"), vec!["set MIXER:Current/InCh/ToSt/Pan 0 0 0"]);

        let results = processor()
            .process_pan_commands("center the vocals", &LabelTable::new())
            .unwrap();
        assert!(results[0].confidence() < 0.9);
    }

    #[test]
    fn test_center_ignores_routing_phrases() {
        assert!(pans("center the vocals in mix 2").is_empty());
    }

    #[test]
    fn test_pan_value() {
        assert_eq!(pan_value("hard left"), Some(-63));
        assert_eq!(pan_value("a little to the right"), Some(16));
        assert_eq!(pan_value("R 10"), Some(10));
        assert_eq!(pan_value("-100"), Some(-63));
        assert_eq!(pan_value("sideways"), None);
    }
}
