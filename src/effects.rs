//! Effects and dynamics
//!
//! Time-based effects and tonal EQ have no single console parameter, so
//! they come out as advisory `#` lines with a suggested setting. The high-pass
//! filter and the channel dynamics switches map to real parameters.

use crate::channels::ChannelProcessor;
use crate::command::{rcp, ProtocolCommand};
use crate::error::Result;
use crate::rules::{self, Rule, RuleMatch};
use crate::session::LabelTable;
use crate::validation::Validator;
use tracing::debug;

const INSTRUMENT_FACTOR: f32 = 0.9;

/// Ratio used for "compress heavily"
const HEAVY_RATIO: f32 = 8.0;
/// Ratio used for limiting
const LIMIT_RATIO: f32 = 20.0;
const MAX_RATIO: f32 = 20.0;
const MAX_ATTACK_MS: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectAction {
    Reverb,
    Delay,
    Eq,
    Tone,
    Hpf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicsAction {
    /// Compressor on; a `heavy` capture also sets a high ratio
    Compress,
    CompressOff,
    Limit,
    Gate,
    GateOff,
    Ratio,
    Attack,
}

const REVERB_KIND: &str = r"(?:(?P<kind>hall|plate|room|chamber|spring)\s+)?";
const AMOUNT_WORDS: &str = r"(?:some\s+|more\s+|a\s+(?:little|bit)\s+(?:of\s+|more\s+)?|a\s+)?";
const EQ_BAND: &str = r"(?P<band>low\s+mids|high\s+mids|lows|low\s+end|bottom\s+end|mids|midrange|highs|high\s+end|top\s+end|treble|presence|air|\d+(?:\.\d+)?\s*k?(?:hz|hertz))";

lazy_static::lazy_static! {
    static ref EFFECT_RULES: Vec<Rule<EffectAction>> = vec![
        Rule::new(
            "reverb_on",
            &format!(r"\b(?:add|put|give|use)\s+{}{}(?:reverb|verb)\s+(?:to|on)\s+(?P<target>.+)$", AMOUNT_WORDS, REVERB_KIND),
            EffectAction::Reverb,
            0.6,
        ),
        Rule::new(
            "give_reverb",
            &format!(r"\b(?:give|add)\s+(?P<target>.+?)\s+{}{}(?:reverb|verb)$", AMOUNT_WORDS, REVERB_KIND),
            EffectAction::Reverb,
            0.6,
        ),
        Rule::new(
            "needs_reverb",
            &format!(r"^(?P<target>.+?)\s+(?:needs|could\s+use|wants)\s+{}{}(?:reverb|verb)$", AMOUNT_WORDS, REVERB_KIND),
            EffectAction::Reverb,
            0.5,
        ),
        Rule::new(
            "delay_on",
            &format!(r"\b(?:add|put|give|use)\s+{}(?P<slap>slap(?:back)?\s+)?(?:delay|echo)\s+(?:to|on)\s+(?P<target>.+)$", AMOUNT_WORDS),
            EffectAction::Delay,
            0.6,
        ),
        Rule::new(
            "give_delay",
            &format!(r"\b(?:give|add)\s+(?P<target>.+?)\s+{}(?P<slap>slap(?:back)?\s+)?(?:delay|echo)$", AMOUNT_WORDS),
            EffectAction::Delay,
            0.6,
        ),
        Rule::new(
            "eq_band",
            &format!(r"\b(?P<dir>boost|cut|add|reduce|lower|raise|scoop)\s+{}(?:the\s+)?{}\s+(?:on|of|in|for|from)\s+(?P<target>.+?)(?:\s+by\s+(?P<amount>.+))?$", AMOUNT_WORDS, EQ_BAND),
            EffectAction::Eq,
            0.5,
        ),
        Rule::new(
            "tone",
            r"\bmake\s+(?P<target>.+?)\s+(?P<tone>brighter|darker|warmer|thinner|fuller|crisper|clearer|less\s+muddy|less\s+boomy|less\s+harsh)$",
            EffectAction::Tone,
            0.5,
        ),
        Rule::new(
            "hpf_on",
            r"\b(?:add|engage|turn\s+on|enable|put|use|apply)\s+(?:an?\s+|the\s+)?(?:hpf|high[\s-]?pass(?:\s+filter)?|low[\s-]?cut)\s+(?:to|on|for)\s+(?P<target>.+)$",
            EffectAction::Hpf,
            0.8,
        ),
        Rule::new(
            "hpf_verb",
            r"^(?:hpf|high[\s-]?pass|low[\s-]?cut)\s+(?P<target>.+)$",
            EffectAction::Hpf,
            0.8,
        ),
        Rule::new(
            "roll_off_lows",
            r"\broll\s+off\s+(?:the\s+|some\s+)?(?:lows|low\s+end|bottom(?:\s+end)?)\s+(?:on|of|from|in)\s+(?P<target>.+)$",
            EffectAction::Hpf,
            0.75,
        ),
    ];

    static ref DYNAMICS_RULES: Vec<Rule<DynamicsAction>> = vec![
        Rule::new(
            "compress",
            r"^compress\s+(?P<target>.+?)(?:\s+(?P<heavy>heavily|hard|harder|a\s+lot))?$",
            DynamicsAction::Compress,
            0.8,
        ),
        Rule::new(
            "add_compression",
            r"\b(?:add|put|use|engage|turn\s+on|enable|apply)\s+(?:some\s+|a\s+|the\s+)?(?P<heavy>heavy\s+|hard\s+|lots\s+of\s+)?(?:compression|compressor|comp)\s+(?:to|on|for)\s+(?P<target>.+)$",
            DynamicsAction::Compress,
            0.8,
        ),
        Rule::new(
            "compression_off",
            r"\b(?:turn\s+off|disable|remove|bypass|kill|take\s+off)\s+(?:the\s+)?(?:compression|compressor|comp)\s+(?:on|for|from)\s+(?P<target>.+)$",
            DynamicsAction::CompressOff,
            0.8,
        ),
        Rule::new("limit", r"^limit\s+(?P<target>.+)$", DynamicsAction::Limit, 0.7),
        Rule::new(
            "add_limiter",
            r"\b(?:add|put|use|engage|turn\s+on|enable)\s+(?:a\s+|the\s+)?limiter\s+(?:to|on|for)\s+(?P<target>.+)$",
            DynamicsAction::Limit,
            0.7,
        ),
        Rule::new("gate", r"^gate\s+(?P<target>.+)$", DynamicsAction::Gate, 0.8),
        Rule::new(
            "add_gate",
            r"\b(?:add|put|use|engage|turn\s+on|enable)\s+(?:a\s+|the\s+)?(?:noise\s+)?gate\s+(?:to|on|for)\s+(?P<target>.+)$",
            DynamicsAction::Gate,
            0.8,
        ),
        Rule::new(
            "gate_off",
            r"\b(?:turn\s+off|disable|remove|bypass|kill|open\s+up)\s+(?:the\s+)?(?:noise\s+)?gate\s+(?:on|for|from)\s+(?P<target>.+)$",
            DynamicsAction::GateOff,
            0.8,
        ),
        Rule::new(
            "ratio",
            r"\b(?:set\s+)?(?:the\s+)?(?:compression|compressor|comp)\s+ratio\s+(?:on|for|of)\s+(?P<target>.+?)\s+to\s+(?P<ratio>\d+(?:\.\d+)?)(?:\s*(?::|to)\s*1)?$",
            DynamicsAction::Ratio,
            0.7,
        ),
        Rule::new(
            "attack",
            r"\b(?:set\s+)?(?:the\s+)?(?:(?:compression|compressor|comp)\s+)?attack\s+(?:on|for|of)\s+(?P<target>.+?)\s+to\s+(?P<attack>\d+(?:\.\d+)?)\s*(?:ms|milliseconds?)?$",
            DynamicsAction::Attack,
            0.7,
        ),
    ];
}

/// Number of rules per list, for diagnostics
pub fn rule_counts() -> [(&'static str, usize); 2] {
    [("effects", EFFECT_RULES.len()), ("dynamics", DYNAMICS_RULES.len())]
}

/// Suggested EQ move for a tonal adjective
fn tone_suggestion(tone: &str) -> &'static str {
    let tone = tone.split_whitespace().collect::<Vec<_>>().join(" ");
    match tone.as_str() {
        "brighter" => "high shelf +3 dB at 8 kHz",
        "darker" => "high shelf -3 dB at 8 kHz",
        "warmer" => "low shelf +2 dB at 200 Hz",
        "thinner" => "high pass around 150 Hz",
        "fuller" => "bell +2 dB at 150 Hz",
        "crisper" => "bell +2 dB at 5 kHz",
        "less boomy" => "bell -3 dB at 120 Hz",
        "less harsh" => "bell -3 dB at 3 kHz",
        // clearer, less muddy
        _ => "bell -3 dB at 300 Hz",
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EffectsProcessor {
    validator: Validator,
    channels: ChannelProcessor,
}

impl EffectsProcessor {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            channels: ChannelProcessor::new(validator),
        }
    }

    fn target<A>(&self, m: &RuleMatch<'_, '_, A>, labels: &LabelTable) -> Result<Option<(u32, f32)>> {
        Ok(self
            .channels
            .resolve_target(m.group("target")?, labels)
            .map(|(ch, explicit)| {
                let confidence = if explicit {
                    m.rule.confidence
                } else {
                    m.rule.confidence * INSTRUMENT_FACTOR
                };
                (ch, confidence)
            }))
    }

    /// Reverb, delay, EQ and high-pass requests
    pub fn process_effects(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&EFFECT_RULES, text) {
            let Some((ch, confidence)) = self.target(&m, labels)? else {
                continue;
            };
            debug!(rule = m.rule.name, channel = ch, "effect rule matched");

            let cmd = match m.rule.action {
                EffectAction::Reverb => {
                    let kind = m.optional("kind").unwrap_or("hall").to_lowercase();
                    ProtocolCommand::advisory(
                        format!("reverb: {} send on channel {}", kind, ch),
                        format!("Add {} reverb to channel {}", kind, ch),
                        confidence,
                    )
                }
                EffectAction::Delay => {
                    let (kind, setting) = if m.optional("slap").is_some() {
                        ("slapback", "~120 ms, single repeat")
                    } else {
                        ("delay", "tempo-synced 1/4 note")
                    };
                    ProtocolCommand::advisory(
                        format!("{}: {} on channel {}", kind, setting, ch),
                        format!("Add {} to channel {}", kind, ch),
                        confidence,
                    )
                }
                EffectAction::Eq => {
                    let dir = m.group("dir")?.to_lowercase();
                    let boost = matches!(dir.as_str(), "boost" | "add" | "raise");
                    let band = m
                        .group("band")?
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .to_lowercase();
                    let amount = m
                        .optional("amount")
                        .and_then(|a| self.validator.parse_db_value(a))
                        .map(|v| {
                            let signed = if boost { v.abs() } else { -v.abs() };
                            format!(" {:+.1} dB", signed as f64 / 100.0)
                        })
                        .unwrap_or_default();
                    let verb = if boost { "boost" } else { "cut" };
                    ProtocolCommand::advisory(
                        format!("eq: {} {}{} on channel {}", verb, band, amount, ch),
                        format!("EQ {} {} on channel {}", verb, band, ch),
                        confidence,
                    )
                }
                EffectAction::Tone => {
                    let tone = m.group("tone")?.to_lowercase();
                    ProtocolCommand::advisory(
                        format!("eq: {} on channel {}", tone_suggestion(&tone), ch),
                        format!("Make channel {} {}", ch, tone),
                        confidence,
                    )
                }
                EffectAction::Hpf => ProtocolCommand::new(
                    rcp::set_single(rcp::INCH_HPF_ON, ch, 1),
                    format!("Engage high-pass filter on channel {}", ch),
                    confidence,
                ),
            };
            results.push(cmd);
        }

        Ok(results)
    }

    /// Compressor, limiter and gate requests
    pub fn process_dynamics(&self, text: &str, labels: &LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&DYNAMICS_RULES, text) {
            let Some((ch, confidence)) = self.target(&m, labels)? else {
                continue;
            };
            debug!(rule = m.rule.name, channel = ch, action = ?m.rule.action, "dynamics rule matched");

            match m.rule.action {
                DynamicsAction::Compress => {
                    results.push(compressor_on(ch, true, confidence));
                    if m.optional("heavy").is_some() {
                        results.push(compressor_ratio(ch, HEAVY_RATIO, confidence.min(0.7)));
                    }
                }
                DynamicsAction::CompressOff => {
                    results.push(compressor_on(ch, false, confidence));
                }
                DynamicsAction::Limit => {
                    results.push(compressor_on(ch, true, confidence));
                    results.push(compressor_ratio(ch, LIMIT_RATIO, confidence));
                }
                DynamicsAction::Gate | DynamicsAction::GateOff => {
                    let on = m.rule.action == DynamicsAction::Gate;
                    results.push(ProtocolCommand::new(
                        rcp::set_single(rcp::INCH_GATE_ON, ch, u8::from(on)),
                        format!("{} gate on channel {}", if on { "Enable" } else { "Disable" }, ch),
                        confidence,
                    ));
                }
                DynamicsAction::Ratio => {
                    let Ok(ratio) = m.group("ratio")?.parse::<f32>() else {
                        continue;
                    };
                    results.push(compressor_ratio(ch, ratio.clamp(1.0, MAX_RATIO), confidence));
                }
                DynamicsAction::Attack => {
                    let Ok(attack) = m.group("attack")?.parse::<f32>() else {
                        continue;
                    };
                    let attack = attack.clamp(0.0, MAX_ATTACK_MS);
                    results.push(ProtocolCommand::new(
                        rcp::set_single(rcp::INCH_COMP_ATTACK, ch, attack),
                        format!("Set compressor attack on channel {} to {} ms", ch, attack),
                        confidence,
                    ));
                }
            }
        }

        Ok(results)
    }
}

fn compressor_on(ch: u32, on: bool, confidence: f32) -> ProtocolCommand {
    ProtocolCommand::new(
        rcp::set_single(rcp::INCH_COMP_ON, ch, u8::from(on)),
        format!("{} compressor on channel {}", if on { "Enable" } else { "Disable" }, ch),
        confidence,
    )
}

fn compressor_ratio(ch: u32, ratio: f32, confidence: f32) -> ProtocolCommand {
    ProtocolCommand::new(
        rcp::set_single(rcp::INCH_COMP_RATIO, ch, ratio),
        format!("Set compressor ratio on channel {} to {}:1", ch, ratio),
        confidence,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationLimits;

    fn processor() -> EffectsProcessor {
        EffectsProcessor::new(Validator::new(ValidationLimits::default()))
    }

    fn effects(text: &str) -> Vec<ProtocolCommand> {
        processor().process_effects(text, &LabelTable::new()).unwrap()
    }

    fn dynamics(text: &str) -> Vec<String> {
        processor()
            .process_dynamics(text, &LabelTable::new())
            .unwrap()
            .iter()
            .map(|c| c.command().to_string())
            .collect()
    }

    #[test]
    fn test_reverb_is_advisory_with_default_type() {
        let results = effects("add reverb to the vocals");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command(), "# reverb: hall send on channel 1");
        assert!(results[0].confidence() < 1.0);
    }

    #[test]
    fn test_reverb_type_is_kept() {
        let results = effects("give the snare some plate reverb");
        assert_eq!(results[0].command(), "# reverb: plate send on channel 3");
    }

    #[test]
    fn test_slapback_delay() {
        let results = effects("add slapback delay to channel 13");
        assert_eq!(results.len(), 1);
        assert!(results[0].command().starts_with("# slapback:"));
        assert!(results[0].command().ends_with("on channel 13"));
    }

    #[test]
    fn test_eq_band_with_amount() {
        let results = effects("cut the lows on the guitar by 3 db");
        assert_eq!(results[0].command(), "# eq: cut lows -3.0 dB on channel 6");
    }

    #[test]
    fn test_tone_idiom() {
        let results = effects("make the vocals brighter");
        assert_eq!(results[0].command(), "# eq: high shelf +3 dB at 8 kHz on channel 1");
    }

    #[test]
    fn test_hpf_is_concrete() {
        let results = effects("add a high pass filter to channel 4");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command(), "set MIXER:Current/InCh/HPF/On 3 0 1");
        assert!(!results[0].is_advisory());
    }

    #[test]
    fn test_unknown_target_is_skipped() {
        assert!(effects("add reverb to the theremin").is_empty());
    }

    #[test]
    fn test_compress_and_heavy_compress() {
        assert_eq!(
            dynamics("compress the vocals"),
            vec!["set MIXER:Current/InCh/Dyna2/On 0 0 1"]
        );
        assert_eq!(
            dynamics("compress the vocals heavily"),
            vec![
                "set MIXER:Current/InCh/Dyna2/On 0 0 1",
                "set MIXER:Current/InCh/Dyna2/Ratio 0 0 8",
            ]
        );
    }

    #[test]
    fn test_limiter() {
        assert_eq!(
            dynamics("put a limiter on the bass"),
            vec![
                "set MIXER:Current/InCh/Dyna2/On 4 0 1",
                "set MIXER:Current/InCh/Dyna2/Ratio 4 0 20",
            ]
        );
    }

    #[test]
    fn test_gate_on_and_off() {
        assert_eq!(dynamics("gate the kick"), vec!["set MIXER:Current/InCh/Dyna1/On 1 0 1"]);
        assert_eq!(
            dynamics("turn off the gate on the kick"),
            vec!["set MIXER:Current/InCh/Dyna1/On 1 0 0"]
        );
    }

    #[test]
    fn test_compressor_off() {
        assert_eq!(
            dynamics("bypass the compressor on channel 5"),
            vec!["set MIXER:Current/InCh/Dyna2/On 4 0 0"]
        );
    }

    #[test]
    fn test_ratio_and_attack() {
        assert_eq!(
            dynamics("set the compressor ratio on channel 2 to 4:1"),
            vec!["set MIXER:Current/InCh/Dyna2/Ratio 1 0 4"]
        );
        assert_eq!(
            dynamics("set the attack on channel 2 to 10 ms"),
            vec!["set MIXER:Current/InCh/Dyna2/Attack 1 0 10"]
        );
    }
}
