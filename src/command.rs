//! Protocol commands produced by the engine
//!
//! A `ProtocolCommand` is either a ready-to-send RCP line or an advisory
//! line prefixed with `#`, used where an intent was recognised but the
//! console path is not mapped. Advisory commands always carry a confidence
//! below 1.0.

use crate::terms::NEG_INF_LEVEL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One translated command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolCommand {
    command: String,
    description: String,
    confidence: f32,
}

impl ProtocolCommand {
    /// Create a command; confidence is clamped into (0, 1]
    pub fn new(command: impl Into<String>, description: impl Into<String>, confidence: f32) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            confidence: confidence.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Create an advisory `#` command for an unmapped action
    pub fn advisory(body: impl fmt::Display, description: impl Into<String>, confidence: f32) -> Self {
        Self::new(
            format!("# {}", body),
            description,
            confidence.min(ADVISORY_CEILING),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn is_advisory(&self) -> bool {
        self.command.starts_with('#')
    }
}

impl fmt::Display for ProtocolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  ({}, {:.0}%)",
            self.command,
            self.description,
            self.confidence * 100.0
        )
    }
}

/// Highest confidence an advisory command may claim
const ADVISORY_CEILING: f32 = 0.9;

/// RCP parameter paths under `MIXER:Current/`
pub mod rcp {
    pub const INCH_FADER_LEVEL: &str = "InCh/Fader/Level";
    pub const INCH_FADER_ON: &str = "InCh/Fader/On";
    pub const INCH_LABEL: &str = "InCh/Label/Name";
    pub const INCH_HEAD_GAIN: &str = "InCh/Head/Gain";
    pub const INCH_TO_MIX_ON: &str = "InCh/ToMix/On";
    pub const INCH_TO_MIX_LEVEL: &str = "InCh/ToMix/Level";
    pub const INCH_TO_MIX_PAN: &str = "InCh/ToMix/Pan";
    pub const INCH_TO_MIX_PREPOST: &str = "InCh/ToMix/PrePost";
    pub const INCH_TO_ST_PAN: &str = "InCh/ToSt/Pan";
    pub const INCH_TO_MTRX_ON: &str = "InCh/ToMtrx/On";
    pub const INCH_TO_MTRX_LEVEL: &str = "InCh/ToMtrx/Level";
    pub const MIX_TO_MTRX_ON: &str = "Mix/ToMtrx/On";
    pub const MIX_TO_MTRX_LEVEL: &str = "Mix/ToMtrx/Level";
    pub const INCH_HPF_ON: &str = "InCh/HPF/On";
    pub const INCH_GATE_ON: &str = "InCh/Dyna1/On";
    pub const INCH_COMP_ON: &str = "InCh/Dyna2/On";
    pub const INCH_COMP_RATIO: &str = "InCh/Dyna2/Ratio";
    pub const INCH_COMP_ATTACK: &str = "InCh/Dyna2/Attack";
    pub const DCA_FADER_LEVEL: &str = "DCA/Fader/Level";
    pub const DCA_FADER_ON: &str = "DCA/Fader/On";
    pub const DCA_LABEL: &str = "DCA/Label/Name";

    /// `set MIXER:Current/<path> <x> <y> <value>` with 1-based x/y converted to 0-based
    pub fn set(path: &str, x: u32, y: u32, value: impl std::fmt::Display) -> String {
        format!(
            "set MIXER:Current/{} {} {} {}",
            path,
            index(x),
            index(y),
            value
        )
    }

    /// Same as `set` for parameters whose second address field is unused
    pub fn set_single(path: &str, x: u32, value: impl std::fmt::Display) -> String {
        format!("set MIXER:Current/{} {} 0 {}", path, index(x), value)
    }

    /// Quoted string payload with embedded quotes removed
    pub fn quoted(text: &str) -> String {
        format!("\"{}\"", text.replace('"', ""))
    }

    pub fn scene_recall(scene: u32) -> String {
        format!("ssrecall_ex scene_{:02}", scene)
    }

    pub fn scene_store(scene: u32) -> String {
        format!("ssstore scene_{:02}", scene)
    }

    /// 1-based console number -> 0-based protocol index
    pub fn index(n: u32) -> u32 {
        n.saturating_sub(1)
    }
}

/// Human-readable level for descriptions ("-6.0 dB", "-inf dB")
pub fn format_level(value: i32) -> String {
    if value == NEG_INF_LEVEL {
        "-inf dB".to_string()
    } else {
        format!("{:.1} dB", value as f64 / 100.0)
    }
}

/// Confidence of a relative-move advisory
pub const RELATIVE_CONFIDENCE: f32 = 0.8;

/// Advisory body for a move relative to the current level of `target`.
///
/// The protocol only sets absolute levels, so the caller has to read the
/// fader first.
pub fn relative_move(target: &str, delta: i32) -> String {
    let verb = if delta < 0 { "subtract" } else { "add" };
    format!(
        "GET current level, then {} {:.1} dB on {}",
        verb,
        delta.unsigned_abs() as f64 / 100.0,
        target
    )
}

/// Human-readable pan position ("L63", "C", "R16")
pub fn format_pan(value: i32) -> String {
    match value {
        0 => "C".to_string(),
        v if v < 0 => format!("L{}", -v),
        v => format!("R{}", v),
    }
}

/// Drop repeated command strings, keeping the first occurrence
pub fn dedup_commands(commands: Vec<ProtocolCommand>) -> Vec<ProtocolCommand> {
    let mut seen = std::collections::HashSet::new();
    commands
        .into_iter()
        .filter(|cmd| seen.insert(cmd.command.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_converts_to_zero_based() {
        assert_eq!(
            rcp::set_single(rcp::INCH_FADER_LEVEL, 1, 0),
            "set MIXER:Current/InCh/Fader/Level 0 0 0"
        );
        assert_eq!(
            rcp::set(rcp::INCH_TO_MIX_ON, 3, 2, 1),
            "set MIXER:Current/InCh/ToMix/On 2 1 1"
        );
    }

    #[test]
    fn test_scene_lines_are_zero_padded() {
        assert_eq!(rcp::scene_recall(5), "ssrecall_ex scene_05");
        assert_eq!(rcp::scene_recall(15), "ssrecall_ex scene_15");
        assert_eq!(rcp::scene_store(100), "ssstore scene_100");
    }

    #[test]
    fn test_advisory_is_prefixed_and_capped() {
        let cmd = ProtocolCommand::advisory("Reverb on channel 2", "reverb", 1.0);
        assert!(cmd.is_advisory());
        assert_eq!(cmd.command(), "# Reverb on channel 2");
        assert!(cmd.confidence() < 1.0);
    }

    #[test]
    fn test_relative_move_names_direction_and_target() {
        assert_eq!(
            relative_move("channel 3", 200),
            "GET current level, then add 2.0 dB on channel 3"
        );
        assert_eq!(
            relative_move("DCA 1", -450),
            "GET current level, then subtract 4.5 dB on DCA 1"
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ProtocolCommand::new("x", "", 3.0).confidence(), 1.0);
        assert!(ProtocolCommand::new("x", "", 0.0).confidence() > 0.0);
    }

    #[test]
    fn test_dedup_keeps_first_description() {
        let commands = vec![
            ProtocolCommand::new("a", "first", 1.0),
            ProtocolCommand::new("b", "other", 1.0),
            ProtocolCommand::new("a", "second", 0.5),
        ];
        let deduped = dedup_commands(commands);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].description(), "first");
        assert_eq!(deduped[1].command(), "b");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_level(-600), "-6.0 dB");
        assert_eq!(format_level(NEG_INF_LEVEL), "-inf dB");
        assert_eq!(format_pan(-63), "L63");
        assert_eq!(format_pan(0), "C");
        assert_eq!(format_pan(16), "R16");
    }
}
