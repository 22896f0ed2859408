//! Scene memory and DCA group commands
//!
//! Scenes are recalled and stored with the console's scene-memory verbs
//! rather than `set` lines. DCA commands mirror the input-channel fader,
//! mute and label forms against their own label table.

use crate::channels::clean_label;
use crate::command::{format_level, rcp, relative_move, ProtocolCommand, RELATIVE_CONFIDENCE};
use crate::error::Result;
use crate::rules::{self, clean_target, dca, num, Rule, RuleMatch, AMOUNT, LEVEL_TAIL};
use crate::session::LabelTable;
use crate::terms::NEG_INF_LEVEL;
use crate::validation::Validator;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    Recall,
    Store,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcaAction {
    Set,
    Up,
    Down,
    Hot,
    Mute,
    Unmute,
    /// On/off taken from the `state` capture
    Switch,
    Name,
}

impl DcaAction {
    fn default_level(self) -> Option<i32> {
        match self {
            DcaAction::Up => Some(300),
            DcaAction::Down => Some(-600),
            DcaAction::Hot => Some(500),
            _ => None,
        }
    }
}

/// Absolute or relative DCA level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelChange {
    To(i32),
    By(i32),
}

/// Scene-memory keyword; preset, snapshot, memory and bank are synonyms
const SCENE_WORD: &str = r"(?:scene\s+bank|scene|preset|snapshot|memory|bank)";

const SCENE: &str = r"(?:the\s+)?(?:scene\s+bank|scene|preset|snapshot|memory|bank)\s*#?\s*";

lazy_static::lazy_static! {
    static ref SCENE_RULES: Vec<Rule<SceneAction>> = vec![
        Rule::new(
            "recall_scene",
            &format!(r"\b(?:recall|load|go\s+to|switch\s+to|jump\s+to|change\s+to|fire|call\s+up)\s+{}{}\b", SCENE, num("scene")),
            SceneAction::Recall,
            1.0,
        ),
        Rule::new(
            "recall_ordinal_scene",
            &format!(r"\b(?:recall|load|go\s+to)\s+(?:the\s+)?{}\s+scene\b", num("scene")),
            SceneAction::Recall,
            0.9,
        ),
        Rule::new(
            "bare_scene",
            &format!(r"^{}\s*#?\s*{}$", SCENE_WORD, num("scene")),
            SceneAction::Recall,
            0.8,
        ),
        Rule::new(
            "scene_change",
            &format!(r"\bscene\s+change\s+(?:to\s+)?{}\b", num("scene")),
            SceneAction::Recall,
            0.9,
        ),
        Rule::new(
            "store_scene",
            &format!(
                r"\b(?:store|save|write)\s+(?:(?:this|it|the\s+current|current)\s+(?:mix\s+|state\s+|settings\s+)?(?:as|to|in|into)\s+)?{}{}\b",
                SCENE,
                num("scene")
            ),
            SceneAction::Store,
            1.0,
        ),
        Rule::new(
            "copy_scene",
            &format!(r"\bcopy\s+{}{}\s+(?:to|into|onto|over)\s+{}{}\b", SCENE, num("from"), SCENE, num("scene")),
            SceneAction::Copy,
            0.5,
        ),
    ];

    static ref DCA_RULES: Vec<Rule<DcaAction>> = {
        let group = dca("dca");
        vec![
            Rule::new(
                "set_dca",
                &format!(r"^(?:(?:set|put|move|bring|take|push|pull)\s+)?{}\s+(?:fader\s+|level\s+)?(?:to|at)\s+(?P<level>.+)$", group),
                DcaAction::Set,
                1.0,
            ),
            Rule::new("bring_up_dca", &format!(r"\b(?:bring|turn|push|raise)\s+up\s+{}\b{}", group, LEVEL_TAIL), DcaAction::Up, 1.0),
            Rule::new("dca_up", &format!(r"\b(?:bring|turn|push|raise)\s+{}\s+up\b{}", group, LEVEL_TAIL), DcaAction::Up, 1.0),
            Rule::new("bring_down_dca", &format!(r"\b(?:bring|turn|pull|take|push)\s+down\s+{}\b{}", group, LEVEL_TAIL), DcaAction::Down, 1.0),
            Rule::new("dca_down", &format!(r"\b(?:bring|turn|pull|take)\s+{}\s+down\b{}", group, LEVEL_TAIL), DcaAction::Down, 1.0),
            Rule::new("lower_dca", &format!(r"\b(?:lower|reduce|drop|dip)\s+{}\b{}", group, LEVEL_TAIL), DcaAction::Down, 1.0),
            Rule::new("dca_up_by", &format!(r"^{}\s+up\s+(?:by\s+)?{}$", group, AMOUNT), DcaAction::Up, 0.8),
            Rule::new("dca_down_by", &format!(r"^{}\s+down\s+(?:by\s+)?{}$", group, AMOUNT), DcaAction::Down, 0.8),
            Rule::new("dca_hot", &format!(r"^{}\s+(?:hot|loud|cooking)\s*$", group), DcaAction::Hot, 0.9),
            Rule::new("crank_dca", &format!(r"\bcrank\s+(?:up\s+)?{}\b", group), DcaAction::Hot, 0.9),
            Rule::new("hot_dca", &format!(r"\bmake\s+{}\s+(?:hot|hotter)\b", group), DcaAction::Hot, 0.9),
            Rule::new("mute_dca", &format!(r"\b(?:mute|kill|cut|silence)\s+{}\s*$", group), DcaAction::Mute, 1.0),
            Rule::new("unmute_dca", &format!(r"\b(?:unmute|restore|open)\s+{}\s*$", group), DcaAction::Unmute, 1.0),
            Rule::new("turn_dca_state", &format!(r"\bturn\s+{}\s+(?P<state>on|off)\s*$", group), DcaAction::Switch, 1.0),
            Rule::new("turn_state_dca", &format!(r"\bturn\s+(?P<state>on|off)\s+{}\s*$", group), DcaAction::Switch, 1.0),
            Rule::new("name_dca", &format!(r"\b(?:name|label|call|tag|rename)\s+{}\s+(?:as\s+|to\s+)?(?P<label>.+)$", group), DcaAction::Name, 1.0),
            Rule::new("dca_is", &format!(r"^{}\s+is\s+(?:now\s+)?(?P<label>.+)$", group), DcaAction::Name, 0.9),
            Rule::new(
                "labelled_dca_up",
                &format!(r"\b(?:bring|turn|push|raise)\s+up\s+(?P<target>.+?)\s+(?:dca|vca)\b{}", LEVEL_TAIL),
                DcaAction::Up,
                0.85,
            ),
            Rule::new(
                "mute_labelled_dca",
                r"\b(?:mute|kill|cut)\s+(?P<target>.+?)\s+(?:dca|vca)\s*$",
                DcaAction::Mute,
                0.85,
            ),
        ]
    };
}

/// Number of rules per list, for diagnostics
pub fn rule_counts() -> [(&'static str, usize); 2] {
    [("scene", SCENE_RULES.len()), ("dca", DCA_RULES.len())]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneProcessor {
    validator: Validator,
}

impl SceneProcessor {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    fn scene_number<A>(&self, m: &RuleMatch<'_, '_, A>, group: &str) -> Result<Option<u32>> {
        Ok(self
            .validator
            .parse_number(m.group(group)?)
            .filter(|&n| self.validator.validate_scene(n)))
    }

    /// Scene recall, store and copy
    pub fn process_scene_recall(&self, text: &str) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&SCENE_RULES, text) {
            let Some(scene) = self.scene_number(&m, "scene")? else {
                continue;
            };
            debug!(rule = m.rule.name, scene, "scene rule matched");

            let cmd = match m.rule.action {
                SceneAction::Recall => ProtocolCommand::new(
                    rcp::scene_recall(scene),
                    format!("Recall scene {}", scene),
                    m.rule.confidence,
                ),
                SceneAction::Store => ProtocolCommand::new(
                    rcp::scene_store(scene),
                    format!("Store current mix as scene {}", scene),
                    m.rule.confidence,
                ),
                SceneAction::Copy => {
                    let Some(from) = self.scene_number(&m, "from")? else {
                        continue;
                    };
                    // No scene copy verb on the protocol side
                    ProtocolCommand::advisory(
                        format!("copy scene {:02} to scene {:02}", from, scene),
                        format!("Copy scene {} to scene {}", from, scene),
                        m.rule.confidence,
                    )
                }
            };
            results.push(cmd);
        }

        Ok(results)
    }

    fn dca_number<A>(&self, m: &RuleMatch<'_, '_, A>, labels: &LabelTable) -> Result<Option<u32>> {
        let number = match m.optional("dca") {
            Some(raw) => self.validator.parse_number(raw),
            None => labels.get(&clean_target(m.group("target")?)),
        };
        Ok(number.filter(|&n| self.validator.validate_dca(n)))
    }

    /// "to LEVEL" sets, "by AMOUNT" moves from the current level
    fn dca_level<A>(&self, action: DcaAction, m: &RuleMatch<'_, '_, A>) -> Option<LevelChange> {
        if let Some(level) = m.optional("level") {
            if rules::mentions_console_object(level) {
                return None;
            }
            return self.validator.parse_db_value(level).map(LevelChange::To);
        }
        if let Some(amount) = m.optional("amount") {
            let value = self.validator.parse_db_value(amount)?;
            if value == NEG_INF_LEVEL {
                return Some(LevelChange::To(value));
            }
            let signed = if action == DcaAction::Down {
                -value.abs()
            } else {
                value.abs()
            };
            return Some(LevelChange::By(signed));
        }
        action.default_level().map(LevelChange::To)
    }

    /// DCA fader, mute and label commands; labels go to `labels`
    pub fn process_dca_commands(&self, text: &str, labels: &mut LabelTable) -> Result<Vec<ProtocolCommand>> {
        let mut results = Vec::new();

        for m in rules::matching(&DCA_RULES, text) {
            let Some(n) = self.dca_number(&m, labels)? else {
                continue;
            };

            let action = match m.rule.action {
                DcaAction::Switch => {
                    if m.group("state")?.eq_ignore_ascii_case("on") {
                        DcaAction::Unmute
                    } else {
                        DcaAction::Mute
                    }
                }
                other => other,
            };
            debug!(rule = m.rule.name, dca = n, ?action, "dca rule matched");

            match action {
                DcaAction::Mute | DcaAction::Unmute => {
                    let on = action == DcaAction::Unmute;
                    results.push(ProtocolCommand::new(
                        rcp::set_single(rcp::DCA_FADER_ON, n, u8::from(on)),
                        format!("{} DCA {}", if on { "Unmute" } else { "Mute" }, n),
                        m.rule.confidence,
                    ));
                }
                DcaAction::Name => {
                    let label = clean_label(m.group("label")?);
                    if label.is_empty() {
                        continue;
                    }
                    labels.assign(&label, n);
                    info!(dca = n, label = %label, "dca labelled");
                    results.push(ProtocolCommand::new(
                        rcp::set_single(rcp::DCA_LABEL, n, rcp::quoted(&label)),
                        format!("Label DCA {} as '{}'", n, label),
                        m.rule.confidence,
                    ));
                }
                _ => {
                    let Some(level) = self.dca_level(action, &m) else {
                        continue;
                    };
                    let cmd = match level {
                        LevelChange::To(level) => ProtocolCommand::new(
                            rcp::set_single(rcp::DCA_FADER_LEVEL, n, level),
                            format!("Set DCA {} to {}", n, format_level(level)),
                            m.rule.confidence,
                        ),
                        LevelChange::By(delta) => ProtocolCommand::advisory(
                            relative_move(&format!("DCA {}", n), delta),
                            format!("Move DCA {} by {}", n, format_level(delta)),
                            m.rule.confidence.min(RELATIVE_CONFIDENCE),
                        ),
                    };
                    results.push(cmd);
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationLimits;

    fn processor() -> SceneProcessor {
        SceneProcessor::new(Validator::new(ValidationLimits::default()))
    }

    fn scenes(text: &str) -> Vec<ProtocolCommand> {
        processor().process_scene_recall(text).unwrap()
    }

    fn dcas(text: &str, labels: &mut LabelTable) -> Vec<String> {
        processor()
            .process_dca_commands(text, labels)
            .unwrap()
            .iter()
            .map(|c| c.command().to_string())
            .collect()
    }

    #[test]
    fn test_recall_scene() {
        let results = scenes("Recall scene 15");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command(), "ssrecall_ex scene_15");
    }

    #[test]
    fn test_recall_word_number_is_padded() {
        assert_eq!(scenes("go to scene three")[0].command(), "ssrecall_ex scene_03");
        assert_eq!(scenes("load the second scene")[0].command(), "ssrecall_ex scene_02");
    }

    #[test]
    fn test_scene_synonyms() {
        assert_eq!(scenes("load preset 4")[0].command(), "ssrecall_ex scene_04");
        assert_eq!(scenes("recall snapshot 12")[0].command(), "ssrecall_ex scene_12");
        assert_eq!(scenes("go to memory seven")[0].command(), "ssrecall_ex scene_07");
        assert_eq!(scenes("bank 9")[0].command(), "ssrecall_ex scene_09");
        assert_eq!(scenes("scene bank 2")[0].command(), "ssrecall_ex scene_02");
        assert_eq!(scenes("save preset 8")[0].command(), "ssstore scene_08");
    }

    #[test]
    fn test_scene_change() {
        let results = scenes("scene change 6");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command(), "ssrecall_ex scene_06");
        assert_eq!(results[0].confidence(), 0.9);
    }

    #[test]
    fn test_store_scene() {
        let results = scenes("save the current mix as scene 12");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].command(), "ssstore scene_12");
    }

    #[test]
    fn test_scene_out_of_range() {
        assert!(scenes("recall scene 101").is_empty());
        assert!(scenes("recall scene 0").is_empty());
    }

    #[test]
    fn test_copy_is_advisory() {
        let results = scenes("copy scene 3 to scene 4");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_advisory());
        assert_eq!(results[0].confidence(), 0.5);
    }

    #[test]
    fn test_dca_level_and_defaults() {
        let mut labels = LabelTable::new();
        assert_eq!(
            dcas("set dca 2 to -5 db", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/Level 1 0 -500"]
        );
        assert_eq!(
            dcas("bring up dca 1", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/Level 0 0 300"]
        );
        assert_eq!(
            dcas("make dca 1 hot", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/Level 0 0 500"]
        );
    }

    #[test]
    fn test_dca_relative_moves_are_advisory() {
        let mut labels = LabelTable::new();
        assert_eq!(
            dcas("bring up dca 1 by 2 db", &mut labels),
            vec!["# GET current level, then add 2.0 dB on DCA 1"]
        );
        assert_eq!(
            dcas("dca 2 down 4", &mut labels),
            vec!["# GET current level, then subtract 4.0 dB on DCA 2"]
        );
        assert_eq!(
            dcas("vca 3 up by 1.5 db", &mut labels),
            vec!["# GET current level, then add 1.5 dB on DCA 3"]
        );

        let results = processor()
            .process_dca_commands("lower dca 4 by 3", &mut labels)
            .unwrap();
        assert!(results[0].is_advisory());
        assert_eq!(results[0].confidence(), 0.8);
    }

    #[test]
    fn test_dca_hot_suffix() {
        let mut labels = LabelTable::new();
        assert_eq!(
            dcas("dca 2 cooking", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/Level 1 0 500"]
        );
    }

    #[test]
    fn test_dca_mute_and_range() {
        let mut labels = LabelTable::new();
        assert_eq!(
            dcas("mute vca 3", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/On 2 0 0"]
        );
        assert_eq!(
            dcas("turn dca 3 on", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/On 2 0 1"]
        );
        assert!(dcas("mute dca 9", &mut labels).is_empty());
    }

    #[test]
    fn test_dca_label_goes_to_dca_table() {
        let mut labels = LabelTable::new();
        let results = dcas("name dca 1 Drums", &mut labels);
        assert_eq!(results, vec!["set MIXER:Current/DCA/Label/Name 0 0 \"Drums\""]);
        assert_eq!(labels.get("drums"), Some(1));

        assert_eq!(
            dcas("mute the drums dca", &mut labels),
            vec!["set MIXER:Current/DCA/Fader/On 0 0 0"]
        );
    }
}
