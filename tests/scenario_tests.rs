//! End-to-end translation scenarios through the public `Engine` API

use mixspeak::{Engine, EngineConfig, ValidationLimits};

fn commands(engine: &mut Engine, text: &str) -> Vec<String> {
    engine
        .process_command(text)
        .iter()
        .map(|c| c.command().to_string())
        .collect()
}

#[test]
fn test_set_channel_to_unity() {
    let mut engine = Engine::default();
    let results = commands(&mut engine, "Set channel 1 to unity");
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("Fader/Level 0 0 0"));
}

#[test]
fn test_mute_channel() {
    let mut engine = Engine::default();
    let results = commands(&mut engine, "Mute channel 3");
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("Fader/On 2 0 0"));
}

#[test]
fn test_label_then_mute_by_label() {
    let mut engine = Engine::default();
    let labelled = commands(&mut engine, "Name channel 5 kick drum");
    assert_eq!(labelled, vec!["set MIXER:Current/InCh/Label/Name 4 0 \"kick drum\""]);

    let results = commands(&mut engine, "Mute the kick drum");
    assert_eq!(results, vec!["set MIXER:Current/InCh/Fader/On 4 0 0"]);
}

#[test]
fn test_recall_scene() {
    let mut engine = Engine::default();
    assert_eq!(commands(&mut engine, "Recall scene 15"), vec!["ssrecall_ex scene_15"]);
}

#[test]
fn test_pan_hard_left() {
    let mut engine = Engine::default();
    let results = commands(&mut engine, "Pan channel 8 hard left");
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("ToSt/Pan 7 0 -63"));
}

#[test]
fn test_compound_fader_and_mute() {
    let mut engine = Engine::default();
    let results = commands(&mut engine, "Bring up channel 1 and mute channel 2");
    assert_eq!(
        results,
        vec![
            "set MIXER:Current/InCh/Fader/Level 0 0 300",
            "set MIXER:Current/InCh/Fader/On 1 0 0",
        ]
    );
}

#[test]
fn test_oversize_input_yields_nothing() {
    let mut engine = Engine::default();
    let text = format!("mute channel 1 {}", "x".repeat(200));
    assert!(engine.process_command(&text).is_empty());
}

#[test]
fn test_input_length_boundary() {
    let mut engine = Engine::default();
    let at_limit = format!("mute channel 1{}", ".".repeat(186));
    assert_eq!(at_limit.chars().count(), 200);
    assert_eq!(
        commands(&mut engine, &at_limit),
        vec!["set MIXER:Current/InCh/Fader/On 0 0 0"]
    );

    let over = format!("{}.", at_limit);
    assert!(engine.process_command(&over).is_empty());
}

#[test]
fn test_send_with_level_pairs_enable_and_level() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "send the vocals to mix 3 at -5 db"),
        vec![
            "set MIXER:Current/InCh/ToMix/On 0 2 1",
            "set MIXER:Current/InCh/ToMix/Level 0 2 -500",
        ]
    );
}

#[test]
fn test_monitor_idiom() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "give me more kick in my ears"),
        vec![
            "set MIXER:Current/InCh/ToMix/On 1 2 1",
            "set MIXER:Current/InCh/ToMix/Level 1 2 300",
        ]
    );
}

#[test]
fn test_hot_defaults_differ_between_channel_and_dca() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "make channel 1 hot"),
        vec!["set MIXER:Current/InCh/Fader/Level 0 0 300"]
    );
    assert_eq!(
        commands(&mut engine, "make dca 1 hot"),
        vec!["set MIXER:Current/DCA/Fader/Level 0 0 500"]
    );
}

#[test]
fn test_dca_relative_move() {
    let mut engine = Engine::default();
    let results = engine.process_command("bring up dca 1 by 2 db");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].command(), "# GET current level, then add 2.0 dB on DCA 1");
    assert_eq!(results[0].confidence(), 0.8);
}

#[test]
fn test_channel_relative_move() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "Channel 3 up 6 db"),
        vec!["# GET current level, then add 6.0 dB on channel 3"]
    );
    assert_eq!(
        commands(&mut engine, "bump up channel 4 by 2"),
        vec!["# GET current level, then add 2.0 dB on channel 4"]
    );
}

#[test]
fn test_gain_turn_off_and_preset() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "gain channel 3 to 6"),
        vec!["# set MIXER:Current/InCh/Head/Gain 2 0 600"]
    );
    assert_eq!(
        commands(&mut engine, "turn off the vocals"),
        vec!["set MIXER:Current/InCh/Fader/On 0 0 0"]
    );
    assert_eq!(commands(&mut engine, "load preset 4"), vec!["ssrecall_ex scene_04"]);
}

#[test]
fn test_polite_phrasing() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "Could you please mute channel 3, please?"),
        vec!["set MIXER:Current/InCh/Fader/On 2 0 0"]
    );
}

#[test]
fn test_unrecognised_utterance_is_empty() {
    let mut engine = Engine::default();
    assert!(engine.process_command("what a lovely evening").is_empty());
    assert!(engine.process_command("").is_empty());
}

#[test]
fn test_limits_from_config_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[limits]\nmax_channel = 16\nmax_mix = 8").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.limits.max_channel, 16);
    assert_eq!(config.limits.max_dca, ValidationLimits::default().max_dca);

    let mut engine = Engine::new(config).unwrap();
    assert!(engine.process_command("mute channel 17").is_empty());
    assert_eq!(
        commands(&mut engine, "mute channel 16"),
        vec!["set MIXER:Current/InCh/Fader/On 15 0 0"]
    );
    assert!(engine.process_command("send channel 1 to mix 9").is_empty());
}
