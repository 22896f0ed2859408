//! Compound utterances and target inheritance

use mixspeak::Engine;

fn commands(engine: &mut Engine, text: &str) -> Vec<String> {
    engine
        .process_command(text)
        .iter()
        .map(|c| c.command().to_string())
        .collect()
}

#[test]
fn test_pronoun_takes_first_clause_channel() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "mute channel 3 and send it to mix 2"),
        vec![
            "set MIXER:Current/InCh/Fader/On 2 0 0",
            "set MIXER:Current/InCh/ToMix/On 2 1 1",
        ]
    );
}

#[test]
fn test_instrument_context_is_inherited() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "bring up the snare and pan it slightly left"),
        vec![
            "set MIXER:Current/InCh/Fader/Level 2 0 300",
            "set MIXER:Current/InCh/ToSt/Pan 2 0 -16",
        ]
    );
}

#[test]
fn test_bare_verb_clause_gets_target() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "set channel 4 to -10 db, then compress"),
        vec![
            "set MIXER:Current/InCh/Fader/Level 3 0 -1000",
            "set MIXER:Current/InCh/Dyna2/On 3 0 1",
        ]
    );
}

#[test]
fn test_then_splits_scene_commands() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "recall scene 3 then store scene 4"),
        vec!["ssrecall_ex scene_03", "ssstore scene_04"]
    );
}

#[test]
fn test_label_then_use_in_same_utterance() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "name channel 9 pastor and mute it"),
        vec![
            "set MIXER:Current/InCh/Label/Name 8 0 \"pastor\"",
            "set MIXER:Current/InCh/Fader/On 8 0 0",
        ]
    );
    assert_eq!(engine.channel_labels().get("pastor"), Some(&9));
}

#[test]
fn test_explicit_channel_in_later_clause_wins() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "mute channel 1 and unmute channel 2"),
        vec![
            "set MIXER:Current/InCh/Fader/On 0 0 0",
            "set MIXER:Current/InCh/Fader/On 1 0 1",
        ]
    );
}

#[test]
fn test_plus_before_number_is_not_a_split() {
    let mut engine = Engine::default();
    assert_eq!(
        commands(&mut engine, "set channel 2 to plus 4 db"),
        vec!["set MIXER:Current/InCh/Fader/Level 1 0 400"]
    );
}
