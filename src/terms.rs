//! Mixing terminology tables
//!
//! Static vocabulary the processors resolve against: spoken numbers,
//! instrument aliases, pan positions, level keywords and the default
//! instrument-to-channel patch used when a session has no labels yet.
//!
//! Pan and level phrases are matched by containment, so both tables are
//! ordered slices and the first contained phrase wins.

use std::collections::HashMap;

/// Level sentinel for a fully closed fader (-inf dB)
pub const NEG_INF_LEVEL: i32 = -32768;

/// Hard pan limit on either side
pub const PAN_LIMIT: i32 = 63;

lazy_static::lazy_static! {
    /// "one" through "forty", with "twenty one" / "twenty-one" style compounds
    static ref NUMBER_WORDS: HashMap<String, u32> = {
        let mut m = HashMap::new();
        let units = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
        ];
        let teens = [
            "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen",
            "sixteen", "seventeen", "eighteen", "nineteen",
        ];
        for (i, word) in units.iter().enumerate() {
            m.insert(word.to_string(), i as u32 + 1);
        }
        for (i, word) in teens.iter().enumerate() {
            m.insert(word.to_string(), i as u32 + 10);
        }
        for (tens, base) in [("twenty", 20u32), ("thirty", 30u32)] {
            m.insert(tens.to_string(), base);
            for (i, unit) in units.iter().enumerate() {
                m.insert(format!("{} {}", tens, unit), base + i as u32 + 1);
            }
        }
        m.insert("forty".to_string(), 40);
        // Ordinals show up in "the third scene", "mix two" is the common case
        m.insert("first".to_string(), 1);
        m.insert("second".to_string(), 2);
        m.insert("third".to_string(), 3);
        m.insert("fourth".to_string(), 4);
        m.insert("fifth".to_string(), 5);
        m
    };

    /// Spoken instrument names -> canonical instrument
    static ref INSTRUMENT_ALIASES: HashMap<&'static str, &'static str> = [
        ("vocal", "vocals"),
        ("vox", "vocals"),
        ("lead vox", "lead vocal"),
        ("bg vox", "background vocals"),
        ("kick", "bass drum"),
        ("bass drum", "kick drum"),
        ("bd", "kick drum"),
        ("snare", "snare drum"),
        ("sd", "snare drum"),
        ("hi-hat", "hihat"),
        ("hh", "hihat"),
        ("hat", "hihat"),
        ("overhead", "overheads"),
        ("oh", "overheads"),
        ("cymbals", "overheads"),
        ("tom", "toms"),
        ("floor tom", "floor"),
        ("rack tom", "rack"),
        ("bass", "bass guitar"),
        ("di", "bass guitar"),
        ("guitar", "electric guitar"),
        ("gtr", "guitar"),
        ("elec", "electric guitar"),
        ("acoustic", "acoustic guitar"),
        ("ac", "acoustic guitar"),
        ("keys", "keyboard"),
        ("kb", "keyboard"),
        ("piano", "keyboard"),
        ("strings", "strings"),
        ("horns", "brass"),
        ("brass", "horns"),
        ("sax", "saxophone"),
        ("trumpet", "horn"),
        ("trombone", "horn"),
        ("drums", "drums"),
        ("lead vocal", "vocals"),
        ("lead guitar", "guitar"),
        ("background vocals", "vocals"),
        ("bg vocals", "vocals"),
    ]
    .into_iter()
    .collect();

    /// Demo house patch, keyed by spoken name
    static ref DEFAULT_CHANNELS: HashMap<&'static str, u32> = [
        ("vocals", 1), ("vox", 1), ("lead vocal", 1),
        ("kick", 2), ("kick drum", 2), ("bass drum", 2), ("bd", 2),
        ("snare", 3), ("snare drum", 3), ("sd", 3),
        ("hihat", 4), ("hi-hat", 4), ("hh", 4), ("hat", 4),
        ("bass", 5), ("bass guitar", 5), ("di", 5),
        ("guitar", 6), ("electric guitar", 6), ("gtr", 6), ("lead guitar", 6),
        ("keys", 7), ("keyboard", 7), ("kb", 7), ("piano", 7),
        ("acoustic", 8), ("acoustic guitar", 8), ("ac", 8),
        ("drums", 9),
        ("overhead", 10), ("overheads", 10),
        ("strings", 11),
        ("saxophone", 12), ("sax", 12),
        ("background vocals", 13), ("bg vocals", 13),
    ]
    .into_iter()
    .collect();
}

/// Pan phrases in lookup order
static PAN_POSITIONS: &[(&str, i32)] = &[
    ("hard left", -63),
    ("hard_left", -63),
    ("hardleft", -63),
    ("full left", -63),
    ("left", -32),
    ("slightly left", -16),
    ("slight left", -16),
    ("little left", -16),
    ("center", 0),
    ("centre", 0),
    ("middle", 0),
    ("dead center", 0),
    ("centered", 0),
    ("slightly right", 16),
    ("slight right", 16),
    ("little right", 16),
    ("right", 32),
    ("hard right", 63),
    ("hard_right", 63),
    ("hardright", 63),
    ("full right", 63),
];

/// Level keywords (dB x 100) in lookup order; the first contained keyword wins
static DB_KEYWORDS: &[(&str, i32)] = &[
    ("unity", 0),
    ("zero", 0),
    ("nominal", 0),
    ("line level", 0),
    ("minus infinity", NEG_INF_LEVEL),
    ("negative infinity", NEG_INF_LEVEL),
    ("inf", NEG_INF_LEVEL),
    ("off", NEG_INF_LEVEL),
    ("down", NEG_INF_LEVEL),
    ("kill", NEG_INF_LEVEL),
    ("cut", NEG_INF_LEVEL),
    ("hot", 300),
    ("loud", 300),
    ("cooking", 300),
    ("pushing", 300),
    ("quiet", -1000),
    ("low", -1000),
    ("soft", -1000),
    ("back", -600),
    ("up", 300),
    ("boost", 600),
    ("bump", 300),
    ("push", 300),
    ("pull", -300),
    ("bring down", -600),
    ("take down", -600),
    ("park", -1000),
    ("set", 0),
    ("dial in", 0),
    ("trim", 0),
];

/// Look up a spoken number ("seven", "twenty-one")
pub fn number_word(word: &str) -> Option<u32> {
    let key = word.trim().to_lowercase().replace('-', " ");
    let key = key.split_whitespace().collect::<Vec<_>>().join(" ");
    NUMBER_WORDS.get(&key).copied()
}

/// Canonical instrument for a spoken alias
pub fn canonical_instrument(name: &str) -> Option<&'static str> {
    INSTRUMENT_ALIASES.get(name).copied()
}

/// House-patch channel for a canonical instrument or alias
pub fn default_channel(name: &str) -> Option<u32> {
    DEFAULT_CHANNELS
        .get(name)
        .or_else(|| canonical_instrument(name).and_then(|c| DEFAULT_CHANNELS.get(c)))
        .copied()
}

/// Pan value for a position phrase.
///
/// A phrase that is exactly a table entry wins; otherwise the first entry
/// contained in `text`, in table order.
pub fn pan_position(text: &str) -> Option<i32> {
    let text = text.trim().to_lowercase();
    let text = text.strip_prefix("a ").unwrap_or(&text);
    PAN_POSITIONS
        .iter()
        .find(|(phrase, _)| *phrase == text)
        .or_else(|| PAN_POSITIONS.iter().find(|(phrase, _)| text.contains(phrase)))
        .map(|&(_, value)| value)
}

/// Level (dB x 100) for the first keyword contained in `text`
pub fn db_keyword(text: &str) -> Option<i32> {
    let text = text.to_lowercase();
    DB_KEYWORDS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|&(_, value)| value)
}

/// Number of entries per table, for diagnostics
pub fn table_sizes() -> [(&'static str, usize); 5] {
    [
        ("number_words", NUMBER_WORDS.len()),
        ("instrument_aliases", INSTRUMENT_ALIASES.len()),
        ("pan_positions", PAN_POSITIONS.len()),
        ("db_keywords", DB_KEYWORDS.len()),
        ("default_channels", DEFAULT_CHANNELS.len()),
    ]
}
