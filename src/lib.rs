//! # mixspeak - Voice Commands for Digital Mixing Consoles
//!
//! mixspeak translates spoken mixing instructions ("bring up the vocals to
//! unity", "pan channel 8 hard left") into lines of a console's remote control
//! protocol (RCP). It is a rule engine: every processor holds an ordered list
//! of patterns, each pattern tagged with an action, and every rule that
//! matches contributes commands.
//!
//! ## Core Features
//!
//! - **Channel control**: fader levels, relative moves, slang ("crank", "bury"),
//!   mute, solo cues and channel naming
//! - **Routing**: mix sends with levels, monitor idioms ("the drummer's wedge",
//!   "my ears"), pre/post-fader sends, matrix sends and pan
//! - **Scenes and DCAs**: scene recall and store, DCA levels, mutes and names
//! - **Processing**: compressor, limiter, gate and high-pass switches, plus
//!   advisory lines for reverb, delay and tonal EQ
//! - **Session labels**: once a channel is named, the name works anywhere a
//!   channel number does
//! - **Compound utterances**: "set channel 4 to -10 and pan it left" is split
//!   and the second clause inherits channel 4
//!
//! ## Quick Start
//!
//! ```rust
//! use mixspeak::Engine;
//!
//! let mut engine = Engine::default();
//! let commands = engine.process_command("Set channel 1 to unity");
//! assert_eq!(commands[0].command(), "set MIXER:Current/InCh/Fader/Level 0 0 0");
//! ```
//!
//! ### Labels carry across utterances
//!
//! ```rust
//! use mixspeak::Engine;
//!
//! let mut engine = Engine::default();
//! engine.process_command("Name channel 5 kick drum");
//! let commands = engine.process_command("Mute the kick drum");
//! assert_eq!(commands[0].command(), "set MIXER:Current/InCh/Fader/On 4 0 0");
//! ```
//!
//! ## Protocol Conventions
//!
//! - Channel, mix, matrix and DCA numbers are spoken 1-based and sent 0-based
//! - Levels are dB x 100 (`-1000` is -10 dB); `-32768` is -inf
//! - Pan runs from `-63` (hard left) to `63` (hard right)
//! - Lines starting with `#` are advisory: the intent was understood but has
//!   no direct parameter
//!
//! ## Configuration
//!
//! Console limits come from [`ValidationLimits`], optionally loaded from TOML
//! through [`EngineConfig`].

pub mod channels;
pub mod command;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod routing;
pub mod rules;
pub mod scenes;
pub mod session;
pub mod terms;
pub mod validation;

pub use command::ProtocolCommand;
pub use config::EngineConfig;
pub use engine::{Engine, SystemInfo};
pub use error::{MixerError, Result};
pub use session::{LabelTable, Session};
pub use validation::{ValidationLimits, Validator};
