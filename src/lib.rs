//! # Harmony
//!
//! Music-theory analysis for a piano trainer: spell the notes being played,
//! name the interval or chord they form in the current key, and pick which
//! notes to highlight.
//!
//! ## Modules
//! - `key` - Key identifiers, signatures and the key wheel
//! - `pitch` - Letters, accidentals, spelled notes and distances
//! - `chord` - Sounding notes and the pitch-class keys of the chord tables
//! - `tables` - The YAML data tables, embedded at build time
//! - `spelling` - Pitch naming for a chord in a key
//! - `analysis` - Scale degrees, intervals and chord labels
//! - `highlight` - Note highlight modes and colors
//! - `label` - Symbol and figured-bass rendering helpers
//! - `settings` - User options
//!
//! ## Example
//! ```rust
//! let result = harmony::analyze("jC_", &[67, 71, 74, 77])?;
//! assert_eq!(result.label, "V{u}");
//! assert_eq!(result.root, vec![67]);
//!
//! // "u" is the figured-bass markup for a root-position seventh
//! let segments = harmony::parse_label(&harmony::convert_symbols(&result.label));
//! assert_eq!(segments[1].text, "u");
//! assert!(segments[1].figured);
//! # Ok::<(), harmony::HarmonyError>(())
//! ```

pub mod analysis;
pub mod chord;
pub mod error;
pub mod highlight;
pub mod key;
pub mod label;
pub mod pitch;
pub mod settings;
pub mod spelling;
pub mod tables;

pub use analysis::{AnalysisResult, Analyzer, Extreme, Harmony};
pub use chord::{Chord, ChordKey, PitchClassSet};
pub use error::*;
pub use highlight::{
    HighlightColor, HighlightColors, HighlightMode, Highlighter, Hsl, DEFAULT_PRIORITY,
};
pub use key::{KeyContext, KeySummary, Mode, Signature};
pub use label::{convert_symbols, parse_label, LabelSegment};
pub use pitch::{Accidental, Distance, Letter, SpelledNote, Spelling};
pub use settings::{AnalysisMode, AnalysisSettings, HighlightModeSettings, HighlightSettings, Settings};
pub use spelling::{display_accidentals, name_note, spell_chord};
pub use tables::{ChordEntry, Degree, NoKeyChordEntry, NoKeyInterval, Tables};

/// Analyze MIDI notes in a key using the built-in tables.
/// This is the main entry point for the library.
///
/// # Errors
/// [`HarmonyError::InvalidKey`] for an unknown key id, or an input error from
/// [`Analyzer::analyze`].
pub fn analyze(key_id: &str, notes: &[u8]) -> Result<AnalysisResult> {
    let key = KeyContext::new(Tables::builtin()?, key_id)?;
    Analyzer::new(key).analyze(notes)
}

/// Spell MIDI notes in a key using the built-in tables, in input order
pub fn spell(key_id: &str, notes: &[u8]) -> Result<Vec<SpelledNote>> {
    let key = KeyContext::new(Tables::builtin()?, key_id)?;
    Analyzer::new(key).spell(notes)
}
