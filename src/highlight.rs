//! # Note Highlighting
//!
//! Colors notes of a chord to point out relationships between them: chord
//! roots, perfect fifths and octaves, tritones, and doubled chromatic notes.
//!
//! Each [`HighlightMode`] decides independently whether it colors a note.
//! When several modes match, the one earliest in the highlighter's priority
//! list wins. [`DEFAULT_PRIORITY`] ranks Root, Doubling, Tritone, Octaves.
//!
//! ## Example
//! ```rust
//! use harmony::{Chord, HighlightColor, HighlightMode, Highlighter, KeyContext, Tables};
//!
//! let key = KeyContext::new(Tables::builtin()?, "jC_")?;
//! let chord = Chord::new(&[60, 64, 67])?;
//! let highlighter = Highlighter::with_default_priority(key, &[HighlightMode::Root]);
//!
//! assert_eq!(highlighter.highlight(60, &chord)?, Some(HighlightColor::Root));
//! assert_eq!(highlighter.highlight(64, &chord)?, None);
//! # Ok::<(), harmony::HarmonyError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::chord::Chord;
use crate::error::{HarmonyError, Result};
use crate::key::KeyContext;

/// Highlight priority when the caller does not give one, highest first
pub const DEFAULT_PRIORITY: [HighlightMode; 4] = [
    HighlightMode::Root,
    HighlightMode::Doubling,
    HighlightMode::Tritone,
    HighlightMode::Octaves,
];

/// Scale degrees above the keynote that are chromatic in a minor key
const MINOR_CHROMATIC: [u8; 4] = [4, 6, 9, 11];
/// Scale degrees above the keynote that are chromatic in a major key
const MAJOR_CHROMATIC: [u8; 5] = [1, 3, 6, 8, 11];

/// HSL color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl(pub u16, pub u8, pub u8);

impl Hsl {
    /// CSS form, e.g. `hsl(120,100%,25%)`
    pub fn css(&self) -> String {
        format!("hsl({},{}%,{}%)", self.0, self.1, self.2)
    }
}

/// The palette from `highlight.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightColors {
    pub perfect_fifth: Hsl,
    pub perfect_fifth_octave: Hsl,
    pub octave: Hsl,
    pub tritone: Hsl,
    pub double: Hsl,
    pub root: Hsl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightMode {
    /// Perfect fifths and octaves above or below the note
    Octaves,
    /// A tritone against any other note
    Tritone,
    /// A chromatic note doubled in another octave
    Doubling,
    /// The note is a root of the chord
    Root,
}

impl HighlightMode {
    pub fn parse(name: &str) -> Option<HighlightMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "octaves" => Some(HighlightMode::Octaves),
            "tritone" => Some(HighlightMode::Tritone),
            "doubling" => Some(HighlightMode::Doubling),
            "root" => Some(HighlightMode::Root),
            _ => None,
        }
    }
}

/// What a highlighted note is marked as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightColor {
    PerfectFifth,
    PerfectFifthOctave,
    Octave,
    Tritone,
    Double,
    Root,
}

impl HighlightColor {
    pub fn hsl(self, colors: &HighlightColors) -> Hsl {
        match self {
            HighlightColor::PerfectFifth => colors.perfect_fifth,
            HighlightColor::PerfectFifthOctave => colors.perfect_fifth_octave,
            HighlightColor::Octave => colors.octave,
            HighlightColor::Tritone => colors.tritone,
            HighlightColor::Double => colors.double,
            HighlightColor::Root => colors.root,
        }
    }
}

/// Semitones from `from` up to `to`, folded into one octave
fn interval_class(from: u8, to: u8) -> u8 {
    ((i32::from(to) - i32::from(from)).rem_euclid(12)) as u8
}

/// Colors notes with a set of modes in priority order
#[derive(Debug, Clone)]
pub struct Highlighter<'a> {
    key: KeyContext<'a>,
    modes: Vec<HighlightMode>,
}

impl<'a> Highlighter<'a> {
    /// `modes` are the enabled modes, highest priority first
    pub fn new(key: KeyContext<'a>, modes: &[HighlightMode]) -> Self {
        let mut ordered: Vec<HighlightMode> = Vec::with_capacity(modes.len());
        for mode in modes {
            if !ordered.contains(mode) {
                ordered.push(*mode);
            }
        }
        Highlighter { key, modes: ordered }
    }

    /// Enable `modes`, ranked by [`DEFAULT_PRIORITY`]
    pub fn with_default_priority(key: KeyContext<'a>, modes: &[HighlightMode]) -> Self {
        let ordered: Vec<HighlightMode> = DEFAULT_PRIORITY
            .iter()
            .copied()
            .filter(|mode| modes.contains(mode))
            .collect();
        Highlighter { key, modes: ordered }
    }

    pub fn modes(&self) -> &[HighlightMode] {
        &self.modes
    }

    /// Color of `note` within `chord`, or `None` when no enabled mode applies.
    ///
    /// # Errors
    /// [`HarmonyError::NoteNotInChord`] if `note` is not sounding.
    pub fn highlight(&self, note: u8, chord: &Chord) -> Result<Option<HighlightColor>> {
        if !chord.contains(note) {
            return Err(HarmonyError::NoteNotInChord {
                note,
                chord: chord.notes().to_vec(),
            });
        }
        Ok(self
            .modes
            .iter()
            .find_map(|mode| self.mode_color(*mode, note, chord)))
    }

    /// Colors for every note of the chord, bass first
    pub fn highlight_chord(&self, chord: &Chord) -> Vec<Option<HighlightColor>> {
        chord
            .notes()
            .iter()
            .map(|note| {
                self.modes
                    .iter()
                    .find_map(|mode| self.mode_color(*mode, *note, chord))
            })
            .collect()
    }

    /// Color one mode gives `note`, ignoring the others
    pub fn mode_color(&self, mode: HighlightMode, note: u8, chord: &Chord) -> Option<HighlightColor> {
        match mode {
            HighlightMode::Octaves => octaves_color(note, chord),
            HighlightMode::Tritone => chord
                .notes()
                .iter()
                .any(|other| *other != note && interval_class(note, *other) == 6)
                .then_some(HighlightColor::Tritone),
            HighlightMode::Doubling => self.doubling_color(note, chord),
            HighlightMode::Root => Analyzer::new(self.key)
                .find_roots(chord)
                .contains(&note)
                .then_some(HighlightColor::Root),
        }
    }

    fn doubling_color(&self, note: u8, chord: &Chord) -> Option<HighlightColor> {
        let degree = interval_class(self.key.tonic_pitch_class(), note);
        let chromatic = if self.key.is_minor() {
            MINOR_CHROMATIC.contains(&degree)
        } else {
            MAJOR_CHROMATIC.contains(&degree)
        };
        let doubled = chord
            .notes()
            .iter()
            .any(|other| *other != note && other % 12 == note % 12);
        (chromatic && doubled).then_some(HighlightColor::Double)
    }
}

/// Fifths and octaves: scans the notes above, then the notes below from the
/// bass up. A fifth and an octave on the same note combine.
fn octaves_color(note: u8, chord: &Chord) -> Option<HighlightColor> {
    let notes = chord.notes();
    let i = chord.position(note)?;
    let mut color = None;
    for upper in &notes[i + 1..] {
        match interval_class(note, *upper) {
            7 => color = Some(HighlightColor::PerfectFifth),
            0 => {
                color = Some(if color == Some(HighlightColor::PerfectFifth) {
                    HighlightColor::PerfectFifthOctave
                } else {
                    HighlightColor::Octave
                })
            }
            _ => {}
        }
    }
    for lower in &notes[..i] {
        match interval_class(note, *lower) {
            5 => {
                color = Some(if color == Some(HighlightColor::Octave) {
                    HighlightColor::PerfectFifthOctave
                } else {
                    HighlightColor::PerfectFifth
                })
            }
            0 => color = Some(HighlightColor::Octave),
            _ => {}
        }
    }
    color
}
