//! Analysis result type definitions

use serde::Serialize;

use crate::pitch::SpelledNote;
use crate::settings::AnalysisSettings;

/// Which root to pick when a root pitch class sounds in several octaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Lowest,
    Highest,
}

/// Harmonic classification of the sounding notes
///
/// Serialized with a `kind` tag: `"note"`, `"interval"`, `"chord"` or
/// `"unclassified"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Harmony {
    /// A single note
    Note {
        /// Helmholtz name of the note
        name: String,
        /// Scale-degree numeral ("1", "#4", "b7"), keyed mode only
        #[serde(skip_serializing_if = "Option::is_none")]
        numeral: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        solfege: Option<String>,
    },
    /// Two notes
    Interval {
        /// Short interval name ("M3", "A4")
        name: String,
        /// Long name from the no-key interval table ("major 3rd")
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Three or more notes found in a chord table
    Chord {
        /// Resolved label; text in {} is figured-bass markup
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(rename = "altLabel", skip_serializing_if = "Option::is_none")]
        alt_label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<u32>,
    },
    /// No table entry matches
    Unclassified,
}

impl Harmony {
    /// Display label: the numeral, interval name or chord label.
    /// Empty for an unclassified chord or a single note without a degree.
    pub fn label(&self) -> &str {
        match self {
            Harmony::Note { numeral, .. } => numeral.as_deref().unwrap_or(""),
            Harmony::Interval { name, .. } => name,
            Harmony::Chord { label, .. } => label,
            Harmony::Unclassified => "",
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Harmony::Unclassified)
    }
}

/// Result of analysing one set of sounding notes
///
/// # Fields
/// - `label`: display label, possibly containing figured-bass markup and
///   symbol tokens (see [`convert_symbols`](crate::convert_symbols))
/// - `root`: MIDI notes that are a root of the chord, lowest first
/// - `spelling`: one spelled note per input note, in input order
/// - `harmony`: the full classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub label: String,
    pub root: Vec<u8>,
    pub spelling: Vec<SpelledNote>,
    pub harmony: Harmony,
}

impl AnalysisResult {
    /// The lines a notation view shows for this result under `settings`.
    ///
    /// Scale degrees and solfege are alternatives, as are note names and
    /// scientific pitch: when both of a pair are enabled neither shows.
    pub fn annotations(&self, settings: &AnalysisSettings) -> Vec<String> {
        let mut lines = Vec::new();
        if !settings.enabled {
            return lines;
        }
        let mode = &settings.mode;
        match &self.harmony {
            Harmony::Note { numeral, solfege, .. } => {
                if mode.scale_degrees && !mode.solfege {
                    lines.extend(numeral.clone());
                } else if mode.solfege && !mode.scale_degrees {
                    lines.extend(solfege.clone());
                }
                if let Some(note) = self.spelling.first() {
                    if mode.note_names && !mode.scientific_pitch {
                        lines.push(note.spelling.to_string());
                    } else if mode.scientific_pitch && !mode.note_names {
                        lines.push(note.scientific());
                    }
                }
            }
            Harmony::Interval { name, .. } => {
                if mode.intervals {
                    lines.push(name.clone());
                }
            }
            Harmony::Chord { label, .. } => {
                if mode.roman_numerals {
                    lines.push(label.clone());
                }
            }
            Harmony::Unclassified => {}
        }
        lines
    }
}
