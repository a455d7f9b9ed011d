//! # Key Context
//!
//! The key in which notes are analysed: keynote, quality, default spelling of
//! each pitch class and the accidentals of its key signature.
//!
//! ## Key Identifiers
//! Keys are named by short identifiers: `j` (major) or `i` (minor), the
//! keynote letter, then `_`, `#` or `b`. `"jC_"` is C major, `"iD_"` D minor,
//! `"iF#"` F# minor. The sentinel `"h"` selects no-key mode, in which notes
//! are spelled chromatically and chords are looked up by their intervals
//! above the bass.
//!
//! ## Example
//! ```rust
//! use harmony::{KeyContext, Tables};
//!
//! let tables = Tables::builtin()?;
//! let key = KeyContext::new(tables, "iD_")?;
//!
//! assert_eq!(key.tonic_pitch_class(), 2);
//! assert_eq!(key.name(), "D minor");
//! assert_eq!(key.signature_spec(), "b");
//! assert_eq!(key.spelling(10).to_string(), "Bb");
//! # Ok::<(), harmony::HarmonyError>(())
//! ```
//!
//! ## Related Modules
//! - `tables` - Loads the key map this module reads from
//! - `spelling` - Applies chord-dependent respelling on top of the key's table

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{HarmonyError, Result};
use crate::pitch::{Accidental, Letter, Spelling};
use crate::tables::Tables;

const ORDER_OF_SHARPS: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const MAJOR_STEPS: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];
const MINOR_STEPS: [u8; 7] = [2, 1, 2, 2, 1, 2, 2];

/// Key quality, from the first character of the identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Major,
    Minor,
    NoKey,
}

/// A key signature: up to seven sharps or seven flats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    accidental: Accidental,
    count: u8,
}

impl Signature {
    /// Parse a signature specification such as `"bb"` or `"###"`.
    ///
    /// # Errors
    /// [`HarmonyError::InvalidSignature`] unless the string is 0-7 copies of
    /// `#` or of `b`.
    pub fn parse(spec: &str) -> Result<Signature> {
        let invalid = || HarmonyError::InvalidSignature(spec.to_string());
        let accidental = match spec.chars().next() {
            None => Accidental::Natural,
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            Some(_) => return Err(invalid()),
        };
        if spec.len() > 7 || spec.chars().any(|c| Some(c) != spec.chars().next()) {
            return Err(invalid());
        }
        Ok(Signature {
            accidental,
            count: spec.len() as u8,
        })
    }

    pub fn count(&self) -> usize {
        usize::from(self.count)
    }

    /// Sharp, flat, or natural for an empty signature
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// The altered notes, in the order they are written on the staff
    pub fn accidentals(&self) -> Vec<Spelling> {
        let count = self.count();
        match self.accidental {
            Accidental::Flat => ORDER_OF_SHARPS
                .iter()
                .rev()
                .take(count)
                .map(|l| Spelling::new(*l, Accidental::Flat))
                .collect(),
            _ => ORDER_OF_SHARPS
                .iter()
                .take(count)
                .map(|l| Spelling::new(*l, self.accidental))
                .collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accidental.symbol().repeat(self.count()))
    }
}

/// One entry of the key map
#[derive(Debug, Clone)]
pub struct KeyDefinition {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub mode: Mode,
    pub tonic: Spelling,
    pub signature: Signature,
    pub spelling: [Spelling; 12],
}

/// Display data for a key, as listed by [`Tables::key_summaries`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySummary {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub mode: Mode,
    pub signature: String,
}

/// An immutable key, passed to every spelling and analysis function
#[derive(Debug, Clone, Copy)]
pub struct KeyContext<'a> {
    tables: &'a Tables,
    key: &'a KeyDefinition,
}

impl<'a> KeyContext<'a> {
    /// Look up a key by identifier.
    ///
    /// # Errors
    /// [`HarmonyError::InvalidKey`] if the identifier is not in the key map.
    pub fn new(tables: &'a Tables, id: &str) -> Result<Self> {
        let key = tables
            .key_definition(id)
            .ok_or_else(|| HarmonyError::InvalidKey(id.to_string()))?;
        debug!("key context {} ({})", key.id, key.name);
        Ok(KeyContext { tables, key })
    }

    pub(crate) fn from_definition(tables: &'a Tables, key: &'a KeyDefinition) -> Self {
        KeyContext { tables, key }
    }

    /// The key associated with a signature specification (`"bb"` is B♭ major).
    ///
    /// # Example
    /// ```rust
    /// use harmony::{KeyContext, Tables};
    ///
    /// let key = KeyContext::from_signature(Tables::builtin()?, "##")?;
    /// assert_eq!(key.id(), "jD_");
    /// # Ok::<(), harmony::HarmonyError>(())
    /// ```
    pub fn from_signature(tables: &'a Tables, spec: &str) -> Result<Self> {
        let signature = Signature::parse(spec)?;
        let id = tables
            .key_for_signature(&signature)
            .ok_or_else(|| HarmonyError::InvalidSignature(spec.to_string()))?;
        KeyContext::new(tables, id)
    }

    pub fn tables(&self) -> &'a Tables {
        self.tables
    }

    pub fn id(&self) -> &'a str {
        &self.key.id
    }

    pub fn name(&self) -> &'a str {
        &self.key.name
    }

    pub fn short_name(&self) -> &'a str {
        &self.key.short_name
    }

    pub fn mode(&self) -> Mode {
        self.key.mode
    }

    pub fn is_major(&self) -> bool {
        self.key.mode == Mode::Major
    }

    pub fn is_minor(&self) -> bool {
        self.key.mode == Mode::Minor
    }

    pub fn is_no_key_mode(&self) -> bool {
        self.key.mode == Mode::NoKey
    }

    /// Spelled keynote (C for no-key mode)
    pub fn tonic(&self) -> Spelling {
        self.key.tonic
    }

    pub fn tonic_pitch_class(&self) -> u8 {
        self.key.tonic.pitch_class() as u8
    }

    /// Default spelling of each pitch class in this key
    pub fn spelling_table(&self) -> &'a [Spelling; 12] {
        &self.key.spelling
    }

    pub fn spelling(&self, pitch_class: u8) -> Spelling {
        self.key.spelling[usize::from(pitch_class % 12)]
    }

    pub fn signature(&self) -> Signature {
        self.key.signature
    }

    /// Signature as a string of sharps or flats
    pub fn signature_spec(&self) -> String {
        self.key.signature.to_string()
    }

    pub fn signature_accidentals(&self) -> Vec<Spelling> {
        self.key.signature.accidentals()
    }

    /// The spelled pitch is one of the signature's accidentals
    pub fn signature_contains(&self, spelling: Spelling) -> bool {
        self.signature_accidentals().contains(&spelling)
    }

    /// The pitch is a natural on a letter the signature alters, so it needs
    /// a natural sign
    pub fn needs_natural(&self, spelling: Spelling) -> bool {
        spelling.is_natural()
            && self
                .signature_accidentals()
                .iter()
                .any(|s| s.letter == spelling.letter)
    }

    /// The seven scale tones starting on the keynote (natural minor for minor
    /// keys, C major in no-key mode)
    ///
    /// # Example
    /// ```rust
    /// use harmony::{KeyContext, Tables};
    ///
    /// let key = KeyContext::new(Tables::builtin()?, "iF#")?;
    /// let names: Vec<String> = key.diatonic_notes().iter().map(|s| s.to_string()).collect();
    /// assert_eq!(names, ["F#", "G#", "A", "B", "C#", "D", "E"]);
    /// # Ok::<(), harmony::HarmonyError>(())
    /// ```
    pub fn diatonic_notes(&self) -> Vec<Spelling> {
        let steps = match self.key.mode {
            Mode::Minor => MINOR_STEPS,
            Mode::Major | Mode::NoKey => MAJOR_STEPS,
        };
        let tonic = self.key.tonic;
        let mut pitch_class = tonic.pitch_class();
        let mut notes = Vec::with_capacity(7);
        for (i, step) in steps.iter().enumerate() {
            let letter = tonic.letter.offset(i as i32);
            notes.push(
                Spelling::on_letter(letter, pitch_class)
                    .unwrap_or_else(|| self.spelling(pitch_class as u8)),
            );
            pitch_class = (pitch_class + i32::from(*step)) % 12;
        }
        notes
    }

    /// Move around the key wheel: positive steps go sharpward, negative
    /// flatward. A key that is not on the wheel starts from its first entry.
    pub fn rotate(&self, steps: i32) -> Result<KeyContext<'a>> {
        let wheel = self.tables.key_wheel();
        if wheel.is_empty() {
            return Ok(*self);
        }
        let len = wheel.len() as i32;
        let index = wheel.iter().position(|id| *id == self.key.id).unwrap_or(0) as i32;
        let next = &wheel[(index + steps).rem_euclid(len) as usize];
        KeyContext::new(self.tables, next)
    }

    pub fn summary(&self) -> KeySummary {
        KeySummary {
            id: self.key.id.clone(),
            name: self.key.name.clone(),
            short_name: self.key.short_name.clone(),
            mode: self.key.mode,
            signature: self.signature_spec(),
        }
    }
}
