//! # Error Types
//!
//! This module defines all error types for the harmony engine.
//!
//! Errors fall into two groups: bad input at the API boundary (unknown key,
//! out-of-range note, empty chord) and bad data in the analysis tables.
//!
//! An unrecognised chord is not an error. It is reported as
//! [`Harmony::Unclassified`](crate::Harmony::Unclassified) so callers can show
//! "no label" for the many note combinations that are not textbook chords.
//!
//! ## Usage
//! ```rust
//! use harmony::{analyze, HarmonyError};
//!
//! match analyze("jZ_", &[60, 64, 67]) {
//!     Ok(result) => println!("{}", result.label),
//!     Err(HarmonyError::InvalidKey(key)) => eprintln!("No such key: {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarmonyError {
    /// Unknown key identifier.
    ///
    /// # Example
    /// ```
    /// # use harmony::HarmonyError;
    /// let err = HarmonyError::InvalidKey("jH_".to_string());
    /// assert_eq!(err.to_string(), "Invalid key: jH_");
    /// ```
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Signature specification that is not 0-7 sharps or 0-7 flats.
    ///
    /// # Example
    /// ```
    /// # use harmony::HarmonyError;
    /// let err = HarmonyError::InvalidSignature("#b".to_string());
    /// assert_eq!(err.to_string(), "Invalid signature: '#b'");
    /// ```
    #[error("Invalid signature: '{0}'")]
    InvalidSignature(String),

    /// MIDI note outside 0..=127.
    ///
    /// # Example
    /// ```
    /// # use harmony::HarmonyError;
    /// let err = HarmonyError::InvalidNote(128);
    /// assert_eq!(err.to_string(), "Invalid MIDI note 128 (expected 0-127)");
    /// ```
    #[error("Invalid MIDI note {0} (expected 0-127)")]
    InvalidNote(i64),

    /// An operation that needs at least one note received none.
    #[error("Chord has no notes")]
    EmptyChord,

    /// Highlight requested for a note that is not part of the chord.
    ///
    /// # Example
    /// ```
    /// # use harmony::HarmonyError;
    /// let err = HarmonyError::NoteNotInChord { note: 61, chord: vec![60, 64, 67] };
    /// assert_eq!(err.to_string(), "Note 61 is not in chord [60, 64, 67]");
    /// ```
    #[error("Note {note} is not in chord {chord:?}")]
    NoteNotInChord { note: u8, chord: Vec<u8> },

    /// A data table failed validation.
    ///
    /// # Example
    /// ```
    /// # use harmony::HarmonyError;
    /// let err = HarmonyError::Table {
    ///     table: "nokey_chords.yaml".to_string(),
    ///     message: "entry '47': spell_bass 'iH_' is not a key".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid table nokey_chords.yaml: entry '47': spell_bass 'iH_' is not a key"
    /// );
    /// ```
    #[error("Invalid table {table}: {message}")]
    Table { table: String, message: String },

    /// A table or settings file is not valid YAML for its schema.
    #[error("Failed to parse {table}: {source}")]
    Yaml {
        table: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A table or settings file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarmonyError>;

impl HarmonyError {
    /// Short machine-readable name of the variant, used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            HarmonyError::InvalidKey(_) => "invalidKey",
            HarmonyError::InvalidSignature(_) => "invalidSignature",
            HarmonyError::InvalidNote(_) => "invalidNote",
            HarmonyError::EmptyChord => "emptyChord",
            HarmonyError::NoteNotInChord { .. } => "noteNotInChord",
            HarmonyError::Table { .. } => "table",
            HarmonyError::Yaml { .. } => "yaml",
            HarmonyError::Io { .. } => "io",
        }
    }

    pub(crate) fn table(table: &str, message: impl Into<String>) -> Self {
        HarmonyError::Table {
            table: table.to_string(),
            message: message.into(),
        }
    }
}
