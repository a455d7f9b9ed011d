//! # Analysis Module
//!
//! Classify the notes sounding at one moment in a key.
//!
//! ## Purpose
//! The analyzer is the engine's public entry point. Given a key and a set of
//! MIDI notes it returns:
//! 1. **Spelling** - each note written correctly for the key and chord
//! 2. **Label** - scale degree, interval name or Roman-numeral chord label
//! 3. **Roots** - every sounding note that is a root of the chord
//!
//! ## Sub-modules
//! - `types` - AnalysisResult, Harmony and Extreme definitions
//! - `engine` - The Analyzer and its table lookups
//!
//! ## Dispatch
//! The number of distinct sounding notes picks the classification:
//! - **1 note** - scale degree and solfege syllable (keyed mode only)
//! - **2 notes** - interval name from semitones and letter-name steps
//! - **3+ notes** - chord label from the major, minor or no-key chord table
//!
//! A chord the tables do not know is [`Harmony::Unclassified`], never an
//! error and never a guess.
//!
//! ## Example
//! ```rust
//! use harmony::{Analyzer, Harmony, KeyContext, Tables};
//!
//! let key = KeyContext::new(Tables::builtin()?, "iD_")?;
//! let result = Analyzer::new(key).analyze(&[62, 65, 69])?;
//!
//! assert_eq!(result.label, "i");
//! assert_eq!(result.root, vec![62]);
//! assert!(matches!(result.harmony, Harmony::Chord { .. }));
//! # Ok::<(), harmony::HarmonyError>(())
//! ```
//!
//! ## Related Modules
//! - `spelling` - Note spelling used for intervals and results
//! - `highlight` - Uses the analyzer's roots for root highlighting

mod types;
mod engine;

#[cfg(test)]
mod tests;

pub use types::{AnalysisResult, Extreme, Harmony};
pub use engine::Analyzer;
