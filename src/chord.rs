//! # Chords and Interval-Set Keys
//!
//! A [`Chord`] is the set of MIDI notes sounding at once, sorted from the
//! bass up. The chord tables are keyed by a compact interval set derived
//! from it:
//!
//! - **Keyed** (major/minor keys): pitch class of the bass relative to the
//!   keynote, then the other pitch classes relative to the keynote,
//!   written `"7/25z"`.
//! - **Above bass** (no key): intervals above the bass only, written `"47"`.
//!
//! Pitch classes 10 and 11 are written `y` and `z`. Duplicate pitch classes
//! are collapsed before the key is built, so the key depends only on the
//! bass and the set of pitch classes, never on voicing or input order.
//!
//! ## Example
//! ```rust
//! use harmony::Chord;
//!
//! // G7 in C major, voiced with a doubled G
//! let chord = Chord::new(&[67, 71, 74, 77, 79])?;
//! assert_eq!(chord.ordered_pitch_classes(0).to_string(), "7/25z");
//! assert_eq!(chord.intervals_above_bass().to_string(), "47y");
//! # Ok::<(), harmony::HarmonyError>(())
//! ```

use std::fmt;

use crate::error::{HarmonyError, Result};

fn digit_char(pitch_class: u8) -> char {
    match pitch_class {
        10 => 'y',
        11 => 'z',
        d => char::from(b'0' + d),
    }
}

fn digit_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'y' => Some(10),
        'z' => Some(11),
        _ => None,
    }
}

/// Set of pitch classes 0-11, iterated in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub fn new() -> Self {
        PitchClassSet(0)
    }

    pub fn insert(&mut self, pitch_class: u8) {
        self.0 |= 1 << (pitch_class % 12);
    }

    pub fn contains(&self, pitch_class: u8) -> bool {
        pitch_class < 12 && self.0 & (1 << pitch_class) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..12).filter(move |pc| self.contains(*pc))
    }

    /// Index of `pitch_class` in ascending order, if present
    pub fn position(&self, pitch_class: u8) -> Option<usize> {
        self.iter().position(|pc| pc == pitch_class)
    }

    /// Parse a digit string such as "25z". Digits must be strictly ascending.
    pub fn parse(s: &str) -> Option<PitchClassSet> {
        let mut set = PitchClassSet::new();
        let mut previous: Option<u8> = None;
        for c in s.chars() {
            let value = digit_value(c)?;
            if previous.map_or(false, |p| value <= p) {
                return None;
            }
            set.insert(value);
            previous = Some(value);
        }
        Some(set)
    }
}

impl FromIterator<u8> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = PitchClassSet::new();
        for pc in iter {
            set.insert(pc);
        }
        set
    }
}

impl fmt::Display for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pc in self.iter() {
            write!(f, "{}", digit_char(pc))?;
        }
        Ok(())
    }
}

/// Chord-table lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKey {
    /// Bass and upper pitch classes relative to the keynote
    Keyed { bass: u8, upper: PitchClassSet },
    /// Intervals above the bass, for the no-key table
    AboveBass(PitchClassSet),
}

impl ChordKey {
    /// Parse the `"bass/upper"` form used by the major and minor tables
    pub fn parse_keyed(s: &str) -> Option<ChordKey> {
        let (bass, upper) = s.split_once('/')?;
        let mut bass_chars = bass.chars();
        let bass = digit_value(bass_chars.next()?)?;
        if bass_chars.next().is_some() {
            return None;
        }
        Some(ChordKey::Keyed {
            bass,
            upper: PitchClassSet::parse(upper)?,
        })
    }

    /// Parse the intervals-above-bass form used by the no-key table
    pub fn parse_above_bass(s: &str) -> Option<ChordKey> {
        let upper = PitchClassSet::parse(s)?;
        if upper.contains(0) {
            return None;
        }
        Some(ChordKey::AboveBass(upper))
    }

    /// The pitch classes above the bass (or other than the bass)
    pub fn upper(&self) -> PitchClassSet {
        match self {
            ChordKey::Keyed { upper, .. } => *upper,
            ChordKey::AboveBass(upper) => *upper,
        }
    }

    /// Whether a chord can ever produce this key. A keyed entry that repeats
    /// the bass among its upper pitch classes never matches.
    pub fn is_reachable(&self) -> bool {
        match self {
            ChordKey::Keyed { bass, upper } => !upper.contains(*bass),
            ChordKey::AboveBass(upper) => !upper.contains(0),
        }
    }
}

impl fmt::Display for ChordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordKey::Keyed { bass, upper } => write!(f, "{}/{}", digit_char(*bass), upper),
            ChordKey::AboveBass(upper) => write!(f, "{}", upper),
        }
    }
}

/// Check that a value is a MIDI note number
pub fn midi_note(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|note| *note <= 127)
        .ok_or(HarmonyError::InvalidNote(value))
}

/// Notes sounding together, sorted ascending with duplicates removed.
/// The first note is the bass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    notes: Vec<u8>,
}

impl Chord {
    /// Build a chord from MIDI note numbers in any order.
    ///
    /// # Errors
    /// [`HarmonyError::EmptyChord`] for an empty list and
    /// [`HarmonyError::InvalidNote`] for a number above 127.
    pub fn new(notes: &[u8]) -> Result<Chord> {
        if notes.is_empty() {
            return Err(HarmonyError::EmptyChord);
        }
        if let Some(bad) = notes.iter().find(|n| **n > 127) {
            return Err(HarmonyError::InvalidNote(i64::from(*bad)));
        }
        let mut notes = notes.to_vec();
        notes.sort_unstable();
        notes.dedup();
        Ok(Chord { notes })
    }

    /// Build a chord from unchecked integers, e.g. parsed user input
    pub fn from_values(values: &[i64]) -> Result<Chord> {
        let notes = values
            .iter()
            .map(|v| midi_note(*v))
            .collect::<Result<Vec<u8>>>()?;
        Chord::new(&notes)
    }

    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    /// Number of distinct sounding notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn bass(&self) -> u8 {
        self.notes[0]
    }

    pub fn contains(&self, note: u8) -> bool {
        self.notes.binary_search(&note).is_ok()
    }

    /// Index of `note` counting from the bass
    pub fn position(&self, note: u8) -> Option<usize> {
        self.notes.binary_search(&note).ok()
    }

    /// Lowest note of each pitch class, in ascending order
    pub fn strip_repeated_pitch_classes(&self) -> Vec<u8> {
        let mut seen = PitchClassSet::new();
        let mut stripped = Vec::with_capacity(self.notes.len());
        for &note in &self.notes {
            let pc = note % 12;
            if !seen.contains(pc) {
                seen.insert(pc);
                stripped.push(note);
            }
        }
        stripped
    }

    /// Pitch classes relative to `tonic`
    pub fn pitch_classes_from(&self, tonic: u8) -> PitchClassSet {
        self.notes
            .iter()
            .map(|note| (note % 12 + 12 - tonic % 12) % 12)
            .collect()
    }

    /// Interval-set key relative to the keynote, for the major and minor tables
    pub fn ordered_pitch_classes(&self, tonic: u8) -> ChordKey {
        let relative = |note: u8| (note % 12 + 12 - tonic % 12) % 12;
        let stripped = self.strip_repeated_pitch_classes();
        ChordKey::Keyed {
            bass: relative(stripped[0]),
            upper: stripped[1..].iter().map(|n| relative(*n)).collect(),
        }
    }

    /// Interval-set key above the bass, for the no-key table
    pub fn intervals_above_bass(&self) -> ChordKey {
        let stripped = self.strip_repeated_pitch_classes();
        let bass = stripped[0] % 12;
        ChordKey::AboveBass(
            stripped[1..]
                .iter()
                .map(|n| (n % 12 + 12 - bass) % 12)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_sorts_and_dedups() {
        let chord = Chord::new(&[67, 60, 64, 60]).unwrap();
        assert_eq!(chord.notes(), &[60, 64, 67]);
        assert_eq!(chord.bass(), 60);
        assert_eq!(chord.len(), 3);
    }

    #[test]
    fn test_chord_validation() {
        assert!(matches!(Chord::new(&[]), Err(HarmonyError::EmptyChord)));
        assert!(matches!(Chord::new(&[60, 128]), Err(HarmonyError::InvalidNote(128))));
        assert!(matches!(Chord::from_values(&[-1]), Err(HarmonyError::InvalidNote(-1))));
        assert!(Chord::from_values(&[0, 127]).is_ok());
    }

    #[test]
    fn test_strip_repeated_keeps_lowest() {
        let chord = Chord::new(&[48, 60, 64, 72, 76]).unwrap();
        assert_eq!(chord.strip_repeated_pitch_classes(), vec![48, 64]);
    }

    #[test]
    fn test_ordered_pitch_classes() {
        // D minor triad in D minor
        let chord = Chord::new(&[62, 65, 69]).unwrap();
        assert_eq!(chord.ordered_pitch_classes(2).to_string(), "0/37");
        // first inversion C major in C
        let chord = Chord::new(&[64, 67, 72]).unwrap();
        assert_eq!(chord.ordered_pitch_classes(0).to_string(), "4/07");
    }

    #[test]
    fn test_key_ignores_input_order_and_voicing() {
        let a = Chord::new(&[60, 64, 67, 70]).unwrap();
        let b = Chord::new(&[70, 67, 76, 60, 64]).unwrap();
        assert_eq!(a.ordered_pitch_classes(5), b.ordered_pitch_classes(5));
        assert_eq!(a.intervals_above_bass(), b.intervals_above_bass());
    }

    #[test]
    fn test_y_and_z_digits() {
        let chord = Chord::new(&[60, 70, 71]).unwrap();
        assert_eq!(chord.intervals_above_bass().to_string(), "yz");
        assert_eq!(chord.ordered_pitch_classes(1).to_string(), "z/9y");
    }

    #[test]
    fn test_parse_keys() {
        let key = ChordKey::parse_keyed("7/25z").unwrap();
        assert_eq!(key.to_string(), "7/25z");
        assert_eq!(key.upper().len(), 3);
        assert!(ChordKey::parse_keyed("7/52").is_none());
        assert!(ChordKey::parse_keyed("12/4").is_none());
        assert!(ChordKey::parse_above_bass("047").is_none());
        assert_eq!(ChordKey::parse_above_bass("368").unwrap().to_string(), "368");
    }

    #[test]
    fn test_unreachable_keyed_entry() {
        assert!(!ChordKey::parse_keyed("4/04").unwrap().is_reachable());
        assert!(ChordKey::parse_keyed("4/07").unwrap().is_reachable());
    }

    #[test]
    fn test_pitch_class_set_position() {
        let set = PitchClassSet::parse("25z").unwrap();
        assert_eq!(set.position(5), Some(1));
        assert_eq!(set.position(7), None);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 5, 11]);
    }
}
