//! # Pitch Spelling Types
//!
//! Letter names, accidentals and spelled notes.
//!
//! A MIDI note number says which key of the piano sounds; a [`Spelling`] says
//! how it is written (C# or Db). [`SpelledNote`] pairs the two and adds the
//! octave in scientific pitch notation, with the octave corrected for B# and
//! Cb which cross the octave boundary.
//!
//! ## Related Modules
//! - `spelling` - Chooses a spelling for a note in a key and chord
//! - `key` - Key contexts hold the default spelling of each pitch class

use std::fmt;

use serde::Serialize;

/// The seven letter names, in scale order starting from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position in scale order (C = 0 ... B = 6)
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Letter at a scale-order position, wrapping in both directions
    pub fn from_index(index: i32) -> Letter {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    /// The letter `steps` letter names above this one (negative goes down)
    pub fn offset(self, steps: i32) -> Letter {
        Self::from_index(self.index() + steps)
    }

    /// Pitch class of the unaltered letter
    pub fn natural_pitch_class(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Accidentals up to a double sharp or double flat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Accidental {
    DoubleFlat,
    Flat,
    #[default]
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// Alteration in semitones (-2..=2)
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    pub fn from_semitones(semitones: i32) -> Option<Accidental> {
        match semitones {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// ASCII form used in the tables ("", "#", "##", "b", "bb")
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }

    /// Parse the ASCII form; "n" is accepted as an explicit natural
    pub fn from_symbol(s: &str) -> Option<Accidental> {
        match s {
            "bb" => Some(Accidental::DoubleFlat),
            "b" => Some(Accidental::Flat),
            "" | "n" => Some(Accidental::Natural),
            "#" => Some(Accidental::Sharp),
            "##" => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }
}

/// A letter name with an accidental, e.g. F#, Bb, C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Spelling {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl Spelling {
    pub fn new(letter: Letter, accidental: Accidental) -> Self {
        Spelling { letter, accidental }
    }

    /// Parse a spelling like "C#", "bb" or "Ebb" (letter case is ignored)
    ///
    /// # Example
    /// ```
    /// use harmony::{Accidental, Letter, Spelling};
    ///
    /// let s = Spelling::parse("Bbb").unwrap();
    /// assert_eq!(s.letter, Letter::B);
    /// assert_eq!(s.accidental, Accidental::DoubleFlat);
    /// assert_eq!(s.pitch_class(), 9);
    /// ```
    pub fn parse(s: &str) -> Option<Spelling> {
        let mut chars = s.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let accidental = Accidental::from_symbol(chars.as_str())?;
        Some(Spelling { letter, accidental })
    }

    /// Spell pitch class `pitch_class` on `letter`, if it needs at most a
    /// double accidental
    pub fn on_letter(letter: Letter, pitch_class: i32) -> Option<Spelling> {
        let mut alteration = (pitch_class - letter.natural_pitch_class()).rem_euclid(12);
        if alteration > 6 {
            alteration -= 12;
        }
        Accidental::from_semitones(alteration).map(|accidental| Spelling { letter, accidental })
    }

    pub fn pitch_class(self) -> i32 {
        (self.letter.natural_pitch_class() + self.accidental.semitones()).rem_euclid(12)
    }

    pub fn is_natural(self) -> bool {
        self.accidental == Accidental::Natural
    }

    /// The same letter without its accidental
    pub fn natural(self) -> Spelling {
        Spelling::new(self.letter, Accidental::Natural)
    }

    /// Respell the same pitch one letter name higher (C# becomes Db).
    /// Returns the spelling unchanged if that would need more than a double flat.
    pub fn push_flatward(self) -> Spelling {
        Spelling::on_letter(self.letter.offset(1), self.pitch_class()).unwrap_or(self)
    }

    /// Respell the same pitch one letter name lower (Db becomes C#).
    /// Returns the spelling unchanged if that would need more than a double sharp.
    pub fn push_sharpward(self) -> Spelling {
        Spelling::on_letter(self.letter.offset(-1), self.pitch_class()).unwrap_or(self)
    }

    /// Lower-case form ("c#"), used for the `&r` / `&x` label placeholders
    pub fn to_lowercase(self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for Spelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

/// A sounding MIDI note with its spelling and octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpelledNote {
    pub midi: u8,
    #[serde(flatten)]
    pub spelling: Spelling,
    pub octave: i32,
}

impl SpelledNote {
    /// Attach a spelling to a MIDI note and compute its octave.
    ///
    /// The octave is `floor(midi / 12) - 1`, raised for Cb/Cbb and lowered for
    /// B#/B## since those spellings belong to the neighbouring octave.
    ///
    /// # Example
    /// ```
    /// use harmony::{SpelledNote, Spelling};
    ///
    /// let b_sharp = SpelledNote::new(72, Spelling::parse("B#").unwrap());
    /// assert_eq!(b_sharp.octave, 4);
    /// assert_eq!(b_sharp.scientific(), "B#4");
    /// ```
    pub fn new(midi: u8, spelling: Spelling) -> Self {
        let mut octave = i32::from(midi) / 12 - 1;
        match (spelling.letter, spelling.accidental) {
            (Letter::C, Accidental::Flat | Accidental::DoubleFlat) => octave += 1,
            (Letter::B, Accidental::Sharp | Accidental::DoubleSharp) => octave -= 1,
            _ => {}
        }
        SpelledNote { midi, spelling, octave }
    }

    /// Scientific pitch notation, e.g. "C#4"
    pub fn scientific(&self) -> String {
        format!("{}{}", self.spelling, self.octave)
    }

    /// Helmholtz pitch notation.
    ///
    /// Octave 2 is the great octave ("C"), lower octaves add commas ("C ,"),
    /// octave 3 is lower case ("c") and higher octaves add apostrophes ("c '").
    pub fn helmholtz(&self) -> String {
        let name = self.spelling.to_string();
        match self.octave {
            o if o < 2 => format!("{} {}", name, ",".repeat((2 - o) as usize)),
            2 => name,
            3 => name.to_lowercase(),
            o => format!("{} {}", name.to_lowercase(), "'".repeat((o - 3) as usize)),
        }
    }
}

impl fmt::Display for SpelledNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scientific())
    }
}

/// Size of an interval in semitones and letter-name steps.
///
/// Tables key interval names and scale degrees by this pair, written
/// "semitones/steps" ("4/2" is a major third, "5/2" an augmented third).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distance {
    pub semitones: i32,
    pub steps: i32,
}

impl Distance {
    /// Distance from `lower` to `upper` using their spelled letters.
    ///
    /// Steps count letter names, plus seven per full octave of semitones.
    /// A downward distance is folded up an octave at a time.
    pub fn between(lower: &SpelledNote, upper: &SpelledNote) -> Distance {
        let mut semitones = i32::from(upper.midi) - i32::from(lower.midi);
        let mut steps = (7 + upper.spelling.letter.index() - lower.spelling.letter.index()) % 7
            + semitones.div_euclid(12) * 7;
        while semitones < 0 {
            semitones += 12;
            if steps != 6 {
                steps += 7;
            }
        }
        Distance { semitones, steps }
    }

    /// Parse the "semitones/steps" table form
    pub fn parse(s: &str) -> Option<Distance> {
        let (semitones, steps) = s.split_once('/')?;
        Some(Distance {
            semitones: semitones.trim().parse().ok()?,
            steps: steps.trim().parse().ok()?,
        })
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.semitones, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(s: &str) -> Spelling {
        Spelling::parse(s).unwrap()
    }

    #[test]
    fn test_parse_spelling() {
        assert_eq!(spell("C"), Spelling::new(Letter::C, Accidental::Natural));
        assert_eq!(spell("f#"), Spelling::new(Letter::F, Accidental::Sharp));
        assert_eq!(spell("An"), Spelling::new(Letter::A, Accidental::Natural));
        assert_eq!(spell("Ebb"), Spelling::new(Letter::E, Accidental::DoubleFlat));
        assert!(Spelling::parse("H").is_none());
        assert!(Spelling::parse("C###").is_none());
        assert!(Spelling::parse("").is_none());
    }

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(spell("B#").pitch_class(), 0);
        assert_eq!(spell("Cb").pitch_class(), 11);
        assert_eq!(spell("Cbb").pitch_class(), 10);
        assert_eq!(spell("B##").pitch_class(), 1);
    }

    #[test]
    fn test_push_flatward_and_sharpward() {
        assert_eq!(spell("C#").push_flatward(), spell("Db"));
        assert_eq!(spell("G#").push_flatward(), spell("Ab"));
        assert_eq!(spell("B").push_flatward(), spell("Cb"));
        assert_eq!(spell("Db").push_sharpward(), spell("C#"));
        assert_eq!(spell("C").push_sharpward(), spell("B#"));
    }

    #[test]
    fn test_push_refuses_triple_accidentals() {
        // Db one letter up would be Ebbb
        assert_eq!(spell("Db").push_flatward(), spell("Db"));
        assert_eq!(spell("A#").push_sharpward(), spell("A#"));
    }

    #[test]
    fn test_on_letter_picks_nearest_alteration() {
        // pitch class 10 on C is C double flat, not C with ten sharps
        assert_eq!(Spelling::on_letter(Letter::C, 10), Some(spell("Cbb")));
        assert_eq!(Spelling::on_letter(Letter::B, 1), Some(spell("B##")));
        assert_eq!(Spelling::on_letter(Letter::E, 1), None);
    }

    #[test]
    fn test_octave_correction() {
        assert_eq!(SpelledNote::new(60, spell("C")).octave, 4);
        assert_eq!(SpelledNote::new(59, spell("Cb")).octave, 4);
        assert_eq!(SpelledNote::new(60, spell("B#")).octave, 3);
        assert_eq!(SpelledNote::new(61, spell("B##")).octave, 3);
        assert_eq!(SpelledNote::new(0, spell("C")).octave, -1);
        assert_eq!(SpelledNote::new(127, spell("G")).octave, 9);
    }

    #[test]
    fn test_octave_correction_at_the_bottom_of_the_range() {
        // B#(-2) sounds as C(-1)
        let b_sharp = SpelledNote::new(0, spell("B#"));
        assert_eq!(b_sharp.octave, -2);
        assert_eq!(b_sharp.scientific(), "B#-2");
        // Cb0 sounds as B(-1)
        let c_flat = SpelledNote::new(11, spell("Cb"));
        assert_eq!(c_flat.octave, 0);
        assert_eq!(c_flat.scientific(), "Cb0");
    }

    #[test]
    fn test_helmholtz() {
        assert_eq!(SpelledNote::new(12, spell("C")).helmholtz(), "C ,,");
        assert_eq!(SpelledNote::new(24, spell("C")).helmholtz(), "C ,");
        assert_eq!(SpelledNote::new(37, spell("C#")).helmholtz(), "C#");
        assert_eq!(SpelledNote::new(58, spell("Bb")).helmholtz(), "bb");
        assert_eq!(SpelledNote::new(60, spell("C")).helmholtz(), "c '");
        assert_eq!(SpelledNote::new(74, spell("D")).helmholtz(), "d ''");
        assert_eq!(SpelledNote::new(0, spell("C")).helmholtz(), "C ,,,");
    }

    #[test]
    fn test_distance_counts_letters() {
        let c = SpelledNote::new(60, spell("C"));
        let e = SpelledNote::new(64, spell("E"));
        let f_flat = SpelledNote::new(64, spell("Fb"));
        let c_up = SpelledNote::new(72, spell("C"));
        assert_eq!(Distance::between(&c, &e).to_string(), "4/2");
        assert_eq!(Distance::between(&c, &f_flat).to_string(), "4/3");
        assert_eq!(Distance::between(&c, &c_up).to_string(), "12/7");
    }

    #[test]
    fn test_distance_folds_downward_intervals() {
        // D down to C#: a major seventh above once folded
        let d = SpelledNote::new(2, spell("D"));
        let c_sharp = SpelledNote::new(1, spell("C#"));
        assert_eq!(Distance::between(&d, &c_sharp).to_string(), "11/6");
    }

    #[test]
    fn test_parse_distance() {
        assert_eq!(Distance::parse("10/6"), Some(Distance { semitones: 10, steps: 6 }));
        assert!(Distance::parse("10").is_none());
        assert!(Distance::parse("a/b").is_none());
    }
}
