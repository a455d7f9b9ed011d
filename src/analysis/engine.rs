//! Analyzer: note-count dispatch and chord-table lookups

use crate::chord::Chord;
use crate::error::Result;
use crate::key::KeyContext;
use crate::pitch::{Distance, SpelledNote, Spelling};
use crate::spelling::{name_note, note_from_distance};
use crate::tables::{Degree, NoKeyChordEntry};

use super::types::{AnalysisResult, Extreme, Harmony};

/// Analyzes chords in one key. Cheap to create; holds no state beyond the key.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    key: KeyContext<'a>,
}

/// Fill the root and bass placeholders of a no-key label. Only the first
/// occurrence of each placeholder is replaced.
fn fill_placeholders(template: &str, root: Option<Spelling>, bass: Option<Spelling>) -> String {
    let mut text = template.to_string();
    if let Some(root) = root {
        text = text
            .replacen("&R", &root.to_string(), 1)
            .replacen("&r", &root.to_lowercase(), 1);
    }
    if let Some(bass) = bass {
        text = text
            .replacen("&X", &bass.to_string(), 1)
            .replacen("&x", &bass.to_lowercase(), 1);
    }
    text
}

impl<'a> Analyzer<'a> {
    pub fn new(key: KeyContext<'a>) -> Self {
        Analyzer { key }
    }

    pub fn key(&self) -> KeyContext<'a> {
        self.key
    }

    /// Analyze the notes sounding together.
    ///
    /// Notes may come in any order; the lowest is the bass. The returned
    /// spelling follows the input order.
    ///
    /// # Example
    /// ```rust
    /// use harmony::{Analyzer, KeyContext, Tables};
    ///
    /// let key = KeyContext::new(Tables::builtin()?, "jC_")?;
    /// let result = Analyzer::new(key).analyze(&[67, 71, 74, 77])?;
    /// assert_eq!(result.label, "V{u}");
    /// assert_eq!(result.root, vec![67]);
    /// # Ok::<(), harmony::HarmonyError>(())
    /// ```
    ///
    /// # Errors
    /// [`HarmonyError::EmptyChord`](crate::HarmonyError::EmptyChord) or
    /// [`HarmonyError::InvalidNote`](crate::HarmonyError::InvalidNote) for
    /// malformed input. An unknown chord is not an error.
    pub fn analyze(&self, notes: &[u8]) -> Result<AnalysisResult> {
        let chord = Chord::new(notes)?;
        let harmony = self.classify(&chord);
        Ok(AnalysisResult {
            label: harmony.label().to_string(),
            root: self.find_roots(&chord),
            spelling: self.spell_in(notes, &chord),
            harmony,
        })
    }

    /// Spell the notes in input order
    pub fn spell(&self, notes: &[u8]) -> Result<Vec<SpelledNote>> {
        let chord = Chord::new(notes)?;
        Ok(self.spell_in(notes, &chord))
    }

    fn spell_in(&self, notes: &[u8], chord: &Chord) -> Vec<SpelledNote> {
        notes
            .iter()
            .map(|note| name_note(&self.key, *note, chord))
            .collect()
    }

    /// Classify a chord by its number of distinct notes
    pub fn classify(&self, chord: &Chord) -> Harmony {
        match chord.len() {
            1 => self.classify_note(chord),
            2 => self.classify_interval(chord),
            _ => self.classify_chord(chord),
        }
    }

    fn classify_note(&self, chord: &Chord) -> Harmony {
        let note = name_note(&self.key, chord.bass(), chord);
        let degree = self.degree(chord);
        Harmony::Note {
            name: note.helmholtz(),
            numeral: degree.map(|d| d.numeral.clone()),
            solfege: degree.map(|d| d.solfege.clone()),
        }
    }

    fn classify_interval(&self, chord: &Chord) -> Harmony {
        let description = if self.key.is_no_key_mode() {
            let (low, high) = (chord.notes()[0], chord.notes()[1]);
            self.key
                .tables()
                .nokey_interval(i32::from(high) - i32::from(low))
                .map(|entry| entry.label.clone())
        } else {
            None
        };
        match (self.interval_name(chord), description) {
            (Some(name), description) => Harmony::Interval {
                name: name.to_string(),
                description,
            },
            (None, Some(description)) => Harmony::Interval {
                name: description.clone(),
                description: Some(description),
            },
            (None, None) => Harmony::Unclassified,
        }
    }

    fn classify_chord(&self, chord: &Chord) -> Harmony {
        let tables = self.key.tables();
        if self.key.is_no_key_mode() {
            return match tables.nokey_chord(&chord.intervals_above_bass()) {
                Some(entry) => self.resolve_nokey_chord(chord, entry),
                None => Harmony::Unclassified,
            };
        }
        let key = chord.ordered_pitch_classes(self.key.tonic_pitch_class());
        match tables.keyed_chord(self.key.mode(), &key) {
            Some(entry) => Harmony::Chord {
                label: entry.label.clone(),
                description: None,
                alt_label: entry.alt_label.clone(),
                priority: entry.priority,
            },
            None => Harmony::Unclassified,
        }
    }

    /// Substitute the spelled root and bass into a no-key entry. Entries with
    /// no bass spelling key keep their templates as written.
    fn resolve_nokey_chord(&self, chord: &Chord, entry: &NoKeyChordEntry) -> Harmony {
        let (label, description) = match &entry.spell_bass {
            None => (entry.label.clone(), entry.description.clone()),
            Some(spell_bass) => {
                let bass = chord.bass();
                let bass_name = self.key.tables().spelling_in(spell_bass, bass);
                let root_name = match (entry.root, bass_name) {
                    (Some(root), Some(bass_name)) => {
                        note_from_distance(bass, bass_name, i32::from(root), entry.root_stepwise)
                    }
                    _ => None,
                };
                (
                    fill_placeholders(&entry.label, root_name, bass_name),
                    fill_placeholders(&entry.description, root_name, bass_name),
                )
            }
        };
        Harmony::Chord {
            label,
            description: Some(description),
            alt_label: None,
            priority: None,
        }
    }

    fn degree(&self, chord: &Chord) -> Option<&'a Degree> {
        if chord.len() != 1 || self.key.is_no_key_mode() {
            return None;
        }
        let tonic = self.key.tonic_pitch_class();
        let pitch_class = chord.bass() % 12;
        // spell keynote and note as a pair, both in the lowest octave
        let pair = Chord::new(&[tonic, pitch_class]).ok()?;
        let distance = Distance::between(
            &name_note(&self.key, tonic, &pair),
            &name_note(&self.key, pitch_class, &pair),
        );
        self.key.tables().degree(self.key.mode(), distance)
    }

    /// Scale-degree numeral of a single note ("1", "b3", "#4")
    pub fn scale_degree(&self, chord: &Chord) -> Option<&'a str> {
        self.degree(chord).map(|d| d.numeral.as_str())
    }

    /// Solfege syllable of a single note
    pub fn solfege(&self, chord: &Chord) -> Option<&'a str> {
        self.degree(chord).map(|d| d.solfege.as_str())
    }

    /// Interval name of a two-note chord, from its spelled letter names
    pub fn interval_name(&self, chord: &Chord) -> Option<&'a str> {
        if chord.len() != 2 {
            return None;
        }
        let (low, high) = (chord.notes()[0], chord.notes()[1]);
        let distance = Distance::between(
            &name_note(&self.key, low, chord),
            &name_note(&self.key, high, chord),
        );
        self.key.tables().interval_name(distance)
    }

    /// Every sounding note whose pitch class is the chord's root.
    ///
    /// A root doubled in several octaves yields all of them, lowest first.
    /// Empty when the chord is not in the table or has no root.
    pub fn find_roots(&self, chord: &Chord) -> Vec<u8> {
        let tables = self.key.tables();
        if self.key.is_no_key_mode() {
            let root = tables
                .nokey_chord(&chord.intervals_above_bass())
                .and_then(|entry| entry.root);
            let bass = chord.bass() % 12;
            return match root {
                Some(root) => chord
                    .notes()
                    .iter()
                    .copied()
                    .filter(|note| (note % 12 + 12 - bass) % 12 == root)
                    .collect(),
                None => Vec::new(),
            };
        }
        let tonic = self.key.tonic_pitch_class();
        let root = tables
            .keyed_chord(self.key.mode(), &chord.ordered_pitch_classes(tonic))
            .and_then(|entry| entry.root);
        match root {
            Some(root) => {
                let root_pc = (root + tonic) % 12;
                chord
                    .notes()
                    .iter()
                    .copied()
                    .filter(|note| note % 12 == root_pc)
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// The lowest or highest of [`find_roots`](Self::find_roots)
    pub fn find_root(&self, chord: &Chord, extreme: Extreme) -> Option<u8> {
        let roots = self.find_roots(chord);
        match extreme {
            Extreme::Lowest => roots.first().copied(),
            Extreme::Highest => roots.last().copied(),
        }
    }
}
