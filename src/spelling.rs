//! # Pitch Namer
//!
//! Chooses how each sounding note is written.
//!
//! ## Keyed mode
//! A note takes its key's default spelling. In major keys a small fixed
//! rule table then respells some notes one letter flatward, depending on
//! which other pitch classes sound with it. This gives the conventional
//! spelling of augmented sixths, the Neapolitan (♭II) and ♭VI.
//!
//! ## No-key mode
//! There is no keynote to spell against, so the bass is spelled from a
//! reference key named by the no-key tables and every other note is spelled
//! by its letter-name distance above the bass. Single notes and chords the
//! tables do not cover use the chromatic note names.
//!
//! ## Example
//! ```rust
//! use harmony::{name_note, Chord, KeyContext, Tables};
//!
//! let key = KeyContext::new(Tables::builtin()?, "jC_")?;
//!
//! // Neapolitan sixth in C major: F Ab Db, not F G# C#
//! let chord = Chord::new(&[65, 68, 73])?;
//! assert_eq!(name_note(&key, 68, &chord).scientific(), "Ab4");
//! assert_eq!(name_note(&key, 73, &chord).scientific(), "Db5");
//! # Ok::<(), harmony::HarmonyError>(())
//! ```

use crate::chord::{Chord, PitchClassSet};
use crate::key::KeyContext;
use crate::pitch::{Accidental, SpelledNote, Spelling};
use crate::tables::Tables;

/// One respelling rule: when every `requires` pitch class sounds and no
/// `excludes` pitch class does, the `respell` pitch classes move flatward.
/// Pitch classes are relative to the keynote.
struct Alteration {
    requires: &'static [u8],
    excludes: &'static [u8],
    respell: &'static [u8],
}

/// Applied in order; a note may be pushed by more than one rule.
const ENHARMONIC_ALTERATIONS: [Alteration; 4] = [
    // Neapolitan and ♭VI together: ♭2 and ♭6
    Alteration { requires: &[1, 8], excludes: &[], respell: &[1, 8] },
    // German/French sixth over the keynote: ♭6
    Alteration { requires: &[0, 6, 8], excludes: &[], respell: &[8] },
    // ♭3 against ♭6
    Alteration { requires: &[3, 8], excludes: &[], respell: &[3] },
    // ♭6 against ♭3, unless an augmented sixth or Neapolitan already spells it
    Alteration { requires: &[3, 8], excludes: &[6, 1], respell: &[8] },
];

/// Respell `spelling` of `note` for the major-key rule table, given the
/// chord's pitch classes relative to the keynote.
pub fn apply_enharmonic_alterations(
    tonic: u8,
    note: u8,
    pitches: PitchClassSet,
    spelling: Spelling,
) -> Spelling {
    let degree = (note % 12 + 12 - tonic % 12) % 12;
    ENHARMONIC_ALTERATIONS
        .iter()
        .filter(|rule| {
            rule.respell.contains(&degree)
                && rule.requires.iter().all(|pc| pitches.contains(*pc))
                && !rule.excludes.iter().any(|pc| pitches.contains(*pc))
        })
        .fold(spelling, |spelling, _| spelling.push_flatward())
}

/// Spell one note of `chord` in `key`.
///
/// Never fails: a note the tables have no rule for gets its chromatic name.
pub fn name_note(key: &KeyContext, note: u8, chord: &Chord) -> SpelledNote {
    let spelling = if key.is_no_key_mode() {
        chromatic_spelling(key.tables(), note, chord)
    } else {
        keyed_spelling(key, note, chord)
    };
    SpelledNote::new(note, spelling)
}

/// Spell every note of a chord, bass first
pub fn spell_chord(key: &KeyContext, chord: &Chord) -> Vec<SpelledNote> {
    chord
        .notes()
        .iter()
        .map(|note| name_note(key, *note, chord))
        .collect()
}

fn keyed_spelling(key: &KeyContext, note: u8, chord: &Chord) -> Spelling {
    let spelling = key.spelling(note % 12);
    if !key.is_major() {
        return spelling;
    }
    let tonic = key.tonic_pitch_class();
    apply_enharmonic_alterations(tonic, note, chord.pitch_classes_from(tonic), spelling)
}

fn chromatic_spelling(tables: &Tables, note: u8, chord: &Chord) -> Spelling {
    let spelled = match chord.len() {
        1 => None,
        2 => interval_spelling(tables, note, chord),
        _ => chord_spelling(tables, note, chord),
    };
    spelled.unwrap_or_else(|| tables.note_name(note % 12))
}

/// Two notes: the interval table gives the bass spelling key and the letter
/// steps to the upper note
fn interval_spelling(tables: &Tables, note: u8, chord: &Chord) -> Option<Spelling> {
    let (low, high) = (chord.notes()[0], chord.notes()[1]);
    let entry = tables.nokey_interval(i32::from(high) - i32::from(low))?;
    let bass = match &entry.spell_bass {
        Some(id) => tables.spelling_in(id, low)?,
        None => tables.note_name(low % 12),
    };
    let steps = if note == high { entry.stepwise? } else { 0 };
    note_from_distance(low, bass, i32::from(note) - i32::from(low), steps)
}

/// Three or more notes: the no-key chord entry gives the bass spelling key
/// and the letter steps of each interval above the bass
fn chord_spelling(tables: &Tables, note: u8, chord: &Chord) -> Option<Spelling> {
    let key = chord.intervals_above_bass();
    let entry = tables.nokey_chord(&key)?;
    let low = chord.bass();
    let bass = tables.spelling_in(entry.spell_bass.as_deref()?, low)?;
    let semitones = (note % 12 + 12 - low % 12) % 12;
    let steps = key
        .upper()
        .position(semitones)
        .and_then(|i| entry.stepwise.get(i).copied())
        .unwrap_or(0);
    note_from_distance(low, bass, i32::from(semitones), steps)
}

/// The pitch `semitones` above `bass`, written `steps` letter names above
/// the bass spelling
pub(crate) fn note_from_distance(
    bass: u8,
    bass_spelling: Spelling,
    semitones: i32,
    steps: i32,
) -> Option<Spelling> {
    Spelling::on_letter(
        bass_spelling.letter.offset(steps),
        (i32::from(bass) + semitones).rem_euclid(12),
    )
}

/// Accidental signs to print for a chord against the key signature.
///
/// `None` prints nothing, `Some(Accidental::Natural)` prints a natural sign.
/// When an altered note and its natural form on the same letter and octave
/// sound together, the natural one gets a natural sign and the altered one
/// its own accidental. Otherwise pitches already in the signature print
/// nothing and naturals on letters the signature alters print a natural.
///
/// # Example
/// ```rust
/// use harmony::{display_accidentals, Accidental, Analyzer, KeyContext, Tables};
///
/// let key = KeyContext::new(Tables::builtin()?, "jG_")?;
/// let notes = Analyzer::new(key).spell(&[62, 65, 66])?; // D F F#
/// assert_eq!(
///     display_accidentals(&key, &notes),
///     vec![None, Some(Accidental::Natural), Some(Accidental::Sharp)]
/// );
/// # Ok::<(), harmony::HarmonyError>(())
/// ```
pub fn display_accidentals(key: &KeyContext, notes: &[SpelledNote]) -> Vec<Option<Accidental>> {
    let mut shown: Vec<Option<Option<Accidental>>> = vec![None; notes.len()];
    for (i, note) in notes.iter().enumerate() {
        if shown[i].is_some() {
            continue;
        }
        let natural = note.spelling.natural();
        let doubled = notes
            .iter()
            .position(|other| other.spelling == natural && other.octave == note.octave)
            .filter(|_| !note.spelling.is_natural());

        let accidental = match doubled {
            Some(j) => {
                shown[j] = Some(Some(Accidental::Natural));
                Some(note.spelling.accidental)
            }
            None if key.signature_contains(note.spelling) => None,
            None if key.needs_natural(note.spelling) => Some(Accidental::Natural),
            None if note.spelling.is_natural() => None,
            None => Some(note.spelling.accidental),
        };
        shown[i] = Some(accidental);
    }
    shown.into_iter().map(Option::flatten).collect()
}
