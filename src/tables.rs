//! # Analysis Tables
//!
//! Loads the static data the engine interprets: the key map, the three chord
//! tables, interval and scale-degree names and the highlight colors.
//!
//! ## Purpose
//! The analysis logic is a thin interpreter over these tables. They live in
//! `data/*.yaml` so they can be corrected without touching code, and are
//! embedded into the binary at build time. [`Tables::builtin()`] parses the
//! embedded copy once; [`Tables::from_dir()`] loads replacements from disk.
//!
//! ## Files
//! - `keys.yaml` - key map, signature-to-key map, key wheel, chromatic names
//! - `major_chords.yaml` / `minor_chords.yaml` - Roman-numeral chord tables
//! - `nokey_chords.yaml` / `nokey_intervals.yaml` - tables for no-key mode
//! - `intervals.yaml` - interval names by "semitones/steps"
//! - `major_degrees.yaml` / `minor_degrees.yaml` - scale degrees and solfege
//! - `highlight.yaml` - highlight colors
//!
//! Table keys keep their compact written form (`"7/25z"`, `"47"`, `"4/2"`)
//! and are parsed into typed keys when loaded. The `"_"` and `"___"` markers
//! for "no value" become `None`.
//!
//! ## Related Modules
//! - `key` - Key contexts borrow their definitions from here
//! - `analysis` - Looks chords, intervals and degrees up in these tables

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chord::ChordKey;
use crate::error::{HarmonyError, Result};
use crate::highlight::HighlightColors;
use crate::key::{KeyContext, KeyDefinition, KeySummary, Mode, Signature};
use crate::pitch::{Accidental, Distance, Letter, Spelling};

include!(concat!(env!("OUT_DIR"), "/tables.rs"));

const KEYS_FILE: &str = "keys.yaml";
const MAJOR_CHORDS_FILE: &str = "major_chords.yaml";
const MINOR_CHORDS_FILE: &str = "minor_chords.yaml";
const NOKEY_CHORDS_FILE: &str = "nokey_chords.yaml";
const NOKEY_INTERVALS_FILE: &str = "nokey_intervals.yaml";
const INTERVALS_FILE: &str = "intervals.yaml";
const MAJOR_DEGREES_FILE: &str = "major_degrees.yaml";
const MINOR_DEGREES_FILE: &str = "minor_degrees.yaml";
const HIGHLIGHT_FILE: &str = "highlight.yaml";

/// Marker for "no value" in the root and stepwise columns
const NONE_MARKER: &str = "_";
/// Marker for "no spelling key" in the spell_bass column
const NO_SPELL_BASS: &str = "___";

static BUILTIN: OnceCell<Tables> = OnceCell::new();

/// Roman-numeral chord table entry (major and minor keys)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordEntry {
    /// Root pitch class relative to the keynote
    pub root: Option<u8>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
    /// Learning priority, 1 = learn first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// No-key chord table entry
#[derive(Debug, Clone, PartialEq)]
pub struct NoKeyChordEntry {
    /// Template with `&R`/`&r` (root) and `&X`/`&x` (bass) placeholders
    pub label: String,
    pub description: String,
    /// Key whose spelling table spells the bass
    pub spell_bass: Option<String>,
    /// Letter steps above the bass, one per interval of the key
    pub stepwise: Vec<i32>,
    /// Root as semitones above the bass
    pub root: Option<u8>,
    pub root_stepwise: i32,
}

/// No-key two-note table entry, keyed by semitone size
#[derive(Debug, Clone, PartialEq)]
pub struct NoKeyInterval {
    pub label: String,
    pub stepwise: Option<i32>,
    pub spell_bass: Option<String>,
}

/// Scale degree numeral and solfege syllable
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Degree {
    pub numeral: String,
    pub solfege: String,
}

#[derive(Deserialize)]
struct KeysFile {
    keys: BTreeMap<String, RawKey>,
    signature_keys: BTreeMap<String, String>,
    key_wheel: Vec<String>,
    note_names: Vec<String>,
}

#[derive(Deserialize)]
struct RawKey {
    name: String,
    short_name: String,
    pitch_class: u8,
    signature: String,
    spelling: Vec<String>,
}

#[derive(Deserialize)]
struct RawChord {
    root: String,
    label: String,
    #[serde(default)]
    alt_label: Option<String>,
    #[serde(default)]
    priority: Option<u32>,
}

#[derive(Deserialize)]
struct RawNoKeyChord {
    label: String,
    description: String,
    spell_bass: String,
    stepwise: String,
    root: String,
    root_stepwise: String,
}

#[derive(Deserialize)]
struct RawNoKeyInterval {
    label: String,
    stepwise: String,
    spell_bass: String,
}

#[derive(Deserialize)]
struct HighlightFile {
    colors: HighlightColors,
}

/// All analysis tables, immutable once loaded
#[derive(Debug, Clone)]
pub struct Tables {
    keys: BTreeMap<String, KeyDefinition>,
    signature_keys: HashMap<String, String>,
    key_wheel: Vec<String>,
    note_names: [Spelling; 12],
    major_chords: HashMap<ChordKey, ChordEntry>,
    minor_chords: HashMap<ChordKey, ChordEntry>,
    nokey_chords: HashMap<ChordKey, NoKeyChordEntry>,
    nokey_intervals: HashMap<u8, NoKeyInterval>,
    intervals: HashMap<Distance, String>,
    major_degrees: HashMap<Distance, Degree>,
    minor_degrees: HashMap<Distance, Degree>,
    colors: HighlightColors,
}

fn embedded(name: &str) -> Result<String> {
    TABLE_SOURCES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, text)| text.to_string())
        .ok_or_else(|| HarmonyError::table(name, "not embedded in this build"))
}

fn parse_yaml<T: DeserializeOwned>(table: &str, text: &str) -> Result<T> {
    serde_yaml::from_str(text).map_err(|source| HarmonyError::Yaml {
        table: table.to_string(),
        source,
    })
}

fn parse_spelling(table: &str, context: &str, text: &str) -> Result<Spelling> {
    Spelling::parse(text)
        .ok_or_else(|| HarmonyError::table(table, format!("{}: bad note name '{}'", context, text)))
}

fn parse_twelve(table: &str, context: &str, names: &[String]) -> Result<[Spelling; 12]> {
    if names.len() != 12 {
        return Err(HarmonyError::table(
            table,
            format!("{}: expected 12 spellings, found {}", context, names.len()),
        ));
    }
    let mut spelling = [Spelling::new(Letter::C, Accidental::Natural); 12];
    for (pc, name) in names.iter().enumerate() {
        let parsed = parse_spelling(table, context, name)?;
        if parsed.pitch_class() != pc as i32 {
            return Err(HarmonyError::table(
                table,
                format!("{}: '{}' does not spell pitch class {}", context, name, pc),
            ));
        }
        spelling[pc] = parsed;
    }
    Ok(spelling)
}

/// A single digit 0-9, y or z, or the none marker
fn parse_pitch_digit(table: &str, context: &str, text: &str) -> Result<Option<u8>> {
    if text == NONE_MARKER {
        return Ok(None);
    }
    let value = match text {
        "y" => Some(10),
        "z" => Some(11),
        _ => text.parse::<u8>().ok().filter(|v| *v < 10),
    };
    value
        .map(Some)
        .ok_or_else(|| HarmonyError::table(table, format!("{}: bad pitch class '{}'", context, text)))
}

fn parse_steps(table: &str, context: &str, text: &str) -> Result<Option<i32>> {
    if text == NONE_MARKER {
        return Ok(None);
    }
    text.parse::<i32>()
        .map(Some)
        .map_err(|_| HarmonyError::table(table, format!("{}: bad step count '{}'", context, text)))
}

/// The keynote spelling encoded in a key id ("jF#" -> F#)
fn tonic_from_id(id: &str) -> Option<Spelling> {
    let mut chars = id.chars().skip(1);
    let letter = Letter::from_char(chars.next()?)?;
    let accidental = match chars.next()? {
        '_' => Accidental::Natural,
        '#' => Accidental::Sharp,
        'b' => Accidental::Flat,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(Spelling::new(letter, accidental))
}

fn parse_key(id: &str, raw: RawKey) -> Result<KeyDefinition> {
    let context = format!("key '{}'", id);
    let (mode, tonic) = match id.chars().next() {
        _ if id == "h" => (Mode::NoKey, Some(Spelling::new(Letter::C, Accidental::Natural))),
        Some('j') => (Mode::Major, tonic_from_id(id)),
        Some('i') => (Mode::Minor, tonic_from_id(id)),
        _ => (Mode::Major, None),
    };
    let tonic = tonic
        .ok_or_else(|| HarmonyError::table(KEYS_FILE, format!("{}: malformed key id", context)))?;
    if tonic.pitch_class() != i32::from(raw.pitch_class) {
        return Err(HarmonyError::table(
            KEYS_FILE,
            format!("{}: pitch_class {} does not match keynote {}", context, raw.pitch_class, tonic),
        ));
    }
    let signature = Signature::parse(&raw.signature)
        .map_err(|e| HarmonyError::table(KEYS_FILE, format!("{}: {}", context, e)))?;
    Ok(KeyDefinition {
        id: id.to_string(),
        name: raw.name,
        short_name: raw.short_name,
        mode,
        tonic,
        signature,
        spelling: parse_twelve(KEYS_FILE, &context, &raw.spelling)?,
    })
}

fn parse_chord_table(table: &str, text: &str) -> Result<HashMap<ChordKey, ChordEntry>> {
    let raw: BTreeMap<String, RawChord> = parse_yaml(table, text)?;
    let mut chords = HashMap::with_capacity(raw.len());
    for (key_text, entry) in raw {
        let context = format!("entry '{}'", key_text);
        let key = ChordKey::parse_keyed(&key_text)
            .ok_or_else(|| HarmonyError::table(table, format!("{}: malformed interval set", context)))?;
        if !key.is_reachable() {
            warn!("{}: {} repeats its bass and can never match", table, context);
            continue;
        }
        chords.insert(
            key,
            ChordEntry {
                root: parse_pitch_digit(table, &context, &entry.root)?,
                label: entry.label,
                alt_label: entry.alt_label,
                priority: entry.priority,
            },
        );
    }
    Ok(chords)
}

fn parse_spell_bass(
    table: &str,
    context: &str,
    text: &str,
    keys: &BTreeMap<String, KeyDefinition>,
) -> Result<Option<String>> {
    if text == NO_SPELL_BASS {
        return Ok(None);
    }
    if !keys.contains_key(text) {
        return Err(HarmonyError::table(
            table,
            format!("{}: spell_bass '{}' is not a key", context, text),
        ));
    }
    Ok(Some(text.to_string()))
}

fn parse_nokey_chords(
    text: &str,
    keys: &BTreeMap<String, KeyDefinition>,
) -> Result<HashMap<ChordKey, NoKeyChordEntry>> {
    let table = NOKEY_CHORDS_FILE;
    let raw: BTreeMap<String, RawNoKeyChord> = parse_yaml(table, text)?;
    let mut chords = HashMap::with_capacity(raw.len());
    for (key_text, entry) in raw {
        let context = format!("entry '{}'", key_text);
        let key = ChordKey::parse_above_bass(&key_text)
            .ok_or_else(|| HarmonyError::table(table, format!("{}: malformed interval set", context)))?;
        let stepwise = entry
            .stepwise
            .chars()
            .map(|c| {
                c.to_digit(10).map(|d| d as i32).ok_or_else(|| {
                    HarmonyError::table(table, format!("{}: bad stepwise '{}'", context, entry.stepwise))
                })
            })
            .collect::<Result<Vec<i32>>>()?;
        if stepwise.len() != key.upper().len() {
            return Err(HarmonyError::table(
                table,
                format!("{}: stepwise '{}' does not match its intervals", context, entry.stepwise),
            ));
        }
        let root_stepwise = parse_steps(table, &context, &entry.root_stepwise)?.unwrap_or(0);
        chords.insert(
            key,
            NoKeyChordEntry {
                label: entry.label,
                description: entry.description,
                spell_bass: parse_spell_bass(table, &context, &entry.spell_bass, keys)?,
                stepwise,
                root: parse_pitch_digit(table, &context, &entry.root)?,
                root_stepwise,
            },
        );
    }
    Ok(chords)
}

fn parse_nokey_intervals(
    text: &str,
    keys: &BTreeMap<String, KeyDefinition>,
) -> Result<HashMap<u8, NoKeyInterval>> {
    let table = NOKEY_INTERVALS_FILE;
    let raw: BTreeMap<u8, RawNoKeyInterval> = parse_yaml(table, text)?;
    raw.into_iter()
        .map(|(semitones, entry)| {
            let context = format!("entry {}", semitones);
            Ok((
                semitones,
                NoKeyInterval {
                    stepwise: parse_steps(table, &context, &entry.stepwise)?,
                    spell_bass: parse_spell_bass(table, &context, &entry.spell_bass, keys)?,
                    label: entry.label,
                },
            ))
        })
        .collect()
}

fn parse_distance_table<T: DeserializeOwned>(table: &str, text: &str) -> Result<HashMap<Distance, T>> {
    let raw: BTreeMap<String, T> = parse_yaml(table, text)?;
    raw.into_iter()
        .map(|(key, value)| {
            Distance::parse(&key)
                .map(|distance| (distance, value))
                .ok_or_else(|| HarmonyError::table(table, format!("malformed distance '{}'", key)))
        })
        .collect()
}

impl Tables {
    /// The tables compiled into this build, parsed on first use.
    ///
    /// # Errors
    /// Only if the embedded data is invalid; the result is cached either way
    /// after the first success.
    pub fn builtin() -> Result<&'static Tables> {
        BUILTIN.get_or_try_init(|| Tables::load(embedded))
    }

    /// Load tables from a directory. Files missing from the directory fall
    /// back to the embedded copy.
    ///
    /// # Errors
    /// [`HarmonyError::Io`] if a file exists but cannot be read, or any parse
    /// or validation error from its contents.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Tables> {
        let dir = dir.as_ref();
        Tables::load(|name| {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!("table {} loaded from {}", name, path.display());
                    Ok(text)
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => embedded(name),
                Err(source) => Err(HarmonyError::Io { path, source }),
            }
        })
    }

    /// Parse and cross-check every table, reading each file through `read`.
    pub fn load<F>(read: F) -> Result<Tables>
    where
        F: Fn(&str) -> Result<String>,
    {
        let keys_file: KeysFile = parse_yaml(KEYS_FILE, &read(KEYS_FILE)?)?;
        let keys = keys_file
            .keys
            .into_iter()
            .map(|(id, raw)| Ok((id.clone(), parse_key(&id, raw)?)))
            .collect::<Result<BTreeMap<String, KeyDefinition>>>()?;

        for (spec, id) in &keys_file.signature_keys {
            Signature::parse(spec)
                .map_err(|e| HarmonyError::table(KEYS_FILE, format!("signature_keys: {}", e)))?;
            if !keys.contains_key(id) {
                return Err(HarmonyError::table(
                    KEYS_FILE,
                    format!("signature_keys: '{}' is not a key", id),
                ));
            }
        }
        if let Some(bad) = keys_file.key_wheel.iter().find(|id| !keys.contains_key(*id)) {
            return Err(HarmonyError::table(
                KEYS_FILE,
                format!("key_wheel: '{}' is not a key", bad),
            ));
        }
        let note_names = parse_twelve(KEYS_FILE, "note_names", &keys_file.note_names)?;

        let highlight: HighlightFile = parse_yaml(HIGHLIGHT_FILE, &read(HIGHLIGHT_FILE)?)?;

        let tables = Tables {
            major_chords: parse_chord_table(MAJOR_CHORDS_FILE, &read(MAJOR_CHORDS_FILE)?)?,
            minor_chords: parse_chord_table(MINOR_CHORDS_FILE, &read(MINOR_CHORDS_FILE)?)?,
            nokey_chords: parse_nokey_chords(&read(NOKEY_CHORDS_FILE)?, &keys)?,
            nokey_intervals: parse_nokey_intervals(&read(NOKEY_INTERVALS_FILE)?, &keys)?,
            intervals: parse_distance_table(INTERVALS_FILE, &read(INTERVALS_FILE)?)?,
            major_degrees: parse_distance_table(MAJOR_DEGREES_FILE, &read(MAJOR_DEGREES_FILE)?)?,
            minor_degrees: parse_distance_table(MINOR_DEGREES_FILE, &read(MINOR_DEGREES_FILE)?)?,
            colors: highlight.colors,
            signature_keys: keys_file.signature_keys.into_iter().collect(),
            key_wheel: keys_file.key_wheel,
            note_names,
            keys,
        };

        debug!(
            "loaded {} keys, {} major / {} minor / {} no-key chords, {} intervals",
            tables.keys.len(),
            tables.major_chords.len(),
            tables.minor_chords.len(),
            tables.nokey_chords.len(),
            tables.intervals.len()
        );
        Ok(tables)
    }

    /// Every supported key identifier, in sorted order
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Look up a key context
    pub fn key(&self, id: &str) -> Result<KeyContext<'_>> {
        KeyContext::new(self, id)
    }

    pub fn key_summaries(&self) -> Vec<KeySummary> {
        self.keys
            .values()
            .map(|key| KeyContext::from_definition(self, key).summary())
            .collect()
    }

    pub(crate) fn key_definition(&self, id: &str) -> Option<&KeyDefinition> {
        self.keys.get(id)
    }

    pub(crate) fn key_for_signature(&self, signature: &Signature) -> Option<&str> {
        self.signature_keys
            .get(&signature.to_string())
            .map(String::as_str)
    }

    /// Default spelling of a pitch class in the key `id`
    pub(crate) fn spelling_in(&self, id: &str, pitch_class: u8) -> Option<Spelling> {
        self.keys
            .get(id)
            .map(|key| key.spelling[usize::from(pitch_class % 12)])
    }

    pub fn key_wheel(&self) -> &[String] {
        &self.key_wheel
    }

    /// Chromatic spelling used when nothing else applies
    pub fn note_name(&self, pitch_class: u8) -> Spelling {
        self.note_names[usize::from(pitch_class % 12)]
    }

    /// Roman-numeral table entry for a major or minor key
    pub fn keyed_chord(&self, mode: Mode, key: &ChordKey) -> Option<&ChordEntry> {
        let table = match mode {
            Mode::Minor => &self.minor_chords,
            _ => &self.major_chords,
        };
        let entry = table.get(key);
        trace!("chord lookup {:?} {} -> {}", mode, key, if entry.is_some() { "hit" } else { "miss" });
        entry
    }

    pub fn nokey_chord(&self, key: &ChordKey) -> Option<&NoKeyChordEntry> {
        let entry = self.nokey_chords.get(key);
        trace!("no-key chord lookup {} -> {}", key, if entry.is_some() { "hit" } else { "miss" });
        entry
    }

    pub fn nokey_interval(&self, semitones: i32) -> Option<&NoKeyInterval> {
        u8::try_from(semitones)
            .ok()
            .and_then(|s| self.nokey_intervals.get(&s))
    }

    pub fn interval_name(&self, distance: Distance) -> Option<&str> {
        let name = self.intervals.get(&distance).map(String::as_str);
        trace!("interval lookup {} -> {:?}", distance, name);
        name
    }

    pub fn degree(&self, mode: Mode, distance: Distance) -> Option<&Degree> {
        match mode {
            Mode::Minor => self.minor_degrees.get(&distance),
            _ => self.major_degrees.get(&distance),
        }
    }

    pub fn colors(&self) -> &HighlightColors {
        &self.colors
    }
}
