//! Integration tests for the harmony engine
//!
//! Tests the full path from key and MIDI notes to labels, spellings and
//! highlight colors.

use harmony::{
    analyze, convert_symbols, display_accidentals, parse_label, spell, Accidental, Analyzer,
    Chord, Harmony, HarmonyError, HighlightColor, Highlighter, KeyContext, Settings, Tables,
};

fn names(key: &str, notes: &[u8]) -> Vec<String> {
    spell(key, notes)
        .unwrap()
        .iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn test_minor_tonic() {
    let result = analyze("iD_", &[62, 65, 69]).expect("D minor triad should analyze");
    assert_eq!(result.label, "i");
    assert_eq!(result.root, vec![62]);
    assert_eq!(names("iD_", &[62, 65, 69]), ["D4", "F4", "A4"]);
}

#[test]
fn test_dominant_seventh() {
    let result = analyze("jC_", &[67, 71, 74, 77]).unwrap();
    assert!(result.label.contains('V'), "label was {}", result.label);
    assert_eq!(result.root, vec![67]);
}

#[test]
fn test_no_key_triad_substitutes_root() {
    let result = analyze("h", &[60, 64, 67]).unwrap();
    assert_eq!(result.label, "C");
    assert!(!result.label.contains('&'));
}

#[test]
fn test_cluster_is_not_an_error() {
    let result = analyze("jC_", &[60, 61, 62]).unwrap();
    assert!(!result.harmony.is_classified());
    assert!(result.root.is_empty());
}

#[test]
fn test_extreme_notes() {
    assert!(analyze("jC_", &[0]).is_ok());
    assert!(analyze("jC_", &[127]).is_ok());
    assert!(analyze("h", &[0, 127]).is_ok());
}

#[test]
fn test_errors() {
    assert!(matches!(analyze("jH_", &[60]), Err(HarmonyError::InvalidKey(_))));
    assert!(matches!(analyze("jC_", &[]), Err(HarmonyError::EmptyChord)));
    assert!(matches!(analyze("jC_", &[128]), Err(HarmonyError::InvalidNote(128))));
    assert!(matches!(Chord::from_values(&[-1]), Err(HarmonyError::InvalidNote(-1))));
}

#[test]
fn test_every_key_analyzes_its_tonic() {
    let tables = Tables::builtin().unwrap();
    for id in tables.key_ids() {
        let key = KeyContext::new(tables, id).unwrap();
        let tonic = 60 + key.tonic_pitch_class();
        let result = Analyzer::new(key).analyze(&[tonic]).unwrap();
        if key.is_no_key_mode() {
            assert_eq!(result.label, "", "key {}", id);
        } else {
            assert_eq!(result.label, "1", "key {}", id);
        }
        assert_eq!(result.spelling[0].spelling, key.tonic(), "key {}", id);
    }
}

#[test]
fn test_key_spelling_follows_signature() {
    assert_eq!(names("jF#", &[66, 70, 73]), ["F#4", "A#4", "C#5"]);
    assert_eq!(names("jEb", &[63, 67, 70]), ["Eb4", "G4", "Bb4"]);
}

#[test]
fn test_signature_and_wheel() {
    let tables = Tables::builtin().unwrap();
    let key = KeyContext::from_signature(tables, "bb").unwrap();
    assert_eq!(key.id(), "jBb");
    assert_eq!(key.signature_spec(), "bb");
    assert!(matches!(
        KeyContext::from_signature(tables, "#b"),
        Err(HarmonyError::InvalidSignature(_))
    ));
    let c = tables.key("jC_").unwrap();
    assert_eq!(c.rotate(2).unwrap().id(), "jG_");
}

#[test]
fn test_accidentals_for_display() {
    let tables = Tables::builtin().unwrap();
    let key = tables.key("jG_").unwrap();
    let spelled = Analyzer::new(key).spell(&[60, 63, 65, 67]).unwrap();
    assert_eq!(
        display_accidentals(&key, &spelled),
        vec![None, Some(Accidental::Sharp), Some(Accidental::Natural), None]
    );
}

#[test]
fn test_highlight_with_settings() {
    let tables = Tables::builtin().unwrap();
    let key = tables.key("jC_").unwrap();
    let settings =
        Settings::from_yaml_str("highlight:\n  mode: { tritone: true }\n").unwrap();
    let highlighter = Highlighter::new(key, &settings.highlight.active_modes());
    let chord = Chord::new(&[67, 71, 74, 77]).unwrap();
    assert_eq!(
        highlighter.highlight_chord(&chord),
        vec![
            Some(HighlightColor::Root),
            Some(HighlightColor::Tritone),
            None,
            Some(HighlightColor::Tritone),
        ]
    );
    assert!(matches!(
        highlighter.highlight(60, &chord),
        Err(HarmonyError::NoteNotInChord { note: 60, .. })
    ));
}

#[test]
fn test_label_rendering() {
    let result = analyze("iA_", &[62, 65, 69, 71]).unwrap();
    let segments = parse_label(&convert_symbols(&result.label));
    assert_eq!(segments[0].text, "ii⌀");
    assert!(!segments[0].figured);
    assert_eq!(segments[1].text, "z5");
    assert!(segments[1].figured);
}

#[test]
fn test_json_shape() {
    let result = analyze("jC_", &[60, 64, 67]).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["label"], "I");
    assert_eq!(json["root"], serde_json::json!([60]));
    assert_eq!(json["harmony"]["kind"], "chord");
    assert_eq!(json["spelling"].as_array().map(|a| a.len()), Some(3));

    let note = serde_json::to_value(analyze("jC_", &[64]).unwrap().harmony).unwrap();
    assert_eq!(note["kind"], "note");
    assert_eq!(note["solfege"], "Mi");
}

#[test]
fn test_tables_from_missing_dir_fall_back() {
    let tables = Tables::from_dir("/nonexistent/harmony-tables").unwrap();
    let key = tables.key("jC_").unwrap();
    let result = Analyzer::new(key).analyze(&[60, 64, 67]).unwrap();
    assert!(matches!(result.harmony, Harmony::Chord { .. }));
    assert_eq!(result.label, "I");
}
