use super::*;
use crate::chord::Chord;
use crate::key::KeyContext;
use crate::label::{convert_symbols, parse_label};
use crate::settings::AnalysisSettings;
use crate::tables::Tables;

fn analyzer(key_id: &str) -> Analyzer<'static> {
    Analyzer::new(KeyContext::new(Tables::builtin().unwrap(), key_id).unwrap())
}

fn chord(notes: &[u8]) -> Chord {
    Chord::new(notes).unwrap()
}

// ============================================================================
// Chords (3+ notes)
// ============================================================================

#[test]
fn test_minor_tonic_triad() {
    let result = analyzer("iD_").analyze(&[62, 65, 69]).unwrap();
    assert_eq!(result.label, "i");
    assert_eq!(result.root, vec![62]);
}

#[test]
fn test_dominant_seventh_root_position() {
    let result = analyzer("jC_").analyze(&[67, 71, 74, 77]).unwrap();
    assert_eq!(result.label, "V{u}");
    assert!(result.label.starts_with('V'));
    assert_eq!(result.root, vec![67]);

    // the figure in braces is the root-position seventh
    let segments = parse_label(&convert_symbols(&result.label));
    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].text.as_str(), segments[0].figured), ("V", false));
    assert_eq!((segments[1].text.as_str(), segments[1].figured), ("u", true));
}

#[test]
fn test_no_key_major_triad() {
    let result = analyzer("h").analyze(&[60, 64, 67]).unwrap();
    assert_eq!(result.label, "C");
    assert_eq!(result.root, vec![60]);
    match result.harmony {
        Harmony::Chord { description, .. } => assert_eq!(description.as_deref(), Some("C major")),
        other => panic!("expected a chord, got {:?}", other),
    }
}

#[test]
fn test_cluster_is_unclassified() {
    let result = analyzer("jC_").analyze(&[60, 61, 62]).unwrap();
    assert_eq!(result.harmony, Harmony::Unclassified);
    assert_eq!(result.label, "");
    assert!(result.root.is_empty());
    assert_eq!(result.spelling.len(), 3);
}

#[test]
fn test_no_key_inversion_names_root_and_bass() {
    let result = analyzer("h").analyze(&[64, 67, 72]).unwrap();
    assert_eq!(result.label, "C/E");
    assert_eq!(result.root, vec![72]);
}

#[test]
fn test_no_key_minor_triad() {
    let result = analyzer("h").analyze(&[62, 65, 69]).unwrap();
    assert_eq!(result.label, "D-");
}

#[test]
fn test_doubled_root_returns_every_octave() {
    let a = analyzer("jC_");
    let c = chord(&[48, 60, 64, 67]);
    assert_eq!(a.find_roots(&c), vec![48, 60]);
    assert_eq!(a.find_root(&c, Extreme::Lowest), Some(48));
    assert_eq!(a.find_root(&c, Extreme::Highest), Some(60));
    assert_eq!(a.analyze(&[48, 60, 64, 67]).unwrap().label, "I");
}

#[test]
fn test_neapolitan_sixth() {
    let result = analyzer("jC_").analyze(&[65, 68, 73]).unwrap();
    assert_eq!(result.label, "♭II{z}");
    assert_eq!(result.root, vec![73]);
    let names: Vec<String> = result.spelling.iter().map(|n| n.to_string()).collect();
    assert_eq!(names, ["F4", "Ab4", "Db5"]);
}

#[test]
fn test_minor_table_alt_label() {
    // D F A B in A minor
    match analyzer("iA_").analyze(&[62, 65, 69, 71]).unwrap().harmony {
        Harmony::Chord { label, alt_label, .. } => {
            assert_eq!(label, "ii⌀{z5}");
            assert_eq!(alt_label.as_deref(), Some("iv{dz}"));
        }
        other => panic!("expected a chord, got {:?}", other),
    }
}

#[test]
fn test_major_table_priority() {
    match analyzer("jC_").analyze(&[60, 64, 67]).unwrap().harmony {
        Harmony::Chord { priority, .. } => assert_eq!(priority, Some(1)),
        other => panic!("expected a chord, got {:?}", other),
    }
}

#[test]
fn test_unknown_chord_has_no_root() {
    let a = analyzer("h");
    let c = chord(&[60, 61, 62]);
    assert!(a.find_roots(&c).is_empty());
    assert_eq!(a.find_root(&c, Extreme::Lowest), None);
}

// ============================================================================
// Intervals (2 notes)
// ============================================================================

#[test]
fn test_interval_name() {
    let a = analyzer("jC_");
    assert_eq!(a.interval_name(&chord(&[60, 64])), Some("M3"));
    assert_eq!(a.interval_name(&chord(&[60, 72])), Some("P8"));
    assert_eq!(a.interval_name(&chord(&[60, 64, 67])), None);
}

#[test]
fn test_interval_uses_letter_names() {
    // F# up to Bb is a diminished fourth, not a major third
    let result = analyzer("jC_").analyze(&[66, 70]).unwrap();
    assert_eq!(result.label, "d4");
}

#[test]
fn test_no_key_interval_has_description() {
    match analyzer("h").analyze(&[60, 64]).unwrap().harmony {
        Harmony::Interval { name, description } => {
            assert_eq!(name, "M3");
            assert_eq!(description.as_deref(), Some("major 3rd"));
        }
        other => panic!("expected an interval, got {:?}", other),
    }
}

#[test]
fn test_octave_is_an_interval_not_a_degree() {
    let result = analyzer("jC_").analyze(&[60, 72]).unwrap();
    assert!(matches!(result.harmony, Harmony::Interval { .. }));
    assert_eq!(result.label, "P8");
}

// ============================================================================
// Single notes
// ============================================================================

#[test]
fn test_scale_degree_and_solfege() {
    let a = analyzer("jC_");
    let e = chord(&[64]);
    assert_eq!(a.scale_degree(&e), Some("3"));
    assert_eq!(a.solfege(&e), Some("Mi"));
    let result = a.analyze(&[64]).unwrap();
    assert_eq!(result.label, "3");
    match result.harmony {
        Harmony::Note { name, .. } => assert_eq!(name, "e '"),
        other => panic!("expected a note, got {:?}", other),
    }
}

#[test]
fn test_minor_solfege_is_la_based() {
    let a = analyzer("iA_");
    assert_eq!(a.solfege(&chord(&[57])), Some("La"));
    assert_eq!(a.scale_degree(&chord(&[60])), Some("3"));
    assert_eq!(a.solfege(&chord(&[60])), Some("Do"));
}

#[test]
fn test_degree_below_keynote_folds_up() {
    // C# in D major is the leading tone
    let a = analyzer("jD_");
    assert_eq!(a.scale_degree(&chord(&[61])), Some("7"));
    assert_eq!(a.solfege(&chord(&[61])), Some("Ti"));
}

#[test]
fn test_no_key_single_note_has_no_degree() {
    let result = analyzer("h").analyze(&[60]).unwrap();
    assert_eq!(result.label, "");
    match result.harmony {
        Harmony::Note { name, numeral, solfege } => {
            assert_eq!(name, "c '");
            assert_eq!(numeral, None);
            assert_eq!(solfege, None);
        }
        other => panic!("expected a note, got {:?}", other),
    }
}

// ============================================================================
// Input handling
// ============================================================================

#[test]
fn test_spelling_follows_input_order() {
    let result = analyzer("jC_").analyze(&[67, 60, 64]).unwrap();
    let names: Vec<String> = result.spelling.iter().map(|n| n.to_string()).collect();
    assert_eq!(names, ["G4", "C4", "E4"]);
    assert_eq!(result.label, "I");
}

#[test]
fn test_analysis_is_idempotent() {
    let a = analyzer("iF#");
    let first = a.analyze(&[54, 61, 66, 69]).unwrap();
    let second = a.analyze(&[54, 61, 66, 69]).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_rejects_bad_input() {
    let a = analyzer("jC_");
    assert!(matches!(a.analyze(&[]), Err(crate::HarmonyError::EmptyChord)));
    assert!(matches!(a.analyze(&[60, 200]), Err(crate::HarmonyError::InvalidNote(200))));
}

#[test]
fn test_boundary_notes_do_not_panic() {
    let a = analyzer("jC_");
    assert_eq!(a.analyze(&[0]).unwrap().spelling[0].octave, -1);
    assert_eq!(a.analyze(&[127]).unwrap().spelling[0].octave, 9);
    assert!(a.analyze(&[0, 127]).is_ok());
}

#[test]
fn test_lowest_note_spelled_b_sharp() {
    // C# major spells pitch class 0 as B#
    let a = analyzer("jC#");
    let note = a.analyze(&[0]).unwrap().spelling[0];
    assert_eq!(note.spelling.to_string(), "B#");
    assert_eq!(note.octave, -2);

    let result = a.analyze(&[0, 12]).unwrap();
    let octaves: Vec<i32> = result.spelling.iter().map(|n| n.octave).collect();
    assert_eq!(octaves, vec![-2, -1]);
    assert!(result.spelling.iter().all(|n| n.spelling.to_string() == "B#"));
    assert_eq!(result.label, "P8");
}

// ============================================================================
// Annotations
// ============================================================================

#[test]
fn test_default_annotations() {
    let settings = AnalysisSettings::default();
    let a = analyzer("jC_");
    assert_eq!(a.analyze(&[64]).unwrap().annotations(&settings), vec!["3"]);
    assert_eq!(a.analyze(&[60, 64]).unwrap().annotations(&settings), vec!["M3"]);
    assert_eq!(a.analyze(&[60, 64, 67]).unwrap().annotations(&settings), vec!["I"]);
}

#[test]
fn test_exclusive_annotation_pairs() {
    let mut settings = AnalysisSettings::default();
    settings.mode.solfege = true;
    settings.mode.scientific_pitch = true;
    // scale degrees and solfege both on: neither shows
    let lines = analyzer("jC_").analyze(&[64]).unwrap().annotations(&settings);
    assert_eq!(lines, vec!["E4"]);

    settings.enabled = false;
    assert!(analyzer("jC_").analyze(&[64]).unwrap().annotations(&settings).is_empty());
}
