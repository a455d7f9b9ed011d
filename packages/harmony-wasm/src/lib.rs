use serde::Serialize;
use wasm_bindgen::prelude::*;

use harmony::chord::midi_note;
use harmony::{
    Analyzer, Chord, HarmonyError, HighlightColor, HighlightMode, Highlighter, KeyContext,
    Tables,
};

#[derive(Serialize)]
struct AnalysisError {
    message: String,
    kind: String,
}

#[derive(Serialize)]
struct HighlightOutput {
    color: Option<HighlightColor>,
    css: Option<String>,
}

fn to_js_error(e: HarmonyError) -> JsValue {
    let error = AnalysisError {
        message: e.to_string(),
        kind: e.kind().to_string(),
    };
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn midi_notes(values: &[i32]) -> Result<Vec<u8>, HarmonyError> {
    values.iter().map(|v| midi_note(i64::from(*v))).collect()
}

fn key_context(key: &str) -> Result<KeyContext<'static>, HarmonyError> {
    KeyContext::new(Tables::builtin()?, key)
}

fn highlight_note(
    key: &str,
    note: i32,
    notes: &[i32],
    modes: &[HighlightMode],
) -> Result<HighlightOutput, HarmonyError> {
    let key = key_context(key)?;
    let note = midi_note(i64::from(note))?;
    let chord = Chord::new(&midi_notes(notes)?)?;
    let color = Highlighter::new(key, modes).highlight(note, &chord)?;
    Ok(HighlightOutput {
        color,
        css: color.map(|c| c.hsl(key.tables().colors()).css()),
    })
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_ok() {
        log::info!("harmony WASM module initialized");
    }
}

/// Analyze MIDI notes in a key; returns the analysis result as JSON
#[wasm_bindgen]
pub fn analyze(key: &str, notes: Vec<i32>) -> Result<String, JsValue> {
    let result = midi_notes(&notes)
        .and_then(|notes| Analyzer::new(key_context(key)?).analyze(&notes))
        .map_err(to_js_error)?;
    to_json(&result)
}

/// Analyze MIDI notes in a key; returns the analysis result as a JS object
#[wasm_bindgen]
pub fn analyze_value(key: &str, notes: Vec<i32>) -> Result<JsValue, JsValue> {
    let result = midi_notes(&notes)
        .and_then(|notes| Analyzer::new(key_context(key)?).analyze(&notes))
        .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&result).map_err(JsValue::from)
}

/// Spell MIDI notes in a key, in input order, as a JSON array
#[wasm_bindgen]
pub fn spell(key: &str, notes: Vec<i32>) -> Result<String, JsValue> {
    let spelled = midi_notes(&notes)
        .and_then(|notes| Analyzer::new(key_context(key)?).spell(&notes))
        .map_err(to_js_error)?;
    to_json(&spelled)
}

/// Highlight color of one note within the sounding notes.
///
/// `modes` are mode names ("root", "tritone", "doubling", "octaves"),
/// highest priority first. Unknown names are ignored.
#[wasm_bindgen]
pub fn highlight(key: &str, note: i32, notes: Vec<i32>, modes: Vec<String>) -> Result<String, JsValue> {
    let modes: Vec<HighlightMode> = modes.iter().filter_map(|m| HighlightMode::parse(m)).collect();
    let output = highlight_note(key, note, &notes, &modes).map_err(to_js_error)?;
    to_json(&output)
}

/// Every supported key as a JSON array of summaries
#[wasm_bindgen]
pub fn keys() -> Result<String, JsValue> {
    let tables = Tables::builtin().map_err(to_js_error)?;
    to_json(&tables.key_summaries())
}
