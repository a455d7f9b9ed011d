use std::env;
use std::process;

use harmony::{
    convert_symbols, display_accidentals, Accidental, Analyzer, Chord, HarmonyError,
    Highlighter, KeyContext, Settings, Tables,
};

const USAGE: &str = "Usage: harmony [--json] [--tables DIR] [--config FILE] <key> <note>...";

struct Options {
    json: bool,
    tables: Option<String>,
    config: Option<String>,
    key: String,
    notes: Vec<i64>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut json = false;
    let mut tables = None;
    let mut config = None;
    let mut positional: Vec<&String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--tables" => {
                tables = Some(iter.next().ok_or("--tables needs a directory")?.clone());
            }
            "--config" => {
                config = Some(iter.next().ok_or("--config needs a file")?.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            _ => positional.push(arg),
        }
    }

    let (key, notes) = positional.split_first().ok_or(USAGE)?;
    if notes.is_empty() {
        return Err(USAGE.to_string());
    }
    let notes = notes
        .iter()
        .map(|n| n.parse::<i64>().map_err(|_| format!("Not a MIDI note: '{}'", n)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Options {
        json,
        tables,
        config,
        key: key.to_string(),
        notes,
    })
}

fn run(options: &Options, tables: &Tables) -> Result<String, HarmonyError> {
    let settings = match &options.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let key = KeyContext::new(tables, &options.key)?;
    let chord = Chord::from_values(&options.notes)?;
    let notes = chord.notes().to_vec();
    let result = Analyzer::new(key).analyze(&notes)?;
    let highlighter = Highlighter::new(key, &settings.highlight.active_modes());
    let colors = highlighter.highlight_chord(&chord);

    if options.json {
        let payload = serde_json::json!({
            "key": key.summary(),
            "analysis": result,
            "annotations": result.annotations(&settings.analysis),
            "highlight": notes
                .iter()
                .zip(&colors)
                .map(|(note, color)| serde_json::json!({
                    "note": note,
                    "color": color,
                    "css": color.map(|c| c.hsl(tables.colors()).css()),
                }))
                .collect::<Vec<_>>(),
        });
        return Ok(payload.to_string());
    }

    let mut out = String::new();
    out.push_str(&format!("Key: {} ({})\n", key.name(), key.id()));
    let accidentals = display_accidentals(&key, &result.spelling);
    let names: Vec<String> = result
        .spelling
        .iter()
        .zip(&accidentals)
        .map(|(note, shown)| match shown {
            Some(Accidental::Natural) if note.spelling.is_natural() => format!("{}(n)", note),
            _ => note.to_string(),
        })
        .collect();
    out.push_str(&format!("Notes: {}\n", names.join(" ")));
    if result.harmony.is_classified() {
        out.push_str(&format!("Label: {}\n", convert_symbols(&result.label)));
    } else {
        out.push_str("Label: (unclassified)\n");
    }
    for line in result.annotations(&settings.analysis) {
        out.push_str(&format!("  {}\n", convert_symbols(&line)));
    }
    if !result.root.is_empty() {
        let roots: Vec<String> = result.root.iter().map(|r| r.to_string()).collect();
        out.push_str(&format!("Root: {}\n", roots.join(" ")));
    }
    for (note, color) in notes.iter().zip(&colors) {
        if let Some(color) = color {
            out.push_str(&format!(
                "Highlight {}: {:?} {}\n",
                note,
                color,
                color.hsl(tables.colors()).css()
            ));
        }
    }
    Ok(out.trim_end().to_string())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    // Load tables
    let loaded;
    let tables = match &options.tables {
        Some(dir) => match Tables::from_dir(dir) {
            Ok(t) => {
                loaded = t;
                &loaded
            }
            Err(e) => {
                eprintln!("Error loading tables from '{}': {}", dir, e);
                process::exit(1);
            }
        },
        None => match Tables::builtin() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading tables: {}", e);
                process::exit(1);
            }
        },
    };

    match run(&options, tables) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Analysis error: {}", e);
            process::exit(1);
        }
    }
}
