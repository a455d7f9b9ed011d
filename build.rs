use std::env;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("tables.rs");

    let mut code = String::new();
    code.push_str("/// Embedded analysis tables: (file name, YAML source)\n");
    code.push_str("pub static TABLE_SOURCES: &[(&str, &str)] = &[\n");

    let data_dir = Path::new("data");

    if data_dir.exists() {
        let mut entries: Vec<_> = WalkDir::new(data_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "yaml"))
            .collect();
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        for entry in entries {
            let path = entry.path();
            let relative_path = path.strip_prefix(data_dir).unwrap();
            let name = relative_path.to_string_lossy().replace('\\', "/");

            if let Ok(content) = fs::read_to_string(path) {
                // Debug formatting yields a valid, fully escaped string literal
                code.push_str(&format!("    ({:?}, {:?}),\n", name, content));
            }
        }
    }

    code.push_str("];\n");

    fs::write(&dest_path, code).unwrap();

    println!("cargo:rerun-if-changed=data");
}
