// Export every bridge function from the Windows DLL.
//
// MSVC needs a module-definition file naming each export. It is generated
// from the `pub extern "C" fn` items in the bridge so the list cannot drift.
use std::env;
use std::fs;
use std::path::PathBuf;

const BRIDGE_SOURCE: &str = "src/bridge/mod.rs";
const LIBRARY_NAME: &str = "shooter_core";

fn main() {
    println!("cargo:rerun-if-changed={}", BRIDGE_SOURCE);

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    let target = env::var("TARGET").unwrap_or_default();

    if target.contains("gnu") {
        println!("cargo:rustc-cdylib-link-arg=-Wl,--export-all-symbols");
    } else if target.contains("msvc") {
        let source = fs::read_to_string(BRIDGE_SOURCE).expect("bridge source is readable");
        let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR");
        let def_path = PathBuf::from(out_dir).join(format!("{}.def", LIBRARY_NAME));
        fs::write(&def_path, module_definition(&source)).expect("OUT_DIR is writable");
        println!("cargo:rustc-cdylib-link-arg=/DEF:{}", def_path.display());
    }
}

fn module_definition(source: &str) -> String {
    let mut def = format!("LIBRARY {}\nEXPORTS\n", LIBRARY_NAME);
    for name in exported_functions(source) {
        def.push_str("    ");
        def.push_str(name);
        def.push('\n');
    }
    def
}

fn exported_functions(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("pub extern \"C\" fn "))
        .filter_map(|rest| rest.split('(').next())
        .map(str::trim)
}
