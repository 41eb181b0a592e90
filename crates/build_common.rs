// Shared build script helper: turns a crate's README.md into its crate-level rustdoc.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Copy `README.md` into `OUT_DIR/README_GENERATED.md`, rewriting links for rustdoc.
///
/// - `](src/foo.rs)` becomes `](foo)` so intra-doc module links resolve.
/// - `](../../README.md` becomes the workspace repository URL.
///
/// A crate without a README gets an empty generated file so the
/// `include_str!` in `lib.rs` always compiles.
fn readme_to_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let content = fs::read_to_string(Path::new(crate_dir).join("README.md")).unwrap_or_default();

    let mut doc = content.replace("](src/", "](").replace(".rs)", ")");
    if let Some(url) = workspace_repository(crate_dir) {
        doc = doc.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").expect("cargo always sets OUT_DIR for build scripts");
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), doc)
        .expect("OUT_DIR is writable during the build");
}

/// Read `repository = "..."` from the workspace manifest two levels up.
fn workspace_repository(crate_dir: &str) -> Option<String> {
    let manifest = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        let value = line.strip_prefix("repository")?.trim_start().strip_prefix('=')?;
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
