use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies the workspace config.toml next to the backend binary so that
/// `shared::config::load_config` finds it at runtime.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let source = manifest_dir.join("../../config.toml");
    if !source.exists() {
        println!("cargo:warning=config.toml not found, the embedded default config will be used");
        return;
    }

    // OUT_DIR looks like target/<profile>/build/backend-<hash>/out
    let out_dir = env::var("OUT_DIR").unwrap_or_default();
    let profile = env::var("PROFILE").unwrap_or_default();
    let Some(target_dir) = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
    else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    if let Err(e) = fs::copy(&source, target_dir.join("config.toml")) {
        println!("cargo:warning=Failed to copy config.toml: {}", e);
    }
}
