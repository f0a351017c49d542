//! Build script for the catalog ETL CLI.
//!
//! Copies the `.env.example` configuration template from the crate root into
//! the user's local data directory, where `config::load_env` looks for the
//! real `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` to `<local data dir>/spotetl/.env.example`.
///
/// A missing template only produces a cargo warning; directory creation and
/// copy failures fail the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let template = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join(".env.example");
    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    let target_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotetl");
    fs::create_dir_all(&target_dir)?;
    fs::copy(&template, target_dir.join(".env.example"))?;

    Ok(())
}
