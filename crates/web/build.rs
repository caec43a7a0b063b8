//! Build script for the web crate.
//!
//! Fingerprints the stylesheet so templates can link an immutable,
//! cache-busted URL.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    fingerprint_stylesheet();
}

/// Hash `static/css/main.css` and place a copy named after the hash under
/// `static/css/derived/`.
///
/// Exposes the short hash as `CSS_HASH` for `env!("CSS_HASH")` in the
/// template filters.
fn fingerprint_stylesheet() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let source = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", source.display());

    let Ok(bytes) = fs::read(&source) else {
        // Tolerate a missing stylesheet so `cargo check` works on a bare tree.
        println!("cargo:warning=static/css/main.css is missing; CSS_HASH left empty");
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    let digest = format!("{:x}", Sha256::digest(&bytes));
    let short = &digest[..8];
    println!("cargo:rustc-env=CSS_HASH={short}");

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create static/css/derived");
    let derived = derived_dir.join(format!("main.{short}.css"));
    fs::copy(&source, &derived).expect("Failed to copy hashed stylesheet");
}
