use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

fn hash_file(path: &Path) -> String {
    let content = fs::read(path).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

fn main() {
    // Re-run build script if hashed assets change
    println!("cargo:rerun-if-changed=static/js/quiz.js");
    println!("cargo:rerun-if-changed=static/css/styles.css");
    println!("cargo:rerun-if-changed=templates/");

    // Hash static assets for cache busting
    let js_hash = hash_file(Path::new("static/js/quiz.js"));
    let css_hash = hash_file(Path::new("static/css/styles.css"));

    // Write generated code to OUT_DIR
    let out_dir = std::env::var("OUT_DIR").unwrap();
    fs::write(
        Path::new(&out_dir).join("asset_hashes.rs"),
        format!(
            r#"/// Hash of quiz.js for cache busting
pub const QUIZ_JS_HASH: &str = "{}";
/// Hash of styles.css for cache busting
pub const STYLES_CSS_HASH: &str = "{}";"#,
            js_hash, css_hash
        ),
    )
    .unwrap();
}
