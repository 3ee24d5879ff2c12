//! Walkthrough: load a fixture source, iterate a gallery field, read
//! sub-fields mid-pass, then rebind the same iterator to another field.
//!
//! Run with `cargo run --example gallery` (set `RUST_LOG=debug` to watch
//! the pass lifecycle).

use anyhow::Result;
use repeater_rows::prelude::*;

const MANIFEST: &str = r#"
current = "42"

[[records."42".gallery]]
image = "sunrise.jpg"
caption = { raw = "<em>Sunrise</em>", formatted = "Sunrise" }

[[records."42".gallery]]
image = "harbor.jpg"
caption = { raw = "<em>Harbor</em>", formatted = "Harbor" }

[[records."42".gallery]]
image = "dunes.jpg"
caption = { raw = "<em>Dunes</em>", formatted = "Dunes" }

[[records."42".downloads]]
file = "brochure.pdf"
size_kb = 812
"#;

fn main() -> Result<()> {
    env_logger::init();

    let source = MemorySource::from_toml_str(MANIFEST)?;

    // The for-loop form: each item is (index, materialized row).
    println!("gallery on the current record:");
    for (i, row) in Rows::over(&source, "gallery") {
        let image = row.get("image").and_then(Value::as_str).unwrap_or("?");
        let caption = row.get("caption").and_then(Value::as_str).unwrap_or("");
        println!("  {i}: {image} ({caption})");
    }

    // The manual protocol, reading single sub-fields through the handle
    // instead of materializing whole rows.
    println!("raw captions via sub_field:");
    let mut rows = Rows::new(
        &source,
        Binding::builder()
            .field("gallery")
            .record("42")
            .format(false)
            .build(),
    );
    while rows.valid() {
        if let Some(caption) = sub_field(&source, rows.cursor(), "caption", false) {
            println!("  {}: {:?}", rows.key(), caption);
        }
        rows.step();
    }

    // Same iterator object, different field.
    rows.rebind(Binding::builder().field("downloads").record("42").build());
    println!("downloads:");
    for (i, row) in rows {
        println!(
            "  {i}: {} ({} KB)",
            row.get("file").and_then(Value::as_str).unwrap_or("?"),
            row.get("size_kb").and_then(Value::as_i64).unwrap_or(0),
        );
    }

    Ok(())
}
