//! Metadata command
//!
//! Print the declarative package fields

use anyhow::{Context, Result};
use extbuild::{BuildConfig, PackageMetadata};
use std::path::Path;

/// Print package metadata as text or JSON
pub(crate) fn run(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = BuildConfig::load_with_options(config_path)?;

    if json {
        let output = serde_json::to_string_pretty(&config.metadata)
            .context("Failed to serialize metadata")?;
        println!("{output}");
    } else {
        print!("{}", format_text(&config.metadata));
    }

    Ok(())
}

fn format_text(metadata: &PackageMetadata) -> String {
    format!(
        "name: {}\nversion: {}\nauthor: {}\ndescription: {}\npy_modules: {}\n",
        metadata.name,
        metadata.version,
        metadata.author,
        metadata.description,
        metadata.py_modules.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_all_fields() {
        let text = format_text(&PackageMetadata::default());
        assert!(text.contains("name: rgb\n"));
        assert!(text.contains("version: 0.2.0\n"));
        assert!(text.contains("author: LNP/BP Standards Association\n"));
        assert!(text.contains("py_modules: rgb\n"));
    }
}
