//! Saving and loading graph documents as JSON files.

use std::path::Path;

use anyhow::Context;
use library::GraphDocument;

pub fn save_document(path: &Path, document: &GraphDocument) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document).context("serializing graph document")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved workflow to {}", path.display());
    Ok(())
}

pub fn load_document(path: &Path) -> anyhow::Result<GraphDocument> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document = serde_json::from_str(&json).context("parsing graph document")?;
    log::info!("loaded workflow from {}", path.display());
    Ok(document)
}
