use formwork_core::{Error, Result};
use std::path::PathBuf;

/// Synthesize the storage application and emit its template
pub fn execute(output: Option<PathBuf>, compact: bool) -> Result<()> {
    let stack = crate::topology::storage_app()?;
    let template = stack.synthesize()?;
    let json = if compact {
        template.to_json_compact()?
    } else {
        template.to_json()?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .map_err(|e| Error::file_system(&path, "write", e))?;
            tracing::info!(path = %path.display(), "wrote deployment template");
        }
        None => println!("{json}"),
    }

    Ok(())
}
