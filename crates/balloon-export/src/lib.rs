//! Export for balloon
//!
//! Bubbles leave the engine as pixels ([`PngExporter`]) or as data
//! ([`JsonExporter`] for fit metadata and recorded draw commands).

use std::fs;
use std::path::Path;

use balloon_core::{
    error::{ExportError, Result},
    traits::{Exporter, Surface},
    types::RenderOutput,
};

pub mod json;
pub mod png;

pub use json::JsonExporter;
pub use png::{encode_bitmap_to_png, PngExporter};

/// Writes the current pixels of `surface` to `path` as PNG
pub fn save_surface<S: Surface + ?Sized>(surface: &S, path: impl AsRef<Path>) -> Result<()> {
    let bitmap = surface.snapshot()?;
    save_output(&PngExporter::new(), &RenderOutput::Bitmap(bitmap), path)
}

/// Encodes `output` with `exporter` and writes the bytes to `path`
pub fn save_output(
    exporter: &dyn Exporter,
    output: &RenderOutput,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = exporter.export(output)?;
    fs::write(path, &bytes)
        .map_err(|e| ExportError::WriteFailed(format!("{}: {e}", path.display())))?;
    log::info!(
        "wrote {} bytes of {} to {}",
        bytes.len(),
        exporter.name(),
        path.display()
    );
    Ok(())
}
