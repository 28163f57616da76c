//! JSON export format
//!
//! Fit metadata and recorded draw commands serialize straight through
//! serde; the shapes are the same ones the Rust types derive.

use balloon_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::RenderOutput,
};

/// JSON exporter for metadata and draw commands
///
/// ```ignore
/// use balloon_export::JsonExporter;
///
/// let exporter = JsonExporter::with_pretty_print();
/// let json = exporter.export(&RenderOutput::Metadata(meta))?;
/// println!("{}", String::from_utf8_lossy(&json));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty_print() -> Self {
        Self { pretty: true }
    }

    fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        Ok(bytes)
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, output: &RenderOutput) -> Result<Vec<u8>> {
        match output {
            RenderOutput::Metadata(meta) => self.encode(meta),
            RenderOutput::Commands(ops) => self.encode(ops.as_slice()),
            RenderOutput::Bitmap(_) => Err(ExportError::UnsupportedFormat(
                "JSON exporter does not encode bitmaps".into(),
            )
            .into()),
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}
