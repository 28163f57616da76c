//! Family and weight lookup over loaded faces

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use balloon_core::{
    error::{FontLoadError, Result},
    traits::{FontProvider, FontRef, TextMeasurer},
    FontSpec, TextExtents,
};

use crate::Font;

/// Faces registered under a family name and a bold flag
///
/// Lookup is forgiving: an exact match wins, then the same family in the
/// other weight, then the first face ever registered. Only an empty book
/// fails with [`FontLoadError::NotFound`].
#[derive(Default)]
pub struct FontBook {
    faces: HashMap<(String, bool), Arc<Font>>,
    /// Registration order, so the fallback face is stable
    order: Vec<(String, bool)>,
    /// Files already parsed, keyed by canonical path
    path_cache: HashMap<PathBuf, Arc<Font>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `font` under `family` and weight, replacing any previous face
    pub fn register(&mut self, family: impl Into<String>, bold: bool, font: Arc<Font>) {
        let family: String = family.into();
        let key = (normalize(&family), bold);
        if self.faces.insert(key.clone(), font).is_none() {
            self.order.push(key);
        }
    }

    /// Loads a font file and registers it
    ///
    /// The same file registered under several names is parsed once.
    pub fn load_file(
        &mut self,
        family: impl Into<String>,
        bold: bool,
        path: impl AsRef<Path>,
    ) -> Result<Arc<Font>> {
        let path = path.as_ref();
        let cache_key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let font = match self.path_cache.get(&cache_key) {
            Some(font) => font.clone(),
            None => {
                let font = Arc::new(Font::from_file(path)?);
                log::debug!("loaded font {}", path.display());
                self.path_cache.insert(cache_key, font.clone());
                font
            },
        };
        self.register(family, bold, font.clone());
        Ok(font)
    }

    /// Best face for `spec`
    pub fn resolve(&self, spec: &FontSpec) -> Result<Arc<Font>> {
        let family = normalize(&spec.family);
        if let Some(font) = self.faces.get(&(family.clone(), spec.bold)) {
            return Ok(font.clone());
        }
        if let Some(font) = self.faces.get(&(family, !spec.bold)) {
            log::debug!(
                "no {} face for '{}', using the other weight",
                weight_name(spec.bold),
                spec.family
            );
            return Ok(font.clone());
        }
        if let Some(font) = self.order.first().and_then(|key| self.faces.get(key)) {
            log::warn!("font family '{}' not registered, falling back", spec.family);
            return Ok(font.clone());
        }
        Err(FontLoadError::NotFound {
            family: spec.family.clone(),
            bold: spec.bold,
        }
        .into())
    }

    /// Number of registered (family, weight) entries
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl FontProvider for FontBook {
    fn font(&self, spec: &FontSpec) -> Result<Arc<dyn FontRef>> {
        let font: Arc<dyn FontRef> = self.resolve(spec)?;
        Ok(font)
    }
}

impl TextMeasurer for FontBook {
    fn measure_text(&self, text: &str, font: &FontSpec, size: f64) -> Result<TextExtents> {
        self.resolve(font)?.measure(text, size)
    }
}

fn normalize(family: &str) -> String {
    family.trim().to_lowercase()
}

fn weight_name(bold: bool) -> &'static str {
    if bold {
        "bold"
    } else {
        "regular"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::BalloonError;

    #[test]
    fn empty_book_reports_not_found() {
        let book = FontBook::new();
        let err = book.resolve(&FontSpec::new("Sans", true)).err().unwrap();
        assert!(matches!(
            err,
            BalloonError::FontLoad(FontLoadError::NotFound { ref family, bold: true })
                if family == "Sans"
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn missing_file_leaves_the_book_untouched() {
        let mut book = FontBook::new();
        assert!(book.load_file("Sans", false, "/no/such/font.ttf").is_err());
        assert_eq!(book.len(), 0);
    }

    #[test]
    fn family_names_ignore_case_and_padding() {
        assert_eq!(normalize("  DejaVu Sans "), "dejavu sans");
    }
}
