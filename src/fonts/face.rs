//! Loaded faces and glyph coverage checks.

use super::encoding;
use crate::error::{Error, Result};
use ab_glyph::{Font, FontArc};
use std::path::Path;
use std::sync::Arc;

/// Metrics of an embedded TrueType face, in 1/1000 em (PDF glyph space).
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`
    pub widths: Vec<f32>,
}

/// First character code described by [`FaceMetrics::widths`].
pub const FIRST_CHAR: u8 = 32;
/// Last character code described by [`FaceMetrics::widths`].
pub const LAST_CHAR: u8 = 255;

/// A TrueType face loaded from disk.
pub struct TrueTypeFace {
    base_font: String,
    data: Arc<Vec<u8>>,
    font: FontArc,
    metrics: FaceMetrics,
}

impl std::fmt::Debug for TrueTypeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFace")
            .field("base_font", &self.base_font)
            .field("size", &self.data.len())
            .finish()
    }
}

impl TrueTypeFace {
    /// Load a face from a font file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Embedded".to_string());
        Self::from_bytes(&stem, data)
    }

    /// Load a face from memory; `name` becomes the PDF BaseFont.
    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data.clone())
            .map_err(|e| Error::Font(format!("{}: {}", name, e)))?;
        let metrics = measure(&font);
        let base_font: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        Ok(Self {
            base_font: if base_font.is_empty() {
                "Embedded".to_string()
            } else {
                base_font
            },
            data: Arc::new(data),
            font,
            metrics,
        })
    }

    /// PDF BaseFont name.
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Raw font program.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph-space metrics.
    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    /// Check if the face has a glyph for `c`.
    pub fn has_glyph(&self, c: char) -> bool {
        self.font.glyph_id(c).0 != 0
    }
}

fn measure(font: &FontArc) -> FaceMetrics {
    let upem = font.units_per_em().unwrap_or(1000.0);
    let scale = 1000.0 / upem;
    let widths = (FIRST_CHAR..=LAST_CHAR)
        .map(|code| match encoding::decode_byte(code) {
            Some(c) => (font.h_advance_unscaled(font.glyph_id(c)) * scale).round(),
            None => 0.0,
        })
        .collect();
    let ascent = font.ascent_unscaled() * scale;
    let cap_height = font
        .outline(font.glyph_id('H'))
        .map(|o| o.bounds.height().abs() * scale)
        .unwrap_or(ascent * 0.7);
    FaceMetrics {
        ascent: ascent.round(),
        descent: (font.descent_unscaled() * scale).round(),
        cap_height: cap_height.round(),
        widths,
    }
}

/// A face ready to be written into a PDF.
#[derive(Debug, Clone)]
pub enum ResolvedFace {
    /// One of the standard fonts; needs no embedding.
    Standard(String),
    /// An embedded TrueType face.
    TrueType(Arc<TrueTypeFace>),
}

impl ResolvedFace {
    /// The fallback face.
    pub fn fallback() -> Self {
        ResolvedFace::Standard(super::FALLBACK_FONT.to_string())
    }

    /// PDF BaseFont name.
    pub fn base_font(&self) -> &str {
        match self {
            ResolvedFace::Standard(name) => name,
            ResolvedFace::TrueType(face) => face.base_font(),
        }
    }

    /// Characters of `text` this face cannot draw, in order of first
    /// appearance.
    pub fn missing_chars(&self, text: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for c in text.chars() {
            let drawable = encoding::encode_char(c).is_some()
                && match self {
                    ResolvedFace::Standard(_) => true,
                    ResolvedFace::TrueType(face) => face.has_glyph(c),
                };
            if !drawable && !missing.contains(&c) {
                missing.push(c);
            }
        }
        missing
    }
}
