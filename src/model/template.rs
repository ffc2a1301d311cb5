//! Template types: the single-page background document.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The visible page area in PDF user space (points, 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    /// Lower-left x of the MediaBox
    pub llx: f32,
    /// Lower-left y of the MediaBox
    pub lly: f32,
    /// Upper-right x of the MediaBox
    pub urx: f32,
    /// Upper-right y of the MediaBox
    pub ury: f32,
}

impl PageBox {
    /// Build a normalized box from two corners in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// A US Letter page (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::from_corners(0.0, 0.0, 612.0, 792.0)
    }

    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    /// Convert a top-left-origin point (y growing downward) to PDF user space.
    pub fn to_user_space(&self, x: f32, y: f32) -> (f32, f32) {
        (self.llx + x, self.ury - y)
    }
}

/// A normalized certificate template.
///
/// A `Template` always holds exactly one page; it can only be created
/// through [`crate::ingest_template`], which enforces that.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    bytes: Arc<Vec<u8>>,
    page_box: PageBox,
    pdf_version: String,
    source_page_count: u32,
}

impl Template {
    pub(crate) fn new(
        bytes: Vec<u8>,
        page_box: PageBox,
        pdf_version: String,
        source_page_count: u32,
    ) -> Self {
        Self {
            bytes: Arc::new(bytes),
            page_box,
            pdf_version,
            source_page_count,
        }
    }

    /// The normalized single-page PDF.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The page box of the single page.
    pub fn page_box(&self) -> PageBox {
        self.page_box
    }

    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.page_box.width()
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.page_box.height()
    }

    /// PDF version declared by the uploaded document (e.g. "1.7").
    pub fn pdf_version(&self) -> &str {
        &self.pdf_version
    }

    /// Number of pages the uploaded document had before normalization.
    pub fn source_page_count(&self) -> u32 {
        self.source_page_count
    }

    /// Always 1.
    pub fn page_count(&self) -> u32 {
        1
    }
}
