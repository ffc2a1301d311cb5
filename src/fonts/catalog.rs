//! Font catalog: which families exist and which weights each declares.

use super::FontWeight;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The 14 fonts every PDF reader provides without embedding.
pub const STANDARD_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Symbol",
    "ZapfDingbats",
];

/// Face used when the requested one cannot draw a value.
pub const FALLBACK_FONT: &str = "Helvetica";

/// Where the glyphs for one family/weight come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaceSource {
    /// One of the [`STANDARD_FONTS`], referenced by name.
    Standard { base_font: String },
    /// A TrueType file embedded into every generated document.
    TrueType { path: PathBuf },
}

impl FaceSource {
    /// A standard-font face.
    pub fn standard(base_font: impl Into<String>) -> Self {
        FaceSource::Standard {
            base_font: base_font.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FaceSource::Standard { base_font } if !STANDARD_FONTS.contains(&base_font.as_str()) => {
                Err(Error::Font(format!(
                    "'{}' is not a standard PDF font; use a true_type face instead",
                    base_font
                )))
            }
            _ => Ok(()),
        }
    }
}

/// A font family and the faces it declares, one per supported weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    /// Identifier used by fields (e.g. "sans")
    pub id: String,
    /// Display name (e.g. "Sans Serif")
    pub name: String,
    /// Faces keyed by weight
    pub faces: BTreeMap<FontWeight, FaceSource>,
    /// Other names the family answers to, such as web font class names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl FontFamily {
    /// Create an empty family.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faces: BTreeMap::new(),
            aliases: Vec::new(),
        }
    }

    /// Add another name the family can be looked up by.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Check if `name` is the id or one of the aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.id == name || self.aliases.iter().any(|a| a == name)
    }

    /// Declare a face for `weight`.
    pub fn with_face(mut self, weight: FontWeight, source: FaceSource) -> Self {
        self.faces.insert(weight, source);
        self
    }

    /// Declared weights, lightest first.
    pub fn weights(&self) -> Vec<FontWeight> {
        self.faces.keys().copied().collect()
    }

    /// Check if `weight` is declared.
    pub fn supports(&self, weight: FontWeight) -> bool {
        self.faces.contains_key(&weight)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    include_builtin: Option<bool>,
    families: Vec<FontFamily>,
}

/// The set of font families available for placement and rendering.
///
/// The catalog is injected into the layout session and the batch renderer;
/// both must see the same catalog for placement-time validation to hold at
/// render time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontCatalog {
    families: Vec<FontFamily>,
}

impl FontCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of families backed by the standard PDF fonts.
    ///
    /// `sans` declares all nine weights (light weights share Helvetica,
    /// heavy weights share Helvetica-Bold), `decorative` declares only 400.
    /// The web families (`inter`, `roboto`, `great-vibes`, `montserrat`,
    /// `playfair-display`) declare the weights their web fonts ship and
    /// answer to their CSS class names; load a JSON catalog to back them
    /// with the real TrueType files.
    pub fn builtin() -> Self {
        let sans = standard_family("sans", "Sans Serif", &FontWeight::ALL, "Helvetica", "Helvetica-Bold");

        let serif = FontFamily::new("serif", "Serif")
            .with_face(FontWeight::REGULAR, FaceSource::standard("Times-Roman"))
            .with_face(FontWeight::BOLD, FaceSource::standard("Times-Bold"));

        let mono = FontFamily::new("mono", "Monospace")
            .with_face(FontWeight::REGULAR, FaceSource::standard("Courier"))
            .with_face(FontWeight::BOLD, FaceSource::standard("Courier-Bold"));

        let decorative = FontFamily::new("decorative", "Decorative")
            .with_face(FontWeight::REGULAR, FaceSource::standard("Times-Italic"));

        let web_sans = [
            FontWeight::THIN,
            FontWeight::LIGHT,
            FontWeight::REGULAR,
            FontWeight::MEDIUM,
            FontWeight::BOLD,
            FontWeight::BLACK,
        ];
        let inter = standard_family("inter", "Inter", &web_sans, "Helvetica", "Helvetica-Bold")
            .with_alias("font-inter-sans");
        let roboto = standard_family("roboto", "Roboto", &web_sans, "Helvetica", "Helvetica-Bold")
            .with_alias("font-roboto");
        let great_vibes = FontFamily::new("great-vibes", "Great Vibes")
            .with_face(FontWeight::REGULAR, FaceSource::standard("Times-Italic"))
            .with_alias("font-great-vibes");
        let montserrat =
            standard_family("montserrat", "Montserrat", &web_sans, "Helvetica", "Helvetica-Bold")
                .with_alias("font-montserrat");
        let playfair = standard_family(
            "playfair-display",
            "Playfair Display",
            &FontWeight::ALL[3..],
            "Times-Roman",
            "Times-Bold",
        )
        .with_alias("font-playfair");

        Self {
            families: vec![
                sans,
                serif,
                mono,
                decorative,
                inter,
                roboto,
                great_vibes,
                montserrat,
                playfair,
            ],
        }
    }

    /// Add a family, replacing any family with the same id.
    pub fn insert(&mut self, family: FontFamily) -> Result<()> {
        if family.faces.is_empty() {
            return Err(Error::Font(format!(
                "family '{}' declares no weights",
                family.id
            )));
        }
        for source in family.faces.values() {
            source.validate()?;
        }
        match self.families.iter_mut().find(|f| f.id == family.id) {
            Some(existing) => {
                let mut family = family;
                for alias in existing.aliases.drain(..) {
                    if !family.aliases.contains(&alias) {
                        family.aliases.push(alias);
                    }
                }
                *existing = family;
            }
            None => self.families.push(family),
        }
        Ok(())
    }

    /// Builder-style [`FontCatalog::insert`].
    pub fn with_family(mut self, family: FontFamily) -> Result<Self> {
        self.insert(family)?;
        Ok(self)
    }

    /// Load a catalog from JSON.
    ///
    /// Relative TrueType paths are resolved against `base_dir`. The built-in
    /// families are included unless the file sets `"include_builtin": false`.
    pub fn from_json_str(json: &str, base_dir: Option<&Path>) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = if file.include_builtin.unwrap_or(true) {
            Self::builtin()
        } else {
            Self::new()
        };

        for mut family in file.families {
            if let Some(base) = base_dir {
                for source in family.faces.values_mut() {
                    if let FaceSource::TrueType { path } = source {
                        if path.is_relative() {
                            *path = base.join(&*path);
                        }
                    }
                }
            }
            catalog.insert(family)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json, path.parent())?;
        log::debug!(
            "Loaded font catalog from {} ({} families)",
            path.display(),
            catalog.families.len()
        );
        Ok(catalog)
    }

    /// All families in declaration order.
    pub fn families(&self) -> &[FontFamily] {
        &self.families
    }

    /// Look up a family by id or alias.
    pub fn family(&self, name: &str) -> Option<&FontFamily> {
        self.families
            .iter()
            .find(|f| f.id == name)
            .or_else(|| self.families.iter().find(|f| f.answers_to(name)))
    }

    /// Face declared for `family`/`weight`.
    pub fn face(&self, family: &str, weight: FontWeight) -> Option<&FaceSource> {
        self.family(family).and_then(|f| f.faces.get(&weight))
    }

    /// The lightest declared weight of `family`.
    pub fn default_weight(&self, family: &str) -> Option<FontWeight> {
        self.family(family)
            .and_then(|f| f.faces.keys().next().copied())
    }

    /// Check that `family` exists and declares `weight`.
    pub fn validate(&self, family: &str, weight: FontWeight) -> Result<()> {
        let fam = self
            .family(family)
            .ok_or_else(|| Error::InvalidTypography(format!("unknown font family '{}'", family)))?;
        if fam.supports(weight) {
            Ok(())
        } else {
            let declared: Vec<String> = fam.weights().iter().map(|w| w.to_string()).collect();
            Err(Error::InvalidTypography(format!(
                "family '{}' does not support weight {} (declared: {})",
                family,
                weight,
                declared.join(", ")
            )))
        }
    }
}

/// A family whose weights below 600 use `regular` and the rest `bold`.
fn standard_family(
    id: &str,
    name: &str,
    weights: &[FontWeight],
    regular: &str,
    bold: &str,
) -> FontFamily {
    weights.iter().fold(FontFamily::new(id, name), |family, &weight| {
        let face = if weight >= FontWeight::SEMI_BOLD { bold } else { regular };
        family.with_face(weight, FaceSource::standard(face))
    })
}
