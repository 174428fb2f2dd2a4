//! Categorical palettes for chart series
//!
//! Palettes are loaded from palettes.json (embedded at compile time) and looked
//! up by name. Colors repeat after exhausting the list.

use serde::Deserialize;
use std::collections::HashMap;

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../palettes.json");

/// Default palette name (matplotlib's category cycle)
pub const DEFAULT_PALETTE: &str = "Tableau10";

const GRAY: [u8; 3] = [128, 128, 128];

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Get a color by index (wraps around)
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.is_empty() {
            return GRAY;
        }
        let idx = index % self.len();
        parse_hex_color(&self.colors[idx]).unwrap_or(GRAY)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// Palettes by lowercase name
    palettes: HashMap<String, PaletteDefinition>,
    /// Names in file order
    names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse palettes JSON: {}", e))?;

        let mut registry = Self::default();
        for def in definitions {
            registry.names.push(def.name.clone());
            registry.palettes.insert(def.name.to_lowercase(), def);
        }

        tracing::debug!(count = registry.palettes.len(), "Loaded palettes");
        Ok(registry)
    }

    /// The palettes shipped with the binary
    pub fn builtin() -> Self {
        Self::from_json(PALETTES_JSON).unwrap_or_else(|e| {
            tracing::error!("Failed to load palettes.json: {}", e);
            Self::default()
        })
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    /// Look up `name`, falling back to the default palette
    pub fn resolve(&self, name: &str) -> PaletteDefinition {
        if let Some(palette) = self.get(name) {
            return palette.clone();
        }
        tracing::warn!(
            palette = name,
            available = %self.names().join(", "),
            "Unknown palette, using {}",
            DEFAULT_PALETTE
        );
        self.get(DEFAULT_PALETTE)
            .cloned()
            .unwrap_or_else(|| PaletteDefinition {
                name: DEFAULT_PALETTE.to_string(),
                colors: Vec::new(),
            })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Parse a hex color string to RGB array
///
/// Supports `#RRGGBB`, `#RRGGBBAA` (alpha ignored), with or without `#`.
fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        tracing::warn!("Invalid hex color '{}'", hex);
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}
