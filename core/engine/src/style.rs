//! FILENAME: core/engine/src/style.rs
//! PURPOSE: Defines the style data structures and registry for cell formatting.
//! CONTEXT: This file implements the Flyweight Pattern for efficient style storage.
//! Instead of storing full style data on every cell, cells store a style_index (usize)
//! that points to a shared Style object in the central StyleRegistry.
//! Defaults mirror a fresh Excel cell so that the writer only emits what differs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Horizontal alignment options for cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    General, // Auto: numbers right, text left
    Left,
    Center,
    Right,
}

/// Vertical alignment options for cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VerticalAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Number format types for displaying numeric values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    #[default]
    General,
    Number {
        decimal_places: u8,
        use_thousands_separator: bool,
    },
    Date {
        format: String, // e.g., "yyyy-mm-dd"
    },
}

impl NumberFormat {
    /// Excel format code for this format; empty for General.
    pub fn format_code(&self) -> String {
        match self {
            NumberFormat::General => String::new(),
            NumberFormat::Number { decimal_places, use_thousands_separator } => {
                let decimal_part = if *decimal_places > 0 {
                    format!(".{}", "0".repeat(*decimal_places as usize))
                } else {
                    String::new()
                };
                if *use_thousands_separator {
                    format!("#,##0{}", decimal_part)
                } else {
                    format!("0{}", decimal_part)
                }
            }
            NumberFormat::Date { format } => format.clone(),
        }
    }
}

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn black() -> Self {
        Color::new(0, 0, 0)
    }

    /// Packed 0xRRGGBB value.
    pub fn to_rgb(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Opaque ARGB hex as used in SpreadsheetML, e.g. "FFC0C0C0".
    pub fn to_argb_hex(&self) -> String {
        format!("FF{:06X}", self.to_rgb())
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

/// Line style for a single border edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
}

/// Border style for a single edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BorderStyle {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderStyle {
    pub fn thin() -> Self {
        BorderStyle {
            style: BorderLineStyle::Thin,
            color: Color::black(),
        }
    }
}

/// Border configuration for a cell. Reports only draw horizontal rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Borders {
    pub top: BorderStyle,
    pub bottom: BorderStyle,
}

/// Font style configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    pub size: u8, // Font size in points
    pub bold: bool,
    pub color: Color,
}

pub const DEFAULT_FONT_FAMILY: &str = "Calibri";
pub const DEFAULT_FONT_SIZE: u8 = 11;

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            color: Color::black(),
        }
    }
}

/// Complete cell style definition.
/// This is what gets stored in the StyleRegistry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CellStyle {
    pub font: FontStyle,
    /// Solid fill color; `None` means no fill.
    pub background: Option<Color>,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub number_format: NumberFormat,
    pub borders: Borders,
}

impl CellStyle {
    /// Create a new default style.
    pub fn new() -> Self {
        CellStyle::default()
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    pub fn with_font(mut self, family: &str, size: u8) -> Self {
        self.font.family = family.to_string();
        self.font.size = size;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Thin top and bottom edges.
    pub fn with_horizontal_rules(mut self) -> Self {
        self.borders.top = BorderStyle::thin();
        self.borders.bottom = BorderStyle::thin();
        self
    }
}

/// The StyleRegistry implements the Flyweight Pattern.
/// It stores unique styles and returns indices for cells to reference.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    /// Vector of unique styles. Index 0 is always the default style.
    styles: Vec<CellStyle>,
    /// Reverse lookup for deduplication.
    style_to_index: HashMap<CellStyle, usize>,
}

impl StyleRegistry {
    /// Create a new registry with the default style at index 0.
    pub fn new() -> Self {
        let default_style = CellStyle::new();
        let mut style_to_index = HashMap::new();
        style_to_index.insert(default_style.clone(), 0);

        StyleRegistry {
            styles: vec![default_style],
            style_to_index,
        }
    }

    /// Get or create a style index for the given style.
    pub fn get_or_create(&mut self, style: CellStyle) -> usize {
        if let Some(&index) = self.style_to_index.get(&style) {
            return index;
        }

        let index = self.styles.len();
        self.style_to_index.insert(style.clone(), index);
        self.styles.push(style);
        index
    }

    /// Get a style by its index.
    /// Returns the default style (index 0) if index is out of bounds.
    pub fn get(&self, index: usize) -> &CellStyle {
        self.styles.get(index).unwrap_or(&self.styles[0])
    }

    /// Derive a new style from an existing one and register it.
    pub fn derive(&mut self, index: usize, f: impl FnOnce(CellStyle) -> CellStyle) -> usize {
        let style = f(self.get(index).clone());
        self.get_or_create(style)
    }

    /// Get the total number of unique styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry only contains the default style.
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Get all styles (for serialization/debugging).
    pub fn all_styles(&self) -> &[CellStyle] {
        &self.styles
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::new()
    }
}
