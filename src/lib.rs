//! Meal Label Composer
//!
//! Keeps the ingredient list of a prepared meal in memory and turns it, together
//! with a few form fields, into a printable label preview: a main label body and
//! a fixed five-slot grid of nutrition-label photos.
//!
//! # Features
//!
//! - **Structured output**: the composer returns a [`LabelDocument`] that can be
//!   projected to HTML, plain text or JSON
//! - **Explicit events**: every edit goes through [`RenderDriver::dispatch`], so a
//!   browser bridge, a CLI or a test harness can drive the same loop
//! - **Safe Defaults**: blank fields render as placeholders, unknown ids and
//!   fields are ignored, and rendering never fails
//!
//! # Example
//!
//! ```
//! use meal_label::{Event, FormFields, IngredientField, LabelConfig, MemorySink, RenderDriver};
//!
//! let config = LabelConfig::default();
//! let mut form = FormFields::new(&config);
//! form.meal_name = "Teriyaki Bowl".to_string();
//!
//! let mut driver = RenderDriver::new(config, form, MemorySink::default());
//! driver.start();
//!
//! let id = driver.dispatch_add();
//! driver.dispatch(Event::UpdateIngredient {
//!     id,
//!     field: IngredientField::Name,
//!     value: "Brown Rice".to_string(),
//! });
//!
//! let html = driver.sink().label();
//! assert!(html.contains("Teriyaki Bowl"));
//! assert!(html.contains("Brown Rice"));
//! ```

use std::path::Path;

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

// Ordered ingredient records
pub mod store;

// PNG/JPEG data URLs and the background decoder
pub mod image;

// Form snapshot and the sources it can be read from
pub mod form;

// Pure label composition plus HTML/text projections
pub mod compose;

// Event dispatch and sink writes
pub mod driver;

// Optional identity bootstrap, independent of label content
pub mod auth;

pub use compose::{compose_label, LabelDocument, MainLabel, NutritionGrid, NutritionSlot};
pub use driver::{Event, LabelSink, MemorySink, RenderDriver};
pub use form::{FormFields, FormSnapshot, FormSource, HtmlForm};
pub use image::{ImageLoader, NutritionImage};
pub use store::{IngredientField, IngredientId, IngredientRecord, IngredientStore};

/// Fixed strings and constants of the printed label
///
/// The defaults reproduce the stock label. Any field can be overridden from a
/// JSON file; fields missing from the file keep their default.
///
/// # Examples
///
/// ```
/// let cfg = meal_label::LabelConfig::default();
/// assert_eq!(cfg.nutrition_slots, 5);
/// assert_eq!(cfg.product_name_placeholder, "Product Name");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Shown when the product name field is blank
    pub product_name_placeholder: String,
    /// Shown when the meal name field is blank
    pub meal_name_placeholder: String,
    /// Shown when the handling instructions field is blank
    pub handling_placeholder: String,
    /// Shown when no dietary option is selected
    pub dietary_fallback: String,
    /// Text printed in the "Prepared for" and "Cook on" sticker boxes
    pub sticker_placeholder: String,
    /// Preparation location printed under "Prepared At"
    pub prepared_at: String,
    /// Number of positional nutrition-image slots
    pub nutrition_slots: usize,
    /// Number of blank date parts under "Prepared On"
    pub date_slots: usize,
    /// Choices of the dietary single-select, in display order
    pub dietary_options: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            product_name_placeholder: "Product Name".to_string(),
            meal_name_placeholder: "Insert Meal Name".to_string(),
            handling_placeholder: "Insert handling instructions".to_string(),
            dietary_fallback: "-".to_string(),
            sticker_placeholder: "STICKER HERE".to_string(),
            prepared_at: "The Charles River Center, 59 E Militia Heights Dr, Needham, MA 02492"
                .to_string(),
            nutrition_slots: 5,
            date_slots: 3,
            dietary_options: ["None", "Vegetarian", "Vegan", "Gluten-Free", "Dairy-Free"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl LabelConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: LabelConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations the label cannot be drawn with
    pub fn validate(&self) -> Result<()> {
        if self.nutrition_slots == 0 {
            return Err(Error::ConfigError("nutrition_slots must be at least 1".into()));
        }
        if self.dietary_options.is_empty() {
            return Err(Error::ConfigError("dietary_options must not be empty".into()));
        }
        if self.dietary_options.iter().any(|o| o.trim().is_empty()) {
            return Err(Error::ConfigError("dietary_options must not contain blank entries".into()));
        }
        Ok(())
    }
}
