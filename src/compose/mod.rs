//! Label composition
//!
//! [`compose_label`] is a pure function of the form snapshot and the ordered
//! ingredient list. It returns a [`LabelDocument`]; the `markup` and `text`
//! projections turn that into something a sink can display.

pub mod grid;
pub mod label;
pub mod markup;
pub mod text;

use serde::Serialize;

use crate::form::FormSnapshot;
use crate::store::IngredientRecord;
use crate::{LabelConfig, Result};

pub use grid::{NutritionGrid, NutritionSlot};
pub use label::{IngredientLine, MainLabel, StickerBox};

/// Both label fragments, as data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDocument {
    pub main: MainLabel,
    pub grid: NutritionGrid,
}

/// Compose the main label and the nutrition grid
pub fn compose_label(
    form: &FormSnapshot,
    ingredients: &[IngredientRecord],
    config: &LabelConfig,
) -> LabelDocument {
    LabelDocument {
        main: MainLabel::compose(form, ingredients, config),
        grid: NutritionGrid::compose(ingredients, config.nutrition_slots),
    }
}

impl LabelDocument {
    /// Preview markup: main label box stacked over the image grid
    pub fn to_html(&self) -> String {
        markup::label_html(self)
    }

    pub fn to_text(&self) -> String {
        text::label_text(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::NutritionImage;
    use crate::store::IngredientStore;

    fn snapshot() -> FormSnapshot {
        FormSnapshot {
            product_name: "Fresh Fuel".into(),
            meal_name: "Stir-fry".into(),
            dietary_info: "None".into(),
            handling_instructions: "Keep cold".into(),
        }
    }

    fn image() -> NutritionImage {
        NutritionImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    #[test]
    fn unbounded_ingredients_bounded_slots() {
        let cfg = LabelConfig::default();
        let mut store = IngredientStore::new();
        for i in 0..8 {
            let id = store.add_with(&format!("Item {}", i + 1), "oz");
            store.attach_image(id, image());
        }
        let doc = compose_label(&snapshot(), store.list(), &cfg);
        assert_eq!(doc.main.ingredients.len(), 8);
        assert_eq!(doc.grid.slots.len(), 5);
        assert!(doc.grid.slots.iter().all(NutritionSlot::is_filled));
    }

    #[test]
    fn composing_is_deterministic() {
        let cfg = LabelConfig::default();
        let store = IngredientStore::with_examples();
        let a = compose_label(&snapshot(), store.list(), &cfg);
        let b = compose_label(&snapshot(), store.list(), &cfg);
        assert_eq!(a, b);
        assert_eq!(a.to_html(), b.to_html());
    }

    #[test]
    fn json_projection_tags_slots() {
        let cfg = LabelConfig::default();
        let store = IngredientStore::with_examples();
        let doc = compose_label(&snapshot(), store.list(), &cfg);
        let v: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(v["main"]["product_name"], "Fresh Fuel");
        assert_eq!(v["grid"]["slots"].as_array().unwrap().len(), 5);
        assert_eq!(v["grid"]["slots"][0]["state"], "empty");
    }
}
