//! Main label body

use serde::Serialize;

use crate::form::FormSnapshot;
use crate::store::IngredientRecord;
use crate::LabelConfig;

/// One of the two sticker boxes under the product name. The text is always
/// the configured placeholder; a printed sticker goes on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerBox {
    pub caption: String,
    pub text: String,
}

/// An active ingredient: unit plus trimmed name, with a blank line left for
/// the amount to be written by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub unit: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainLabel {
    pub product_name: String,
    pub stickers: Vec<StickerBox>,
    pub meal_name: String,
    pub ingredients: Vec<IngredientLine>,
    pub dietary_info: String,
    pub handling_instructions: String,
    pub prepared_at: String,
    /// Always blank; the date is filled in by hand
    pub date_slots: Vec<String>,
}

impl MainLabel {
    pub fn compose(
        form: &FormSnapshot,
        ingredients: &[IngredientRecord],
        config: &LabelConfig,
    ) -> Self {
        let sticker = |caption: &str| StickerBox {
            caption: caption.to_string(),
            text: config.sticker_placeholder.clone(),
        };
        let dietary_info = if form.dietary_info.is_empty() {
            config.dietary_fallback.clone()
        } else {
            form.dietary_info.clone()
        };

        Self {
            product_name: form.product_name.clone(),
            stickers: vec![sticker("Prepared for"), sticker("Cook on")],
            meal_name: form.meal_name.clone(),
            ingredients: active_lines(ingredients),
            dietary_info,
            handling_instructions: form.handling_instructions.clone(),
            prepared_at: config.prepared_at.clone(),
            date_slots: vec![String::new(); config.date_slots],
        }
    }
}

/// Lines for every ingredient with a non-blank name, in store order
pub fn active_lines(ingredients: &[IngredientRecord]) -> Vec<IngredientLine> {
    ingredients
        .iter()
        .filter_map(|rec| {
            rec.active_name().map(|name| IngredientLine {
                unit: rec.unit.clone(),
                name: name.to_string(),
            })
        })
        .collect()
}
