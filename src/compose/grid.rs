//! Positional nutrition-image grid
//!
//! Slot `i` belongs to the `i`-th record in store order, whether or not that
//! record has a name. Records past the last slot have no slot at all.

use serde::Serialize;

use crate::image::NutritionImage;
use crate::store::IngredientRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NutritionSlot {
    Filled {
        index: usize,
        title: String,
        image: NutritionImage,
    },
    Empty {
        index: usize,
        caption: String,
    },
}

impl NutritionSlot {
    /// 0-based position in the grid
    pub fn index(&self) -> usize {
        match self {
            NutritionSlot::Filled { index, .. } | NutritionSlot::Empty { index, .. } => *index,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, NutritionSlot::Filled { .. })
    }

    pub fn image(&self) -> Option<&NutritionImage> {
        match self {
            NutritionSlot::Filled { image, .. } => Some(image),
            NutritionSlot::Empty { .. } => None,
        }
    }
}

fn slot_title(index: usize) -> String {
    format!("Ingredient {}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionGrid {
    pub slots: Vec<NutritionSlot>,
}

impl NutritionGrid {
    pub fn compose(ingredients: &[IngredientRecord], slot_count: usize) -> Self {
        let slots = (0..slot_count)
            .map(|index| {
                match ingredients.get(index).and_then(|r| r.nutrition_image.as_ref()) {
                    Some(image) => NutritionSlot::Filled {
                        index,
                        title: slot_title(index),
                        image: image.clone(),
                    },
                    None => NutritionSlot::Empty {
                        index,
                        caption: format!("{} Slot Empty", slot_title(index)),
                    },
                }
            })
            .collect();
        Self { slots }
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }
}
