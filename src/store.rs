//! Ingredient store
//!
//! Owns the ordered list of ingredient records the label is built from.
//! Insertion order is display order. Ids come from a per-store counter that
//! only moves forward, so an id is never handed out twice even after its
//! record has been removed.

use std::fmt;

use serde::Serialize;

use crate::image::NutritionImage;

/// Unit assigned to newly added ingredients
pub const DEFAULT_UNIT: &str = "oz";

/// Names of the records a fresh store is seeded with
pub const EXAMPLE_INGREDIENTS: [&str; 3] = [
    "Diced Chicken Breast",
    "Stir-fry Vegetable Mix",
    "Low Sodium Soy Sauce",
];

/// Opaque ingredient identifier, stable for the lifetime of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IngredientId(u64);

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for IngredientId {
    fn from(raw: u64) -> Self {
        IngredientId(raw)
    }
}

/// Editable text fields of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    Unit,
}

impl IngredientField {
    /// Parse a field name as sent by an editor row. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(IngredientField::Name),
            "unit" => Some(IngredientField::Unit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IngredientField::Name => "name",
            IngredientField::Unit => "unit",
        }
    }
}

/// One row of user-entered ingredient data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientRecord {
    pub id: IngredientId,
    pub name: String,
    pub unit: String,
    pub nutrition_image: Option<NutritionImage>,
}

impl IngredientRecord {
    fn new(id: IngredientId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            nutrition_image: None,
        }
    }

    /// Trimmed name, or `None` when the name is blank
    pub fn active_name(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Ordered, id-addressed collection of ingredient records
///
/// Every mutator returns `true` when it changed something. Operations on
/// unknown ids are silent no-ops that return `false`.
#[derive(Debug, Clone, Default)]
pub struct IngredientStore {
    records: Vec<IngredientRecord>,
    next_id: u64,
}

impl IngredientStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the three example ingredients
    pub fn with_examples() -> Self {
        let mut store = Self::new();
        for name in EXAMPLE_INGREDIENTS {
            store.push_named(name);
        }
        store
    }

    fn fresh_id(&mut self) -> IngredientId {
        self.next_id += 1;
        IngredientId(self.next_id)
    }

    fn push_named(&mut self, name: &str) -> IngredientId {
        let id = self.fresh_id();
        self.records.push(IngredientRecord::new(id, name));
        id
    }

    fn find_mut(&mut self, id: IngredientId) -> Option<&mut IngredientRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Append a blank ingredient and return its id
    pub fn add(&mut self) -> IngredientId {
        self.push_named("")
    }

    /// Append an ingredient with a name and unit already filled in
    pub fn add_with(&mut self, name: &str, unit: &str) -> IngredientId {
        let id = self.push_named(name);
        if let Some(rec) = self.records.last_mut() {
            rec.unit = unit.to_string();
        }
        id
    }

    /// Remove the record with `id`, keeping the order of the survivors
    pub fn remove(&mut self, id: IngredientId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Overwrite one text field of a record
    pub fn update(&mut self, id: IngredientId, field: IngredientField, value: &str) -> bool {
        let Some(rec) = self.find_mut(id) else {
            return false;
        };
        match field {
            IngredientField::Name => rec.name = value.to_string(),
            IngredientField::Unit => rec.unit = value.to_string(),
        }
        true
    }

    /// String-keyed variant of [`update`](Self::update); unknown field names are ignored
    pub fn update_named(&mut self, id: IngredientId, field: &str, value: &str) -> bool {
        match IngredientField::parse(field) {
            Some(field) => self.update(id, field, value),
            None => false,
        }
    }

    /// Set (or replace) the nutrition-label image of a record
    pub fn attach_image(&mut self, id: IngredientId, image: NutritionImage) -> bool {
        match self.find_mut(id) {
            Some(rec) => {
                rec.nutrition_image = Some(image);
                true
            }
            None => false,
        }
    }

    /// Live records in display order
    pub fn list(&self) -> &[IngredientRecord] {
        &self.records
    }

    pub fn get(&self, id: IngredientId) -> Option<&IngredientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<IngredientId> {
        self.records.iter().map(|r| r.id).collect()
    }
}
