//! Render driver
//!
//! Owns the ingredient store and the form source, and turns every event into
//! a synchronous "render now": read the form, compose the label, overwrite
//! the label region of the sink. Events that change the ingredient list
//! also rewrite the editor region, since its rows are keyed by ids that may
//! have gone away.

use crate::compose::{compose_label, markup, LabelDocument};
use crate::form::{FormSnapshot, FormSource};
use crate::image::{DecodeCompletion, ImageLoader, NutritionImage};
use crate::store::{IngredientField, IngredientId, IngredientStore};
use crate::LabelConfig;

/// Everything that can trigger a render
#[derive(Debug)]
pub enum Event {
    AddIngredient,
    RemoveIngredient(IngredientId),
    UpdateIngredient {
        id: IngredientId,
        field: IngredientField,
        value: String,
    },
    AttachImage {
        id: IngredientId,
        image: NutritionImage,
    },
    /// A background decode finished, successfully or not
    ImageDecoded(DecodeCompletion),
    /// Any edit of the product, meal, dietary or handling fields
    FormInput,
}

impl Event {
    fn changes_list(&self) -> bool {
        matches!(
            self,
            Event::AddIngredient
                | Event::RemoveIngredient(_)
                | Event::AttachImage { .. }
                | Event::ImageDecoded(_)
        )
    }
}

/// Output regions the driver writes into. Each call replaces the whole
/// previous content of that region.
pub trait LabelSink {
    fn replace_label(&mut self, html: &str);
    fn replace_editor(&mut self, html: &str);
}

/// Sink that keeps the latest content of both regions in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    label: String,
    editor: String,
    label_writes: usize,
    editor_writes: usize,
}

impl MemorySink {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn label_writes(&self) -> usize {
        self.label_writes
    }

    pub fn editor_writes(&self) -> usize {
        self.editor_writes
    }
}

impl LabelSink for MemorySink {
    fn replace_label(&mut self, html: &str) {
        self.label = html.to_string();
        self.label_writes += 1;
    }

    fn replace_editor(&mut self, html: &str) {
        self.editor = html.to_string();
        self.editor_writes += 1;
    }
}

pub struct RenderDriver<F: FormSource, S: LabelSink> {
    config: LabelConfig,
    store: IngredientStore,
    form: F,
    sink: S,
    renders: u64,
    last: Option<LabelDocument>,
}

impl<F: FormSource, S: LabelSink> RenderDriver<F, S> {
    /// Driver over a store seeded with the example ingredients
    pub fn new(config: LabelConfig, form: F, sink: S) -> Self {
        Self::with_store(config, IngredientStore::with_examples(), form, sink)
    }

    pub fn with_store(config: LabelConfig, store: IngredientStore, form: F, sink: S) -> Self {
        Self {
            config,
            store,
            form,
            sink,
            renders: 0,
            last: None,
        }
    }

    /// Initial render, equivalent to page load
    pub fn start(&mut self) -> &LabelDocument {
        self.render_editor();
        self.render()
    }

    /// Apply an event and re-render. Returns whether the store changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        self.apply(event).is_some()
    }

    /// Add a blank ingredient and return its id
    pub fn dispatch_add(&mut self) -> IngredientId {
        match self.apply(Event::AddIngredient) {
            Some(id) => id,
            None => unreachable!("adding an ingredient always creates a record"),
        }
    }

    /// Mutate the store for `event` and re-render. Returns the id of the
    /// record that changed, `None` when the store was left untouched.
    fn apply(&mut self, event: Event) -> Option<IngredientId> {
        log::debug!("dispatch {:?}", EventKind(&event));
        let regenerate_editor = event.changes_list();
        let touched = match event {
            Event::AddIngredient => Some(self.store.add()),
            Event::RemoveIngredient(id) => self.store.remove(id).then_some(id),
            Event::UpdateIngredient { id, field, value } => {
                self.store.update(id, field, &value).then_some(id)
            }
            Event::AttachImage { id, image } => self.store.attach_image(id, image).then_some(id),
            Event::ImageDecoded(DecodeCompletion { id, result }) => match result {
                Ok(image) => self.store.attach_image(id, image).then_some(id),
                Err(err) => {
                    log::warn!("nutrition image for ingredient {} not decoded: {}", id, err);
                    return None;
                }
            },
            Event::FormInput => None,
        };
        if touched.is_none() && regenerate_editor {
            log::debug!("event referred to an ingredient that no longer exists");
        }
        if regenerate_editor {
            self.render_editor();
        }
        self.render();
        touched
    }

    /// Edit the form and re-render
    pub fn edit_form(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.form);
        self.dispatch(Event::FormInput);
    }

    /// Dispatch every decode that has completed so far. Returns how many
    /// completions were handled.
    pub fn pump(&mut self, loader: &ImageLoader) -> usize {
        let done = loader.try_completed();
        let count = done.len();
        for completion in done {
            self.dispatch(Event::ImageDecoded(completion));
        }
        count
    }

    /// Read the form, compose and overwrite the label region
    pub fn render(&mut self) -> &LabelDocument {
        let snapshot = FormSnapshot::read(&self.form, &self.config);
        let doc = compose_label(&snapshot, self.store.list(), &self.config);
        self.sink.replace_label(&doc.to_html());
        self.renders += 1;
        log::debug!(
            "render #{}: {} active ingredients, {} of {} slots filled",
            self.renders,
            doc.main.ingredients.len(),
            doc.grid.filled_count(),
            doc.grid.slots.len()
        );
        self.last.insert(doc)
    }

    /// Regenerate every ingredient editing row
    pub fn render_editor(&mut self) {
        self.sink.replace_editor(&markup::editor_html(self.store.list()));
    }

    pub fn store(&self) -> &IngredientStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The document produced by the most recent render
    pub fn last_document(&self) -> Option<&LabelDocument> {
        self.last.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

/// Compact event description for logs; image payloads can be large
struct EventKind<'a>(&'a Event);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::AddIngredient => write!(f, "AddIngredient"),
            Event::RemoveIngredient(id) => write!(f, "RemoveIngredient({})", id),
            Event::UpdateIngredient { id, field, .. } => {
                write!(f, "UpdateIngredient({}, {})", id, field.as_str())
            }
            Event::AttachImage { id, image } => write!(f, "AttachImage({}, {})", id, image.mime().as_str()),
            Event::ImageDecoded(c) => write!(f, "ImageDecoded({}, ok={})", c.id, c.result.is_ok()),
            Event::FormInput => write!(f, "FormInput"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormFields;
    use crate::Error;

    fn driver() -> RenderDriver<FormFields, MemorySink> {
        let cfg = LabelConfig::default();
        let form = FormFields::new(&cfg);
        RenderDriver::new(cfg, form, MemorySink::default())
    }

    fn image() -> NutritionImage {
        NutritionImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    #[test]
    fn start_writes_both_regions() {
        let mut d = driver();
        d.start();
        assert_eq!(d.sink().label_writes(), 1);
        assert_eq!(d.sink().editor_writes(), 1);
        assert!(d.sink().label().contains("Diced Chicken Breast"));
        assert_eq!(d.sink().editor().matches("ingredient-row").count(), 3);
    }

    #[test]
    fn update_rewrites_label_but_not_editor() {
        let mut d = driver();
        d.start();
        let id = d.store().ids()[0];
        d.dispatch(Event::UpdateIngredient { id, field: IngredientField::Unit, value: "g".into() });
        assert_eq!(d.sink().label_writes(), 2);
        assert_eq!(d.sink().editor_writes(), 1);
        let doc = d.last_document().unwrap();
        assert_eq!(doc.main.ingredients[0].unit, "g");
    }

    #[test]
    fn add_and_remove_regenerate_editor() {
        let mut d = driver();
        d.start();
        let id = d.dispatch_add();
        assert_eq!(d.store().len(), 4);
        assert_eq!(d.sink().editor().matches("ingredient-row").count(), 4);
        // blank row is not an active ingredient
        assert_eq!(d.last_document().unwrap().main.ingredients.len(), 3);

        assert!(d.dispatch(Event::RemoveIngredient(id)));
        assert!(!d.dispatch(Event::RemoveIngredient(id)));
        assert_eq!(d.store().len(), 3);
        assert_eq!(d.sink().editor_writes(), 4);
    }

    #[test]
    fn add_event_and_dispatch_add_behave_alike() {
        let mut via_event = driver();
        let mut via_add = driver();
        via_event.start();
        via_add.start();

        assert!(via_event.dispatch(Event::AddIngredient));
        let id = via_add.dispatch_add();

        assert_eq!(via_event.store().ids(), via_add.store().ids());
        assert_eq!(via_add.store().ids().last(), Some(&id));
        assert_eq!(via_event.sink().label(), via_add.sink().label());
        assert_eq!(via_event.sink().editor(), via_add.sink().editor());
        assert_eq!(via_event.sink().editor_writes(), via_add.sink().editor_writes());
        assert_eq!(via_event.render_count(), via_add.render_count());
    }

    #[test]
    fn decode_for_removed_ingredient_is_harmless() {
        let mut d = driver();
        d.start();
        let id = d.store().ids()[1];
        d.dispatch(Event::RemoveIngredient(id));
        let before = d.store().list().to_vec();

        let changed = d.dispatch(Event::ImageDecoded(DecodeCompletion { id, result: Ok(image()) }));
        assert!(!changed);
        assert_eq!(d.store().list(), before.as_slice());
        assert_eq!(d.last_document().unwrap().grid.filled_count(), 0);
    }

    #[test]
    fn failed_decode_leaves_slot_empty() {
        let mut d = driver();
        d.start();
        let id = d.store().ids()[0];
        let renders = d.render_count();
        let changed = d.dispatch(Event::ImageDecoded(DecodeCompletion {
            id,
            result: Err(Error::UnsupportedImageType("image/gif".into())),
        }));
        assert!(!changed);
        assert_eq!(d.render_count(), renders);
        assert!(d.store().get(id).unwrap().nutrition_image.is_none());
    }

    #[test]
    fn attach_image_fills_positional_slot() {
        let mut d = driver();
        d.start();
        let second = d.store().ids()[1];
        d.dispatch(Event::AttachImage { id: second, image: image() });
        let grid = &d.last_document().unwrap().grid;
        assert!(!grid.slots[0].is_filled());
        assert!(grid.slots[1].is_filled());
        assert!(d.sink().editor().contains("Label Preview"));
    }

    #[test]
    fn form_edits_trigger_render() {
        let mut d = driver();
        d.start();
        d.edit_form(|f| {
            f.product_name = "Fresh Fuel".into();
            f.clear_dietary();
        });
        let main = &d.last_document().unwrap().main;
        assert_eq!(main.product_name, "Fresh Fuel");
        assert_eq!(main.dietary_info, "-");
        assert_eq!(d.sink().label_writes(), 2);
    }

    #[test]
    fn pump_dispatches_loader_completions() {
        let mut d = driver();
        d.start();
        let id = d.store().ids()[0];
        let loader = ImageLoader::new();
        loader.request_bytes(id, b"\x89PNG\r\n\x1a\nrest".to_vec());

        let mut handled = 0;
        for _ in 0..500 {
            handled += d.pump(&loader);
            if handled == 1 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(handled, 1);
        assert!(d.store().get(id).unwrap().nutrition_image.is_some());
        assert!(d.last_document().unwrap().grid.slots[0].is_filled());
    }
}
