//! Form reading
//!
//! The label header comes from four form fields. A [`FormSource`] exposes the
//! raw values; [`FormSnapshot::read`] applies placeholders and the dietary
//! fallback. Snapshots are rebuilt on every render and never cached.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::{Error, LabelConfig, Result};

/// Raw access to the form fields that feed the label
pub trait FormSource {
    fn product_name(&self) -> String;
    fn meal_name(&self) -> String;
    fn handling_instructions(&self) -> String;
    /// Value of the checked dietary option, `None` if nothing is checked
    fn dietary_selection(&self) -> Option<String>;
}

/// Form values with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub product_name: String,
    pub meal_name: String,
    pub dietary_info: String,
    pub handling_instructions: String,
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

impl FormSnapshot {
    /// Read the current form values. Never fails: empty fields fall back to
    /// their placeholders and a missing dietary choice to the fallback marker.
    /// Anything else, whitespace included, is taken verbatim.
    pub fn read<F: FormSource + ?Sized>(source: &F, config: &LabelConfig) -> Self {
        let dietary_info = match source.dietary_selection() {
            Some(v) if !v.is_empty() => v,
            _ => {
                log::debug!("no dietary option selected, using fallback");
                config.dietary_fallback.clone()
            }
        };
        Self {
            product_name: or_placeholder(source.product_name(), &config.product_name_placeholder),
            meal_name: or_placeholder(source.meal_name(), &config.meal_name_placeholder),
            dietary_info,
            handling_instructions: or_placeholder(
                source.handling_instructions(),
                &config.handling_placeholder,
            ),
        }
    }
}

/// In-memory form used by the CLI and by tests
///
/// The dietary control behaves like a radio group: [`FormFields::new`]
/// checks the first option and [`select_dietary`](Self::select_dietary)
/// only accepts one of the configured options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub product_name: String,
    pub meal_name: String,
    pub handling_instructions: String,
    dietary_options: Vec<String>,
    dietary: Option<String>,
}

impl FormFields {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            product_name: String::new(),
            meal_name: String::new(),
            handling_instructions: String::new(),
            dietary: config.dietary_options.first().cloned(),
            dietary_options: config.dietary_options.clone(),
        }
    }

    pub fn dietary_options(&self) -> &[String] {
        &self.dietary_options
    }

    pub fn dietary(&self) -> Option<&str> {
        self.dietary.as_deref()
    }

    /// Check one of the configured options. Unknown values leave the
    /// selection untouched and return `false`.
    pub fn select_dietary(&mut self, value: &str) -> bool {
        match self.dietary_options.iter().find(|o| o.eq_ignore_ascii_case(value)) {
            Some(option) => {
                self.dietary = Some(option.clone());
                true
            }
            None => false,
        }
    }

    /// Uncheck every dietary option, as a broken host page would
    pub fn clear_dietary(&mut self) {
        self.dietary = None;
    }
}

impl FormSource for FormFields {
    fn product_name(&self) -> String {
        self.product_name.clone()
    }

    fn meal_name(&self) -> String {
        self.meal_name.clone()
    }

    fn handling_instructions(&self) -> String {
        self.handling_instructions.clone()
    }

    fn dietary_selection(&self) -> Option<String> {
        self.dietary.clone()
    }
}

/// Form fields read from a host HTML page
///
/// Text fields are located by id (`productName`, `mealName`,
/// `handlingInstructions`); the dietary choice is the checked
/// `input[name="dietaryInfo"]` radio.
pub struct HtmlForm {
    document: Html,
}

pub const PRODUCT_NAME_ID: &str = "productName";
pub const MEAL_NAME_ID: &str = "mealName";
pub const HANDLING_INSTRUCTIONS_ID: &str = "handlingInstructions";
pub const DIETARY_INPUT_NAME: &str = "dietaryInfo";

impl HtmlForm {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .map_err(|e| Error::FormError(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(Self::parse(&html))
    }

    fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse(css).ok()?;
        self.document.select(&sel).next()
    }

    /// Current value of a text input or textarea
    fn field_value(&self, id: &str) -> String {
        let Some(el) = self.select_first(&format!("#{}", id)) else {
            return String::new();
        };
        if el.value().name() == "textarea" {
            el.text().collect()
        } else {
            el.value().attr("value").unwrap_or_default().to_string()
        }
    }

    /// Values of every dietary radio on the page, in document order
    pub fn dietary_options(&self) -> Vec<String> {
        let Ok(sel) = Selector::parse(&format!(r#"input[name="{}"]"#, DIETARY_INPUT_NAME)) else {
            return Vec::new();
        };
        self.document
            .select(&sel)
            .filter_map(|el| el.value().attr("value"))
            .map(str::to_string)
            .collect()
    }
}

impl FormSource for HtmlForm {
    fn product_name(&self) -> String {
        self.field_value(PRODUCT_NAME_ID)
    }

    fn meal_name(&self) -> String {
        self.field_value(MEAL_NAME_ID)
    }

    fn handling_instructions(&self) -> String {
        self.field_value(HANDLING_INSTRUCTIONS_ID)
    }

    fn dietary_selection(&self) -> Option<String> {
        self.select_first(&format!(r#"input[name="{}"][checked]"#, DIETARY_INPUT_NAME))
            .and_then(|el| el.value().attr("value").map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_PAGE: &str = r#"<html><body><form id="labelForm">
        <input type="text" id="productName" value="Fresh Fuel">
        <input type="text" id="mealName" value="">
        <label><input type="radio" name="dietaryInfo" value="None"> None</label>
        <label><input type="radio" name="dietaryInfo" value="Vegan" checked> Vegan</label>
        <textarea id="handlingInstructions">Keep refrigerated</textarea>
    </form></body></html>"#;

    #[test]
    fn empty_form_renders_placeholders() {
        let cfg = LabelConfig::default();
        let mut form = FormFields::new(&cfg);
        form.clear_dietary();
        let snap = FormSnapshot::read(&form, &cfg);
        assert_eq!(snap.product_name, "Product Name");
        assert_eq!(snap.meal_name, "Insert Meal Name");
        assert_eq!(snap.handling_instructions, "Insert handling instructions");
        assert_eq!(snap.dietary_info, "-");
    }

    #[test]
    fn new_form_has_exactly_one_dietary_choice() {
        let cfg = LabelConfig::default();
        let form = FormFields::new(&cfg);
        assert_eq!(form.dietary(), Some("None"));
    }

    #[test]
    fn select_dietary_only_accepts_known_options() {
        let cfg = LabelConfig::default();
        let mut form = FormFields::new(&cfg);
        assert!(form.select_dietary("vegan"));
        assert_eq!(form.dietary(), Some("Vegan"));
        assert!(!form.select_dietary("Keto"));
        assert_eq!(form.dietary(), Some("Vegan"));
    }

    #[test]
    fn filled_values_pass_through() {
        let cfg = LabelConfig::default();
        let mut form = FormFields::new(&cfg);
        form.product_name = "Fresh Fuel".into();
        form.meal_name = "Chicken Stir-fry".into();
        form.handling_instructions = "Reheat to 165F".into();
        form.select_dietary("Gluten-Free");
        let snap = FormSnapshot::read(&form, &cfg);
        assert_eq!(snap.product_name, "Fresh Fuel");
        assert_eq!(snap.meal_name, "Chicken Stir-fry");
        assert_eq!(snap.handling_instructions, "Reheat to 165F");
        assert_eq!(snap.dietary_info, "Gluten-Free");
    }

    #[test]
    fn whitespace_only_values_are_not_empty() {
        struct Spaces;
        impl FormSource for Spaces {
            fn product_name(&self) -> String {
                "   ".into()
            }
            fn meal_name(&self) -> String {
                " ".into()
            }
            fn handling_instructions(&self) -> String {
                "\n".into()
            }
            fn dietary_selection(&self) -> Option<String> {
                Some("  ".into())
            }
        }

        let cfg = LabelConfig::default();
        let snap = FormSnapshot::read(&Spaces, &cfg);
        assert_eq!(snap.product_name, "   ");
        assert_eq!(snap.meal_name, " ");
        assert_eq!(snap.handling_instructions, "\n");
        assert_eq!(snap.dietary_info, "  ");

        let mut form = FormFields::new(&cfg);
        form.product_name = "   ".into();
        assert_eq!(FormSnapshot::read(&form, &cfg).product_name, "   ");
    }

    #[test]
    fn html_form_reads_fields_and_checked_radio() {
        let cfg = LabelConfig::default();
        let form = HtmlForm::parse(HOST_PAGE);
        let snap = FormSnapshot::read(&form, &cfg);
        assert_eq!(snap.product_name, "Fresh Fuel");
        assert_eq!(snap.meal_name, "Insert Meal Name");
        assert_eq!(snap.dietary_info, "Vegan");
        assert_eq!(snap.handling_instructions, "Keep refrigerated");
        assert_eq!(form.dietary_options(), vec!["None", "Vegan"]);
    }

    #[test]
    fn html_form_without_checked_radio_falls_back() {
        let cfg = LabelConfig::default();
        let page = HOST_PAGE.replace(" checked", "");
        let form = HtmlForm::parse(&page);
        assert_eq!(form.dietary_selection(), None);
        assert_eq!(FormSnapshot::read(&form, &cfg).dietary_info, "-");
    }

    #[test]
    fn html_form_missing_fields_read_as_blank() {
        let cfg = LabelConfig::default();
        let form = HtmlForm::parse("<html><body></body></html>");
        let snap = FormSnapshot::read(&form, &cfg);
        assert_eq!(snap.product_name, "Product Name");
        assert_eq!(snap.handling_instructions, "Insert handling instructions");
    }
}
