//! Reading a host page and checking the structure of the generated markup

use scraper::{Html, Selector};

use meal_label::{
    FormSnapshot, HtmlForm, IngredientStore, LabelConfig, MemorySink, NutritionImage, RenderDriver,
};

const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Meal Label Maker</title></head>
<body>
<form id="labelForm">
  <input type="text" id="productName" value="Fresh &amp; Fit">
  <input type="text" id="mealName" value="Teriyaki Chicken">
  <input type="radio" name="dietaryInfo" value="None">
  <input type="radio" name="dietaryInfo" value="Gluten-Free" checked>
  <textarea id="handlingInstructions">Keep refrigerated. Microwave 2 minutes.</textarea>
</form>
<div id="ingredientsContainer"></div>
<div id="label-preview"></div>
</body>
</html>"#;

fn texts(doc: &Html, css: &str) -> Vec<String> {
    let sel = Selector::parse(css).expect("valid selector");
    doc.select(&sel)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect()
}

#[test]
fn host_page_values_reach_the_label() {
    let cfg = LabelConfig::default();
    let form = HtmlForm::parse(HOST_PAGE);
    let snap = FormSnapshot::read(&form, &cfg);
    assert_eq!(snap.product_name, "Fresh & Fit");
    assert_eq!(snap.dietary_info, "Gluten-Free");

    let mut driver = RenderDriver::new(cfg, form, MemorySink::default());
    driver.start();
    let preview = Html::parse_fragment(driver.sink().label());

    assert_eq!(texts(&preview, ".meal-label-box .text-xl"), vec!["Fresh & Fit"]);
    assert_eq!(texts(&preview, ".meal-name"), vec!["Teriyaki Chicken"]);
    assert_eq!(texts(&preview, ".dietary-info"), vec!["Gluten-Free"]);
    assert_eq!(
        texts(&preview, ".handling-instructions"),
        vec!["Keep refrigerated. Microwave 2 minutes."]
    );
    assert_eq!(
        texts(&preview, ".ingredient-lines .flex-grow"),
        vec!["Diced Chicken Breast", "Stir-fry Vegetable Mix", "Low Sodium Soy Sauce"]
    );
    assert_eq!(texts(&preview, ".sticker-box"), vec!["STICKER HERE", "STICKER HERE"]);
}

#[test]
fn grid_markup_has_five_children_in_order() {
    let cfg = LabelConfig::default();
    let mut store = IngredientStore::new();
    store.add_with("Rice", "cup");
    let beans = store.add_with("Beans", "oz");
    store.attach_image(
        beans,
        NutritionImage::from_data_url("data:image/jpeg;base64,/9j/4AAQ").expect("jpeg url"),
    );

    let mut driver =
        RenderDriver::with_store(cfg, store, HtmlForm::parse(HOST_PAGE), MemorySink::default());
    driver.start();
    let preview = Html::parse_fragment(driver.sink().label());

    let slot_sel = Selector::parse("#nutrition-images-grid > .nutrition-image-container")
        .expect("valid selector");
    let slots: Vec<_> = preview.select(&slot_sel).collect();
    assert_eq!(slots.len(), 5);

    let empty: Vec<bool> = slots
        .iter()
        .map(|s| s.value().classes().any(|c| c == "nutrition-slot-empty"))
        .collect();
    assert_eq!(empty, vec![true, false, true, true, true]);

    let img_sel = Selector::parse("img").expect("valid selector");
    let img = slots[1].select(&img_sel).next().expect("image in filled slot");
    assert_eq!(img.value().attr("alt"), Some("Ingredient 2"));
    assert_eq!(img.value().attr("src"), Some("data:image/jpeg;base64,/9j/4AAQ"));
}

#[test]
fn editor_rows_round_trip_names_through_attributes() {
    let cfg = LabelConfig::default();
    let mut store = IngredientStore::new();
    store.add_with(r#"Salt "Kosher""#, "tsp");

    let mut driver =
        RenderDriver::with_store(cfg, store, HtmlForm::parse(HOST_PAGE), MemorySink::default());
    driver.start();
    let editor = Html::parse_fragment(driver.sink().editor());

    let sel = Selector::parse(r#"input[placeholder="Ingredient Name"]"#).expect("valid selector");
    let input = editor.select(&sel).next().expect("name input");
    assert_eq!(input.value().attr("value"), Some(r#"Salt "Kosher""#));
}
