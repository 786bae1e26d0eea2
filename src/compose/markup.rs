//! HTML projection of the label and of the ingredient editor
//!
//! All user-supplied text passes through [`escape`] exactly once, here.
//! Class names match the stylesheet of the host page, including
//! `nutrition-slot-empty`, which print styling hides.

use crate::compose::{IngredientLine, LabelDocument, MainLabel, NutritionGrid, NutritionSlot};
use crate::store::IngredientRecord;

const CONTENT_CLASS: &str = "flex items-start mb-3";
const LABEL_COL_CLASS: &str = "w-32 text-sm font-medium text-gray-800 flex-none";
const VALUE_COL_CLASS: &str = "text-sm flex-grow";
const GRID_COLS_CLASS: &str = "grid-cols-5-print";

const UPLOAD_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-6 w-6 mx-auto text-indigo-400" fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2"><path stroke-linecap="round" stroke-linejoin="round" d="M4 16l4.586-4.586a2 2 0 012.828 0L16 16m-2-2l1.586-1.586a2 2 0 012.828 0L20 14m-6-6h.01M6 20h12a2 2 0 002-2V6a2 2 0 00-2-2H6a2 2 0 00-2 2v12a2 2 0 002 2z" /></svg>"#;
const REMOVE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5" viewBox="0 0 20 20" fill="currentColor"><path fill-rule="evenodd" d="M9 2a1 1 0 00-.894.553L7.382 4H4a1 1 0 000 2v10a2 2 0 002 2h8a2 2 0 002-2V6a1 1 0 100-2h-3.382l-.724-1.447A1 1 0 0011 2H9zM7 8a1 1 0 012 0v6a1 1 0 11-2 0V8zm5-1a1 1 0 00-1 1v6a1 1 0 102 0V8a1 1 0 00-1-1z" clip-rule="evenodd" /></svg>"#;

/// Escape text for use in element content and double- or single-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn ingredient_line_html(line: &IngredientLine) -> String {
    format!(
        r#"<div class="flex items-start mb-1"><div class="flex-none flex items-center w-20 text-sm font-medium text-gray-800"><span class="oz-line w-10"></span><span class="ml-2">{}</span></div><span class="flex-grow text-sm">{}</span></div>"#,
        escape(&line.unit),
        escape(&line.name)
    )
}

fn main_label_html(label: &MainLabel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        r#"<div class="text-xl font-bold text-gray-900">{}</div><div class="label-line mt-1"></div>"#,
        escape(&label.product_name)
    ));

    out.push_str(r#"<div class="flex justify-between items-center mb-4">"#);
    for sticker in &label.stickers {
        out.push_str(&format!(
            r#"<div class="flex items-center text-sm font-medium">{}<div class="sticker-box ml-2 text-center text-xs font-bold uppercase text-gray-700">{}</div></div>"#,
            escape(&sticker.caption),
            escape(&sticker.text)
        ));
    }
    out.push_str(r#"</div><div class="label-line"></div>"#);

    out.push_str(&format!(
        r#"<div class="{c}"><span class="{l}">Meal Name</span><span class="{v} font-bold meal-name">{}</span></div>"#,
        escape(&label.meal_name),
        c = CONTENT_CLASS,
        l = LABEL_COL_CLASS,
        v = VALUE_COL_CLASS
    ));

    let lines: String = label.ingredients.iter().map(ingredient_line_html).collect();
    out.push_str(&format!(
        r#"<div class="mb-2"><div class="{c} mb-0"><span class="{l}">Ingredients</span><div class="{v}"><div class="mt-2 pl-4 ingredient-lines">{}</div></div></div></div>"#,
        lines,
        c = CONTENT_CLASS,
        l = LABEL_COL_CLASS,
        v = VALUE_COL_CLASS
    ));

    out.push_str(&format!(
        r#"<div class="{c} mt-3"><span class="{l}">Dietary Info</span><span class="{v} font-bold text-indigo-700 dietary-info">{}</span></div>"#,
        escape(&label.dietary_info),
        c = CONTENT_CLASS,
        l = LABEL_COL_CLASS,
        v = VALUE_COL_CLASS
    ));
    out.push_str(&format!(
        r#"<div class="{c} mb-4"><span class="{l}">Handling Instructions</span><span class="{v} handling-instructions">{}</span></div><div class="label-line"></div>"#,
        escape(&label.handling_instructions),
        c = CONTENT_CLASS,
        l = LABEL_COL_CLASS,
        v = VALUE_COL_CLASS
    ));

    out.push_str(&format!(
        r#"<div class="mb-2 text-sm"><span class="font-medium text-gray-800">Prepared At</span><span class="ml-4 text-gray-700 font-medium">{}</span></div>"#,
        escape(&label.prepared_at)
    ));
    let dates: Vec<String> = label
        .date_slots
        .iter()
        .map(|d| format!(r#"<span class="date-line">{}</span>"#, escape(d)))
        .collect();
    out.push_str(&format!(
        r#"<div class="flex items-center text-sm"><span class="font-medium text-gray-800">Prepared On</span><span class="ml-4 text-gray-700">{}</span></div>"#,
        dates.join(" / ")
    ));
    out
}

fn slot_html(slot: &NutritionSlot) -> String {
    match slot {
        NutritionSlot::Filled { title, image, .. } => format!(
            r#"<div class="nutrition-image-container flex-none text-center bg-gray-50"><h3 class="text-[10px] font-semibold mb-1 truncate text-gray-800 px-1 pt-1">{t}</h3><img src="{}" alt="{t}" class="h-auto"></div>"#,
            escape(image.data_url()),
            t = escape(title)
        ),
        NutritionSlot::Empty { caption, .. } => format!(
            r#"<div class="nutrition-image-container nutrition-slot-empty flex-none text-center flex"><span class="text-xs text-gray-500 m-auto">{}</span></div>"#,
            escape(caption)
        ),
    }
}

fn grid_html(grid: &NutritionGrid) -> String {
    let slots: String = grid.slots.iter().map(slot_html).collect();
    format!(
        r#"<div id="nutrition-labels-section" class="pt-0 w-full mt-4"><div id="nutrition-images-grid" class="grid {} gap-4">{}</div></div>"#,
        GRID_COLS_CLASS, slots
    )
}

/// Full preview markup written to the label output region
pub fn label_html(doc: &LabelDocument) -> String {
    format!(
        r#"<div class="print-stacked-layout w-full h-full"><div class="meal-label-box p-4 bg-white shadow-2xl mb-6 w-full">{}</div>{}</div>"#,
        main_label_html(&doc.main),
        grid_html(&doc.grid)
    )
}

fn editor_row_html(rec: &IngredientRecord) -> String {
    let id = rec.id;
    let preview = match &rec.nutrition_image {
        Some(image) => format!(
            r#"<img src="{}" class="h-10 w-auto mx-auto object-contain" alt="Label Preview">"#,
            escape(image.data_url())
        ),
        None => format!(
            r#"{}<span class="text-gray-500 text-xs mt-1">Upload Label</span>"#,
            UPLOAD_ICON
        ),
    };
    format!(
        r#"<div class="flex items-stretch space-x-2 border-b pb-3 ingredient-row" data-ingredient-id="{id}"><div class="flex-1 flex space-x-2"><input type="text" value="{name}" oninput="updateIngredient({id}, 'name', this.value)" placeholder="Ingredient Name" maxlength="250" class="flex-grow rounded-lg border-gray-300 shadow-sm p-2 border"><input type="text" value="{unit}" oninput="updateIngredient({id}, 'unit', this.value)" placeholder="Unit" class="w-16 text-center rounded-lg border-gray-300 shadow-sm p-2 border"></div><div class="flex-none w-24 flex flex-col justify-center items-center bg-gray-50 border rounded-lg hover:border-indigo-500 cursor-pointer p-1 relative" onclick="document.getElementById('file-input-{id}').click()">{preview}<input type="file" id="file-input-{id}" onchange="handleImageUpload(event, {id})" accept="image/png, image/jpeg" class="absolute inset-0 opacity-0 cursor-pointer"></div><button type="button" onclick="removeIngredient({id})" class="flex-none text-red-500 hover:text-red-700 p-2 self-center rounded-full">{remove}</button></div>"#,
        id = id,
        name = escape(&rec.name),
        unit = escape(&rec.unit),
        preview = preview,
        remove = REMOVE_ICON
    )
}

/// Editing rows, one per record, written to the editor region
pub fn editor_html(records: &[IngredientRecord]) -> String {
    records.iter().map(editor_row_html).collect()
}
