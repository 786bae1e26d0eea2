//! Plain-text projection, handy for terminals and snapshot tests

use crate::compose::{LabelDocument, NutritionSlot};

const RULE_WIDTH: usize = 48;
const BLANK_AMOUNT: &str = "____";

pub fn label_text(doc: &LabelDocument) -> String {
    let main = &doc.main;
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::new();

    lines.push(main.product_name.clone());
    lines.push(rule.clone());
    let stickers: Vec<String> = main
        .stickers
        .iter()
        .map(|s| format!("{} [{}]", s.caption, s.text))
        .collect();
    lines.push(stickers.join("   "));
    lines.push(rule.clone());
    lines.push(format!("Meal Name: {}", main.meal_name));
    lines.push("Ingredients:".to_string());
    for line in &main.ingredients {
        lines.push(format!("  {} {}  {}", BLANK_AMOUNT, line.unit, line.name));
    }
    lines.push(format!("Dietary Info: {}", main.dietary_info));
    lines.push(format!("Handling Instructions: {}", main.handling_instructions));
    lines.push(rule);
    lines.push(format!("Prepared At: {}", main.prepared_at));
    let dates: Vec<&str> = main
        .date_slots
        .iter()
        .map(|d| if d.is_empty() { BLANK_AMOUNT } else { d.as_str() })
        .collect();
    lines.push(format!("Prepared On: {}", dates.join(" / ")));
    lines.push(String::new());
    lines.push("Nutrition Labels:".to_string());
    for slot in &doc.grid.slots {
        let entry = match slot {
            NutritionSlot::Filled { title, image, .. } => format!(
                "{} ({}, {} bytes)",
                title,
                image.mime().as_str(),
                image.byte_len()
            ),
            NutritionSlot::Empty { caption, .. } => caption.clone(),
        };
        lines.push(format!("  [{}] {}", slot.index() + 1, entry));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
