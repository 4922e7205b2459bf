//! 结果的文本渲染

use std::fmt::Write;

use crate::models::CombinedResult;

/// 渲染结果卡片
pub fn render_results(result: Option<&CombinedResult>, loading: bool) -> String {
    if loading {
        return "Processing image...\n".to_string();
    }
    let Some(result) = result else {
        return "No result yet. Upload an image to begin.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", result.plant_name());
    let _ = writeln!(out, "{}", "=".repeat(result.plant_name().chars().count().max(3)));

    render_section(
        &mut out,
        "Medicinal Properties",
        result.medicinal_properties(),
        "None found",
    );
    render_section(&mut out, "Regions", result.regions(), "Not specified");
    render_section(&mut out, "Facts", result.facts(), "No facts available");

    let _ = writeln!(out, "\nModel Scores");
    let scores = serde_json::to_string_pretty(result.scores()).unwrap_or_else(|_| "{}".to_string());
    let _ = writeln!(out, "{}", scores);

    out
}

fn render_section(out: &mut String, title: &str, items: &[String], empty: &str) {
    let _ = writeln!(out, "\n{}", title);
    if items.is_empty() {
        let _ = writeln!(out, "  {}", empty);
    } else {
        for item in items {
            let _ = writeln!(out, "  • {}", item);
        }
    }
}
