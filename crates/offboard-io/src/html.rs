//! Inline HTML preview table for email bodies.
//!
//! Styles are inline because most mail clients strip `<style>` blocks.

use offboard_core::types::AssetTable;

const TABLE_STYLE: &str = "border-collapse:collapse; width:100%;";
const TH_STYLE: &str = "background:#f2f2f2; padding:6px; border:1px solid #ccc; text-align:left;";
const TD_STYLE: &str = "padding:6px; border:1px solid #ccc;";

/// Escape `&`, `<` and `>`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the table, or an empty string when there are no rows.
pub fn build_html_table(table: &AssetTable) -> String {
    if table.is_empty() {
        return String::new();
    }

    let thead: String = table
        .columns
        .iter()
        .map(|c| format!(r#"<th style="{TH_STYLE}">{}</th>"#, escape_html(c)))
        .collect();

    let tbody: String = table
        .rows
        .iter()
        .map(|row| {
            let tds: String = row
                .display_values()
                .map(|v| format!(r#"<td style="{TD_STYLE}">{}</td>"#, escape_html(v)))
                .collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();

    format!(
        r#"<table style="{TABLE_STYLE}"><thead><tr>{thead}</tr></thead><tbody>{tbody}</tbody></table>"#
    )
}
