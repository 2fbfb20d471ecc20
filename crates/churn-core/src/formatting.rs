use std::collections::BTreeMap;

use crate::table::Table;

/// Render a label → number mapping in its plain key→value textual form.
///
/// Keys are quoted, values use Rust's shortest round-trip float formatting and
/// no locale-specific grouping is applied.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use churn_core::formatting::format_label_map;
///
/// let mut rates = BTreeMap::new();
/// rates.insert("Yes".to_string(), 0.25);
/// rates.insert("No".to_string(), 0.75);
/// assert_eq!(format_label_map(&rates), r#"{"No": 0.75, "Yes": 0.25}"#);
/// assert_eq!(format_label_map(&BTreeMap::new()), "{}");
/// ```
pub fn format_label_map(map: &BTreeMap<String, f64>) -> String {
    let body: Vec<String> = map
        .iter()
        .map(|(label, value)| format!("{:?}: {:?}", label, value))
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// Escape the five characters that are significant in HTML text and
/// attribute values.
///
/// # Examples
///
/// ```
/// use churn_core::formatting::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Tab-separated preview of a table: a header line with the column names
/// followed by one line per row.
pub fn format_preview(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(table.column_names().join("\t"));
    for i in 0..table.row_count() {
        let cells: Vec<String> = table.row(i).iter().map(|c| c.to_string()).collect();
        lines.push(cells.join("\t"));
    }
    lines.join("\n")
}
