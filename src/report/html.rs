//! HTML rendering.

use crate::report::SummaryTable;

pub fn render(t: &SummaryTable) -> String {
    let table = &t.table;
    let ncol = table.column_count();
    let mut out = String::new();

    out.push_str("<table class=\"model-summary\">\n");
    out.push_str("  <thead>\n");
    if let Some(title) = &t.title {
        out.push_str(&format!("    <tr class=\"title\"><th colspan=\"{ncol}\">{}</th></tr>\n", escape(title)));
    }
    if let Some(subtitle) = &t.subtitle {
        out.push_str(&format!(
            "    <tr class=\"subtitle\"><th colspan=\"{ncol}\">{}</th></tr>\n",
            escape(subtitle)
        ));
    }
    out.push_str("    <tr class=\"columns\"><th></th>");
    for name in &table.model_names {
        out.push_str(&format!("<th>{}</th>", escape(name)));
    }
    out.push_str("</tr>\n");
    out.push_str("  </thead>\n");

    out.push_str("  <tbody>\n");
    for (i, row) in table.rows.iter().enumerate() {
        // The first gof row draws the boundary under the estimates group.
        let boundary = i == table.estimate_rows.end && !table.estimate_rows.is_empty();
        if boundary {
            out.push_str("    <tr class=\"gof group-start\" style=\"border-top: 1px solid;\">");
        } else if i >= table.estimate_rows.end {
            out.push_str("    <tr class=\"gof\">");
        } else {
            out.push_str("    <tr class=\"estimate\">");
        }
        out.push_str(&format!("<td class=\"label\">{}</td>", escape(&row.label)));
        for value in &row.values {
            out.push_str(&format!("<td>{}</td>", escape(value)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n");

    if !t.notes.is_empty() {
        out.push_str("  <tfoot>\n");
        for note in &t.notes {
            out.push_str(&format!("    <tr class=\"note\"><td colspan=\"{ncol}\">{}</td></tr>\n", escape(note)));
        }
        out.push_str("  </tfoot>\n");
    }
    out.push_str("</table>\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
