//! RTF rendering.
//!
//! One `\trowd` table row per table row. Widths are in twips: the label column is
//! 2 inches and each model column 1 inch.

use crate::report::SummaryTable;

const LABEL_WIDTH: usize = 2880;
const MODEL_WIDTH: usize = 1440;

#[derive(Clone, Copy)]
struct Borders {
    top: bool,
    bottom: bool,
}

pub fn render(t: &SummaryTable) -> String {
    let table = &t.table;
    let mut out = String::new();

    out.push_str("{\\rtf1\\ansi\\deff0\n");
    out.push_str("{\\fonttbl{\\f0 Times New Roman;}}\n");
    if let Some(title) = &t.title {
        out.push_str(&format!("\\pard\\qc\\b {}\\b0\\par\n", escape(title)));
    }
    if let Some(subtitle) = &t.subtitle {
        out.push_str(&format!("\\pard\\qc\\i {}\\i0\\par\n", escape(subtitle)));
    }

    let header: Vec<&str> = std::iter::once("")
        .chain(table.model_names.iter().map(String::as_str))
        .collect();
    write_row(&mut out, &header, Borders { top: true, bottom: true });

    let last = table.rows.len().saturating_sub(1);
    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<&str> = std::iter::once(row.label.as_str())
            .chain(row.values.iter().map(String::as_str))
            .collect();
        let borders = Borders {
            top: i == table.estimate_rows.end && !table.estimate_rows.is_empty(),
            bottom: i == last,
        };
        write_row(&mut out, &cells, borders);
    }

    for note in &t.notes {
        out.push_str(&format!("\\pard\\ql\\fs18 {}\\fs24\\par\n", escape(note)));
    }
    out.push_str("}\n");
    out
}

fn write_row(out: &mut String, cells: &[&str], borders: Borders) {
    out.push_str("\\trowd\\trgaph108");
    let mut right = 0;
    for i in 0..cells.len() {
        if borders.top {
            out.push_str("\\clbrdrt\\brdrs\\brdrw10");
        }
        if borders.bottom {
            out.push_str("\\clbrdrb\\brdrs\\brdrw10");
        }
        right += if i == 0 { LABEL_WIDTH } else { MODEL_WIDTH };
        out.push_str(&format!("\\cellx{right}"));
    }
    out.push('\n');
    for (i, cell) in cells.iter().enumerate() {
        let align = if i == 0 { "\\ql" } else { "\\qc" };
        out.push_str(&format!("\\pard\\intbl{align} {}\\cell", escape(cell)));
    }
    out.push_str("\\row\n");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\line "),
            c if c.is_ascii() => out.push(c),
            c => {
                // \uN takes a signed 16-bit value; astral characters go as surrogate pairs.
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}
