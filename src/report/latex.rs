//! LaTeX rendering (booktabs).
//!
//! The output is a floating `table` holding one `tabular`. It needs
//! `\usepackage{booktabs}` in the preamble.

use crate::report::SummaryTable;

pub fn render(t: &SummaryTable) -> String {
    let table = &t.table;
    let ncol = table.column_count();
    let mut out = String::new();

    out.push_str("\\begin{table}[!h]\n");
    out.push_str("\\centering\n");
    if let Some(title) = &t.title {
        out.push_str(&format!("\\caption{{{}}}\n", escape(title)));
    }
    out.push_str(&format!("\\begin{{tabular}}{{l{}}}\n", "c".repeat(table.model_names.len())));
    out.push_str("\\toprule\n");
    if let Some(subtitle) = &t.subtitle {
        out.push_str(&format!("\\multicolumn{{{ncol}}}{{c}}{{\\textit{{{}}}}} \\\\\n", escape(subtitle)));
    }

    let header: Vec<String> = table.model_names.iter().map(|n| escape(n)).collect();
    out.push_str(&format!(" & {} \\\\\n", header.join(" & ")));
    out.push_str("\\midrule\n");

    for (i, row) in table.rows.iter().enumerate() {
        if i == table.estimate_rows.end && !table.estimate_rows.is_empty() {
            out.push_str("\\midrule\n");
        }
        let mut cells = Vec::with_capacity(ncol);
        cells.push(escape(&row.label));
        cells.extend(row.values.iter().map(|v| escape(v)));
        out.push_str(&format!("{} \\\\\n", cells.join(" & ")));
    }
    out.push_str("\\bottomrule\n");

    for note in &t.notes {
        out.push_str(&format!("\\multicolumn{{{ncol}}}{{l}}{{\\footnotesize {}}} \\\\\n", escape(note)));
    }
    out.push_str("\\end{tabular}\n");
    out.push_str("\\end{table}\n");
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::small_table;

    #[test]
    fn renders_booktabs_tabular() {
        let tex = render(&small_table());
        assert!(tex.contains("\\begin{tabular}{lcc}"));
        assert!(tex.contains("\\caption{Fuel \\& weight}"));
        assert!(tex.contains("\\multicolumn{3}{c}{\\textit{OLS \\textless{}linear\\textgreater{}}} \\\\"));
        assert!(tex.contains(" & Model 1 & Model 2 \\\\"));
        assert!(tex.contains("x\\_1 & 1.000** & 0.900 \\\\"));
        assert!(tex.contains(" & (0.100) & (0.500) \\\\"));
        assert!(tex.contains("Num.Obs. & 32 &  \\\\"));
        assert!(tex.trim_end().ends_with("\\end{table}"));
    }

    #[test]
    fn separates_groups_with_midrules() {
        let tex = render(&small_table());
        // header/body and estimates/gof
        assert_eq!(tex.matches("\\midrule").count(), 2);
        let lines: Vec<&str> = tex.lines().collect();
        let gof = lines.iter().position(|l| l.starts_with("Num.Obs.")).unwrap();
        assert_eq!(lines[gof - 1], "\\midrule");
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("50% of $x_1 {a}"), "50\\% of \\$x\\_1 \\{a\\}");
        assert_eq!(escape("a\\b~c^d"), "a\\textbackslash{}b\\textasciitilde{}c\\textasciicircum{}d");
    }
}
