//! Long-to-wide merge of the per-model row streams.

use std::collections::HashMap;

use crate::domain::{AssembledRow, AssembledTable, CoefficientMap, GofMap, RowGroup, RowPart, TidyRow};

/// Merge one row stream per model into the wide table.
///
/// Cells are keyed by (label, part); a model without a value for a key gets an
/// empty cell. Added rows are matched by position since their labels may repeat.
pub fn assemble(
    model_names: Vec<String>,
    streams: &[Vec<TidyRow>],
    coef_map: Option<&CoefficientMap>,
    gof_map: &GofMap,
) -> AssembledTable {
    let n = model_names.len();
    let mut cells: HashMap<(&str, RowPart), Vec<String>> = HashMap::new();
    let mut estimate_seen: Vec<&str> = Vec::new();
    let mut gof_seen: Vec<&str> = Vec::new();

    for row in streams.iter().flatten() {
        match row.part {
            RowPart::Added => continue,
            RowPart::Estimate if !estimate_seen.contains(&row.term.as_str()) => estimate_seen.push(&row.term),
            RowPart::Gof if !gof_seen.contains(&row.term.as_str()) => gof_seen.push(&row.term),
            _ => {}
        }
        let slot = cells
            .entry((row.term.as_str(), row.part))
            .or_insert_with(|| vec![String::new(); n]);
        if let Some(cell) = slot.get_mut(row.model_index) {
            cell.clone_from(&row.value);
        }
    }

    let estimate_order: Vec<&str> = match coef_map {
        Some(map) => map
            .display_order()
            .into_iter()
            .filter(|label| estimate_seen.contains(label))
            .collect(),
        None => estimate_seen,
    };
    let mut gof_order: Vec<&str> = gof_map
        .display_order()
        .into_iter()
        .filter(|label| gof_seen.contains(label))
        .collect();
    for label in gof_seen {
        if !gof_order.contains(&label) {
            gof_order.push(label);
        }
    }

    let mut rows = Vec::with_capacity(2 * estimate_order.len() + gof_order.len());
    for label in &estimate_order {
        rows.push(AssembledRow {
            label: label.to_string(),
            group: RowGroup::Estimate,
            values: take(&mut cells, label, RowPart::Estimate, n),
        });
        rows.push(AssembledRow {
            label: String::new(),
            group: RowGroup::Estimate,
            values: take(&mut cells, label, RowPart::Uncertainty, n),
        });
    }
    let estimate_rows = 0..rows.len();

    for label in &gof_order {
        rows.push(AssembledRow {
            label: label.to_string(),
            group: RowGroup::Gof,
            values: take(&mut cells, label, RowPart::Gof, n),
        });
    }
    rows.extend(added_rows(streams, n));

    AssembledTable {
        model_names,
        rows,
        estimate_rows,
    }
}

fn take<'a>(cells: &mut HashMap<(&'a str, RowPart), Vec<String>>, label: &'a str, part: RowPart, n: usize) -> Vec<String> {
    cells
        .remove(&(label, part))
        .unwrap_or_else(|| vec![String::new(); n])
}

fn added_rows(streams: &[Vec<TidyRow>], n: usize) -> Vec<AssembledRow> {
    let per_model: Vec<Vec<&TidyRow>> = streams
        .iter()
        .map(|s| s.iter().filter(|r| r.part == RowPart::Added).collect())
        .collect();
    let Some(first) = per_model.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|k| {
            let mut values = vec![String::new(); n];
            for rows in &per_model {
                if let Some(row) = rows.get(k) {
                    if let Some(cell) = values.get_mut(row.model_index) {
                        cell.clone_from(&row.value);
                    }
                }
            }
            AssembledRow {
                label: first[k].term.clone(),
                group: RowGroup::Gof,
                values,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(term: &str, part: RowPart, value: &str, model_index: usize) -> TidyRow {
        TidyRow {
            term: term.to_string(),
            part,
            value: value.to_string(),
            model_index,
        }
    }

    fn coef(term: &str, est: &str, se: &str, m: usize) -> [TidyRow; 2] {
        [row(term, RowPart::Estimate, est, m), row(term, RowPart::Uncertainty, se, m)]
    }

    fn names() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    fn labels(t: &AssembledTable) -> Vec<&str> {
        t.rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn disjoint_coefficients_get_empty_cells() {
        let a: Vec<TidyRow> = coef("x", "1.000", "(0.100)", 0).into();
        let b: Vec<TidyRow> = coef("z", "2.000", "(0.200)", 1).into();
        let t = assemble(names(), &[a, b], None, &GofMap::default());

        assert_eq!(labels(&t), vec!["x", "", "z", ""]);
        assert_eq!(t.rows[0].values, vec!["1.000", ""]);
        assert_eq!(t.rows[1].values, vec!["(0.100)", ""]);
        assert_eq!(t.rows[2].values, vec!["", "2.000"]);
        assert_eq!(t.estimate_rows, 0..4);
        assert!(t.gof_rows().is_empty());
    }

    #[test]
    fn coef_map_order_wins_over_first_seen() {
        let mut a: Vec<TidyRow> = coef("Constant", "1", "(1)", 0).into();
        a.extend(coef("Slope", "2", "(2)", 0));
        let map = CoefficientMap::new([("x", "Slope"), ("(Intercept)", "Constant"), ("w", "Unused")]);
        let t = assemble(vec!["A".to_string()], &[a], Some(&map), &GofMap::default());
        assert_eq!(labels(&t), vec!["Slope", "", "Constant", ""]);
    }

    #[test]
    fn gof_rows_follow_map_then_first_seen_then_added() {
        let a = vec![
            row("custom", RowPart::Gof, "1", 0),
            row("R2", RowPart::Gof, "0.5", 0),
            row("Num.Obs.", RowPart::Gof, "10", 0),
            row("FE", RowPart::Added, "Yes", 0),
        ];
        let b = vec![
            row("Num.Obs.", RowPart::Gof, "20", 1),
            row("other", RowPart::Gof, "3", 1),
            row("FE", RowPart::Added, "No", 1),
        ];
        let t = assemble(names(), &[a, b], None, &GofMap::default());
        assert_eq!(labels(&t), vec!["Num.Obs.", "R2", "custom", "other", "FE"]);
        assert_eq!(t.row("Num.Obs.").unwrap().values, vec!["10", "20"]);
        assert_eq!(t.row("R2").unwrap().values, vec!["0.5", ""]);
        assert_eq!(t.row("FE").unwrap().values, vec!["Yes", "No"]);
        assert_eq!(t.estimate_rows, 0..0);
    }

    #[test]
    fn shared_labels_merge_across_models() {
        let mut a: Vec<TidyRow> = coef("x", "1", "(1)", 0).into();
        a.push(row("Num.Obs.", RowPart::Gof, "10", 0));
        let mut b: Vec<TidyRow> = coef("x", "3", "(3)", 1).into();
        b.push(row("Num.Obs.", RowPart::Gof, "12", 1));
        let t = assemble(names(), &[a, b], None, &GofMap::default());
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0].values, vec!["1", "3"]);
        assert_eq!(t.gof_rows()[0].group, RowGroup::Gof);
    }
}
