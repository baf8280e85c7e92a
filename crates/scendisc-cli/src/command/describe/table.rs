//! Aligned text tables
//!
//! The first column holds row labels and is left-aligned; every other column
//! is right-aligned to its widest cell.

use std::fmt::Write as _;

use scendisc_analysis::report::{BoxesTable, Cell, StatsTable};

pub(super) struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub(super) fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    pub(super) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = self
            .header
            .iter()
            .map(|h| h.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
        out.push(' ');
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i == 0 {
                let _ = write!(out, " {cell:<width$}");
            } else {
                let _ = write!(out, " {cell:>width$}");
            }
        }
        out.push('\n');
    }

    pub(super) fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        Self::render_line(&mut out, &self.header, &widths);
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        let _ = writeln!(out, "  {}", "-".repeat(total));
        for row in &self.rows {
            Self::render_line(&mut out, row, &widths);
        }
        out
    }

    pub(super) fn print(&self) {
        print!("{}", self.render());
    }
}

pub(super) fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(value) => format!("{value:.3}"),
        Cell::Labels(labels) => {
            let labels = labels.iter().map(String::as_str).collect::<Vec<_>>();
            format!("{{{}}}", labels.join(", "))
        }
    }
}

pub(super) fn format_value(value: Option<f64>) -> String {
    value.map_or("N/A".to_owned(), |v| format!("{v:.3}"))
}

pub(super) fn boxes_table(table: &BoxesTable) -> TextTable {
    let header = std::iter::once("Dimension".to_owned()).chain(
        table
            .boxes
            .iter()
            .flat_map(|label| [format!("{label} min"), format!("{label} max")]),
    );
    let mut text = TextTable::new(header);
    for (dim, cells) in table.dims.iter().zip(&table.cells) {
        let row = std::iter::once(dim.clone())
            .chain(
                cells
                    .iter()
                    .flat_map(|cells| [format_cell(&cells.min), format_cell(&cells.max)]),
            )
            .collect();
        text.push_row(row);
    }
    text
}

pub(super) fn stats_table(table: &StatsTable) -> TextTable {
    let header = std::iter::once("Box".to_owned()).chain(table.columns.iter().cloned());
    let mut text = TextTable::new(header);
    for (label, values) in table.index.iter().zip(&table.rows) {
        let row = std::iter::once(label.clone())
            .chain(values.iter().map(|v| format_value(*v)))
            .collect();
        text.push_row(row);
    }
    text
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use scendisc_analysis::report::StatsRecord;

    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = TextTable::new(["Box", "density"]);
        table.push_row(vec!["box 1".to_owned(), "0.900".to_owned()]);
        table.push_row(vec!["box 10".to_owned(), "N/A".to_owned()]);
        let rendered = table.render();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "  Box    density");
        assert_eq!(lines[1], "  --------------");
        assert_eq!(lines[2], "  box 1    0.900");
        assert_eq!(lines[3], "  box 10     N/A");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Cell::Number(0.25)), "0.250");
        let labels = BTreeSet::from(["b".to_owned(), "a".to_owned()]);
        assert_eq!(format_cell(&Cell::Labels(labels)), "{a, b}");
    }

    #[test]
    fn test_stats_table_marks_missing_values() {
        let records = vec![
            StatsRecord::from_iter([("coverage".to_owned(), 0.5)]),
            StatsRecord::from_iter([("density".to_owned(), 1.0)]),
        ];
        let text = stats_table(&StatsTable::from_records(&records));
        let rendered = text.render();
        assert!(rendered.contains("box 1    0.500     N/A"));
        assert!(rendered.contains("box 2      N/A   1.000"));
    }
}
