//! Column-aligned listings.

use console::measure_text_width;

/// Rows rendered as left-aligned columns separated by two spaces.
///
/// There are no headers or borders; listings stay easy to pipe into
/// `cut` and `awk`.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Gap between columns.
    const PADDING: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the table.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();

        for (i, cell) in row.iter().enumerate() {
            let width = measure_text_width(cell);
            match self.column_widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => self.column_widths.push(width),
            }
        }

        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render all rows, one line each, without a trailing newline.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| self.render_row(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = self.column_widths[i] - measure_text_width(cell) + Self::PADDING;
                line.push_str(&" ".repeat(pad));
            }
        }
        line.trim_end().to_string()
    }
}
