/// A simple text table for terminal panels
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
    right_aligned: Vec<bool>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| display_width(h)).collect();
        let right_aligned = vec![false; headers.len()];
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
            right_aligned,
        }
    }

    /// Right-align the given column (amounts, scores)
    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(column) {
            *flag = true;
        }
        self
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(display_width(col));
            }
        }

        self.rows.push(row);
    }

    /// Render the table, header and separator first
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut line = String::new();
        for (i, col) in row.iter().enumerate() {
            if i >= self.col_widths.len() {
                break;
            }
            let padding = " ".repeat(self.col_widths[i].saturating_sub(display_width(col)));
            if self.right_aligned[i] {
                line.push_str(&padding);
                line.push_str(col);
            } else {
                line.push_str(col);
                line.push_str(&padding);
            }
            if i < row.len() - 1 {
                line.push_str(" | ");
            }
        }
        line.trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        let mut line = String::new();
        for (i, &width) in self.col_widths.iter().enumerate() {
            line.push_str(&"-".repeat(width));
            if i < self.col_widths.len() - 1 {
                line.push_str("-+-");
            }
        }
        line
    }
}

// Counts chars, not bytes, so "Rp\u{a0}" and icons do not skew the columns.
fn display_width(text: &str) -> usize {
    text.chars().count()
}
