#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Markdown pipe table with padded, aligned columns.
#[derive(Debug, Clone)]
pub struct PipeTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Vec<Align>,
}

impl PipeTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = vec![Align::Left; headers.len()];
        PipeTable {
            headers,
            rows: Vec::new(),
            align,
        }
    }

    /// Rows are cut or padded to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Right-align every column whose non-empty cells are all integers.
    pub fn align_integers_right(mut self) -> Self {
        for col in 0..self.headers.len() {
            let mut cells = self
                .rows
                .iter()
                .map(|r| r[col].as_str())
                .filter(|c| !c.is_empty())
                .peekable();
            if cells.peek().is_some() && cells.all(|c| c.parse::<i64>().is_ok()) {
                self.align[col] = Align::Right;
            }
        }
        self
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .map(|r| width(&r[col]))
                    .max()
                    .unwrap_or(0);
                longest.max(width(&self.headers[col]) + 2)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_line(&self.headers, &widths));
        lines.push(
            widths
                .iter()
                .zip(&self.align)
                .map(|(w, a)| {
                    let dashes = "-".repeat(w + 1);
                    match a {
                        Align::Left => format!(":{}", dashes),
                        Align::Right => format!("{}:", dashes),
                    }
                })
                .fold(String::from("|"), |acc, seg| acc + &seg + "|"),
        );
        for row in &self.rows {
            lines.push(self.render_line(row, &widths));
        }
        lines.join("\n")
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for ((cell, w), a) in cells.iter().zip(widths).zip(&self.align) {
            let pad = " ".repeat(w - width(cell));
            match a {
                Align::Left => line.push_str(&format!(" {}{} |", cell, pad)),
                Align::Right => line.push_str(&format!(" {}{} |", pad, cell)),
            }
        }
        line
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Wrap text as an inline code span.
pub fn code(s: &str) -> String {
    format!("`{}`", s)
}
