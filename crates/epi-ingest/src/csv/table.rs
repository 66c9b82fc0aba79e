/// A raw source table: one header row and text cells.
///
/// Every row has exactly `headers.len()` cells; missing values are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map_or("", String::as_str))
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CsvTable {
        CsvTable {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                vec!["1".to_string(), "x".to_string()],
                vec!["2".to_string(), String::new()],
            ],
        }
    }

    #[test]
    fn looks_up_columns() {
        let table = table();
        assert_eq!(table.column_index("B"), Some(1));
        assert_eq!(table.column(1).collect::<Vec<_>>(), ["x", ""]);
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(5, 0), "");
        assert_eq!(table.column_index("C"), None);
    }
}
