//! In-memory list processing for the record tables: free-text search,
//! single-column sort, and fixed-page-size pagination.
//!
//! The processor is a pure function of the full collection plus a
//! [`TableState`]; it never touches the store.

use std::cmp::Ordering;

use chrono::NaiveDate;

/// How a cell should be rendered by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    #[default]
    Text,
    Date,
    Badge,
    Link,
}

/// Declarative column descriptor: key, label, sortable flag, and a
/// semantic format instead of an embedded render callback.
#[derive(Debug, Clone)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub format: CellFormat,
}

impl Column {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
            format: CellFormat::Text,
        }
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Mark the column as not sortable.
    pub fn fixed(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// A single cell value. Ordering compares like values naturally and
/// falls back to a fixed variant rank across kinds, with `Empty` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Number(i64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
        }
    }

    /// Stringified form used for substring search.
    pub fn search_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rows expose their cells by column key.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// The interactive state of one table: search term, sort column and
/// direction, current page. Mutations follow the UI conventions:
/// changing the search resets to page 1, clicking the same column
/// toggles direction, clicking a new column resets to ascending.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub search: String,
    pub sort_key: Option<String>,
    pub direction: SortDirection,
    pub page: usize,
}

impl TableState {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// One visible page of rows plus the pagination bookkeeping.
#[derive(Debug)]
pub struct TablePage<'a, T> {
    pub rows: Vec<&'a T>,
    /// The page actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Filter, sort, and page a collection.
///
/// Search is a case-insensitive substring match against the stringified
/// value of every column in `columns`; a row matches if any column does.
/// Sorting is stable, so ties keep their original relative order. Pages
/// are 1-indexed; a page beyond the last valid one clamps to the last.
pub fn paginate<'a, T: TableRow>(
    rows: &'a [T],
    columns: &[Column],
    state: &TableState,
    page_size: usize,
) -> TablePage<'a, T> {
    let page_size = page_size.max(1);

    let mut matched: Vec<&T> = if state.search.is_empty() {
        rows.iter().collect()
    } else {
        let needle = state.search.to_lowercase();
        rows.iter()
            .filter(|row| {
                columns
                    .iter()
                    .any(|col| row.cell(col.key).search_text().to_lowercase().contains(&needle))
            })
            .collect()
    };

    if let Some(ref key) = state.sort_key {
        matched.sort_by(|a, b| {
            let ord = a.cell(key).cmp(&b.cell(key));
            match state.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(page_size);
    let page = state.page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let rows = matched
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        page,
        total_pages,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        amount: i64,
    }

    impl TableRow for Row {
        fn cell(&self, key: &str) -> CellValue {
            match key {
                "name" => CellValue::Text(self.name.to_string()),
                "amount" => CellValue::Number(self.amount),
                _ => CellValue::Empty,
            }
        }
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("name", "Name"), Column::new("amount", "Amount")]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Alpha", amount: 30 },
            Row { name: "Bravo", amount: 10 },
            Row { name: "Charlie", amount: 20 },
            Row { name: "alphabet", amount: 40 },
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = rows();
        let mut state = TableState::new();
        state.set_search("ALPHA");
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.total_matches, 2);

        state.set_search("rav");
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.rows[0].name, "Bravo");
    }

    #[test]
    fn test_search_no_match_returns_empty() {
        let rows = rows();
        let mut state = TableState::new();
        state.set_search("zulu");
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.total_matches, 0);
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_search_matches_numeric_column() {
        let rows = rows();
        let mut state = TableState::new();
        state.set_search("30");
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.rows[0].name, "Alpha");
    }

    #[test]
    fn test_sort_numeric_asc_then_desc_reverses() {
        let rows = rows();
        let mut state = TableState::new();
        state.toggle_sort("amount");
        let asc: Vec<i64> = paginate(&rows, &columns(), &state, 10)
            .rows
            .iter()
            .map(|r| r.amount)
            .collect();
        assert_eq!(asc, vec![10, 20, 30, 40]);

        state.toggle_sort("amount");
        assert_eq!(state.direction, SortDirection::Desc);
        let desc: Vec<i64> = paginate(&rows, &columns(), &state, 10)
            .rows
            .iter()
            .map(|r| r.amount)
            .collect();
        assert_eq!(desc, vec![40, 30, 20, 10]);
    }

    #[test]
    fn test_toggle_new_column_resets_to_asc() {
        let mut state = TableState::new();
        state.toggle_sort("amount");
        state.toggle_sort("amount");
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle_sort("name");
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(state.sort_key.as_deref(), Some("name"));
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let rows = vec![
            Row { name: "first", amount: 5 },
            Row { name: "second", amount: 5 },
            Row { name: "third", amount: 5 },
        ];
        let mut state = TableState::new();
        state.toggle_sort("amount");
        let page = paginate(&rows, &columns(), &state, 10);
        let names: Vec<&str> = page.rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_pagination_splits_25_rows_into_3_pages() {
        let rows: Vec<Row> = (0..25)
            .map(|i| Row { name: "row", amount: i })
            .collect();
        let mut state = TableState::new();

        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 10);

        state.set_page(3);
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.rows.len(), 5);
    }

    #[test]
    fn test_out_of_range_page_clamps_to_last() {
        let rows: Vec<Row> = (0..25)
            .map(|i| Row { name: "row", amount: i })
            .collect();
        let mut state = TableState::new();
        state.set_page(9);
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.rows.len(), 5);
    }

    #[test]
    fn test_search_resets_page() {
        let rows: Vec<Row> = (0..25)
            .map(|i| Row { name: "row", amount: i })
            .collect();
        let mut state = TableState::new();
        state.set_page(3);
        state.set_search("row");
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_shrinking_filter_after_paging_does_not_panic() {
        let rows = rows();
        let mut state = TableState::new();
        state.set_page(4);
        // Filter shrinks the set to one row; page 4 no longer exists.
        state.search = "Bravo".to_string();
        let page = paginate(&rows, &columns(), &state, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn test_empty_cell_sorts_first() {
        assert!(CellValue::Empty < CellValue::Number(0));
        assert!(CellValue::Number(99) < CellValue::Text("a".to_string()));
    }
}
