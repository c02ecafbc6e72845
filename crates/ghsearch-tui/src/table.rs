// Non-interactive listing
use crate::ui::rank_label;
use ghsearch_core::Browsable;
use std::io::Write;

/// Print one ranked summary per line
pub fn write_table<R: Browsable, W: Write>(
    rows: &[R],
    page: u32,
    page_size: usize,
    out: &mut W,
) -> std::io::Result<()> {
    for (i, row) in rows.iter().enumerate() {
        writeln!(out, "{:>3} {}", rank_label(page, page_size, i), row.summary())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghsearch_core::DetailField;

    struct Row(&'static str);

    impl Browsable for Row {
        fn summary(&self) -> String {
            self.0.to_string()
        }

        fn details(&self) -> Vec<DetailField> {
            Vec::new()
        }

        fn url(&self) -> &str {
            ""
        }
    }

    #[test]
    fn test_ranks_continue_across_pages() {
        let mut out = Vec::new();
        write_table(&[Row("a/one"), Row("b/two")], 3, 30, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), " 61 a/one\n 62 b/two\n");
    }

    #[test]
    fn test_empty_rows_print_nothing() {
        let mut out = Vec::new();
        write_table::<Row, _>(&[], 1, 30, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
