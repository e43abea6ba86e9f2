//! Batched INSERT generation and COPY value escaping.

use crate::parser::TableData;

/// Rows per INSERT statement (for readability and transaction size)
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Render one raw COPY field as a SQL literal.
///
/// The NULL marker and the bare boolean letters become unquoted keywords.
/// Everything else is quoted: single quotes are doubled first, then the
/// two-character escapes `\n`, `\r`, `\t` emitted by the dump become the
/// real control characters. Other backslashes pass through untouched.
pub fn escape_value(raw: &str) -> String {
    match raw {
        "\\N" => "NULL".to_string(),
        "t" => "TRUE".to_string(),
        "f" => "FALSE".to_string(),
        _ => {
            let escaped = raw
                .replace('\'', "''")
                .replace("\\n", "\n")
                .replace("\\r", "\r")
                .replace("\\t", "\t");
            format!("'{}'", escaped)
        }
    }
}

/// Generate batched INSERT statements for one table.
///
/// Rows keep their parse order, within and across batches. A table with no
/// rows yields no statements.
pub fn insert_statements(table: &TableData, batch_size: usize) -> Vec<String> {
    if table.rows.is_empty() {
        return Vec::new();
    }

    let col_list = table.columns.join(", ");

    table
        .rows
        .chunks(batch_size.max(1))
        .map(|batch| {
            let mut stmt = format!("INSERT INTO {} ({}) VALUES\n", table.name, col_list);

            for (i, row) in batch.iter().enumerate() {
                if i > 0 {
                    stmt.push_str(",\n");
                }
                stmt.push('(');
                for (j, value) in row.iter().enumerate() {
                    if j > 0 {
                        stmt.push_str(", ");
                    }
                    stmt.push_str(&escape_value(value));
                }
                stmt.push(')');
            }

            stmt.push(';');
            stmt
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> TableData {
        TableData {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_escape_null_marker() {
        assert_eq!(escape_value("\\N"), "NULL");
    }

    #[test]
    fn test_escape_booleans() {
        assert_eq!(escape_value("t"), "TRUE");
        assert_eq!(escape_value("f"), "FALSE");
    }

    #[test]
    fn test_escape_quotes_doubled() {
        assert_eq!(escape_value("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_escape_decodes_control_sequences() {
        assert_eq!(escape_value("line1\\nline2"), "'line1\nline2'");
        assert_eq!(escape_value("a\\tb"), "'a\tb'");
        assert_eq!(escape_value("a\\rb"), "'a\rb'");
    }

    #[test]
    fn test_escape_plain_text() {
        assert_eq!(escape_value("hello"), "'hello'");
        // `true`/`false` spelled out are data, not booleans
        assert_eq!(escape_value("true"), "'true'");
    }

    #[test]
    fn test_escape_unknown_backslash_passthrough() {
        // only \n, \r, \t are decoded; a stray backslash stays put
        assert_eq!(escape_value("C:\\path"), "'C:\\path'");
        assert_eq!(escape_value("a\\\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_insert_single_batch() {
        let t = table("users", &["id", "name"], &[&["1", "Alice"], &["2", "\\N"]]);
        let stmts = insert_statements(&t, 100);

        assert_eq!(stmts.len(), 1);
        assert_eq!(
            stmts[0],
            "INSERT INTO users (id, name) VALUES\n('1', 'Alice'),\n('2', NULL);"
        );
    }

    #[test]
    fn test_insert_no_rows_no_statements() {
        let t = table("empty", &["id"], &[]);
        assert!(insert_statements(&t, 100).is_empty());
    }

    #[test]
    fn test_insert_batching_splits_and_preserves_order() {
        let rows: Vec<Vec<String>> = (0..250).map(|i| vec![i.to_string()]).collect();
        let t = TableData {
            name: "t".to_string(),
            columns: vec!["id".to_string()],
            rows,
        };

        let stmts = insert_statements(&t, 100);
        assert_eq!(stmts.len(), 3);
        for stmt in &stmts {
            assert!(stmt.starts_with("INSERT INTO t (id) VALUES\n"));
            assert!(stmt.ends_with(';'));
        }
        assert_eq!(stmts[0].matches("('").count(), 100);
        assert_eq!(stmts[1].matches("('").count(), 100);
        assert_eq!(stmts[2].matches("('").count(), 50);

        // order preserved across batch boundaries
        assert!(stmts[0].contains("('0')"));
        assert!(stmts[0].ends_with("('99');"));
        assert!(stmts[1].starts_with("INSERT INTO t (id) VALUES\n('100')"));
        assert!(stmts[2].ends_with("('249');"));
    }
}
