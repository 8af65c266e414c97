//! Minimal CSV reading/writing: quotes and CRLF tolerated, nothing fancier.
//! Reference data and proposal files are small enough that streaming is not
//! worth the machinery.

/// Parses CSV text into rows of fields. Double-quote escaping (`""`) and
/// quoted separators/newlines are honoured; blank lines are dropped.
pub(crate) fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/// Quotes a field when needed; embedded quotes are doubled.
pub(crate) fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_rows() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn honours_quoted_commas_and_escaped_quotes() {
        let rows = parse_rows("\"a,b\",\"say \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![vec!["a,b", "say \"hi\""]]);
    }

    #[test]
    fn tolerates_crlf_and_missing_trailing_newline() {
        let rows = parse_rows("a,b\r\nc,d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn escape_round_trips_through_parse() {
        let field = "Chicken, \"Boneless\" Breast";
        let line = format!("{},x\n", escape(field));
        let rows = parse_rows(&line);
        assert_eq!(rows[0][0], field);
    }
}
