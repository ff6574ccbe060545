//! Token-level helpers for Fortran namelist text.
//!
//! Field values are accumulated as comma-terminated tokens and wrapped into
//! physical lines by [`wrap_tokens`], independently of where the lines are
//! eventually written.

use std::borrow::Cow;

/// Maximum width of a physical namelist line.
pub const MAX_LINE_WIDTH: usize = 80;

/// Packs `tokens` after `head` into lines no wider than [`MAX_LINE_WIDTH`].
///
/// A token that does not fit on the current line starts a continuation line
/// made of a single space followed by the token. Tokens are never split, so a
/// token too wide for a continuation line still gets one to itself.
pub fn wrap_tokens<I, S>(head: &str, tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    let mut line = head.to_string();
    for token in tokens {
        let token = token.as_ref();
        if line.len() + token.len() > MAX_LINE_WIDTH {
            lines.push(std::mem::replace(&mut line, format!(" {}", token)));
        } else {
            line.push_str(token);
        }
    }
    lines.push(line);
    lines
}

/// Formats a real value as the shortest decimal text that reads back exactly.
///
/// Magnitudes outside `[1e-4, 1e16)` use exponent notation with a signed,
/// two-digit exponent (`1e-05`, `1.5e+16`).
pub fn format_real(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// Splits namelist text into trimmed, non-empty comma-separated items.
///
/// Commas inside single-quoted strings do not separate items.
pub fn split_items(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Splits `KEY=value` into its parts; `=` inside a quoted value is ignored.
pub fn split_assignment(item: &str) -> Option<(&str, &str)> {
    let unquoted_end = item.find('\'').unwrap_or(item.len());
    let eq = item[..unquoted_end].find('=')?;
    Some((item[..eq].trim(), item[eq + 1..].trim()))
}

/// Wraps `text` in single quotes, doubling any quote inside it.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Removes one pair of enclosing single quotes, if present, and collapses
/// doubled quotes inside them.
pub fn unquote(value: &str) -> Cow<'_, str> {
    match value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        Some(inner) if inner.contains("''") => Cow::Owned(inner.replace("''", "'")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_tokens_keeps_short_fields_on_one_line() {
        let lines = wrap_tokens(" PROTCNT=", ["0,", "1,", "1,"]);
        assert_eq!(lines, vec![" PROTCNT=0,1,1,".to_string()]);
    }

    #[test]
    fn wrap_tokens_emits_head_alone_without_tokens() {
        let lines = wrap_tokens(" CHRGDAT=", Vec::<String>::new());
        assert_eq!(lines, vec![" CHRGDAT=".to_string()]);
    }

    #[test]
    fn wrap_tokens_allows_lines_of_exactly_max_width() {
        let head = "H".repeat(70);
        let lines = wrap_tokens(&head, ["123456789,", "X,"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE_WIDTH);
        assert_eq!(lines[1], " X,");
    }

    #[test]
    fn wrap_tokens_never_exceeds_max_width_for_ordinary_tokens() {
        let tokens: Vec<String> = (0..500).map(|i| format!("{}.{},", i, i * 7)).collect();
        let lines = wrap_tokens(" CHRGDAT=", &tokens);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= MAX_LINE_WIDTH, "line too long: {:?}", line);
        }
        for line in &lines[1..] {
            assert!(line.starts_with(' ') && !line.starts_with("  "));
        }
        let rejoined: String = lines.iter().map(|l| l.trim_start()).collect();
        assert_eq!(rejoined, format!("CHRGDAT={}", tokens.concat()));
    }

    #[test]
    fn wrap_tokens_emits_oversized_token_whole_on_its_own_line() {
        let long = format!("{},", "9".repeat(95));
        let lines = wrap_tokens(" STATENE=", ["1.0,", long.as_str(), "2.0,"]);
        assert_eq!(
            lines,
            vec![
                " STATENE=1.0,".to_string(),
                format!(" {}", long),
                " 2.0,".to_string(),
            ]
        );
    }

    #[test]
    fn format_real_uses_shortest_round_trip_text() {
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(-0.8014), "-0.8014");
        assert_eq!(format_real(26.8894), "26.8894");
        assert_eq!(format_real(0.0001), "0.0001");
    }

    #[test]
    fn format_real_pads_and_signs_exponents() {
        assert_eq!(format_real(1e-5), "1e-05");
        assert_eq!(format_real(-2.5e-7), "-2.5e-07");
        assert_eq!(format_real(1.5e16), "1.5e+16");
        assert_eq!(format_real(1e100), "1e+100");
    }

    #[test]
    fn split_items_respects_quoted_commas() {
        let items = split_items(" RESNAME='System: a,b','Residue: AS4 3',\n TRESCNT=1,");
        assert_eq!(
            items,
            vec!["RESNAME='System: a,b'", "'Residue: AS4 3'", "TRESCNT=1"]
        );
    }

    #[test]
    fn split_assignment_ignores_equals_inside_quotes() {
        assert_eq!(
            split_assignment("RESNAME='System: x=y'"),
            Some(("RESNAME", "'System: x=y'"))
        );
        assert_eq!(split_assignment("'Residue: a=b 3'"), None);
        assert_eq!(split_assignment("0.25"), None);
    }

    #[test]
    fn quote_doubles_embedded_quotes() {
        assert_eq!(quote("Residue: TYR 4"), "'Residue: TYR 4'");
        assert_eq!(quote("System: O'Brien"), "'System: O''Brien'");
        assert_eq!(unquote(&quote("it's a 'test'")), "it's a 'test'");
    }

    #[test]
    fn split_items_keeps_doubled_quotes_inside_one_item() {
        let items = split_items("RESNAME='System: O''Brien, lab','Residue: AS4 3',");
        assert_eq!(items, vec!["RESNAME='System: O''Brien, lab'", "'Residue: AS4 3'"]);
    }

    #[test]
    fn unquote_strips_only_enclosing_quotes() {
        assert_eq!(unquote("'Residue: TYR 4'"), "Residue: TYR 4");
        assert_eq!(unquote("plain"), "plain");
    }
}
