//! Statement classification

const SCHEMA_KEYWORDS: [&str; 3] = ["create", "drop", "alter"];
const TRANSACTION_KEYWORDS: [&str; 4] = ["begin", "commit", "end", "rollback"];

/// Words of `statement` outside string literals, quoted identifiers and
/// comments
fn code_words(statement: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
        match c {
            '\'' | '"' | '`' | '[' => {
                let close = if c == '[' { ']' } else { c };
                // A doubled quote closes and reopens, which skips the same text
                for next in chars.by_ref() {
                    if next == close {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => {}
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// Whether a statement mentions CREATE, DROP or ALTER as a whole word.
///
/// This is a refresh signal for cached schema views, not a parse. Words
/// inside literals, quoted identifiers and comments are ignored.
pub fn is_schema_changing(statement: &str) -> bool {
    code_words(statement)
        .iter()
        .any(|word| SCHEMA_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k)))
}

/// Whether a statement opens or closes a transaction itself
/// (`BEGIN`, `COMMIT`, `END`, `ROLLBACK`)
pub fn is_transaction_control(statement: &str) -> bool {
    code_words(statement)
        .first()
        .is_some_and(|first| TRANSACTION_KEYWORDS.iter().any(|k| first.eq_ignore_ascii_case(k)))
}

/// Whether a statement needs an explicit commit after it runs.
///
/// Everything except text starting with `select` (ignoring case and
/// leading whitespace) is committed.
pub fn requires_commit(statement: &str) -> bool {
    !statement
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}
