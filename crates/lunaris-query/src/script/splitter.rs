//! Statement splitter

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    /// Inside a literal or quoted identifier; holds the closing character
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Keyword tracking for the statement being scanned.
///
/// Only needed to recognise `CREATE [TEMP] TRIGGER ... BEGIN ... END`,
/// whose body contains `;` that do not end the statement.
#[derive(Debug, Default)]
struct StatementWords {
    count: usize,
    after_create: bool,
    after_temp: bool,
    is_trigger: bool,
    in_body: bool,
    case_depth: usize,
    ends_body: bool,
}

impl StatementWords {
    fn push(&mut self, word: &mut String) {
        if word.is_empty() {
            return;
        }
        let upper = word.to_ascii_uppercase();
        word.clear();
        self.count += 1;
        self.ends_body = false;

        match (self.count, upper.as_str()) {
            (1, "CREATE") => self.after_create = true,
            (2, "TRIGGER") if self.after_create => self.is_trigger = true,
            (2, "TEMP" | "TEMPORARY") if self.after_create => self.after_temp = true,
            (3, "TRIGGER") if self.after_temp => self.is_trigger = true,
            _ => {}
        }
        if !self.is_trigger {
            return;
        }
        match upper.as_str() {
            "BEGIN" => self.in_body = true,
            "CASE" if self.in_body => self.case_depth += 1,
            "END" if self.in_body => {
                if self.case_depth > 0 {
                    self.case_depth -= 1;
                } else {
                    self.ends_body = true;
                }
            }
            _ => {}
        }
    }

    /// Whether a `;` at this point belongs to a trigger body
    fn in_trigger_body(&self) -> bool {
        self.is_trigger && self.in_body && !self.ends_body
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Split SQL text into statements.
///
/// Separators inside string literals, quoted identifiers (`"x"`, `` `x` ``,
/// `[x]`), comments and trigger bodies are ignored. Statements are trimmed
/// and lose their trailing `;`. Fragments holding only whitespace or
/// comments are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut word = String::new();
    let mut words = StatementWords::default();
    let mut has_code = false;
    let mut state = State::Code;

    let chars: Vec<char> = sql.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            State::LineComment => {
                current.push(c);
                if c == '\n' {
                    state = State::Code;
                }
                i += 1;
                continue;
            }
            State::BlockComment => {
                current.push(c);
                if c == '*' && next == Some('/') {
                    current.push('/');
                    state = State::Code;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            State::Quoted(close) => {
                current.push(c);
                if c == close {
                    // Doubled quote is an escaped quote; brackets have no escape
                    if close != ']' && next == Some(close) {
                        current.push(close);
                        i += 2;
                        continue;
                    }
                    state = State::Code;
                }
                i += 1;
                continue;
            }
            State::Code => {}
        }

        if is_word_char(c) {
            word.push(c);
            current.push(c);
            has_code = true;
            i += 1;
            continue;
        }
        words.push(&mut word);

        match c {
            '-' if next == Some('-') => {
                state = State::LineComment;
                current.push_str("--");
                i += 2;
                continue;
            }
            '/' if next == Some('*') => {
                state = State::BlockComment;
                current.push_str("/*");
                i += 2;
                continue;
            }
            '\'' | '"' | '`' => state = State::Quoted(c),
            '[' => state = State::Quoted(']'),
            ';' if !words.in_trigger_body() => {
                if has_code {
                    statements.push(current.trim().to_string());
                }
                current.clear();
                words = StatementWords::default();
                has_code = false;
                i += 1;
                continue;
            }
            _ => {}
        }

        if !c.is_whitespace() {
            has_code = true;
        }
        current.push(c);
        i += 1;
    }

    if has_code {
        statements.push(current.trim().to_string());
    }

    tracing::trace!(statement_count = statements.len(), "split SQL text");
    statements
}
