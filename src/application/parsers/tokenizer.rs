/// Splits a command line into shell-like tokens.
///
/// Unquoted whitespace separates tokens. A `"` or `'` opens a quoted region
/// that runs until the same character appears again; everything inside is
/// taken literally and the quote characters are dropped. There is no escape
/// character, and empty tokens are never produced, so `''` alone yields
/// nothing.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (None, '"') | (None, '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
