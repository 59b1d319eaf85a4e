//! Escaping of user text for the index query syntax.

const SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Escape a single term so it is matched literally.
pub fn escape_term(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if SPECIAL.contains(&ch) || ch.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Quote a phrase, escaping embedded quotes and backslashes.
pub fn quote_phrase(raw: &str) -> String {
    let inner = raw.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{inner}\"")
}

/// Split free text into index-ready terms.
///
/// Double-quoted runs stay together as phrases; everything else splits on
/// whitespace. Each returned term is already escaped or quoted.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for (index, chunk) in raw.split('"').enumerate() {
        let inside_quotes = index % 2 == 1;
        if inside_quotes {
            let phrase = chunk.split_whitespace().collect::<Vec<_>>().join(" ");
            if !phrase.is_empty() {
                terms.push(quote_phrase(&phrase));
            }
        } else {
            terms.extend(chunk.split_whitespace().map(escape_term));
        }
    }
    terms
}
