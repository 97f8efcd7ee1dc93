//! Tolerant HTML tokenizer.
//!
//! Never fails: anything that does not form a complete tag is returned as
//! text, so half-typed markup simply contributes fewer elements.

/// An attribute as written in a start tag. Names are lowercased; a bare
/// attribute (`<input disabled>`) has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    /// Contents of `<style>` or `<script>`, taken verbatim.
    RawText(String),
    Comment(String),
    /// `<!DOCTYPE ...>` or any other `<!...>` / `<?...>` declaration.
    Declaration(String),
}

/// Elements whose contents are not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Split `source` into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'<' && starts_markup(bytes, pos) {
            match read_markup(source, pos) {
                Some((token, end)) => {
                    pos = end;
                    let raw_end = match &token {
                        Token::StartTag {
                            name, self_closing, ..
                        } if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                            Some(find_raw_text_end(source, pos, name))
                        }
                        _ => None,
                    };
                    tokens.push(token);
                    if let Some(raw_end) = raw_end {
                        if raw_end > pos {
                            tokens.push(Token::RawText(source[pos..raw_end].to_string()));
                        }
                        pos = raw_end;
                    }
                }
                None => {
                    // Unterminated construct: the rest of the input is text.
                    push_text(&mut tokens, &source[pos..]);
                    pos = bytes.len();
                }
            }
        } else {
            let end = next_markup_start(bytes, pos + 1);
            push_text(&mut tokens, &source[pos..end]);
            pos = end;
        }
    }

    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Text(previous)) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// A `<` only opens markup when followed by a tag name, `/`, `!` or `?`.
fn starts_markup(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos + 1) {
        Some(b) => b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'),
        None => false,
    }
}

fn next_markup_start(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'<' && starts_markup(bytes, pos) {
            return pos;
        }
        pos += 1;
    }
    bytes.len()
}

/// Read the construct opening at `pos` (which holds `<`). Returns the token and
/// the byte offset just past it, or `None` when it is never closed.
fn read_markup(source: &str, pos: usize) -> Option<(Token, usize)> {
    let rest = &source[pos..];

    if let Some(body) = rest.strip_prefix("<!--") {
        let end = body.find("-->")?;
        return Some((Token::Comment(body[..end].to_string()), pos + 4 + end + 3));
    }

    if rest.starts_with("<!") || rest.starts_with("<?") {
        let end = rest.find('>')?;
        return Some((Token::Declaration(rest[2..end].trim().to_string()), pos + end + 1));
    }

    if let Some(body) = rest.strip_prefix("</") {
        let end = body.find('>')?;
        let name = read_name(body.as_bytes(), 0);
        if name.is_empty() {
            // `</ >` and friends: treat as a bogus comment, like browsers do.
            return Some((Token::Comment(body[..end].to_string()), pos + 2 + end + 1));
        }
        return Some((
            Token::EndTag {
                name: name.to_ascii_lowercase(),
            },
            pos + 2 + end + 1,
        ));
    }

    read_start_tag(source, pos)
}

fn read_name(bytes: &[u8], from: usize) -> String {
    let mut end = from;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || matches!(bytes[end], b'-' | b'_' | b':')) {
        end += 1;
    }
    String::from_utf8_lossy(&bytes[from..end]).into_owned()
}

fn read_start_tag(source: &str, pos: usize) -> Option<(Token, usize)> {
    let bytes = source.as_bytes();
    let name = read_name(bytes, pos + 1);
    let mut cursor = pos + 1 + name.len();
    let mut attributes: Vec<Attribute> = Vec::new();

    loop {
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        match bytes.get(cursor)? {
            b'>' => {
                return Some((start_tag(name, attributes, false), cursor + 1));
            }
            b'/' => {
                if bytes.get(cursor + 1) == Some(&b'>') {
                    return Some((start_tag(name, attributes, true), cursor + 2));
                }
                cursor += 1;
            }
            _ => {
                let (attribute, next) = read_attribute(source, cursor)?;
                // First occurrence wins, as in browsers.
                if !attribute.name.is_empty() && !attributes.iter().any(|a| a.name == attribute.name) {
                    attributes.push(attribute);
                }
                cursor = next;
            }
        }
    }
}

fn start_tag(name: String, attributes: Vec<Attribute>, self_closing: bool) -> Token {
    Token::StartTag {
        name: name.to_ascii_lowercase(),
        attributes,
        self_closing,
    }
}

fn read_attribute(source: &str, pos: usize) -> Option<(Attribute, usize)> {
    let bytes = source.as_bytes();
    let mut end = pos;
    while end < bytes.len()
        && !bytes[end].is_ascii_whitespace()
        && !matches!(bytes[end], b'=' | b'>' | b'/')
    {
        end += 1;
    }
    let name = source[pos..end].to_ascii_lowercase();

    let mut cursor = end;
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if bytes.get(cursor) != Some(&b'=') {
        return Some((Attribute { name, value: None }, end));
    }
    cursor += 1;
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }

    match bytes.get(cursor)? {
        quote @ (b'"' | b'\'') => {
            let close = source[cursor + 1..].find(*quote as char)?;
            let value = source[cursor + 1..cursor + 1 + close].to_string();
            Some((
                Attribute {
                    name,
                    value: Some(value),
                },
                cursor + 1 + close + 1,
            ))
        }
        _ => {
            let start = cursor;
            while cursor < bytes.len() && !bytes[cursor].is_ascii_whitespace() && bytes[cursor] != b'>' {
                cursor += 1;
            }
            Some((
                Attribute {
                    name,
                    value: Some(source[start..cursor].to_string()),
                },
                cursor,
            ))
        }
    }
}

/// Offset of the `</name` that closes a raw text element, or the end of input.
fn find_raw_text_end(source: &str, from: usize, name: &str) -> usize {
    let closing = format!("</{}", name);
    source[from..]
        .to_ascii_lowercase()
        .find(&closing)
        .map(|offset| from + offset)
        .unwrap_or(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: vec![],
            self_closing: false,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_simple_element() {
        let tokens = tokenize("<div>Test</div>");
        assert_eq!(
            tokens,
            vec![start("div"), Token::Text("Test".to_string()), end("div")]
        );
    }

    #[test]
    fn test_tag_names_lowercased() {
        let tokens = tokenize("<DIV></Div>");
        assert_eq!(tokens, vec![start("div"), end("div")]);
    }

    #[test]
    fn test_attribute_quote_styles() {
        let tokens = tokenize(r#"<a href="x" title='y' id=z hidden>"#);
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                let values: Vec<_> = attributes
                    .iter()
                    .map(|a| (a.name.as_str(), a.value.as_deref()))
                    .collect();
                assert_eq!(
                    values,
                    vec![
                        ("href", Some("x")),
                        ("title", Some("y")),
                        ("id", Some("z")),
                        ("hidden", None)
                    ]
                );
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_spaces_around_equals() {
        let tokens = tokenize("<p class = \"intro\">");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].name, "class");
                assert_eq!(attributes[0].value.as_deref(), Some("intro"));
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing() {
        let tokens = tokenize("<img src=\"a.png\" />");
        assert!(matches!(
            &tokens[0],
            Token::StartTag { self_closing: true, .. }
        ));
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        let tokens = tokenize("<p id=\"a\" id=\"b\">");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes.len(), 1);
                assert_eq!(attributes[0].value.as_deref(), Some("a"));
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_style_contents_are_raw() {
        let tokens = tokenize("<style>a > b { color: red; }</STYLE>");
        assert_eq!(tokens[0], start("style"));
        assert_eq!(tokens[1], Token::RawText("a > b { color: red; }".to_string()));
        assert_eq!(tokens[2], end("style"));
    }

    #[test]
    fn test_comment_and_doctype() {
        let tokens = tokenize("<!DOCTYPE html><!-- note --><p>");
        assert_eq!(tokens[0], Token::Declaration("DOCTYPE html".to_string()));
        assert_eq!(tokens[1], Token::Comment(" note ".to_string()));
        assert_eq!(tokens[2], start("p"));
    }

    #[test]
    fn test_plain_text_has_no_tags() {
        let tokens = tokenize("invalid code without tags");
        assert_eq!(
            tokens,
            vec![Token::Text("invalid code without tags".to_string())]
        );
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let tokens = tokenize("1 < 2 and 3 > 2");
        assert_eq!(tokens, vec![Token::Text("1 < 2 and 3 > 2".to_string())]);
    }

    #[test]
    fn test_unterminated_tag_becomes_text() {
        let tokens = tokenize("<p>Hi</p><div class=\"open");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3], Token::Text("<div class=\"open".to_string()));
    }

    #[test]
    fn test_unterminated_comment_becomes_text() {
        let tokens = tokenize("<!-- never closed");
        assert_eq!(tokens, vec![Token::Text("<!-- never closed".to_string())]);
    }

    #[test]
    fn test_non_ascii_text_and_values() {
        let tokens = tokenize("<button aria-label=\"Menu ☰\">☰ Menü</button>");
        match &tokens[0] {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes[0].value.as_deref(), Some("Menu ☰"));
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
        assert_eq!(tokens[1], Token::Text("☰ Menü".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }
}
