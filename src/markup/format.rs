//! Re-indents learner markup, one construct per line.

use super::tokenizer::{tokenize, Attribute, Token};
use super::VOID_ELEMENTS;

const INDENT: &str = "    ";

/// Pretty-print markup. Elements holding only text stay on one line; other
/// elements put their children on indented lines. The result parses to the
/// same elements, attributes and styles as the input.
pub fn format_markup(source: &str) -> String {
    let tokens = tokenize(source);
    let mut out = String::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let open = render_start_tag(name, attributes, *self_closing);
                if *self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                    push_line(&mut out, depth, &open);
                } else if let Some(Token::EndTag { name: end }) = tokens.get(i + 1).filter(|_| !is_raw(name)) {
                    if end == name {
                        push_line(&mut out, depth, &format!("{}</{}>", open, name));
                        i += 2;
                        continue;
                    }
                    push_line(&mut out, depth, &open);
                    depth += 1;
                } else if let (Some(Token::Text(text)), Some(Token::EndTag { name: end })) =
                    (tokens.get(i + 1), tokens.get(i + 2))
                {
                    if end == name && !text.trim().contains('\n') {
                        push_line(&mut out, depth, &format!("{}{}</{}>", open, text.trim(), name));
                        i += 3;
                        continue;
                    }
                    push_line(&mut out, depth, &open);
                    depth += 1;
                } else {
                    push_line(&mut out, depth, &open);
                    depth += 1;
                }
            }
            Token::EndTag { name } => {
                depth = depth.saturating_sub(1);
                push_line(&mut out, depth, &format!("</{}>", name));
            }
            Token::Text(text) => {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    push_line(&mut out, depth, line);
                }
            }
            Token::RawText(text) => push_raw_text(&mut out, depth, text),
            Token::Comment(text) => push_line(&mut out, depth, &format!("<!--{}-->", text)),
            Token::Declaration(text) => push_line(&mut out, depth, &format!("<!{}>", text)),
        }
        i += 1;
    }

    out
}

fn is_raw(name: &str) -> bool {
    name == "style" || name == "script"
}

fn render_start_tag(name: &str, attributes: &[Attribute], self_closing: bool) -> String {
    let mut tag = format!("<{}", name);
    for attribute in attributes {
        tag.push(' ');
        tag.push_str(&attribute.name);
        if let Some(value) = &attribute.value {
            let quote = if value.contains('"') { '\'' } else { '"' };
            tag.push('=');
            tag.push(quote);
            tag.push_str(value);
            tag.push(quote);
        }
    }
    tag.push_str(if self_closing { " />" } else { ">" });
    tag
}

/// Style and script bodies: trimmed lines, nested one level per open brace.
fn push_raw_text(out: &mut String, depth: usize, text: &str) {
    let mut nested = 0usize;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('}') {
            nested = nested.saturating_sub(1);
        }
        push_line(out, depth + nested, line);
        let opens = line.matches('{').count();
        let closes = line.matches('}').count() - usize::from(line.starts_with('}'));
        nested = (nested + opens).saturating_sub(closes);
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}
