//! Lightweight markup model used by the lesson validator.
//!
//! Learner submissions are parsed into a flat list of elements (document
//! order, with parent links), the CSS rules found in `<style>` blocks and the
//! declarations of `style` attributes. The parser is tolerant: it never
//! fails, it only finds fewer structures in broken input.
//!
//! # Architecture
//!
//! - `tokenizer`: tags, attributes, text and raw `<style>` contents
//! - `css`: rules, declarations and selector compounds
//! - `format`: re-indents a submission (the editor's "Format" action)

mod css;
mod format;
mod tokenizer;

pub use css::{parse_declarations, parse_stylesheet, Compound, CssRule, Declaration};
pub use format::format_markup;
pub use tokenizer::{tokenize, Attribute, Token};

/// Elements that never have contents or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// An element of a parsed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Index of the enclosing element in [`Document::elements`].
    pub parent: Option<usize>,
    /// Text directly inside this element (not its children), with whitespace
    /// runs collapsed to single spaces and no leading or trailing space.
    pub text: String,
}

impl Element {
    /// Attribute value; bare attributes read as the empty string.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        HEADINGS
            .iter()
            .position(|h| *h == self.name)
            .map(|i| i as u8 + 1)
    }
}

/// A parsed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: Vec<Element>,
    style_rules: Vec<CssRule>,
    inline_declarations: Vec<Declaration>,
}

impl Document {
    /// Parse a submission. Mismatched end tags are ignored; unclosed elements
    /// are closed at the end of input.
    pub fn parse(source: &str) -> Document {
        let mut document = Document::default();
        let mut open: Vec<usize> = Vec::new();

        for token in tokenize(source) {
            match token {
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    if let Some(style) = attributes
                        .iter()
                        .find(|a| a.name == "style")
                        .and_then(|a| a.value.as_deref())
                    {
                        document
                            .inline_declarations
                            .extend(parse_declarations(style));
                    }
                    let index = document.elements.len();
                    let is_void = VOID_ELEMENTS.contains(&name.as_str());
                    document.elements.push(Element {
                        name,
                        attributes,
                        parent: open.last().copied(),
                        text: String::new(),
                    });
                    if !self_closing && !is_void {
                        open.push(index);
                    }
                }
                Token::EndTag { name } => {
                    if let Some(depth) = open
                        .iter()
                        .rposition(|&i| document.elements[i].name == name)
                    {
                        open.truncate(depth);
                    }
                }
                Token::Text(text) => {
                    if let Some(&current) = open.last() {
                        append_text(&mut document.elements[current].text, &text);
                    }
                }
                Token::RawText(text) => {
                    let in_style = open
                        .last()
                        .map(|&i| document.elements[i].name == "style")
                        .unwrap_or(false);
                    if in_style {
                        document.style_rules.extend(parse_stylesheet(&text));
                    }
                }
                Token::Comment(_) | Token::Declaration(_) => {}
            }
        }

        document
    }

    /// All elements in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements with the given tag name, in document order.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (usize, &'a Element)> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.name == name)
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Whether the element at `index` sits (at any depth) inside an element
    /// named one of `ancestors`.
    pub fn is_inside(&self, index: usize, ancestors: &[&str]) -> bool {
        let mut current = self.elements.get(index).and_then(|e| e.parent);
        while let Some(i) = current {
            if ancestors.contains(&self.elements[i].name.as_str()) {
                return true;
            }
            current = self.elements[i].parent;
        }
        false
    }

    /// Whether the element at `index` or any of its descendants holds
    /// non-blank text.
    pub fn has_text(&self, index: usize) -> bool {
        let Some(element) = self.elements.get(index) else {
            return false;
        };
        if !element.text.trim().is_empty() {
            return true;
        }
        (index + 1..self.elements.len())
            .filter(|&i| self.is_descendant(i, index))
            .any(|i| !self.elements[i].text.trim().is_empty())
    }

    fn is_descendant(&self, index: usize, ancestor: usize) -> bool {
        let mut current = self.elements[index].parent;
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.elements[i].parent;
        }
        false
    }

    /// Rules from every `<style>` block.
    pub fn style_rules(&self) -> &[CssRule] {
        &self.style_rules
    }

    /// Declarations from every `style="..."` attribute.
    pub fn inline_declarations(&self) -> &[Declaration] {
        &self.inline_declarations
    }

    /// Every declaration in the document, stylesheet and inline.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.style_rules
            .iter()
            .flat_map(|r| r.declarations.iter())
            .chain(self.inline_declarations.iter())
    }

    /// Whether some element satisfies the selector's last compound.
    pub fn matches_compound(&self, compound: &Compound) -> bool {
        if compound.element.is_none() && compound.classes.is_empty() && compound.ids.is_empty() {
            // `*`, `:root` and friends match the root element when there is one.
            return !self.elements.is_empty();
        }
        self.elements.iter().any(|e| {
            compound.element.as_deref().map_or(true, |name| e.name == name)
                && compound
                    .classes
                    .iter()
                    .all(|c| e.classes().any(|own| own == c))
                && compound.ids.iter().all(|id| e.attr("id") == Some(id.as_str()))
        })
    }
}

fn append_text(target: &mut String, text: &str) {
    for word in text.split_whitespace() {
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(word);
    }
}
