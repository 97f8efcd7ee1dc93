//! Just enough CSS to answer "which selectors set which properties".
//!
//! Tokenizing and error recovery come from `cssparser`. A rule or
//! declaration that does not parse is skipped and the rest of the
//! stylesheet is still read.

use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser, Token,
};
use tracing::debug;

/// `@media`/`@supports` blocks nested deeper than this are skipped whole.
pub const MAX_NESTING: usize = 16;

/// A single `property: value` pair. Property names are lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A style rule: its comma-separated selectors and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// The last compound of a selector (`nav a:focus` -> `a:focus`), split into
/// its parts. Pseudo-classes are lowercased without their leading colons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub element: Option<String>,
    pub classes: Vec<String>,
    pub ids: Vec<String>,
    pub pseudo_classes: Vec<String>,
}

/// Parse a stylesheet. Rules nested in `@media`/`@supports` blocks are
/// flattened; other at-rules are skipped.
pub fn parse_stylesheet(text: &str) -> Vec<CssRule> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    collect_rules(&mut parser, 0)
}

/// Parse the body of a rule or a `style` attribute.
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    collect_declarations(&mut parser)
}

fn collect_rules(input: &mut Parser<'_, '_>, depth: usize) -> Vec<CssRule> {
    let mut collector = RuleCollector { depth };
    StyleSheetParser::new(input, &mut collector)
        .filter_map(|item| match item {
            Ok(rules) => Some(rules),
            Err((error, source)) => {
                debug!("Skipping CSS rule {:?}: {:?}", source.trim(), error.kind);
                None
            }
        })
        .flatten()
        .collect()
}

fn collect_declarations(input: &mut Parser<'_, '_>) -> Vec<Declaration> {
    RuleBodyParser::new(input, &mut DeclarationCollector)
        .filter_map(Result::ok)
        .collect()
}

/// Raw text of every token left in `input`, trimmed.
fn remaining_text(input: &mut Parser<'_, '_>) -> String {
    let start = input.position();
    while input.next().is_ok() {}
    input.slice_from(start).trim().to_string()
}

/// Top-level and `@media` rule lists. Each item is the style rules it
/// contributes, so a flattened block yields several.
struct RuleCollector {
    depth: usize,
}

impl<'i> QualifiedRuleParser<'i> for RuleCollector {
    type Prelude = Vec<String>;
    type QualifiedRule = Vec<CssRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let selectors: Vec<String> = input
            .parse_comma_separated(|input| Ok::<_, ParseError<'i, ()>>(remaining_text(input)))?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if selectors.is_empty() {
            return Err(input.new_error_for_next_token());
        }
        Ok(selectors)
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(vec![CssRule {
            selectors,
            declarations: collect_declarations(input),
        }])
    }
}

impl<'i> AtRuleParser<'i> for RuleCollector {
    type Prelude = ();
    type AtRule = Vec<CssRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let grouping = name.eq_ignore_ascii_case("media") || name.eq_ignore_ascii_case("supports");
        if !grouping || self.depth >= MAX_NESTING {
            return Err(input.new_error(BasicParseErrorKind::AtRuleInvalid(name)));
        }
        remaining_text(input);
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Ok(collect_rules(input, self.depth + 1))
    }
}

/// Declarations of one rule body or `style` attribute.
struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let value = remaining_text(input);
        if value.is_empty() {
            return Err(input.new_error_for_next_token());
        }
        Ok(Declaration {
            property: name.to_ascii_lowercase(),
            value,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

impl Compound {
    /// Parse the rightmost compound of a selector.
    pub fn of_selector(selector: &str) -> Compound {
        let mut input = ParserInput::new(selector);
        let mut parser = Parser::new(&mut input);
        let mut compound = Compound::default();
        let mut combined = false;

        while let Ok(token) = parser.next_including_whitespace() {
            let token = token.clone();
            if matches!(token, Token::WhiteSpace(_) | Token::Delim('>' | '+' | '~')) {
                combined = true;
                continue;
            }
            if combined {
                compound = Compound::default();
                combined = false;
            }
            match token {
                Token::Ident(name) => compound.element = Some(name.to_ascii_lowercase()),
                Token::IDHash(name) | Token::Hash(name) => compound.ids.push(name.to_string()),
                Token::Delim('.') => {
                    if let Ok(Token::Ident(name)) = parser.next_including_whitespace() {
                        compound.classes.push(name.to_string());
                    }
                }
                Token::Colon => {
                    if let Some(name) = pseudo_name(&mut parser) {
                        compound.pseudo_classes.push(name);
                    }
                }
                // Attribute selectors and `*` add nothing we query
                _ => {}
            }
        }
        compound
    }
}

/// Name after a `:` or `::`; functional pseudo-classes drop their arguments.
fn pseudo_name(parser: &mut Parser<'_, '_>) -> Option<String> {
    loop {
        match parser.next_including_whitespace().ok()? {
            Token::Colon => continue,
            Token::Ident(name) | Token::Function(name) => return Some(name.to_ascii_lowercase()),
            _ => return None,
        }
    }
}
