//! Lesson validation.
//!
//! A submission is parsed once into a [`Document`] and every rule of the
//! lesson is checked against it. Validation is stateless and total: empty or
//! broken markup just fails the rules it cannot satisfy.

use crate::course::{Check, Lesson, LessonId};
use crate::markup::{Compound, Document};
use serde::Serialize;
use tracing::debug;

/// Outcome of checking one submission against one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// True when every rule of the lesson holds
    pub passed: bool,

    /// Ids of the rules that do not hold, in rule-definition order. The first
    /// one is the primary hint.
    pub failed_rule_ids: Vec<&'static str>,
}

impl VerificationResult {
    /// The rule to hint at first, if any failed.
    pub fn primary_failure(&self) -> Option<&'static str> {
        self.failed_rule_ids.first().copied()
    }

    /// Translation keys of the hints for the failed rules, in order.
    pub fn feedback_keys(&self, lesson: &Lesson) -> Vec<String> {
        self.failed_rule_ids
            .iter()
            .map(|id| lesson.feedback_key(id))
            .collect()
    }
}

/// Validate `source` against the rules of `lesson`.
pub fn validate(source: &str, lesson: LessonId) -> VerificationResult {
    validate_lesson(source, lesson.lesson())
}

/// Validate `source` against an explicit lesson definition.
pub fn validate_lesson(source: &str, lesson: &Lesson) -> VerificationResult {
    let document = Document::parse(source);

    let failed_rule_ids: Vec<&'static str> = lesson
        .rules
        .iter()
        .filter(|rule| !holds(&document, &rule.check))
        .map(|rule| rule.id)
        .collect();

    debug!(
        "Validated lesson {} ({}): {} of {} rules failed",
        lesson.id,
        lesson.slug,
        failed_rule_ids.len(),
        lesson.rules.len()
    );

    VerificationResult {
        passed: failed_rule_ids.is_empty(),
        failed_rule_ids,
    }
}

/// Evaluate a single check against a parsed submission.
pub fn holds(document: &Document, check: &Check) -> bool {
    match *check {
        Check::AnyElement => !document.is_empty(),

        Check::Element(name) => document.has_element(name),

        Check::AnyOf(names) => names.iter().any(|name| document.has_element(name)),

        Check::ElementWithText(name) => document
            .elements_named(name)
            .any(|(index, _)| document.has_text(index)),

        Check::Attribute(attribute) => document.elements().iter().any(|e| e.has_attr(attribute)),

        Check::ElementAttribute(name, attribute) => document
            .elements_named(name)
            .any(|(_, e)| e.has_attr(attribute)),

        Check::NonEmptyAttribute(name, attribute) => document
            .elements_named(name)
            .any(|(_, e)| e.attr(attribute).is_some_and(|v| !v.trim().is_empty())),

        Check::DescriptiveAttribute {
            element,
            attribute,
            min_words,
        } => document.elements_named(element).any(|(_, e)| {
            e.attr(attribute)
                .is_some_and(|v| v.split_whitespace().count() >= min_words)
        }),

        Check::NestedIn { child, parents } => document
            .elements_named(child)
            .any(|(index, _)| document.is_inside(index, parents)),

        Check::HeadingThenParagraph => {
            let first_heading = document
                .elements()
                .iter()
                .position(|e| e.heading_level().is_some());
            match first_heading {
                Some(heading) => document.elements()[heading + 1..]
                    .iter()
                    .any(|e| e.name == "p"),
                None => false,
            }
        }

        Check::HeadingHierarchy => heading_hierarchy_holds(document),

        Check::LabelledControl => labelled_control_exists(document),

        Check::StyleRule => document
            .style_rules()
            .iter()
            .any(|r| !r.declarations.is_empty()),

        Check::StyleProperty(property) => document.declarations().any(|d| d.property == property),

        Check::StyleDeclarations(min) => document.declarations().count() >= min,

        Check::SelectorMatchesElement => document.style_rules().iter().any(|r| {
            !r.declarations.is_empty()
                && r.selectors
                    .iter()
                    .any(|s| document.matches_compound(&Compound::of_selector(s)))
        }),

        Check::FocusStyle(name) => document.style_rules().iter().any(|r| {
            !r.declarations.is_empty()
                && r.selectors.iter().any(|s| {
                    let compound = Compound::of_selector(s);
                    compound.element.as_deref() == Some(name)
                        && compound
                            .pseudo_classes
                            .iter()
                            .any(|p| p == "focus" || p == "focus-visible")
                })
        }),
    }
}

const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// The first heading is an `h1` and each later one goes at most one level
/// deeper than the heading before it.
fn heading_hierarchy_holds(document: &Document) -> bool {
    let mut previous = 0u8;
    for level in document.elements().iter().filter_map(|e| e.heading_level()) {
        if level > previous + 1 {
            return false;
        }
        previous = level;
    }
    previous > 0
}

fn labelled_control_exists(document: &Document) -> bool {
    let control_ids: Vec<&str> = document
        .elements()
        .iter()
        .filter(|e| FORM_CONTROLS.contains(&e.name.as_str()))
        .filter_map(|e| e.attr("id"))
        .filter(|id| !id.trim().is_empty())
        .collect();

    let by_reference = document
        .elements_named("label")
        .filter_map(|(_, label)| label.attr("for"))
        .any(|target| control_ids.contains(&target));

    let by_wrapping = FORM_CONTROLS.iter().any(|control| {
        document
            .elements_named(control)
            .any(|(index, _)| document.is_inside(index, &["label"]))
    });

    by_reference || by_wrapping
}
