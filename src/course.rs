//! The course: categories, lessons and their validation rules.
//!
//! This is static data. Lessons are numbered globally in the order learners
//! take them; categories are contiguous runs of that numbering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of lessons in the course.
pub const LESSON_COUNT: usize = 20;

pub const REFERENCE_BASE: &str = "https://www.w3schools.com/";

/// A validated lesson id (global position in the course, starting at 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LessonId(u8);

impl LessonId {
    pub const FIRST: LessonId = LessonId(0);
    pub const LAST: LessonId = LessonId(LESSON_COUNT as u8 - 1);

    /// Returns `None` when `index` is not a lesson of the course.
    pub fn new(index: usize) -> Option<LessonId> {
        (index < LESSON_COUNT).then(|| LessonId(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn next(self) -> Option<LessonId> {
        LessonId::new(self.index() + 1)
    }

    pub fn previous(self) -> Option<LessonId> {
        self.index().checked_sub(1).and_then(LessonId::new)
    }

    /// Every lesson id in course order.
    pub fn all() -> impl Iterator<Item = LessonId> {
        (0..LESSON_COUNT as u8).map(LessonId)
    }

    pub fn lesson(self) -> &'static Lesson {
        &LESSONS[self.index()]
    }
}

impl TryFrom<u8> for LessonId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LessonId::new(value as usize).ok_or_else(|| format!("Unknown lesson id: {}", value))
    }
}

impl From<LessonId> for u8 {
    fn from(id: LessonId) -> u8 {
        id.0
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Course sections, in the order they are taught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    HtmlFundamentals,
    Html,
    Css,
    Accessibility,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::HtmlFundamentals,
            Category::Html,
            Category::Css,
            Category::Accessibility,
        ]
    }

    /// Stable identifier, also the key under `categories` in the translation table.
    pub fn id(&self) -> &'static str {
        match self {
            Category::HtmlFundamentals => "html-fundamentals",
            Category::Html => "html",
            Category::Css => "css",
            Category::Accessibility => "accessibility",
        }
    }

    pub fn from_id(id: &str) -> Option<Category> {
        Category::all().iter().copied().find(|c| c.id() == id)
    }

    pub fn title_key(&self) -> String {
        format!("categories.{}", self.id())
    }

    /// Lessons of this category, in course order.
    pub fn lessons(&self) -> impl Iterator<Item = &'static Lesson> + '_ {
        LESSONS.iter().filter(move |l| l.category == *self)
    }

    pub fn first_lesson(&self) -> LessonId {
        // Every category owns at least one lesson.
        self.lessons().next().map(|l| l.id).unwrap_or(LessonId::FIRST)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A structural predicate over a parsed submission. Tag and attribute names
/// are lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// At least one element of any kind.
    AnyElement,
    /// An element with this tag.
    Element(&'static str),
    /// An element with any of these tags.
    AnyOf(&'static [&'static str]),
    /// An element with this tag holding non-blank text.
    ElementWithText(&'static str),
    /// Any element carrying this attribute.
    Attribute(&'static str),
    /// An element with this tag carrying this attribute.
    ElementAttribute(&'static str, &'static str),
    /// An element with this tag whose attribute value is not blank.
    NonEmptyAttribute(&'static str, &'static str),
    /// An element with this tag whose attribute has at least `min_words` words.
    DescriptiveAttribute {
        element: &'static str,
        attribute: &'static str,
        min_words: usize,
    },
    /// An element with tag `child` inside one of the `parents`.
    NestedIn {
        child: &'static str,
        parents: &'static [&'static str],
    },
    /// A heading with a paragraph somewhere after it.
    HeadingThenParagraph,
    /// At least one heading, starting at `h1`, never skipping a level.
    HeadingHierarchy,
    /// A `label` tied to a form control (`for`/`id` or by wrapping it).
    LabelledControl,
    /// A CSS rule with at least one declaration.
    StyleRule,
    /// A declaration of this CSS property, in a stylesheet or `style` attribute.
    StyleProperty(&'static str),
    /// At least this many CSS declarations in total.
    StyleDeclarations(usize),
    /// A CSS rule whose selector matches an element of the document.
    SelectorMatchesElement,
    /// A `:focus` or `:focus-visible` rule with declarations for this tag.
    FocusStyle(&'static str),
}

/// One requirement of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Stable id, unique within the lesson; reported when the rule fails.
    pub id: &'static str,
    pub check: Check,
}

/// One unit of instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub category: Category,
    /// Human-readable identifier used in logs and the CLI.
    pub slug: &'static str,
    /// W3Schools page for further reading, relative to [`REFERENCE_BASE`].
    pub reference: &'static str,
    pub rules: &'static [Rule],
}

impl Lesson {
    pub fn title_key(&self) -> String {
        format!("lessons.{}.title", self.id)
    }

    pub fn starter_code_key(&self) -> String {
        format!("lessons.{}.starter", self.id)
    }

    /// Translation key of the hint behind the lesson's hint toggle.
    pub fn hint_key(&self) -> String {
        format!("lessons.{}.hint", self.id)
    }

    pub fn reference_url(&self) -> String {
        format!("{}{}", REFERENCE_BASE, self.reference)
    }

    /// Anchor to the reference page. External pages open in a new tab.
    pub fn reference_link(&self, label: &str) -> String {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            self.reference_url(),
            label
        )
    }

    /// Translation key for the hint shown when `rule_id` fails.
    pub fn feedback_key(&self, rule_id: &str) -> String {
        format!("lessons.{}.feedback.{}", self.id, rule_id)
    }

    /// 0-based position within its category.
    pub fn position_in_category(&self) -> usize {
        self.category
            .lessons()
            .position(|l| l.id == self.id)
            .unwrap_or(0)
    }

    pub fn rule(&self, id: &str) -> Option<&'static Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}

/// Look a lesson up by its slug.
pub fn lesson_by_slug(slug: &str) -> Option<&'static Lesson> {
    LESSONS.iter().find(|l| l.slug == slug)
}

/// Every lesson in course order.
pub fn lessons() -> &'static [Lesson] {
    &LESSONS
}

const fn rule(id: &'static str, check: Check) -> Rule {
    Rule { id, check }
}

const LISTS: &[&str] = &["ul", "ol"];

static LESSONS: [Lesson; LESSON_COUNT] = [
    // ==================== HTML Fundamentals ====================
    Lesson {
        id: LessonId(0),
        category: Category::HtmlFundamentals,
        slug: "understanding-html-tags",
        reference: "html/html_elements.asp",
        rules: &[rule("has-element", Check::AnyElement)],
    },
    Lesson {
        id: LessonId(1),
        category: Category::HtmlFundamentals,
        slug: "first-html-tag",
        reference: "html/html_paragraphs.asp",
        rules: &[
            rule("has-paragraph", Check::Element("p")),
            rule("paragraph-has-text", Check::ElementWithText("p")),
        ],
    },
    Lesson {
        id: LessonId(2),
        category: Category::HtmlFundamentals,
        slug: "html-attributes",
        reference: "html/html_attributes.asp",
        rules: &[
            rule("has-id", Check::Attribute("id")),
            rule("has-class", Check::Attribute("class")),
        ],
    },
    Lesson {
        id: LessonId(3),
        category: Category::HtmlFundamentals,
        slug: "common-html-tags",
        reference: "tags/default.asp",
        rules: &[
            rule("div-with-class", Check::ElementAttribute("div", "class")),
            rule(
                "has-inline-element",
                Check::AnyOf(&["span", "strong", "em", "b", "i", "a"]),
            ),
        ],
    },
    // ==================== HTML ====================
    Lesson {
        id: LessonId(4),
        category: Category::Html,
        slug: "document-structure",
        reference: "html/html_basic.asp",
        rules: &[
            rule("has-html", Check::Element("html")),
            rule("has-head", Check::Element("head")),
            rule("has-body", Check::Element("body")),
            rule(
                "title-in-head",
                Check::NestedIn {
                    child: "title",
                    parents: &["head"],
                },
            ),
        ],
    },
    Lesson {
        id: LessonId(5),
        category: Category::Html,
        slug: "adding-content",
        reference: "html/html_headings.asp",
        rules: &[
            rule("has-heading", Check::AnyOf(crate::markup::HEADINGS)),
            rule("heading-then-paragraph", Check::HeadingThenParagraph),
        ],
    },
    Lesson {
        id: LessonId(6),
        category: Category::Html,
        slug: "lists",
        reference: "html/html_lists.asp",
        rules: &[
            rule("has-list", Check::AnyOf(LISTS)),
            rule(
                "item-in-list",
                Check::NestedIn {
                    child: "li",
                    parents: LISTS,
                },
            ),
        ],
    },
    Lesson {
        id: LessonId(7),
        category: Category::Html,
        slug: "links",
        reference: "html/html_links.asp",
        rules: &[
            rule("has-link", Check::Element("a")),
            rule("link-has-href", Check::NonEmptyAttribute("a", "href")),
        ],
    },
    Lesson {
        id: LessonId(8),
        category: Category::Html,
        slug: "images",
        reference: "html/html_images.asp",
        rules: &[
            rule("has-image", Check::Element("img")),
            rule("image-has-src", Check::NonEmptyAttribute("img", "src")),
            rule("image-has-alt", Check::ElementAttribute("img", "alt")),
        ],
    },
    // ==================== CSS ====================
    Lesson {
        id: LessonId(9),
        category: Category::Css,
        slug: "introduction-to-css",
        reference: "css/css_intro.asp",
        rules: &[
            rule("has-style-block", Check::Element("style")),
            rule("has-css-rule", Check::StyleRule),
        ],
    },
    Lesson {
        id: LessonId(10),
        category: Category::Css,
        slug: "css-colors",
        reference: "css/css_colors.asp",
        rules: &[rule("sets-color", Check::StyleProperty("color"))],
    },
    Lesson {
        id: LessonId(11),
        category: Category::Css,
        slug: "text-styling",
        reference: "css/css_text.asp",
        rules: &[rule("sets-font-size", Check::StyleProperty("font-size"))],
    },
    Lesson {
        id: LessonId(12),
        category: Category::Css,
        slug: "css-selectors",
        reference: "css/css_selectors.asp",
        rules: &[
            rule("has-css-rule", Check::StyleRule),
            rule("selector-matches", Check::SelectorMatchesElement),
        ],
    },
    Lesson {
        id: LessonId(13),
        category: Category::Css,
        slug: "combining-styles",
        reference: "css/css_syntax.asp",
        rules: &[
            rule("has-css-rule", Check::StyleRule),
            rule("multiple-declarations", Check::StyleDeclarations(2)),
        ],
    },
    // ==================== Accessibility ====================
    Lesson {
        id: LessonId(14),
        category: Category::Accessibility,
        slug: "semantic-html",
        reference: "html/html5_semantic_elements.asp",
        rules: &[
            rule("has-header", Check::Element("header")),
            rule("has-main", Check::Element("main")),
        ],
    },
    Lesson {
        id: LessonId(15),
        category: Category::Accessibility,
        slug: "alt-text",
        reference: "tags/att_img_alt.asp",
        rules: &[
            rule("has-image", Check::Element("img")),
            rule("image-has-alt", Check::NonEmptyAttribute("img", "alt")),
            rule(
                "alt-is-descriptive",
                Check::DescriptiveAttribute {
                    element: "img",
                    attribute: "alt",
                    min_words: 3,
                },
            ),
        ],
    },
    Lesson {
        id: LessonId(16),
        category: Category::Accessibility,
        slug: "heading-hierarchy",
        reference: "html/html_headings.asp",
        rules: &[
            rule("has-h1", Check::Element("h1")),
            rule("has-h2", Check::Element("h2")),
            rule("no-skipped-levels", Check::HeadingHierarchy),
        ],
    },
    Lesson {
        id: LessonId(17),
        category: Category::Accessibility,
        slug: "keyboard-navigation",
        reference: "accessibility/accessibility_keyboard.php",
        rules: &[
            rule("has-link", Check::Element("a")),
            rule("link-focus-style", Check::FocusStyle("a")),
        ],
    },
    Lesson {
        id: LessonId(18),
        category: Category::Accessibility,
        slug: "aria-labels",
        reference: "accessibility/accessibility_aria.php",
        rules: &[
            rule("has-role", Check::Attribute("role")),
            rule("has-aria-label", Check::Attribute("aria-label")),
        ],
    },
    Lesson {
        id: LessonId(19),
        category: Category::Accessibility,
        slug: "advanced-accessibility",
        reference: "tags/tag_label.asp",
        rules: &[
            rule("declares-lang", Check::NonEmptyAttribute("html", "lang")),
            rule("has-label", Check::Element("label")),
            rule("label-for-control", Check::LabelledControl),
        ],
    },
];
