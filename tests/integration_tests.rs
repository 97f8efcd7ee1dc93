//! Integration tests for the course engine and its tooling
//!
//! These tests drive the crate the way the page and the binaries do:
//! commands in, URL tokens out, the shipped site directory on disk.

use chrono::{TimeZone, Utc};
use learn_html_css::course::{lessons, Category, LessonId, LESSON_COUNT};
use learn_html_css::i18n::{CatalogValidator, Language, TranslationCatalog};
use learn_html_css::markup::format_markup;
use learn_html_css::progress::{Command, Position, Tracker};
use learn_html_css::{bundle, certificate, codec, server, validate, Session};
use proptest::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ==================== Test Helpers ====================

/// One passing submission per lesson, in course order.
const SOLUTIONS: [&str; LESSON_COUNT] = [
    "<div>Test</div>",
    "<p>Hello World</p>",
    "<p id=\"test\">Content</p>\n<div class=\"container\">More</div>",
    "<div class=\"container\">Test</div><span>Inline</span><strong>Bold</strong>",
    "<html><head><title>Test</title></head><body><h1>Hello</h1></body></html>",
    "<html><head><title>Test</title></head><body><h1>Title</h1><p>Paragraph</p></body></html>",
    "<html><head><title>Test</title></head><body><ul><li>Item</li></ul></body></html>",
    "<html><head><title>Test</title></head><body><a href=\"https://example.com\">Link</a></body></html>",
    "<html><head><title>Test</title></head><body><img src=\"test.jpg\" alt=\"Test image\"></body></html>",
    "<html><head><style>body { color: blue; font-size: 16px; }</style></head><body><h1>Test</h1></body></html>",
    "<html><head><style>body { color: blue; font-size: 16px; }</style></head><body><h1>Test</h1></body></html>",
    "<html><head><style>body { color: blue; font-size: 16px; }</style></head><body><h1>Test</h1></body></html>",
    "<html><head><style>body { color: blue; font-size: 16px; }</style></head><body><h1>Test</h1></body></html>",
    "<html><head><style>body { color: blue; font-size: 16px; }</style></head><body><h1>Test</h1></body></html>",
    "<html lang=\"en\"><head><title>Test</title></head><body><header><h1>Welcome</h1></header><main><p>Content</p></main></body></html>",
    "<html><head><title>Test</title></head><body><img src=\"test.jpg\" alt=\"A red sunset over the ocean\"></body></html>",
    "<html><head><title>Test</title></head><body><h1>Main Title</h1><h2>Subtitle</h2><p>Content</p></body></html>",
    "<html><head><title>Test</title><style>a:focus { outline: 2px solid blue; }</style></head><body><nav><a href=\"#home\">Home</a></nav></body></html>",
    "<html><head><title>Test</title></head><body><div role=\"button\" aria-label=\"Click me\">Button</div></body></html>",
    "<html lang=\"en\"><head><title>Test</title></head><body><form><label for=\"user\">User:</label><input type=\"text\" id=\"user\"></form></body></html>",
];

/// Markup fragments combined into random submissions.
const SNIPPETS: [&str; 16] = [
    "<html lang=\"fr\">",
    "</html>",
    "<head><title>Page</title></head>",
    "<body>",
    "</body>",
    "<h1>Title</h1>",
    "<h3>Deep</h3>",
    "<p class='lead'>Some   text</p>",
    "<ul><li>One</li><li>Two</li></ul>",
    "<a href=\"#top\">Top</a>",
    "<img src=\"a.png\" alt=\"A small red kite\">",
    "<br/>",
    "<style>p { color: red; font-size: 2em; } a:focus-visible { outline: none; }</style>",
    "<label for=\"q\">Search</label><input id=\"q\">",
    "<div role=\"note\" aria-label=\"Tip\">Hint</div>",
    "\n   plain text \n",
];

fn site_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("site")
}

fn lesson(index: usize) -> LessonId {
    LessonId::new(index).unwrap()
}

/// Apply a command the way the page does: restore from the URL, dispatch,
/// return the new URL token.
fn step(token: &str, command: Command) -> String {
    let mut tracker = Tracker::from_token(token);
    tracker.dispatch(command).token
}

// ==================== Course Walkthrough Tests ====================

#[test]
fn test_full_course_through_url_tokens() {
    let mut token = step(
        "",
        Command::Start {
            name: "Test User".to_string(),
            language: Language::FRENCH,
        },
    );

    for (index, solution) in SOLUTIONS.iter().enumerate() {
        let session = codec::decode(&token);
        assert_eq!(session.current(), lesson(index));

        let mut tracker = Tracker::from_token(&token);
        let outcome = tracker.dispatch(Command::Verify(solution.to_string()));
        assert!(outcome.result.unwrap().passed, "lesson {}", index);

        let outcome = tracker.dispatch(Command::Advance);
        assert_eq!(outcome.changed, index + 1 < LESSON_COUNT);
        token = outcome.token;
    }

    let tracker = Tracker::from_token(&token);
    assert_eq!(tracker.position(), Position::Completed);
    assert_eq!(tracker.session().student_name(), "Test User");
    assert_eq!(tracker.session().language(), Language::FRENCH);

    let payload = certificate::generate(
        tracker.session(),
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
    );
    assert_eq!(payload.student_name, "Test User");
    assert_eq!(payload.formatted_date(), "19 octobre 2026");
}

#[test]
fn test_advance_needs_a_fresh_pass_after_reload() {
    let mut tracker = Tracker::default();
    let token = tracker.dispatch(Command::Verify(SOLUTIONS[0].to_string())).token;

    // The last result is not part of the token
    let mut reloaded = Tracker::from_token(&token);
    assert!(!reloaded.dispatch(Command::Advance).changed);
    assert!(reloaded.session().is_completed(LessonId::FIRST));
}

#[test]
fn test_skip_then_return_to_open_lesson() {
    let mut token = step("", Command::Skip);
    token = step(&token, Command::JumpToCategory(Category::Accessibility));
    assert_eq!(codec::decode(&token).current(), lesson(14));

    token = step(&token, Command::JumpToCategory(Category::HtmlFundamentals));
    let session = codec::decode(&token);
    assert_eq!(session.current(), LessonId::FIRST);
    assert_eq!(session.completed_count(), 0);
}

#[test]
fn test_category_progress_after_first_section() {
    let mut tracker = Tracker::default();
    for solution in &SOLUTIONS[..4] {
        tracker.dispatch(Command::Verify(solution.to_string()));
        tracker.dispatch(Command::Advance);
    }

    let session = tracker.session();
    assert_eq!(session.category_progress(Category::HtmlFundamentals), (4, 4));
    assert_eq!(session.category_progress(Category::Html), (0, 5));
    assert_eq!(session.current(), lesson(4));
}

// ==================== State Codec Tests ====================

#[test]
fn test_share_link_reopens_session() {
    let mut tracker = Tracker::default();
    tracker.dispatch(Command::Start {
        name: "Ada".to_string(),
        language: Language::ENGLISH,
    });
    tracker.dispatch(Command::Verify(SOLUTIONS[0].to_string()));

    let link = codec::share_link("http://localhost:8000/", tracker.session());
    let fragment = link.split_once('#').map(|(_, f)| f).unwrap();

    assert_eq!(&codec::decode(fragment), tracker.session());
    assert_eq!(&codec::decode(&format!("#{}", fragment)), tracker.session());
}

#[test]
fn test_tampered_token_restarts_course() {
    let token = step(
        "",
        Command::Start {
            name: "Ada".to_string(),
            language: Language::FRENCH,
        },
    );
    let tampered = format!("{}!", token);

    assert_eq!(codec::decode(&tampered), Session::default());
    assert!(codec::try_decode(&tampered).is_err());
}

// ==================== Translation Coverage Tests ====================

#[test]
fn test_every_lesson_key_resolves_in_both_languages() {
    let catalog = TranslationCatalog::builtin();

    for code in ["en", "fr"] {
        for lesson in lessons() {
            let mut keys = vec![lesson.title_key(), lesson.starter_code_key(), lesson.hint_key()];
            keys.extend(lesson.rules.iter().map(|rule| lesson.feedback_key(rule.id)));

            for key in keys {
                let text = catalog.get(code, &key);
                assert!(
                    text.is_some_and(|t| !t.trim().is_empty()),
                    "'{}' missing for '{}'",
                    key,
                    code
                );
            }
        }
        for category in Category::all() {
            assert!(catalog.get(code, &category.title_key()).is_some());
        }
        for key in ["ui.hint_show", "ui.hint_hide", "ui.reference"] {
            assert!(catalog.get(code, key).is_some(), "'{}' missing for '{}'", key, code);
        }
    }
}

#[test]
fn test_hint_and_reference_for_every_lesson() {
    let catalog = TranslationCatalog::builtin();
    let mut token = String::new();

    for lesson in lessons() {
        let mut tracker = Tracker::from_token(&token);
        assert_eq!(tracker.session().current(), lesson.id);

        tracker.dispatch(Command::ToggleHint);
        let hint = tracker.hint(catalog).unwrap();
        assert_ne!(hint, lesson.hint_key());

        let link = tracker.reference_link(catalog);
        assert!(link.contains(&format!("href=\"{}\"", lesson.reference_url())));
        assert!(link.contains("target=\"_blank\""));

        token = tracker.dispatch(Command::Skip).token;
    }
}

#[test]
fn test_shipped_table_passes_checks() {
    let catalog = TranslationCatalog::from_path(site_root().join("translations.json")).unwrap();
    let report = CatalogValidator::validate(&catalog);
    assert!(report.is_clean(), "{:?}", report);
}

#[test]
fn test_starter_code_does_not_pass() {
    let catalog = TranslationCatalog::builtin();
    for language in [Language::ENGLISH, Language::FRENCH] {
        for lesson in lessons() {
            let key = lesson.starter_code_key();
            let starter = catalog.lookup(&key, language);
            assert!(
                !validate(starter, lesson.id).passed,
                "starter of lesson {} ({}) already passes",
                lesson.id,
                language
            );
        }
    }
}

#[test]
fn test_french_ui_strings() {
    let catalog = TranslationCatalog::builtin();
    assert_eq!(catalog.lookup("ui.verify", Language::FRENCH), "Vérifier le Code");
    assert_eq!(catalog.lookup("ui.skip", Language::FRENCH), "Passer");
    assert_eq!(catalog.lookup("ui.back", Language::FRENCH), "← Retour");
    assert_eq!(catalog.lookup("lessons.0.title", Language::FRENCH), "Comprendre les Balises HTML");
}

// ==================== Formatting Tests ====================

#[test]
fn test_formatted_solutions_still_pass() {
    for (index, solution) in SOLUTIONS.iter().enumerate() {
        let formatted = format_markup(solution);
        assert!(
            validate(&formatted, lesson(index)).passed,
            "lesson {} fails after formatting:\n{}",
            index,
            formatted
        );
    }
}

#[test]
fn test_quote_style_and_tag_case_do_not_matter() {
    let tag_name = Regex::new(r"(</?)([a-z][a-z0-9]*)").unwrap();

    for (index, solution) in SOLUTIONS.iter().enumerate() {
        let single_quoted = solution.replace('"', "'");
        let upper = tag_name.replace_all(solution, |caps: &regex::Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        });

        assert!(validate(&single_quoted, lesson(index)).passed, "lesson {}", index);
        assert!(validate(&upper, lesson(index)).passed, "lesson {}", index);
    }
}

proptest! {
    #[test]
    fn prop_whitespace_does_not_change_result(
        index in 0..LESSON_COUNT,
        indent in "[ \t]{0,8}",
        newlines in 1usize..3,
    ) {
        let separator = format!(">{}{}<", "\n".repeat(newlines), indent);
        let spread = SOLUTIONS[index].replace("><", &separator);

        prop_assert_eq!(
            validate(&spread, lesson(index)),
            validate(SOLUTIONS[index], lesson(index))
        );
    }

    #[test]
    fn prop_formatting_preserves_result(
        pieces in prop::collection::vec(prop::sample::select(SNIPPETS.to_vec()), 0..12),
        index in 0..LESSON_COUNT,
    ) {
        let source = pieces.concat();
        let formatted = format_markup(&source);
        prop_assert_eq!(validate(&formatted, lesson(index)), validate(&source, lesson(index)));
    }
}

// ==================== Dev Server Tests ====================

#[tokio::test]
async fn test_dev_server_serves_site() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server::serve_on(listener, &site_root(), async {
            let _ = stop_rx.await;
        })
        .await
    });

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["access-control-allow-methods"], "GET");
    assert_eq!(
        response.headers()["cache-control"],
        "no-store, no-cache, must-revalidate"
    );
    assert!(response.text().await.unwrap().contains("fetch('translations.json')"));

    let response = reqwest::get(format!("http://{}/translations.json", addr)).await.unwrap();
    let served = TranslationCatalog::from_json_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(served.lookup("ui.start", Language::FRENCH), "Commencer l'Apprentissage");

    let _ = stop_tx.send(());
    handle.await.unwrap().unwrap();
}

// ==================== Bundler Tests ====================

#[test]
fn test_bundle_shipped_site() {
    let dir = tempfile::tempdir().unwrap();
    for file in ["index.html", "translations.json"] {
        std::fs::copy(site_root().join(file), dir.path().join(file)).unwrap();
    }

    let report = bundle::bundle(dir.path(), &dir.path().join("translations.json")).unwrap();
    assert!(report.replaced);
    assert!(report.output_bytes > report.input_bytes);

    let page = std::fs::read_to_string(dir.path().join(bundle::OUTPUT_FILE)).unwrap();
    assert!(!page.contains("fetch('translations.json')"));
    assert!(page.contains("const translationsLoaded = true;"));
    assert!(page.contains("Vérifier le Code"));
    assert!(page.contains("if (translationsLoaded) applyLanguage();"));
}
