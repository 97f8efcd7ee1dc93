//! Lesson checker - validates a markup file against one lesson
//!
//! Usage:
//!   cargo run --bin check -- <lesson> <file>            # lesson number or slug
//!   cargo run --bin check -- 8 page.html --lang fr      # hints in French
//!   cargo run --bin check -- links - < page.html        # read stdin
//!   cargo run --bin check -- 8 page.html --format       # print formatted code
//!
//! Exits with status 1 when a rule fails.

use anyhow::{bail, Context, Result};
use learn_html_css::course::{lesson_by_slug, Lesson, LessonId};
use learn_html_css::i18n::{Language, LookupMetrics, TranslationCatalog};
use learn_html_css::markup::format_markup;
use learn_html_css::validator::validate_lesson;
use std::io::Read;
use tracing::info;

fn find_lesson(arg: &str) -> Result<&'static Lesson> {
    if let Ok(index) = arg.parse::<usize>() {
        return LessonId::new(index)
            .map(LessonId::lesson)
            .with_context(|| format!("No lesson number {}", index));
    }
    lesson_by_slug(arg).with_context(|| format!("No lesson named '{}'", arg))
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learn_html_css=info".parse()?),
        )
        .init();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let format = args.iter().any(|arg| arg == "--format");
    let language = match args.iter().position(|arg| arg == "--lang") {
        Some(i) => Language::from_code(args.get(i + 1).map(String::as_str).unwrap_or_default())?,
        None => Language::default(),
    };
    let positional: Vec<&str> = args
        .iter()
        .enumerate()
        .filter(|(i, arg)| !arg.starts_with("--") && !(*i > 0 && args[i - 1] == "--lang"))
        .map(|(_, arg)| arg.as_str())
        .collect();

    let &[lesson, path] = positional.as_slice() else {
        bail!("Usage: check <lesson> <file> [--lang en|fr] [--format]");
    };

    let lesson = find_lesson(lesson)?;
    let source = read_source(path)?;
    let catalog = TranslationCatalog::builtin();

    info!("Checking {} against lesson {} ({})", path, lesson.id, lesson.slug);
    let result = validate_lesson(&source, lesson);

    let number = (lesson.id.index() + 1).to_string();
    println!(
        "\n{} {}: {}",
        catalog.lookup_with("ui.lesson_label", language, &[("number", number.as_str())]),
        lesson.slug,
        catalog.lookup(&lesson.title_key(), language)
    );
    if result.passed {
        println!("✅ {}", catalog.lookup("ui.success", language));
    } else {
        println!("❌ {}", catalog.lookup("ui.error", language));
        for (rule, key) in result.failed_rule_ids.iter().zip(result.feedback_keys(lesson)) {
            println!("   - [{}] {}", rule, catalog.lookup(&key, language));
        }
        let hint_key = lesson.hint_key();
        println!("\n💡 {}", catalog.lookup(&hint_key, language));
        println!(
            "📖 {}: {}",
            catalog.lookup("ui.reference", language),
            lesson.reference_url()
        );
    }

    if format {
        println!("\n{}", format_markup(&source));
    }

    info!("{}", LookupMetrics::global().report().format_log());

    if !result.passed {
        std::process::exit(1);
    }
    Ok(())
}
