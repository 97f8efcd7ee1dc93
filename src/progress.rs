//! Progress tracking: where the learner is and what they may do next.
//!
//! The [`Tracker`] owns the session plus the result of the last
//! verification. The page talks to it through [`Command`]s; every dispatch
//! returns the re-encoded session token so the URL is updated after the
//! state changed.

use crate::codec;
use crate::course::{Category, LessonId, LESSON_COUNT};
use crate::i18n::{Language, Resolver};
use crate::session::Session;
use crate::validator::{validate, VerificationResult};
use tracing::{debug, info};

/// Where the learner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Lesson(LessonId),
    /// Every lesson is completed. Terminal.
    Completed,
}

/// Something the learner did on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the welcome screen with a fresh session.
    Start { name: String, language: Language },
    /// Check code against the current lesson.
    Verify(String),
    Advance,
    Back,
    Skip,
    JumpToCategory(Category),
    SwitchLanguage(Language),
    /// Show or hide the hint of the current lesson.
    ToggleHint,
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// False when the command was a no-op
    pub changed: bool,

    /// Set for `Verify`
    pub result: Option<VerificationResult>,

    /// Session token after the command
    pub token: String,
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    session: Session,
    last_result: Option<VerificationResult>,
    hint_visible: bool,
}

impl Tracker {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            last_result: None,
            hint_visible: false,
        }
    }

    /// Resume from a URL fragment (or a fresh session if it is unreadable).
    pub fn from_token(token: &str) -> Self {
        Self::new(codec::decode(token))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn last_result(&self) -> Option<&VerificationResult> {
        self.last_result.as_ref()
    }

    pub fn position(&self) -> Position {
        if self.session.is_course_complete() {
            Position::Completed
        } else {
            Position::Lesson(self.session.current())
        }
    }

    pub fn is_completed(&self) -> bool {
        self.position() == Position::Completed
    }

    /// Validate `code` against the current lesson and record it. A pass
    /// marks the lesson completed.
    pub fn verify(&mut self, code: &str) -> VerificationResult {
        let lesson = self.session.current();
        self.session.record_code(lesson, code);

        let result = validate(code, lesson);
        if result.passed && self.session.mark_completed(lesson) {
            info!(
                "Lesson {} completed ({}/{})",
                lesson,
                self.session.completed_count(),
                LESSON_COUNT
            );
        }

        self.last_result = Some(result.clone());
        result
    }

    /// Move on after a passing verification.
    ///
    /// From the last lesson this goes to the first lesson still open, or
    /// nowhere when the course is done.
    pub fn advance(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        if !self.last_result.as_ref().is_some_and(|r| r.passed) {
            debug!("Advance ignored: lesson {} has not passed", self.session.current());
            return false;
        }

        match self.session.current().next() {
            Some(next) => self.go_to(next),
            None => match self.session.first_incomplete() {
                Some(open) => self.go_to(open),
                None => false,
            },
        }
    }

    /// Move to the next lesson without passing. No-op at the last lesson.
    pub fn skip(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        match self.session.current().next() {
            Some(next) => self.go_to(next),
            None => false,
        }
    }

    /// Previous lesson. No-op at the first lesson.
    pub fn back(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        match self.session.current().previous() {
            Some(previous) => self.go_to(previous),
            None => false,
        }
    }

    /// First lesson of `category`, completed or not.
    pub fn jump_to_category(&mut self, category: Category) -> bool {
        if self.is_completed() {
            return false;
        }
        self.go_to(category.first_lesson())
    }

    pub fn switch_language(&mut self, language: Language) -> bool {
        if self.session.language() == language {
            return false;
        }
        self.session.set_language(language);
        true
    }

    /// Apply a command and re-encode the session.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        debug!("Dispatching {:?}", command);

        let mut result = None;
        let changed = match command {
            Command::Start { name, language } => {
                self.session = Session::start(&name, language);
                self.last_result = None;
                self.hint_visible = false;
                true
            }
            Command::Verify(code) => {
                result = Some(self.verify(&code));
                true
            }
            Command::Advance => self.advance(),
            Command::Back => self.back(),
            Command::Skip => self.skip(),
            Command::JumpToCategory(category) => self.jump_to_category(category),
            Command::SwitchLanguage(language) => self.switch_language(language),
            Command::ToggleHint => self.toggle_hint(),
        };

        Outcome {
            changed,
            result,
            token: codec::encode(&self.session),
        }
    }

    /// Hints for the failed rules of the last verification, in the session
    /// language.
    pub fn feedback(&self, resolver: &dyn Resolver) -> Vec<String> {
        let Some(result) = &self.last_result else {
            return Vec::new();
        };
        let lesson = self.session.current_lesson();
        result
            .feedback_keys(lesson)
            .iter()
            .map(|key| resolver.resolve(key, self.session.language()))
            .collect()
    }

    /// What the editor shows: the learner's last code for the current
    /// lesson, or the lesson's starter code.
    pub fn editor_code(&self, resolver: &dyn Resolver) -> String {
        match self.session.code_for(self.session.current()) {
            Some(code) => code.to_string(),
            None => resolver.resolve(
                &self.session.current_lesson().starter_code_key(),
                self.session.language(),
            ),
        }
    }

    /// Flip the hint of the current lesson. Not possible once the course is
    /// done.
    pub fn toggle_hint(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.hint_visible = !self.hint_visible;
        true
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// The current lesson's hint while it is shown.
    pub fn hint(&self, resolver: &dyn Resolver) -> Option<String> {
        self.hint_visible.then(|| {
            resolver.resolve(&self.session.current_lesson().hint_key(), self.session.language())
        })
    }

    /// Label of the hint button: "show" while hidden, "hide" while shown.
    pub fn hint_toggle_label(&self, resolver: &dyn Resolver) -> String {
        let key = if self.hint_visible {
            "ui.hint_hide"
        } else {
            "ui.hint_show"
        };
        resolver.resolve(key, self.session.language())
    }

    /// Link to the current lesson's reference page, opening in a new tab.
    pub fn reference_link(&self, resolver: &dyn Resolver) -> String {
        let label = resolver.resolve("ui.reference", self.session.language());
        self.session.current_lesson().reference_link(&label)
    }

    fn go_to(&mut self, lesson: LessonId) -> bool {
        let moved = self.session.current() != lesson;
        self.session.move_to(lesson);
        self.last_result = None;
        self.hint_visible = false;
        moved
    }
}
