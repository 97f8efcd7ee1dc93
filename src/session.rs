//! The learner's session: name, language, position and progress.
//!
//! A session only changes through these methods, which keeps it inside the
//! set of states the state codec can reproduce exactly: names are trimmed,
//! stored code is trimmed and never blank, completion is never revoked.

use crate::course::{Category, Lesson, LessonId, LESSON_COUNT};
use crate::i18n::Language;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    student_name: String,
    language: Language,
    current: LessonId,
    completed: BTreeSet<LessonId>,
    code: BTreeMap<LessonId, String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            language: Language::canonical(),
            current: LessonId::FIRST,
            completed: BTreeSet::new(),
            code: BTreeMap::new(),
        }
    }
}

impl Session {
    /// A fresh session at the first lesson.
    pub fn start(student_name: &str, language: Language) -> Self {
        Self {
            student_name: student_name.trim().to_string(),
            language,
            ..Self::default()
        }
    }

    /// May be empty.
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn current(&self) -> LessonId {
        self.current
    }

    pub fn current_lesson(&self) -> &'static Lesson {
        self.current.lesson()
    }

    pub(crate) fn move_to(&mut self, lesson: LessonId) {
        self.current = lesson;
    }

    /// Remember the last submission for `lesson`. Blank code forgets it.
    pub fn record_code(&mut self, lesson: LessonId, code: &str) {
        let code = code.trim();
        if code.is_empty() {
            self.code.remove(&lesson);
        } else {
            self.code.insert(lesson, code.to_string());
        }
    }

    pub fn code_for(&self, lesson: LessonId) -> Option<&str> {
        self.code.get(&lesson).map(String::as_str)
    }

    /// Stored submissions, by lesson.
    pub fn code(&self) -> impl Iterator<Item = (LessonId, &str)> {
        self.code.iter().map(|(id, code)| (*id, code.as_str()))
    }

    /// Returns true if the lesson was not completed before.
    pub fn mark_completed(&mut self, lesson: LessonId) -> bool {
        self.completed.insert(lesson)
    }

    pub fn is_completed(&self, lesson: LessonId) -> bool {
        self.completed.contains(&lesson)
    }

    /// Completed lessons in course order.
    pub fn completed(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.completed.iter().copied()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_course_complete(&self) -> bool {
        self.completed.len() == LESSON_COUNT
    }

    /// `(completed, total)` lessons of a category.
    pub fn category_progress(&self, category: Category) -> (usize, usize) {
        category.lessons().fold((0, 0), |(done, total), lesson| {
            (done + usize::from(self.is_completed(lesson.id)), total + 1)
        })
    }

    /// The earliest lesson not completed yet.
    pub fn first_incomplete(&self) -> Option<LessonId> {
        LessonId::all().find(|id| !self.is_completed(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(index: usize) -> LessonId {
        LessonId::new(index).unwrap()
    }

    #[test]
    fn test_default_session() {
        let session = Session::default();
        assert_eq!(session.student_name(), "");
        assert_eq!(session.language(), Language::ENGLISH);
        assert_eq!(session.current(), LessonId::FIRST);
        assert_eq!(session.completed_count(), 0);
        assert!(session.code().next().is_none());
    }

    #[test]
    fn test_start_trims_name() {
        let session = Session::start("  Ada Lovelace \n", Language::FRENCH);
        assert_eq!(session.student_name(), "Ada Lovelace");
        assert_eq!(session.language(), Language::FRENCH);
        assert_eq!(session.current(), LessonId::FIRST);
    }

    #[test]
    fn test_record_code_trims_and_forgets_blank() {
        let mut session = Session::default();
        session.record_code(lesson(1), "\n  <p>Hi</p>  \n");
        assert_eq!(session.code_for(lesson(1)), Some("<p>Hi</p>"));

        session.record_code(lesson(1), "   ");
        assert_eq!(session.code_for(lesson(1)), None);
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let mut session = Session::default();
        assert!(session.mark_completed(lesson(3)));
        assert!(!session.mark_completed(lesson(3)));
        assert_eq!(session.completed_count(), 1);
        assert!(session.is_completed(lesson(3)));
    }

    #[test]
    fn test_completed_in_course_order() {
        let mut session = Session::default();
        for index in [7, 2, 5] {
            session.mark_completed(lesson(index));
        }
        let completed: Vec<_> = session.completed().map(LessonId::index).collect();
        assert_eq!(completed, vec![2, 5, 7]);
    }

    #[test]
    fn test_category_progress() {
        let mut session = Session::default();
        session.mark_completed(lesson(0));
        session.mark_completed(lesson(2));
        session.mark_completed(lesson(9));

        assert_eq!(session.category_progress(Category::HtmlFundamentals), (2, 4));
        assert_eq!(session.category_progress(Category::Html), (0, 5));
        assert_eq!(session.category_progress(Category::Css), (1, 5));
        assert_eq!(session.category_progress(Category::Accessibility), (0, 6));
    }

    #[test]
    fn test_first_incomplete() {
        let mut session = Session::default();
        assert_eq!(session.first_incomplete(), Some(LessonId::FIRST));

        session.mark_completed(lesson(0));
        session.mark_completed(lesson(1));
        assert_eq!(session.first_incomplete(), Some(lesson(2)));

        for id in LessonId::all() {
            session.mark_completed(id);
        }
        assert_eq!(session.first_incomplete(), None);
        assert!(session.is_course_complete());
    }
}
