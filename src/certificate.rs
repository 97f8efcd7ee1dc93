//! Completion certificate.
//!
//! The payload is a plain projection of the session; rendering it is the
//! page's job. Callers check that the course is complete and supply the
//! timestamp.

use crate::i18n::{Language, LanguageStrings, Resolver};
use crate::session::Session;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePayload {
    pub student_name: String,
    pub completion_date: DateTime<Utc>,
    pub language: Language,
}

/// Build the certificate for `session`, dated `timestamp`.
pub fn generate(session: &Session, timestamp: DateTime<Utc>) -> CertificatePayload {
    CertificatePayload {
        student_name: session.student_name().to_string(),
        completion_date: timestamp,
        language: session.language(),
    }
}

impl CertificatePayload {
    /// Completion date in the payload language, e.g. `19 octobre 2026`.
    pub fn formatted_date(&self) -> String {
        let date = self.completion_date.date_naive();
        LanguageStrings::for_language(self.language).format_date(date.day(), date.month(), date.year())
    }

    /// Certificate text lines: title, congratulations, body, date.
    pub fn render_lines(&self, resolver: &dyn Resolver) -> Vec<String> {
        let name = self.student_name.as_str();
        vec![
            resolver.resolve("ui.certificate_title", self.language),
            resolver
                .resolve("ui.congratulations", self.language)
                .replace("{name}", name),
            resolver
                .resolve("ui.certificate_body", self.language)
                .replace("{name}", name),
            resolver
                .resolve("ui.completed_on", self.language)
                .replace("{date}", &self.formatted_date()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::TranslationCatalog;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_generate_projects_session() {
        let session = Session::start("Test User", Language::FRENCH);
        let payload = generate(&session, timestamp());

        assert_eq!(payload.student_name, "Test User");
        assert_eq!(payload.completion_date, timestamp());
        assert_eq!(payload.language, Language::FRENCH);
    }

    #[test]
    fn test_generate_allows_empty_name() {
        let payload = generate(&Session::default(), timestamp());
        assert_eq!(payload.student_name, "");
        assert_eq!(payload.language, Language::ENGLISH);
    }

    #[test]
    fn test_formatted_date() {
        let english = generate(&Session::start("Ada", Language::ENGLISH), timestamp());
        assert_eq!(english.formatted_date(), "19 October 2026");

        let french = generate(&Session::start("Ada", Language::FRENCH), timestamp());
        assert_eq!(french.formatted_date(), "19 octobre 2026");
    }

    #[test]
    fn test_serializes_for_renderer() {
        let payload = generate(&Session::start("Ada", Language::FRENCH), timestamp());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["studentName"], "Ada");
        assert_eq!(json["language"], "fr");
        assert_eq!(json["completionDate"], "2026-10-19T14:30:00Z");
    }

    #[test]
    fn test_render_lines_in_french() {
        let payload = generate(&Session::start("Ada", Language::FRENCH), timestamp());
        let lines = payload.render_lines(TranslationCatalog::builtin());

        assert_eq!(lines[0], "Certificat de Réussite");
        assert_eq!(lines[1], "Félicitations, Ada !");
        assert!(lines[2].contains("Ada"));
        assert_eq!(lines[3], "Terminé le 19 octobre 2026");
    }
}
