//! Locale strings compiled into the binary.
//!
//! Page text lives in the translation catalog. What stays here is the
//! formatting data the engine itself needs, such as month names for
//! certificate dates.

use crate::i18n::Language;

/// Locale data for a language
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    /// Month names, January first
    pub months: [&'static str; 12],

    /// Date layout.
    /// Placeholders: {day}, {month}, {year}
    pub date_pattern: &'static str,
}

// ==================== English Strings ====================

/// English locale data (canonical)
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    date_pattern: "{day} {month} {year}",
};

// ==================== French Strings ====================

/// French locale data
pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    date_pattern: "{day} {month} {year}",
};

impl LanguageStrings {
    /// Locale data for a language, English for anything unknown.
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language.code() {
            "fr" => &FRENCH_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    /// Name of `month` (1-based). Out-of-range months yield an empty string.
    pub fn month_name(&self, month: u32) -> &'static str {
        month
            .checked_sub(1)
            .and_then(|index| self.months.get(index as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Render a calendar date with this locale's layout.
    pub fn format_date(&self, day: u32, month: u32, year: i32) -> String {
        self.date_pattern
            .replace("{day}", &day.to_string())
            .replace("{month}", self.month_name(month))
            .replace("{year}", &year.to_string())
    }
}
