//! Engine and tooling for an interactive HTML/CSS course.
//!
//! Learners type markup into a lesson; the [`validator`] checks it against
//! the lesson's rules, the [`progress`] tracker moves them through the
//! course, and the [`codec`] keeps the whole session in the URL fragment.
//! Finishing every lesson earns a [`certificate`].

pub mod bundle;
pub mod certificate;
pub mod codec;
pub mod config;
pub mod course;
pub mod i18n;
pub mod markup;
pub mod progress;
pub mod server;
pub mod session;
pub mod validator;

pub use certificate::CertificatePayload;
pub use codec::CodecError;
pub use course::{Category, Lesson, LessonId, LESSON_COUNT};
pub use i18n::{Language, TranslationCatalog};
pub use progress::{Command, Position, Tracker};
pub use session::Session;
pub use validator::{validate, VerificationResult};
