//! Session <-> URL fragment token.
//!
//! A token is compact JSON (one-letter field names, completed lessons as a
//! bitmask) encoded as unpadded base64url, so it can sit in a URL fragment
//! without escaping. Decoding is total: anything unreadable becomes the
//! default session.

use crate::course::{LessonId, LESSON_COUNT};
use crate::i18n::Language;
use crate::session::Session;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Token format version written by [`encode`].
pub const TOKEN_VERSION: u8 = 1;

/// Why a token could not be turned back into a session.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("token is empty")]
    Empty,

    #[error("token is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported token version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown lesson id {0}")]
    UnknownLesson(u8),

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("completed set {0:#x} names lessons outside the course")]
    InvalidCompletedSet(u32),
}

/// Wire shape of a token. Every field but the version has a default, and
/// unknown fields are ignored.
#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    v: u8,

    /// Student name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    n: String,

    /// Language code
    #[serde(default = "canonical_code")]
    l: String,

    /// Current lesson
    #[serde(default)]
    c: u8,

    /// Completed lessons, bit i set for lesson i
    #[serde(default, skip_serializing_if = "is_zero")]
    d: u32,

    /// Last submission per lesson
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    s: BTreeMap<u8, String>,
}

fn canonical_code() -> String {
    Language::canonical().code().to_string()
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Serialize a session into a URL-fragment-safe token.
pub fn encode(session: &Session) -> String {
    let payload = Payload {
        v: TOKEN_VERSION,
        n: session.student_name().to_string(),
        l: session.language().code().to_string(),
        c: session.current().into(),
        d: session
            .completed()
            .fold(0u32, |mask, id| mask | (1 << id.index())),
        s: session
            .code()
            .map(|(id, code)| (u8::from(id), code.to_string()))
            .collect(),
    };

    match serde_json::to_vec(&payload) {
        Ok(json) => URL_SAFE_NO_PAD.encode(json),
        Err(e) => {
            warn!("Failed to serialize session: {}", e);
            String::new()
        }
    }
}

/// Parse a token, reporting why it was rejected.
///
/// Accepts the bare token, a raw fragment (`#<token>`) and the `s=<token>`
/// form.
pub fn try_decode(token: &str) -> Result<Session, CodecError> {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token);
    let token = token.strip_prefix("s=").unwrap_or(token);
    if token.is_empty() {
        return Err(CodecError::Empty);
    }

    let json = URL_SAFE_NO_PAD.decode(token)?;
    let payload: Payload = serde_json::from_slice(&json)?;

    if payload.v != TOKEN_VERSION {
        return Err(CodecError::UnsupportedVersion(payload.v));
    }
    if payload.d >> LESSON_COUNT != 0 {
        return Err(CodecError::InvalidCompletedSet(payload.d));
    }

    let language =
        Language::from_code(&payload.l).map_err(|_| CodecError::UnknownLanguage(payload.l.clone()))?;
    let current = lesson_id(payload.c)?;

    let mut session = Session::start(&payload.n, language);
    session.move_to(current);
    for id in LessonId::all().filter(|id| (payload.d & (1 << id.index())) != 0) {
        session.mark_completed(id);
    }
    for (id, code) in &payload.s {
        session.record_code(lesson_id(*id)?, code);
    }

    Ok(session)
}

/// Parse a token; anything unreadable yields the default session.
pub fn decode(token: &str) -> Session {
    match try_decode(token) {
        Ok(session) => session,
        Err(CodecError::Empty) => Session::default(),
        Err(e) => {
            debug!("Discarding session token: {}", e);
            Session::default()
        }
    }
}

/// Link that reopens `session`: `<base_url>#<token>`. Any fragment already
/// on `base_url` is replaced.
pub fn share_link(base_url: &str, session: &Session) -> String {
    let base = base_url.split('#').next().unwrap_or(base_url);
    format!("{}#{}", base, encode(session))
}

fn lesson_id(raw: u8) -> Result<LessonId, CodecError> {
    LessonId::new(raw as usize).ok_or(CodecError::UnknownLesson(raw))
}
