use crate::metrics::NormalizationError;
use core::fmt::{Display, Formatter};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use strum::{Display as StrumDisplay, IntoStaticStr};

/// Longest unclassified reason shown to a user.
pub const MAX_REASON_CHARS: usize = 160;

static HTTP_STATUS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\s*(\d{3})").expect("invalid regex"));

/// Everything that can go wrong inside a collector.
///
/// None of these ever leave a collector: they are classified and folded into a
/// [`SourceResult`](super::SourceResult).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    Transport(String),

    /// The collaborator answered with a non-success status.
    Protocol { status: u16, message: Option<String> },

    /// The body could not be parsed at all.
    MalformedResponse(String),

    /// The collaborator is not present in this environment.
    CapabilityUnavailable(String),

    /// The body parsed but does not have the expected structure.
    Normalization(NormalizationError),
}

impl SourceError {
    /// Unprocessed diagnostic text, for logs and the machine-readable summary.
    #[must_use]
    pub fn raw_reason(&self) -> String {
        match self {
            Self::Transport(text) | Self::MalformedResponse(text) | Self::CapabilityUnavailable(text) => text.clone(),
            Self::Protocol { status, message: Some(message) } => format!("HTTP {status}: {message}"),
            Self::Protocol { status, message: None } => format!("HTTP {status}"),
            Self::Normalization(e) => e.to_string(),
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw_reason())
    }
}

impl core::error::Error for SourceError {}

impl From<NormalizationError> for SourceError {
    fn from(e: NormalizationError) -> Self {
        Self::Normalization(e)
    }
}

/// Closed taxonomy of user-facing failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    RateLimit,
    AccessDenied,
    InvalidRequest,
    MissingOrInvalidCredential,
    MalformedResponse,
    Transport,
}

impl FailureKind {
    /// Whether a failure of this kind is the anticipated outcome of calling a service without a
    /// credential.
    ///
    /// Such failures are reported as a note rather than an issue.
    #[must_use]
    pub const fn is_expected_unavailable(self, credential_supplied: bool) -> bool {
        !credential_supplied && matches!(self, Self::RateLimit | Self::AccessDenied | Self::MissingOrInvalidCredential)
    }
}

/// A failure mapped onto the taxonomy, with the one sentence shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: FailureKind,
    pub reason: String,
}

/// Classify a collector failure for the given service name (e.g. "PageSpeed API").
#[must_use]
pub fn classify(service: &str, error: &SourceError) -> Classified {
    match error {
        SourceError::MalformedResponse(_) | SourceError::Normalization(_) => Classified {
            kind: FailureKind::MalformedResponse,
            reason: format!("{service} returned a malformed response"),
        },
        _ => classify_text(service, &error.raw_reason()),
    }
}

/// Classify free-form failure text by scanning it for known markers.
#[must_use]
pub fn classify_text(service: &str, raw: &str) -> Classified {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return Classified {
            kind: FailureKind::Transport,
            reason: format!("{service} request failed"),
        };
    }

    let lower = text.to_lowercase();

    if lower.contains("quota") && (lower.contains("exceeded") || lower.contains("limit")) {
        return Classified {
            kind: FailureKind::RateLimit,
            reason: format!("{service} quota exceeded"),
        };
    }

    if lower.contains("api key") || lower.contains("key invalid") {
        return Classified {
            kind: FailureKind::MissingOrInvalidCredential,
            reason: format!("{service} key missing or invalid"),
        };
    }

    if let Some(code) = HTTP_STATUS_REGEX.captures(&lower).and_then(|caps| caps.get(1)) {
        let (kind, reason) = match code.as_str() {
            "429" => (FailureKind::RateLimit, format!("{service} rate limit reached")),
            "403" => (FailureKind::AccessDenied, format!("{service} access denied")),
            "400" => (FailureKind::InvalidRequest, format!("{service} request invalid")),
            other => (FailureKind::Transport, format!("HTTP {other} from {service}")),
        };
        return Classified { kind, reason };
    }

    Classified {
        kind: FailureKind::Transport,
        reason: truncate_chars(&text, MAX_REASON_CHARS),
    }
}

/// First `max` characters of `text`, never splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
