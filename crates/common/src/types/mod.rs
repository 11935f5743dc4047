use serde::{Deserialize, Serialize};

/// How long a banner stays visible before the client dismisses it.
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
    Info,
}

/// Transient user-facing banner attached to a response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub ttl_ms: u64,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self { level, text: text.into(), ttl_ms: DEFAULT_NOTICE_TTL_MS }
    }

    pub fn success(text: impl Into<String>) -> Self { Self::new(NoticeLevel::Success, text) }
    pub fn warning(text: impl Into<String>) -> Self { Self::new(NoticeLevel::Warning, text) }
    pub fn danger(text: impl Into<String>) -> Self { Self::new(NoticeLevel::Danger, text) }
    pub fn info(text: impl Into<String>) -> Self { Self::new(NoticeLevel::Info, text) }

    /// Override the display duration (configured via `ui.notice_ttl_ms`).
    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }
}

/// Response envelope: a payload plus an optional banner.
#[derive(Serialize, Debug)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T) -> Self { Self { data, notice: None } }

    pub fn with_notice(data: T, notice: Notice) -> Self { Self { data, notice: Some(notice) } }
}
