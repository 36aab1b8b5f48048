use std::fmt;

use shared::domain::PhoneId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("malformed JSON from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} unavailable: {message}")]
    Unavailable { path: String, message: String },
}

impl FetchError {
    pub fn path(&self) -> &str {
        match self {
            FetchError::Transport { path, .. }
            | FetchError::Status { path, .. }
            | FetchError::Decode { path, .. }
            | FetchError::Unavailable { path, .. } => path,
        }
    }
}

/// Call site a failure is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadContext {
    InitialPhone,
    Catalogue,
    Selection,
}

impl fmt::Display for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadContext::InitialPhone => "initial phone",
            LoadContext::Catalogue => "catalogue",
            LoadContext::Selection => "selected phone",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load {context}: {source}")]
    Fetch {
        context: LoadContext,
        #[source]
        source: FetchError,
    },
    #[error("extra action signal for phone {phone_id} was dropped before it fired")]
    ExtraActionDropped { phone_id: PhoneId },
}

impl PageError {
    pub fn fetch(context: LoadContext, source: FetchError) -> Self {
        PageError::Fetch { context, source }
    }

    pub fn context(&self) -> LoadContext {
        match self {
            PageError::Fetch { context, .. } => *context,
            PageError::ExtraActionDropped { .. } => LoadContext::Selection,
        }
    }
}

/// Cloneable projection of a [`PageError`] carried on the page event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    context: LoadContext,
    message: String,
}

impl PageFailure {
    pub fn context(&self) -> LoadContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&PageError> for PageFailure {
    fn from(err: &PageError) -> Self {
        Self {
            context: err.context(),
            message: err.to_string(),
        }
    }
}
