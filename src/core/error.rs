use std::io;
use thiserror::Error;

/// Unified error type for chatrelay
#[derive(Error, Debug)]
pub enum ChatError {
    /// Unknown provider, missing credential or an unreadable settings file.
    /// Dispatch must not proceed until the user reconfigures.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request never produced a usable HTTP exchange, or the provider
    /// answered with a non-2xx status
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The provider answered 2xx but the envelope had no reply text
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ChatError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        ChatError::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ChatError::Configuration(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        if err.is_timeout() {
            ChatError::transport(status, format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::transport(status, format!("Connection failed: {}", err))
        } else {
            ChatError::transport(status, format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_bare_message() {
        let err = ChatError::transport(Some(401), "bad key");
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn only_configuration_errors_block_dispatch() {
        assert!(ChatError::Configuration("no key".into()).is_configuration());
        assert!(!ChatError::Protocol("empty".into()).is_configuration());
    }
}
