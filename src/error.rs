//! Error types for the cipherduel session engine

use thiserror::Error;

/// Main error type for the cipherduel engine
///
/// Every failure surfaced by the engine carries a distinguishable kind so
/// callers can render a specific message. Rejected operations never
/// partially mutate session state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("Invalid plaintext: {message}")]
    InvalidPlaintext {
        message: String,
        field: Option<String>,
    },

    #[error("Corrupted ciphertext: {message}")]
    CorruptedCiphertext { message: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Invalid players: {message}")]
    InvalidPlayers { message: String },

    #[error("Not your turn: {player}")]
    NotYourTurn { player: String },

    #[error("Unknown card: {card_id}")]
    UnknownCard { card_id: String },

    #[error("Session already completed: {session_id}")]
    SessionCompleted { session_id: String },

    #[error("Game not completed: {session_id}")]
    GameNotCompleted { session_id: String },

    #[error("Invalid trade: {message}")]
    InvalidTrade { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String, field: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Hex decoding error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidPlaintext`] without a field name
    pub fn invalid_plaintext(message: impl Into<String>) -> Self {
        EngineError::InvalidPlaintext {
            message: message.into(),
            field: None,
        }
    }

    /// Shorthand for an [`EngineError::InvalidPlaintext`] tied to a named field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidPlaintext {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Shorthand for an [`EngineError::CorruptedCiphertext`]
    pub fn corrupted(message: impl Into<String>) -> Self {
        EngineError::CorruptedCiphertext {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type GameResult<T> = Result<T, EngineError>;

/// Utility functions for cryptographic operations
pub mod utils {
    use sha2::{Digest, Sha256};

    /// Compute SHA256 hash of input data
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    /// Convert bytes to hexadecimal string
    pub fn to_hex(bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    /// Convert hexadecimal string to bytes
    pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(hex_str)
    }

    /// Compute SHA256 hash and return as hex string
    pub fn sha256_hex(data: &[u8]) -> String {
        to_hex(&sha256(data))
    }
}

/// Logging configuration and initialization
pub mod logging {
    use std::env;
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    /// Logging output format
    #[derive(Debug, Clone)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stdout,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("cipherduel=trace".parse()?)
            .add_directive("tokio=info".parse()?);

        let registry = tracing_subscriber::registry().with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
        }

        Ok(())
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = env::var("CIPHERDUEL_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = match env::var("CIPHERDUEL_LOG_FORMAT").as_ref().map(|s| s.as_str()) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("CIPHERDUEL_LOG_OUTPUT").as_ref().map(|s| s.as_str()) {
            Ok("stderr") => LogOutput::Stderr,
            _ => LogOutput::Stdout,
        };

        let config = LoggingConfig { level, format, output };
        init_logging(config)
    }
}
