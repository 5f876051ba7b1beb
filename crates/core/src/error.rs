/// Result alias that carries the custom [`BridgeError`] type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Common error type for the core crate.
///
/// Every variant except [`BridgeError::Message`] is fatal for the dispatch
/// loop: the bridge has no recovery path and simply stops.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Free-form error for conditions that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors (including missing sound files).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The serial port could not be opened or enumerated.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    /// The serial device stopped producing data.
    #[error("serial port `{0}` closed")]
    SerialClosed(String),
    /// A received line was not valid UTF-8.
    #[error("received line is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// No audio output device could be opened.
    #[error("audio output unavailable: {0}")]
    Stream(#[from] rodio::StreamError),
    /// The output device refused a new sink.
    #[error("audio playback failed: {0}")]
    Play(#[from] rodio::PlayError),
    /// The sound file is not in a supported format.
    #[error("could not decode sound file: {0}")]
    Decoder(#[from] rodio::decoder::DecoderError),
}

impl BridgeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for BridgeError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for BridgeError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
