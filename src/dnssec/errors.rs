use thiserror::Error;

/// Errors raised while deriving a key tag from DNSKEY or DS RDATA
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyTagError {
    /// A symbol outside the Base64 alphabet, or padding in the wrong place
    #[error("invalid base64 symbol in '{run}'")]
    InvalidBase64Symbol { run: String },
    /// Input length is not a multiple of four
    #[error("base64 input has {extra} extra characters")]
    TruncatedBase64 { extra: usize },
    #[error("malformed {rtype} rdata: {reason}")]
    MalformedRdata { rtype: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, KeyTagError>;
