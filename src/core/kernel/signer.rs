use crate::core::errors::ExchangeError;
use crate::core::kernel::keys::{KeyPair, PrivateKeyHandle};
use crate::core::types::Params;
use base64::engine::general_purpose;
use base64::Engine;

pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
pub const HEADER_WINDOW: &str = "X-Window";
pub const HEADER_API_KEY: &str = "X-API-Key";
pub const HEADER_SIGNATURE: &str = "X-Signature";

/// Authentication headers for one outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub timestamp: i64,
    pub window: u64,
    pub api_key: String,
    pub signature: String,
}

impl AuthHeaders {
    pub fn to_header_pairs(&self) -> [(&'static str, String); 4] {
        [
            (HEADER_TIMESTAMP, self.timestamp.to_string()),
            (HEADER_WINDOW, self.window.to_string()),
            (HEADER_API_KEY, self.api_key.clone()),
            (HEADER_SIGNATURE, self.signature.clone()),
        ]
    }
}

/// Signer trait for request authentication
///
/// Implementations turn an instruction and its parameters into the headers
/// the exchange checks. Called once per attempt, so every retry carries a
/// fresh timestamp.
pub trait Signer: Send + Sync {
    fn sign_request(
        &self,
        instruction: &str,
        params: &Params,
        timestamp: i64,
        window: u64,
    ) -> Result<AuthHeaders, ExchangeError>;
}

fn form_encode<T: serde::Serialize>(pairs: &T) -> Result<String, ExchangeError> {
    serde_urlencoded::to_string(pairs)
        .map_err(|e| ExchangeError::SerializationError(format!("Failed to encode parameters: {}", e)))
}

/// Build the exact byte string that gets signed.
///
/// `instruction=<name>&<sorted params>&timestamp=<ts>&window=<w>`, with the
/// parameter segment omitted when there are no parameters. Parameters are
/// form-encoded in ascending byte order of their keys; `timestamp` and
/// `window` always come last, in that order.
pub fn build_message(
    instruction: &str,
    params: &Params,
    timestamp: i64,
    window: u64,
) -> Result<Vec<u8>, ExchangeError> {
    let header = form_encode(&[("timestamp", timestamp.to_string()), ("window", window.to_string())])?;

    let mut message = format!("instruction={}&", instruction);
    if !params.is_empty() {
        message.push_str(&form_encode(&params.to_pairs())?);
        message.push('&');
    }
    message.push_str(&header);

    Ok(message.into_bytes())
}

/// Sign `message` and base64-encode the signature for header transport
pub fn sign(message: &[u8], private_key: &PrivateKeyHandle) -> String {
    general_purpose::STANDARD.encode(private_key.sign(message).to_bytes())
}

/// Ed25519 signer over a validated key pair
#[derive(Debug, Clone)]
pub struct Ed25519Signer {
    keys: KeyPair,
}

impl Ed25519Signer {
    pub fn new(keys: KeyPair) -> Self {
        Self { keys }
    }

    /// Create a signer from base64 private seed and public key
    pub fn from_base64(private_key: &str, public_key: &str) -> Result<Self, ExchangeError> {
        KeyPair::from_base64(private_key, public_key).map(Self::new)
    }

    pub fn api_key(&self) -> String {
        self.keys.public_key().to_base64()
    }
}

impl Signer for Ed25519Signer {
    fn sign_request(
        &self,
        instruction: &str,
        params: &Params,
        timestamp: i64,
        window: u64,
    ) -> Result<AuthHeaders, ExchangeError> {
        let message = build_message(instruction, params, timestamp, window)?;
        let signature = sign(&message, self.keys.private_key());

        Ok(AuthHeaders {
            timestamp,
            window,
            api_key: self.api_key(),
            signature,
        })
    }
}
