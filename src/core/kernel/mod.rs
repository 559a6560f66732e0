//! Authenticated request pipeline building blocks.
//!
//! - [`keys`]: Ed25519 key material in the exchange's raw base64 encoding
//! - [`signer`]: canonical signing message and request signatures
//! - [`registry`]: named operations and whether they need authentication
//! - [`rest`]: one HTTP attempt over reqwest
//! - [`retry`]: backoff loop around attempts
//! - [`response`]: numeric coercion and exchange error extraction
//!
//! # Signing a request by hand
//! ```rust,no_run
//! use lotusx_backpack::core::kernel::{build_message, Ed25519Signer, Signer};
//! use lotusx_backpack::core::types::Params;
//!
//! # fn example(private_b64: &str, public_b64: &str) -> Result<(), lotusx_backpack::ExchangeError> {
//! let signer = Ed25519Signer::from_base64(private_b64, public_b64)?;
//! let params = Params::new().with("symbol", "SOL_USDC").with("orderId", "111");
//! let headers = signer.sign_request("orderQuery", &params, 1_700_000_000_000, 5000)?;
//! let message = build_message("orderQuery", &params, 1_700_000_000_000, 5000)?;
//! assert!(!headers.signature.is_empty() && !message.is_empty());
//! # Ok(())
//! # }
//! ```
pub mod keys;
pub mod registry;
pub mod response;
pub mod rest;
pub mod retry;
pub mod signer;

pub use keys::{KeyPair, PrivateKeyHandle, PublicKeyHandle};
pub use registry::{HttpMethod, OperationDescriptor, OperationRegistry, OperationRegistryBuilder};
pub use response::{check_exchange_error, coerce_numbers, normalize, Envelope};
pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientConfig};
pub use retry::{RetryMode, RetryPolicy};
pub use signer::{build_message, sign, AuthHeaders, Ed25519Signer, Signer};
