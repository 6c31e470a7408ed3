//! Boundary of the remote payment gateway.
//!
//! The session talks to the outside world only through the three
//! collaborator traits defined here, which are injected when the session
//! is built:
//!
//! - [`PaymentGateway`] sends the card data and reports the [`PaymentOutcome`]
//! - [`BrandLookup`] resolves the brand of a bin; [`LocalBrandLookup`] is the
//!   default and needs no network
//! - [`TransactionDetailsSource`] fetches the amount to display
//!
//! The wire types ([`PayResponse`], [`ServiceErrorPayload`]) and
//! [`decode_response`] describe the JSON contract of the hosted gateway so
//! that any transport can reuse them.

use crate::detect::classify;
use crate::mask::{mask_number, mask_secret};
use crate::money::TransactionDetails;
use crate::CardBrand;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors reported by a gateway collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A URL could not be built or parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The gateway answered with a non-success HTTP status.
    #[error("unexpected response status {status}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decoding(String),

    /// The gateway returned an explicit error payload.
    #[error("{message}")]
    Service {
        /// Human-readable message from the gateway.
        message: String,
        /// Detailed error list.
        errors: Vec<String>,
        /// Error category reported by the gateway.
        kind: String,
    },

    /// The gateway did not answer in time.
    #[error("request timed out")]
    Timeout,
}

impl GatewayError {
    /// Whether the gateway itself refused the request, as opposed to a
    /// transport or decoding failure.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::InvalidResponse { .. })
    }
}

/// Card data sent to the gateway on submit.
///
/// The number and CVV are wiped from memory when the value is dropped and
/// never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParameters {
    transaction_id: String,
    number: String,
    card_holder: String,
    expiration_date: String,
    security_number: String,
}

impl PaymentParameters {
    /// Bundles the submit payload. `expiration_date` must already be in the
    /// `MM/YY` submission format.
    pub fn new(
        transaction_id: impl Into<String>,
        number: impl Into<String>,
        card_holder: impl Into<String>,
        expiration_date: impl Into<String>,
        security_number: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            number: number.into(),
            card_holder: card_holder.into(),
            expiration_date: expiration_date.into(),
            security_number: security_number.into(),
        }
    }

    /// Transaction being paid.
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Card number, digits only.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Name on the card.
    pub fn card_holder(&self) -> &str {
        &self.card_holder
    }

    /// Expiration date as `MM/YY`.
    pub fn expiration_date(&self) -> &str {
        &self.expiration_date
    }

    /// CVV, empty for brands without one.
    pub fn security_number(&self) -> &str {
        &self.security_number
    }
}

impl fmt::Debug for PaymentParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentParameters")
            .field("transaction_id", &self.transaction_id)
            .field("number", &mask_number(&self.number))
            .field("card_holder", &self.card_holder)
            .field("expiration_date", &self.expiration_date)
            .field("security_number", &mask_secret(&self.security_number))
            .finish()
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The payment went through.
    Accepted,
    /// The payment was declined.
    Rejected,
    /// The issuer requires a step-up challenge at this URL.
    StepUpRequired(Url),
}

/// Wire response of the pay call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayResponse {
    /// Whether the payment succeeded without a challenge.
    pub status: bool,
    /// Challenge URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether a 3-D Secure challenge is required.
    #[serde(rename = "threeDSIsPresent", alias = "threeDSRequired", default)]
    pub three_ds_required: bool,
}

impl PayResponse {
    /// Maps the wire response to an outcome.
    ///
    /// A required challenge with a URL wins over `status`; a challenge URL
    /// that does not parse is an error rather than a silent rejection.
    pub fn into_outcome(self) -> Result<PaymentOutcome, GatewayError> {
        match (self.three_ds_required, self.url) {
            (true, Some(url)) => Url::parse(&url)
                .map(PaymentOutcome::StepUpRequired)
                .map_err(|_| GatewayError::InvalidUrl(url)),
            _ if self.status => Ok(PaymentOutcome::Accepted),
            _ => Ok(PaymentOutcome::Rejected),
        }
    }
}

/// Error envelope returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorPayload {
    /// Optional extra data, unused.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Error details.
    pub status: ServiceErrorStatus,
}

/// Details of a [`ServiceErrorPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorStatus {
    /// Human-readable message.
    pub message: String,
    /// Detailed errors.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Error category.
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<ServiceErrorPayload> for GatewayError {
    fn from(payload: ServiceErrorPayload) -> Self {
        GatewayError::Service {
            message: payload.status.message,
            errors: payload.status.errors,
            kind: payload.status.kind,
        }
    }
}

/// Decodes a gateway response body.
///
/// A body in the error envelope is a [`GatewayError::Service`] whatever the
/// status code. Otherwise a non-2xx status is
/// [`GatewayError::InvalidResponse`], and a body that is not a `T` is
/// [`GatewayError::Decoding`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, GatewayError> {
    if let Ok(payload) = serde_json::from_slice::<ServiceErrorPayload>(body) {
        return Err(payload.into());
    }

    if !(200..300).contains(&status) {
        return Err(GatewayError::InvalidResponse { status });
    }

    serde_json::from_slice(body).map_err(|e| GatewayError::Decoding(e.to_string()))
}

/// Sends a payment to the gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits the card data and reports the outcome.
    async fn pay(&self, parameters: &PaymentParameters) -> Result<PaymentOutcome, GatewayError>;
}

/// Resolves the brand of a bin.
#[async_trait]
pub trait BrandLookup: Send + Sync {
    /// Returns `Ok(None)` when no brand matches.
    async fn lookup_brand(&self, bin: &str) -> Result<Option<CardBrand>, GatewayError>;
}

/// Fetches the details of the transaction being paid.
#[async_trait]
pub trait TransactionDetailsSource: Send + Sync {
    /// Fetches amount and currency.
    async fn fetch_details(&self, transaction_id: &str)
        -> Result<TransactionDetails, GatewayError>;
}

/// Brand lookup backed by the local prefix rules; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBrandLookup;

#[async_trait]
impl BrandLookup for LocalBrandLookup {
    async fn lookup_brand(&self, bin: &str) -> Result<Option<CardBrand>, GatewayError> {
        Ok(classify(bin).ok().flatten())
    }
}
