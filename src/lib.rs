//! # payze
//!
//! Card-entry engine of the Payze payment SDK: brand detection, number
//! formatting, field validation and the payment session that talks to the
//! gateway.
//!
//! ## Features
//!
//! - Brand detection from the bin (Visa, Mastercard, American Express, Humo, UzCard)
//! - Brand-aware number formatting for the input field
//! - Card number (Luhn), expiration date, cardholder name and CVV validation
//! - Payment session with step-up (3-D Secure) redirect handling
//! - Localized messages in English, Uzbek and Russian
//!
//! ## Quick Start
//!
//! ```rust
//! use payze::{classify, format_card_number, validate_card_number, CardBrand};
//!
//! let brand = classify("4532 0151").unwrap();
//! assert_eq!(brand, Some(CardBrand::Visa));
//!
//! assert_eq!(format_card_number("4532015112830366", brand), "4532 0151 1283 0366");
//! assert!(validate_card_number("4532015112830366", brand).is_ok());
//! ```
//!
//! ## Field Validation
//!
//! ```rust
//! use payze::{cvv, expiry, holder, CardBrand};
//!
//! assert!(cvv::validate_cvv("1234", Some(CardBrand::Amex)).is_ok());
//! assert!(cvv::validate_cvv("", Some(CardBrand::UzCard)).is_ok());
//!
//! assert!(expiry::validate_expiry("12/2099").is_ok());
//! assert!(expiry::validate_expiry("01/2020").is_err());
//! assert_eq!(expiry::to_submission_format("07/2027").as_deref(), Some("07/27"));
//!
//! assert!(holder::validate_card_holder("Jane Doe").is_ok());
//! ```
//!
//! ## Payment Session
//!
//! A [`PaymentSession`] is built with its collaborators injected explicitly
//! and publishes [`SessionEvent`]s for the UI:
//!
//! ```rust
//! use payze::config::{Configuration, ServiceEnvironment};
//! use payze::gateway::{GatewayError, PaymentGateway, PaymentOutcome, PaymentParameters,
//!     TransactionDetailsSource};
//! use payze::money::TransactionDetails;
//! use payze::{CardForm, CompletionHandler, PaymentCompletion, PaymentSession};
//! use std::sync::Arc;
//!
//! struct Approve;
//!
//! #[async_trait::async_trait]
//! impl PaymentGateway for Approve {
//!     async fn pay(&self, _: &PaymentParameters) -> Result<PaymentOutcome, GatewayError> {
//!         Ok(PaymentOutcome::Accepted)
//!     }
//! }
//!
//! #[async_trait::async_trait]
//! impl TransactionDetailsSource for Approve {
//!     async fn fetch_details(&self, _: &str) -> Result<TransactionDetails, GatewayError> {
//!         Ok(TransactionDetails { amount: 10.0, currency: "USD".into() })
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let (session, _events) = PaymentSession::builder("tx-1", Configuration::new(ServiceEnvironment::Development))
//!     .gateway(Arc::new(Approve))
//!     .details(Arc::new(Approve))
//!     .on_completion(CompletionHandler::single(|completion| {
//!         assert_eq!(completion, PaymentCompletion::Succeeded);
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let form = CardForm::new("4532 0151 1283 0366", "Jane Doe", "12/2099", "123");
//! session.submit(&form).await.unwrap();
//! # });
//! ```
//!
//! ## Supported Card Brands
//!
//! | Brand | Prefix | Length | CVV |
//! |-------|--------|--------|-----|
//! | Visa | 4 | 16 | 3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | 3 |
//! | American Express | 34, 37 | 15 | 4 |
//! | Humo | 9860 | 16 | - |
//! | UzCard | 8600, 5614 | 16 | - |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `http` | reqwest-based gateway client |
//! | `cli` | Command-line tool |
//!
//! ## Security
//!
//! - Card numbers are logged masked, last four digits only
//! - [`CardForm`] and payment parameters are zeroized when dropped
//! - `Debug` output never shows the full number or the CVV
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod card;
pub mod config;
pub mod cvv;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod format;
pub mod gateway;
pub mod holder;
#[cfg(feature = "http")]
pub mod http;
pub mod localization;
pub mod luhn;
pub mod mask;
pub mod money;
pub mod redirect;
pub mod session;
pub mod validate;

// Re-export main types at crate root
pub use card::CardBrand;
pub use config::{ConfigError, Configuration, ServiceEnvironment};
pub use detect::{classify, BinError};
pub use error::{CardNumberError, Field, ValidationError};
pub use format::format_card_number;
pub use gateway::{GatewayError, PaymentOutcome};
pub use redirect::PaymentCompletion;
pub use session::{
    CardForm, CompletionHandler, PaymentSession, SessionBuilder, SessionEvent, SessionState,
    SubmitError,
};
pub use validate::{is_valid, validate_card_number};

#[cfg(feature = "http")]
pub use http::HttpGateway;
