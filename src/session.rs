//! The payment session: one card-entry screen from open to completion.
//!
//! A [`PaymentSession`] owns the form state of a single transaction and
//! drives it through
//!
//! ```text
//! Idle -> Submitting -> Completed(Succeeded | Failed)
//!              |    \-> AwaitingStepUp -> Completed(Succeeded | Failed | InProgress)
//!              \-> Idle (gateway error, retry allowed)
//! ```
//!
//! Collaborators are injected through [`SessionBuilder`]. UI updates are
//! published as [`SessionEvent`]s on the channel returned by
//! [`SessionBuilder::build`]. The host's [`CompletionHandler`] runs exactly
//! once, and [`SessionEvent::Dismiss`] is sent at most once.
//!
//! Brand lookups are latest-wins: every keystroke aborts the previous lookup
//! and a result that arrives for an older keystroke is discarded. At most one
//! submit is in flight; a second one is refused with
//! [`SubmitError::AlreadySubmitting`].
//!
//! Methods that start background work ([`PaymentSession::number_did_update`])
//! must be called from within a Tokio runtime.

use crate::config::{ConfigError, Configuration};
use crate::cvv::validate_cvv;
use crate::error::{Field, ValidationError};
use crate::expiry::{to_submission_format, validate_expiry, ExpiryError};
use crate::format::{format_card_number, strip_whitespace};
use crate::gateway::{
    BrandLookup, GatewayError, LocalBrandLookup, PaymentGateway, PaymentOutcome,
    PaymentParameters, TransactionDetailsSource,
};
use crate::holder::validate_card_holder_with;
use crate::localization::{localize, MessageKey};
use crate::mask::mask_number;
use crate::money::Money;
use crate::redirect::{PaymentCompletion, RedirectClassifier};
use crate::validate::validate_card_number;
use crate::CardBrand;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the user to submit.
    Idle,
    /// A payment request is in flight.
    Submitting,
    /// The issuer challenge is open in the web view.
    AwaitingStepUp {
        /// Challenge URL.
        url: Url,
    },
    /// The session is over.
    Completed(PaymentCompletion),
}

impl SessionState {
    /// Whether the session has ended.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Updates for the payment screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The transaction amount is known.
    AmountLoaded(Money),
    /// The detected brand changed (`None` when no brand matches).
    BrandChanged(Option<CardBrand>),
    /// New text for the card number field.
    CardNumberFormatted(String),
    /// The submit button should show (or stop showing) progress.
    LoadingChanged(bool),
    /// A dismissible error alert with a localized message.
    Error(String),
    /// Open the step-up challenge at this URL.
    OpenStepUp(Url),
    /// Close the payment screen.
    Dismiss,
}

/// Raw field values typed by the user.
///
/// Wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CardForm {
    /// Card number, separators allowed.
    pub number: String,
    /// Name on the card.
    pub card_holder: String,
    /// Expiration date as `MM/YYYY`.
    pub expiration_date: String,
    /// CVV; may be empty for brands without one.
    pub cvv: String,
}

impl CardForm {
    /// Creates a form from the four field values.
    pub fn new(
        number: impl Into<String>,
        card_holder: impl Into<String>,
        expiration_date: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            card_holder: card_holder.into(),
            expiration_date: expiration_date.into(),
            cvv: cvv.into(),
        }
    }
}

impl fmt::Debug for CardForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardForm")
            .field("number", &mask_number(&self.number))
            .field("card_holder", &self.card_holder)
            .field("expiration_date", &self.expiration_date)
            .field("cvv", &"***")
            .finish()
    }
}

type SingleCallback = Box<dyn FnOnce(PaymentCompletion) + Send>;
type PlainCallback = Box<dyn FnOnce() + Send>;

enum Callbacks {
    Single(SingleCallback),
    Split {
        on_success: PlainCallback,
        on_failure: PlainCallback,
    },
}

/// The host app's completion callback(s).
pub struct CompletionHandler(Callbacks);

impl CompletionHandler {
    /// One callback receiving the completion.
    pub fn single<F>(callback: F) -> Self
    where
        F: FnOnce(PaymentCompletion) + Send + 'static,
    {
        Self(Callbacks::Single(Box::new(callback)))
    }

    /// Separate success and failure callbacks. A payment still in progress
    /// is reported as a failure.
    pub fn split<S, F>(on_success: S, on_failure: F) -> Self
    where
        S: FnOnce() + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        Self(Callbacks::Split {
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        })
    }

    fn call(self, completion: PaymentCompletion) {
        match self.0 {
            Callbacks::Single(callback) => callback(completion),
            Callbacks::Split {
                on_success,
                on_failure,
            } => match completion {
                PaymentCompletion::Succeeded => on_success(),
                PaymentCompletion::Failed | PaymentCompletion::InProgress => on_failure(),
            },
        }
    }
}

impl fmt::Debug for CompletionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0 {
            Callbacks::Single(_) => "single",
            Callbacks::Split { .. } => "split",
        };
        f.debug_tuple("CompletionHandler").field(&kind).finish()
    }
}

/// Reasons a submit did not reach a gateway outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A field is invalid; the session stays idle.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The gateway call failed; the session is idle again.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A submit is already in flight.
    #[error("a payment is already being submitted")]
    AlreadySubmitting,

    /// The step-up challenge is open.
    #[error("waiting for the step-up challenge to finish")]
    AwaitingStepUp,

    /// The session has ended.
    #[error("the payment session is closed")]
    Closed,
}

/// Builds a [`PaymentSession`] from its collaborators.
pub struct SessionBuilder {
    transaction_id: String,
    configuration: Configuration,
    gateway: Option<Arc<dyn PaymentGateway>>,
    brand_lookup: Option<Arc<dyn BrandLookup>>,
    details: Option<Arc<dyn TransactionDetailsSource>>,
    completion: Option<CompletionHandler>,
}

impl SessionBuilder {
    /// Sets the payment gateway.
    pub fn gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Replaces the default [`LocalBrandLookup`].
    pub fn brand_lookup(mut self, lookup: Arc<dyn BrandLookup>) -> Self {
        self.brand_lookup = Some(lookup);
        self
    }

    /// Sets the transaction details source.
    pub fn details(mut self, details: Arc<dyn TransactionDetailsSource>) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the host's completion callback(s).
    pub fn on_completion(mut self, handler: CompletionHandler) -> Self {
        self.completion = Some(handler);
        self
    }

    /// Checks the configuration and collaborators and creates the session.
    pub fn build(self) -> Result<(PaymentSession, UnboundedReceiver<SessionEvent>), ConfigError> {
        self.configuration.validate()?;

        let gateway = self
            .gateway
            .ok_or(ConfigError::MissingCollaborator("payment gateway"))?;
        let details = self
            .details
            .ok_or(ConfigError::MissingCollaborator("transaction details"))?;
        let completion = self
            .completion
            .ok_or(ConfigError::MissingCollaborator("completion handler"))?;
        let brand_lookup = self
            .brand_lookup
            .unwrap_or_else(|| Arc::new(LocalBrandLookup));

        let (events, receiver) = mpsc::unbounded_channel();

        let session = PaymentSession {
            inner: Arc::new(Inner {
                transaction_id: self.transaction_id,
                classifier: self.configuration.redirect_classifier(),
                configuration: self.configuration,
                gateway,
                brand_lookup,
                details,
                events,
                shared: Mutex::new(Shared {
                    state: SessionState::Idle,
                    brand: None,
                    loading: false,
                    amount: None,
                    digits: String::new(),
                    lookup_generation: 0,
                    lookup_task: None,
                    completion: Some(completion),
                }),
            }),
        };

        debug!(transaction_id = %session.inner.transaction_id, "payment session created");
        Ok((session, receiver))
    }
}

struct Shared {
    state: SessionState,
    brand: Option<CardBrand>,
    loading: bool,
    amount: Option<Money>,
    digits: String,
    lookup_generation: u64,
    lookup_task: Option<JoinHandle<()>>,
    completion: Option<CompletionHandler>,
}

struct Inner {
    transaction_id: String,
    configuration: Configuration,
    classifier: RedirectClassifier,
    gateway: Arc<dyn PaymentGateway>,
    brand_lookup: Arc<dyn BrandLookup>,
    details: Arc<dyn TransactionDetailsSource>,
    events: UnboundedSender<SessionEvent>,
    shared: Mutex<Shared>,
}

/// Controller of a single payment screen.
///
/// Cheap to clone; clones drive the same session.
#[derive(Clone)]
pub struct PaymentSession {
    inner: Arc<Inner>,
}

impl fmt::Debug for PaymentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSession")
            .field("transaction_id", &self.inner.transaction_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PaymentSession {
    /// Starts building a session for `transaction_id`.
    pub fn builder(transaction_id: impl Into<String>, configuration: Configuration) -> SessionBuilder {
        SessionBuilder {
            transaction_id: transaction_id.into(),
            configuration,
            gateway: None,
            brand_lookup: None,
            details: None,
            completion: None,
        }
    }

    /// Transaction being paid.
    pub fn transaction_id(&self) -> &str {
        &self.inner.transaction_id
    }

    /// Configuration the session was built with.
    pub fn configuration(&self) -> &Configuration {
        &self.inner.configuration
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    /// Brand detected from the latest bin lookup.
    pub fn brand(&self) -> Option<CardBrand> {
        self.inner.lock().brand
    }

    /// Whether a submit is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    /// Transaction amount, once loaded.
    pub fn amount(&self) -> Option<Money> {
        self.inner.lock().amount.clone()
    }

    /// Message in the configured language.
    pub fn localize(&self, key: MessageKey) -> &'static str {
        localize(key, self.inner.configuration.language)
    }

    /// Fetches the transaction amount and publishes
    /// [`SessionEvent::AmountLoaded`].
    ///
    /// The screen cannot be used without an amount, so a failure ends the
    /// session as [`PaymentCompletion::Failed`].
    pub async fn load_details(&self) -> Result<Money, GatewayError> {
        let inner = &self.inner;
        let result = inner
            .with_timeout(inner.details.fetch_details(&inner.transaction_id))
            .await;

        match result {
            Ok(details) => {
                let money = Money::from(details);
                info!(transaction_id = %inner.transaction_id, amount = %money, "transaction details loaded");
                inner.lock().amount = Some(money.clone());
                inner.emit(SessionEvent::AmountLoaded(money.clone()));
                Ok(money)
            }
            Err(error) => {
                warn!(transaction_id = %inner.transaction_id, %error, "failed to load transaction details");
                inner.complete(PaymentCompletion::Failed);
                Err(error)
            }
        }
    }

    /// Formats input with the currently detected brand, without side effects.
    pub fn format_card_number(&self, input: &str) -> String {
        format_card_number(input, self.brand())
    }

    /// Handles an edit of the card number field.
    ///
    /// Returns the reformatted text immediately (also sent as
    /// [`SessionEvent::CardNumberFormatted`]) and starts a brand lookup for
    /// the new bin, aborting the previous one. When the lookup changes the
    /// brand, [`SessionEvent::BrandChanged`] is sent followed by the number
    /// reformatted for the new brand.
    pub fn number_did_update(&self, input: &str) -> String {
        let digits = strip_whitespace(input);
        let inner = &self.inner;

        let (formatted, generation) = {
            let mut shared = inner.lock();
            let formatted = format_card_number(&digits, shared.brand);

            if shared.state.is_completed() {
                return formatted;
            }

            shared.digits = digits.clone();
            shared.lookup_generation += 1;
            if let Some(previous) = shared.lookup_task.take() {
                previous.abort();
            }
            (formatted, shared.lookup_generation)
        };

        inner.emit(SessionEvent::CardNumberFormatted(formatted.clone()));

        let task_inner = Arc::clone(inner);
        let handle = tokio::spawn(async move {
            task_inner.run_lookup(digits, generation).await;
        });

        let mut shared = inner.lock();
        if shared.lookup_generation == generation {
            shared.lookup_task = Some(handle);
        } else {
            handle.abort();
        }

        formatted
    }

    /// Validates the form in field order, stopping at the first failure.
    pub fn validate(&self, form: &CardForm) -> Result<(), ValidationError> {
        self.inner.validate(form, self.brand())
    }

    /// Validates the form and, if valid, sends it to the gateway.
    ///
    /// On `Accepted` or `Rejected` the session completes. On
    /// `StepUpRequired` it waits for [`web_view_did_navigate`]
    /// (see [`SessionEvent::OpenStepUp`]). On a gateway error it returns to
    /// `Idle`, sends [`SessionEvent::Error`] and may be submitted again.
    ///
    /// [`web_view_did_navigate`]: Self::web_view_did_navigate
    pub async fn submit(&self, form: &CardForm) -> Result<PaymentOutcome, SubmitError> {
        let inner = &self.inner;

        let parameters = {
            let mut shared = inner.lock();
            match shared.state {
                SessionState::Idle => {}
                SessionState::Submitting => return Err(SubmitError::AlreadySubmitting),
                SessionState::AwaitingStepUp { .. } => return Err(SubmitError::AwaitingStepUp),
                SessionState::Completed(_) => return Err(SubmitError::Closed),
            }

            if let Err(error) = inner.validate(form, shared.brand) {
                debug!(field = ?error.field(), %error, "submit blocked by validation");
                return Err(error.into());
            }

            let expiration = to_submission_format(&form.expiration_date)
                .ok_or(ValidationError::ExpirationDate(ExpiryError::InvalidFormat))?;

            shared.state = SessionState::Submitting;
            shared.loading = true;

            PaymentParameters::new(
                inner.transaction_id.clone(),
                strip_whitespace(&form.number),
                form.card_holder.trim(),
                expiration,
                form.cvv.clone(),
            )
        };

        info!(
            transaction_id = %inner.transaction_id,
            number = %mask_number(parameters.number()),
            "submitting payment"
        );
        inner.emit(SessionEvent::LoadingChanged(true));

        let result = inner.with_timeout(inner.gateway.pay(&parameters)).await;
        drop(parameters);

        // The check and the transition share one lock scope so a concurrent
        // cancel either wins outright or sees the new state.
        let still_submitting = {
            let mut shared = inner.lock();
            shared.loading = false;
            let submitting = shared.state == SessionState::Submitting;
            if submitting {
                match &result {
                    Ok(PaymentOutcome::StepUpRequired(url)) => {
                        shared.state = SessionState::AwaitingStepUp { url: url.clone() };
                    }
                    Err(_) => shared.state = SessionState::Idle,
                    Ok(PaymentOutcome::Accepted | PaymentOutcome::Rejected) => {}
                }
            }
            submitting
        };
        inner.emit(SessionEvent::LoadingChanged(false));

        if !still_submitting {
            debug!(transaction_id = %inner.transaction_id, "session ended while the payment was in flight");
            return Err(SubmitError::Closed);
        }

        match result {
            Ok(outcome) => {
                info!(transaction_id = %inner.transaction_id, ?outcome, "gateway responded");
                let completed = match &outcome {
                    PaymentOutcome::Accepted => inner.complete(PaymentCompletion::Succeeded),
                    PaymentOutcome::Rejected => inner.complete(PaymentCompletion::Failed),
                    PaymentOutcome::StepUpRequired(url) => {
                        inner.emit(SessionEvent::OpenStepUp(url.clone()));
                        true
                    }
                };
                if !completed {
                    return Err(SubmitError::Closed);
                }
                Ok(outcome)
            }
            Err(error) => {
                warn!(transaction_id = %inner.transaction_id, %error, business = error.is_business(), "payment request failed");
                inner.emit(SessionEvent::Error(inner.error_message(&error)));
                Err(error.into())
            }
        }
    }

    /// Handles a navigation of the step-up web view.
    ///
    /// Returns the completion when `url` terminates the flow. Intermediate
    /// navigations, and any navigation outside the step-up state, are
    /// ignored.
    pub fn web_view_did_navigate(&self, url: &str) -> Option<PaymentCompletion> {
        let inner = &self.inner;

        if !matches!(inner.lock().state, SessionState::AwaitingStepUp { .. }) {
            debug!("navigation outside step-up ignored");
            return None;
        }

        match inner.classifier.classify_str(url) {
            Some(completion) => {
                info!(%completion, "step-up finished");
                inner.complete(completion).then_some(completion)
            }
            None => {
                debug!("intermediate step-up navigation");
                None
            }
        }
    }

    /// Closes the session on behalf of the user.
    ///
    /// Completes as [`PaymentCompletion::Failed`] unless the session already
    /// completed. Returns whether this call ended the session.
    pub fn cancel(&self) -> bool {
        info!(transaction_id = %self.inner.transaction_id, "payment cancelled by user");
        self.inner.complete(PaymentCompletion::Failed)
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("session event receiver dropped");
        }
    }

    fn timeout(&self) -> Duration {
        self.configuration.request_timeout()
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        tokio::time::timeout(self.timeout(), call)
            .await
            .unwrap_or(Err(GatewayError::Timeout))
    }

    fn validate(&self, form: &CardForm, brand: Option<CardBrand>) -> Result<(), ValidationError> {
        for field in Field::SUBMIT_ORDER {
            match field {
                Field::CardNumber => validate_card_number(&form.number, brand)?,
                Field::CardHolder => validate_card_holder_with(
                    &form.card_holder,
                    self.configuration.holder_name_rule,
                )?,
                Field::ExpirationDate => {
                    validate_expiry(&form.expiration_date)?;
                }
                Field::Cvv => validate_cvv(&form.cvv, brand)?,
            }
        }
        Ok(())
    }

    fn error_message(&self, error: &GatewayError) -> String {
        match error {
            GatewayError::Service { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => localize(MessageKey::DefaultErrorDescription, self.configuration.language).to_string(),
        }
    }

    async fn run_lookup(&self, digits: String, generation: u64) {
        debug!(bin = %mask_number(&digits), generation, "brand lookup started");

        let brand = match self.with_timeout(self.brand_lookup.lookup_brand(&digits)).await {
            Ok(brand) => brand,
            Err(error) => {
                warn!(%error, "brand lookup failed");
                None
            }
        };

        let reformatted = {
            let mut shared = self.lock();
            if shared.lookup_generation != generation || shared.state.is_completed() {
                debug!(generation, "stale brand lookup discarded");
                return;
            }
            shared.lookup_task = None;

            if shared.brand == brand {
                return;
            }
            shared.brand = brand;
            format_card_number(&shared.digits, brand)
        };

        debug!(brand = ?brand, "card brand changed");
        self.emit(SessionEvent::BrandChanged(brand));
        self.emit(SessionEvent::CardNumberFormatted(reformatted));
    }

    /// Ends the session once. Returns `false` if it had already ended.
    fn complete(&self, completion: PaymentCompletion) -> bool {
        let handler = {
            let mut shared = self.lock();
            if shared.state.is_completed() {
                return false;
            }
            shared.state = SessionState::Completed(completion);
            shared.loading = false;
            if let Some(task) = shared.lookup_task.take() {
                task.abort();
            }
            shared.completion.take()
        };

        info!(transaction_id = %self.transaction_id, %completion, "payment session completed");
        if let Some(handler) = handler {
            handler.call(completion);
        }
        self.emit(SessionEvent::Dismiss);
        true
    }
}
