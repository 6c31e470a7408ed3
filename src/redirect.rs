//! Detection of the redirect that ends a step-up (3-D Secure) flow.
//!
//! While the embedded browser walks through the issuer's challenge it
//! reports every URL it visits. Only a URL on a known gateway host whose
//! path contains one of the terminating segments ends the flow; anything
//! else is an intermediate hop and is ignored.
//!
//! # Example
//!
//! ```
//! use payze::redirect::{PaymentCompletion, RedirectClassifier};
//!
//! let classifier = RedirectClassifier::new(["gw.example"]);
//!
//! assert_eq!(
//!     classifier.classify_str("https://gw.example/v2/success?tx=1"),
//!     Some(PaymentCompletion::Succeeded)
//! );
//! assert_eq!(classifier.classify_str("https://gw.example/otp?tx=1"), None);
//! assert_eq!(classifier.classify_str("https://unrelated.example/success"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Path segment of a successful payment.
pub const SUCCESS_SEGMENT: &str = "success";
/// Path segment of a failed payment.
pub const FAIL_SEGMENT: &str = "fail";
/// Path segment of a payment the gateway is still processing.
pub const IN_PROGRESS_SEGMENT: &str = "inProgress";

/// How a payment session ended, as reported to the host app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentCompletion {
    /// The payment went through.
    Succeeded,
    /// The payment was declined, failed or was cancelled.
    Failed,
    /// The gateway has not settled the payment yet.
    InProgress,
}

impl fmt::Display for PaymentCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::InProgress => "in progress",
        })
    }
}

/// Classifies web view navigations against a gateway host allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectClassifier {
    hosts: Vec<String>,
}

impl RedirectClassifier {
    /// Creates a classifier accepting the given hosts (case-insensitive).
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.into().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Hosts this classifier accepts.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Returns the completion a URL terminates with, or `None` for an
    /// intermediate navigation.
    pub fn classify(&self, url: &Url) -> Option<PaymentCompletion> {
        let host = url.host_str()?.to_ascii_lowercase();
        if !self.hosts.iter().any(|h| *h == host) {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.collect();

        [
            (SUCCESS_SEGMENT, PaymentCompletion::Succeeded),
            (FAIL_SEGMENT, PaymentCompletion::Failed),
            (IN_PROGRESS_SEGMENT, PaymentCompletion::InProgress),
        ]
        .into_iter()
        .find(|(marker, _)| segments.contains(marker))
        .map(|(_, completion)| completion)
    }

    /// Parses and classifies a URL string; unparsable input is not terminating.
    pub fn classify_str(&self, url: &str) -> Option<PaymentCompletion> {
        Url::parse(url).ok().and_then(|url| self.classify(&url))
    }
}
