//! HTTP client for the hosted Payze gateway.
//!
//! [`HttpGateway`] implements all three remote collaborators over one
//! `reqwest::Client`:
//!
//! | Call | Request |
//! |------|---------|
//! | pay | `POST v2/payment/pay` with the camelCase card payload |
//! | brand lookup | `GET card/brand?bin=…` |
//! | transaction details | `GET v2/payment/payment-details?transactionId=…` |
//!
//! Responses go through [`decode_response`], so an error envelope is always
//! reported as [`GatewayError::Service`].

use crate::config::{ConfigError, Configuration};
use crate::gateway::{
    decode_response, BrandLookup, GatewayError, PayResponse, PaymentGateway, PaymentOutcome,
    PaymentParameters, TransactionDetailsSource,
};
use crate::mask::mask_number;
use crate::money::TransactionDetails;
use crate::CardBrand;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

const PAY_PATH: &str = "v2/payment/pay";
const CARD_BRAND_PATH: &str = "card/brand";
const PAYMENT_DETAILS_PATH: &str = "v2/payment/payment-details";

/// Gateway client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Creates a client for `base_url`.
    ///
    /// Endpoint paths are appended to the base path, so
    /// `https://host.example/api` and `https://host.example/api/` both send
    /// payments to `https://host.example/api/v2/payment/pay`.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client for the configured environment.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigError> {
        Ok(Self::new(configuration.base_url()?))
    }

    /// Uses a preconfigured `reqwest` client (proxies, TLS, headers).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        debug!(status, bytes = body.len(), "gateway response received");
        decode_response(status, &body)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(error.to_string())
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn pay(&self, parameters: &PaymentParameters) -> Result<PaymentOutcome, GatewayError> {
        let url = self.endpoint(PAY_PATH)?;
        debug!(%url, number = %mask_number(parameters.number()), "sending payment");

        let response: PayResponse = self.send(self.client.post(url).json(parameters)).await?;
        response.into_outcome()
    }
}

#[async_trait]
impl BrandLookup for HttpGateway {
    async fn lookup_brand(&self, bin: &str) -> Result<Option<CardBrand>, GatewayError> {
        let url = self.endpoint(CARD_BRAND_PATH)?;
        let request = self.client.get(url).query(&[("bin", bin)]);

        match self.send::<CardBrand>(request).await {
            Ok(brand) => Ok(Some(brand)),
            Err(GatewayError::InvalidResponse { status: 404 }) => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[async_trait]
impl TransactionDetailsSource for HttpGateway {
    async fn fetch_details(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionDetails, GatewayError> {
        let url = self.endpoint(PAYMENT_DETAILS_PATH)?;
        let request = self
            .client
            .get(url)
            .query(&[("transactionId", transaction_id)]);

        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEnvironment;

    #[test]
    fn test_endpoints_are_relative_to_base() {
        let gateway =
            HttpGateway::from_configuration(&Configuration::new(ServiceEnvironment::Production))
                .unwrap();
        assert_eq!(
            gateway.endpoint(PAY_PATH).unwrap().as_str(),
            "https://paygate.payze.uz/v2/payment/pay"
        );

        let gateway = HttpGateway::new(Url::parse("http://localhost:9000/api/").unwrap());
        assert_eq!(
            gateway.endpoint(CARD_BRAND_PATH).unwrap().as_str(),
            "http://localhost:9000/api/card/brand"
        );
    }

    #[test]
    fn test_base_path_without_trailing_slash_is_kept() {
        let gateway = HttpGateway::new(Url::parse("https://host.example/api").unwrap());
        assert_eq!(gateway.base_url().as_str(), "https://host.example/api/");
        assert_eq!(
            gateway.endpoint(PAY_PATH).unwrap().as_str(),
            "https://host.example/api/v2/payment/pay"
        );
    }
}
