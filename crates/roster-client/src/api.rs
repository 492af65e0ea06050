use async_trait::async_trait;
use reqwest::Client;
use roster_core::{IdToken, Persona, Revision, SortState, TrustAction, TrustList};
use snafu::ResultExt as _;
use tracing::{debug, trace};
use url::Url;

use crate::error::{FetchResult, RequestSnafu, StatusSnafu, TransportResult};
use crate::wire;

const LOG_TARGET: &str = "roster::api";

/// Requests against the roster's trust endpoint
///
/// Implementations are stateless and never retry, retrying is up to the
/// caller.
#[async_trait]
pub trait TrustApi: Send + Sync {
    async fn fetch_revision(&self) -> FetchResult<Revision>;

    /// The list as sorted by the server
    async fn fetch_list(&self, list: TrustList, sort: SortState) -> FetchResult<Vec<Persona>>;

    /// `reason` is ignored by the server for actions that don't take one
    async fn submit_action(
        &self,
        action: TrustAction,
        token: &IdToken,
        reason: &str,
    ) -> TransportResult<()>;
}

/// [`TrustApi`] over HTTP
///
/// `url` is the trust endpoint itself, e.g. `http://127.0.0.1:9090/MuWire/Trust`.
#[derive(Debug, Clone)]
pub struct HttpTrustClient {
    client: Client,
    url: Url,
}

impl HttpTrustClient {
    pub fn new(url: Url, user_agent: &str) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context(RequestSnafu)?;

        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn get_section(&self, query: &[(&str, &str)]) -> TransportResult<String> {
        trace!(target: LOG_TARGET, url = %self.url, ?query, "GET");
        let response = self
            .client
            .get(self.url.clone())
            .query(query)
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu { status }.fail();
        }

        response.text().await.context(RequestSnafu)
    }
}

#[async_trait]
impl TrustApi for HttpTrustClient {
    async fn fetch_revision(&self) -> FetchResult<Revision> {
        let doc = self.get_section(&[("section", "revision")]).await?;
        Ok(wire::parse_revision(&doc)?)
    }

    async fn fetch_list(&self, list: TrustList, sort: SortState) -> FetchResult<Vec<Persona>> {
        let doc = self
            .get_section(&[
                ("section", list.section()),
                ("key", sort.key.as_str()),
                ("order", sort.order.as_str()),
            ])
            .await?;
        let personas = wire::parse_personas(&doc, list)?;
        debug!(target: LOG_TARGET, %list, count = personas.len(), "Fetched list");
        Ok(personas)
    }

    async fn submit_action(
        &self,
        action: TrustAction,
        token: &IdToken,
        reason: &str,
    ) -> TransportResult<()> {
        let reason = if action.takes_reason() { reason } else { "" };
        debug!(target: LOG_TARGET, %action, %token, "Submitting action");

        let response = self
            .client
            .post(self.url.clone())
            .form(&[
                ("action", action.as_str()),
                ("reason", reason),
                ("persona", token.as_str()),
            ])
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu { status }.fail();
        }
        Ok(())
    }
}
