use std::time::Duration;

use ureq::Agent;

use crate::prelude::*;

/// Source of the raw live data.
pub trait Fetch {
    fn fetch(&self, host: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to fetch the live data from `{host}`: {source}")]
pub struct FetchError {
    pub host: String,
    pub source: ureq::Error,
}

/// The Energy Detective local API client.
pub struct Client {
    agent: Agent,
}

impl Client {
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        // The device lives on the local network, environment proxies would only get in the way:
        let agent = Agent::config_builder().timeout_global(Some(Self::TIMEOUT)).proxy(None).build();
        Self { agent: agent.into() }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for Client {
    #[instrument(skip_all, name = "Fetching the live data…")]
    fn fetch(&self, host: &str) -> Result<Vec<u8>, FetchError> {
        info!("fetching the live data…");
        let raw = self
            .agent
            .get(format!("http://{host}/api/LiveData.xml"))
            .call()
            .and_then(|mut response| response.body_mut().read_to_vec())
            .map_err(|source| FetchError { host: host.to_owned(), source })?;
        info!(n_bytes = raw.len(), "fetched");
        Ok(raw)
    }
}
