//! Client configuration.
//!
//! Every request the client makes carries the same identity:
//! - `User-Agent`, which is mandatory and identifies the calling application.
//! - `From`, an optional contact address for the operators of ecosyste.ms.
//! - `Authorization: Bearer <key>`, if an API key is configured.

use std::{env, fmt, time::Duration};

use bon::Builder;
use non_empty_string::NonEmptyString;
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder},
    header::{AUTHORIZATION, FROM, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::Error;

/// Base URL of the production package metadata API.
pub const DEFAULT_PACKAGES_SERVER: &str = "https://packages.ecosyste.ms/api/v1";

/// Base URL of the production repository metadata API.
pub const DEFAULT_REPOS_SERVER: &str = "https://repos.ecosyste.ms/api/v1";

/// Overall timeout applied to each call made by the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable read by [`ClientConfig::from_env`] for the user agent.
pub const ENV_USER_AGENT: &str = "ECOSYSTEMS_USER_AGENT";

/// Environment variable read by [`ClientConfig::from_env`] for the `From` header.
pub const ENV_FROM: &str = "ECOSYSTEMS_FROM";

/// Environment variable read by [`ClientConfig::from_env`] for the API key.
pub const ENV_API_KEY: &str = "ECOSYSTEMS_API_KEY";

/// Environment variable read by [`ClientConfig::from_env`] for the packages server.
pub const ENV_PACKAGES_URL: &str = "ECOSYSTEMS_PACKAGES_URL";

/// Environment variable read by [`ClientConfig::from_env`] for the repos server.
pub const ENV_REPOS_URL: &str = "ECOSYSTEMS_REPOS_URL";

/// Configuration for [`Client`](crate::Client) construction.
///
/// Only the user agent is required:
/// ```
/// # use ecosystems::ClientConfig;
/// let config = ClientConfig::builder()
///     .user_agent("my-tool/1.0")
///     .from("ops@example.com")
///     .build();
/// assert_eq!(config.packages_server, ecosystems::DEFAULT_PACKAGES_SERVER);
/// ```
#[derive(Clone, Builder)]
pub struct ClientConfig {
    /// Identifies the calling application. Must not be empty.
    #[builder(into)]
    pub user_agent: String,

    /// Base URL of the package metadata API.
    #[builder(into, default = DEFAULT_PACKAGES_SERVER.to_string())]
    pub packages_server: String,

    /// Base URL of the repository metadata API.
    #[builder(into, default = DEFAULT_REPOS_SERVER.to_string())]
    pub repos_server: String,

    /// Transport used for all requests.
    ///
    /// If unset, a pooled client with [`ClientConfig::timeout`] is built.
    pub http_client: Option<HttpClient>,

    /// Contact address sent in the `From` header.
    #[builder(into)]
    pub from: Option<String>,

    /// API key sent as a bearer token.
    #[builder(into)]
    pub api_key: Option<String>,

    /// Overall per-call timeout of the default transport.
    /// Ignored when [`ClientConfig::http_client`] is set.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl ClientConfig {
    /// Read configuration from the environment.
    ///
    /// `ECOSYSTEMS_USER_AGENT` is required; `ECOSYSTEMS_FROM`, `ECOSYSTEMS_API_KEY`,
    /// `ECOSYSTEMS_PACKAGES_URL`, and `ECOSYSTEMS_REPOS_URL` are optional.
    pub fn from_env() -> Result<Self, Error> {
        let user_agent = env::var(ENV_USER_AGENT)
            .map_err(|err| Error::Configuration(format!("{ENV_USER_AGENT}: {err}")))?;

        Ok(Self::builder()
            .user_agent(user_agent)
            .maybe_from(env::var(ENV_FROM).ok())
            .maybe_api_key(env::var(ENV_API_KEY).ok())
            .maybe_packages_server(env::var(ENV_PACKAGES_URL).ok())
            .maybe_repos_server(env::var(ENV_REPOS_URL).ok())
            .build())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user_agent", &self.user_agent)
            .field("packages_server", &self.packages_server)
            .field("repos_server", &self.repos_server)
            .field("from", &self.from)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Headers identifying the caller, validated once and applied to every request.
#[derive(Clone)]
pub(crate) struct Identity {
    user_agent: NonEmptyString,
    user_agent_header: HeaderValue,
    from: Option<HeaderValue>,
    authorization: Option<HeaderValue>,
}

impl Identity {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self, Error> {
        let user_agent = NonEmptyString::new(config.user_agent.clone())
            .map_err(|_| Error::Configuration(String::from("user agent is required")))?;
        let user_agent_header = header_value("user agent", user_agent.as_str())?;

        let from = config
            .from
            .as_deref()
            .filter(|from| !from.is_empty())
            .map(|from| header_value("from", from))
            .transpose()?;

        let authorization = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| {
                let mut value = header_value("api key", &format!("Bearer {key}"))?;
                value.set_sensitive(true);
                Ok::<_, Error>(value)
            })
            .transpose()?;

        debug!(
            user_agent = user_agent.as_str(),
            has_from = from.is_some(),
            has_api_key = authorization.is_some(),
            "configured client identity"
        );

        Ok(Self {
            user_agent,
            user_agent_header,
            from,
            authorization,
        })
    }

    pub(crate) fn user_agent(&self) -> &str {
        self.user_agent.as_str()
    }

    /// Decorate a request with the identifying headers.
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(USER_AGENT, self.user_agent_header.clone());
        let request = match &self.from {
            Some(from) => request.header(FROM, from.clone()),
            None => request,
        };
        match &self.authorization {
            Some(authorization) => request.header(AUTHORIZATION, authorization.clone()),
            None => request,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("user_agent", &self.user_agent)
            .field("from", &self.from)
            .field("has_api_key", &self.authorization.is_some())
            .finish()
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|err| Error::Configuration(format!("invalid {field} header: {err}")))
}

/// Build the default transport: pooled, keep-alive connections and an overall timeout.
pub(crate) fn default_http_client(timeout: Duration) -> Result<HttpClient, Error> {
    HttpClient::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .tcp_keepalive(Duration::from_secs(30))
        .timeout(timeout)
        .build()
        .map_err(|err| Error::Configuration(format!("building http client: {err}")))
}
