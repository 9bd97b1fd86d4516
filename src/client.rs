//! Blocking client for the ecosyste.ms package and repository APIs.

use std::{collections::HashMap, fmt};

use reqwest::{
    StatusCode,
    blocking::{Client as HttpClient, RequestBuilder, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    Error, Package, PackageWithRegistry, Purl, Registry, Repository, Version,
    VersionWithDependencies,
    config::{ClientConfig, Identity, default_http_client},
};

/// The most PURLs sent in a single bulk lookup request.
pub const MAX_BULK_LOOKUP_SIZE: usize = 100;

/// The number of versions requested per page when listing all versions.
pub const VERSIONS_PAGE_SIZE: usize = 100;

/// A client for the ecosyste.ms APIs.
///
/// Every method performs live requests and blocks until they complete or time out.
/// Requests are made one at a time: bulk lookups and version listings issue
/// their batches and pages sequentially, and abort entirely on the first failure.
///
/// The client is cheap to share: it is `Send + Sync` and reuses pooled connections.
///
/// Lookups of a single entity return `Ok(None)` if the backend reports it does not exist:
/// ```no_run
/// # use ecosystems::{Client, ClientConfig};
/// let client = Client::new(ClientConfig::builder().user_agent("my-tool/1.0").build())?;
/// match client.lookup_by_registry_and_name("rubygems.org", "rails")? {
///     Some(package) => println!("{} is licensed {:?}", package.name, package.licenses),
///     None => println!("no such package"),
/// }
/// # Ok::<(), ecosystems::Error>(())
/// ```
pub struct Client {
    http: HttpClient,
    packages: Url,
    repos: Url,
    identity: Identity,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("packages", &self.packages.as_str())
            .field("repos", &self.repos.as_str())
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new client from configuration.
    ///
    /// Fails with [`Error::Configuration`] if the user agent is empty
    /// or a server address is not a usable base URL. No requests are made.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let identity = Identity::new(&config)?;
        let packages = base_url("packages server", &config.packages_server)?;
        let repos = base_url("repos server", &config.repos_server)?;
        let http = match config.http_client {
            Some(http) => http,
            None => default_http_client(config.timeout)?,
        };

        debug!(%packages, %repos, "created ecosyste.ms client");
        Ok(Self {
            http,
            packages,
            repos,
            identity,
        })
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        self.identity.user_agent()
    }

    /// Look up many packages by PURL.
    ///
    /// Returns a map keyed by each PURL string as supplied.
    /// PURLs the backend knows nothing about are absent from the map.
    ///
    /// PURLs are sent in batches of [`MAX_BULK_LOOKUP_SIZE`], in order;
    /// an empty input makes no request at all.
    #[instrument(skip_all, fields(purls = purls.len()))]
    pub fn bulk_lookup<S: AsRef<str>>(
        &self,
        purls: &[S],
    ) -> Result<HashMap<String, PackageWithRegistry>, Error> {
        const OPERATION: &str = "bulk lookup";

        let mut results = HashMap::new();
        let url = endpoint(&self.packages, ["packages", "bulk_lookup"]);
        for (index, batch) in purls.chunks(MAX_BULK_LOOKUP_SIZE).enumerate() {
            let batch = batch.iter().map(|purl| purl.as_ref()).collect::<Vec<&str>>();
            debug!(batch = index, size = batch.len(), "looking up batch");

            let request = self
                .http
                .post(url.clone())
                .json(&BulkLookupRequest { purls: &batch });
            let response = self.send(OPERATION, request)?;
            let records = expect_success::<Option<Vec<PackageWithRegistry>>>(OPERATION, response)?;
            merge_batch(&mut results, &batch, records.unwrap_or_default());
        }

        Ok(results)
    }

    /// Look up a single package by PURL.
    ///
    /// Returns `None` if the backend does not know the package.
    #[instrument(skip(self))]
    pub fn lookup(&self, purl: &str) -> Result<Option<PackageWithRegistry>, Error> {
        let mut results = self.bulk_lookup(&[purl])?;
        Ok(results.remove(purl))
    }

    /// Look up a package by registry and registry-local name.
    #[instrument(skip(self))]
    pub fn lookup_by_registry_and_name(
        &self,
        registry: &str,
        name: &str,
    ) -> Result<Option<Package>, Error> {
        const OPERATION: &str = "lookup package";

        let url = endpoint(&self.packages, ["registries", registry, "packages", name]);
        let response = self.send(OPERATION, self.http.get(url))?;
        optional(OPERATION, response)
    }

    /// Get a specific version of a package, including its dependencies.
    #[instrument(skip(self))]
    pub fn get_version(
        &self,
        registry: &str,
        name: &str,
        version: &str,
    ) -> Result<Option<VersionWithDependencies>, Error> {
        const OPERATION: &str = "get version";

        let url = endpoint(
            &self.packages,
            ["registries", registry, "packages", name, "versions", version],
        );
        let response = self.send(OPERATION, self.http.get(url))?;
        optional(OPERATION, response)
    }

    /// Get every version of a package, following pagination.
    ///
    /// Returns an empty list if the package does not exist.
    #[instrument(skip(self))]
    pub fn get_all_versions(&self, registry: &str, name: &str) -> Result<Vec<Version>, Error> {
        const OPERATION: &str = "get versions";

        let url = endpoint(
            &self.packages,
            ["registries", registry, "packages", name, "versions"],
        );
        collect_pages(VERSIONS_PAGE_SIZE, |page| {
            debug!(page, "requesting versions page");
            let request = self
                .http
                .get(url.clone())
                .query(&[("page", page), ("per_page", VERSIONS_PAGE_SIZE)]);
            let response = self.send(OPERATION, request)?;
            let found = optional::<Option<Vec<Version>>>(OPERATION, response)?;
            Ok(found.map(Option::unwrap_or_default))
        })
    }

    /// Look up a source repository by URL.
    #[instrument(skip(self))]
    pub fn get_repository(&self, url: &str) -> Result<Option<Repository>, Error> {
        const OPERATION: &str = "lookup repository";

        let request = self
            .http
            .get(endpoint(&self.repos, ["repositories", "lookup"]))
            .query(&[("url", url)]);
        let response = self.send(OPERATION, request)?;
        optional(OPERATION, response)
    }

    /// List every registry known to ecosyste.ms.
    #[instrument(skip(self))]
    pub fn list_registries(&self) -> Result<Vec<Registry>, Error> {
        const OPERATION: &str = "list registries";

        let request = self.http.get(endpoint(&self.packages, ["registries"]));
        let response = self.send(OPERATION, request)?;
        let registries = expect_success::<Option<Vec<Registry>>>(OPERATION, response)?;
        Ok(registries.unwrap_or_default())
    }

    /// Look up a package by PURL using its registry and name.
    ///
    /// Unlike [`Client::lookup`], this returns the full [`Package`] record.
    /// Fails with [`Error::UnsupportedEcosystem`] without making a request
    /// if the PURL type has no registry.
    #[instrument(skip_all, fields(purl = %purl))]
    pub fn lookup_purl(&self, purl: &Purl) -> Result<Option<Package>, Error> {
        let (registry, name) = resolve(purl)?;
        self.lookup_by_registry_and_name(registry, &name)
    }

    /// Get the version named by a PURL.
    ///
    /// Fails with [`Error::MissingVersion`] without making a request
    /// if the PURL has no version.
    #[instrument(skip_all, fields(purl = %purl))]
    pub fn get_version_purl(&self, purl: &Purl) -> Result<Option<VersionWithDependencies>, Error> {
        let Some(version) = purl.version() else {
            return Err(Error::MissingVersion(purl.to_string()));
        };
        let (registry, name) = resolve(purl)?;
        self.get_version(registry, &name, version)
    }

    /// Get every version of the package named by a PURL.
    /// The version of the PURL, if any, is ignored.
    #[instrument(skip_all, fields(purl = %purl))]
    pub fn get_all_versions_purl(&self, purl: &Purl) -> Result<Vec<Version>, Error> {
        let (registry, name) = resolve(purl)?;
        self.get_all_versions(registry, &name)
    }

    fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, Error> {
        self.identity
            .apply(request)
            .send()
            .map_err(|source| Error::Transport { operation, source })
    }
}

#[derive(Serialize)]
struct BulkLookupRequest<'a> {
    purls: &'a [&'a str],
}

/// Error body returned by the backends for rejected requests.
#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

fn base_url(field: &str, server: &str) -> Result<Url, Error> {
    let url = Url::parse(server)
        .map_err(|err| Error::Configuration(format!("invalid {field} '{server}': {err}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Configuration(format!(
            "invalid {field} '{server}': not a base url"
        )));
    }
    Ok(url)
}

/// Append path segments to a base URL, percent-encoding each one.
///
/// Segments may contain `/`, as registry names often do; it is encoded
/// rather than treated as a separator.
fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn resolve(purl: &Purl) -> Result<(&'static str, String), Error> {
    let registry = purl.registry();
    if registry.is_empty() {
        return Err(Error::UnsupportedEcosystem(purl.package_type().to_string()));
    }
    Ok((registry, purl.registry_name()))
}

/// Decode a `200 OK` response; any other status is an error.
///
/// Only a `400 Bad Request` is expected to explain itself in an `{"error": ...}` body.
fn expect_success<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, Error> {
    let status = response.status();
    if status != StatusCode::OK {
        let message = if status == StatusCode::BAD_REQUEST {
            response
                .json::<ErrorResponse>()
                .ok()
                .and_then(|body| body.error)
        } else {
            None
        };
        return Err(Error::Backend {
            operation,
            status,
            message,
        });
    }

    response
        .json()
        .map_err(|source| Error::InvalidResponse { operation, source })
}

/// Like [`expect_success`], but a not-found response means the entity is absent.
fn optional<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<Option<T>, Error> {
    if response.status() == StatusCode::NOT_FOUND {
        debug!(operation, "not found");
        return Ok(None);
    }
    expect_success(operation, response).map(Some)
}

/// Fetch pages starting at page 1 until one is shorter than `page_size`.
///
/// `fetch` returns `None` if the collection does not exist,
/// in which case the result is empty regardless of earlier pages.
fn collect_pages<T>(
    page_size: usize,
    mut fetch: impl FnMut(usize) -> Result<Option<Vec<T>>, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = Vec::new();
    for page in 1.. {
        let Some(found) = fetch(page)? else {
            return Ok(Vec::new());
        };

        let count = found.len();
        items.extend(found);
        if count < page_size {
            break;
        }
    }
    Ok(items)
}

/// Merge a batch of bulk lookup records into `results`, keyed by the PURLs as supplied.
fn merge_batch(
    results: &mut HashMap<String, PackageWithRegistry>,
    batch: &[&str],
    records: Vec<PackageWithRegistry>,
) {
    let requested = batch
        .iter()
        .map(|purl| (*purl, Purl::parse(purl).ok()))
        .collect::<Vec<_>>();
    for record in records {
        let key = requested_purl(&requested, &record.purl);
        results.insert(key, record);
    }
}

/// Find the supplied PURL a returned record answers.
///
/// The backend may echo a PURL in a different but equivalent form,
/// for example with the `pkg:` scheme added, or without the requested version.
fn requested_purl(requested: &[(&str, Option<Purl>)], returned: &str) -> String {
    if let Some((purl, _)) = requested.iter().find(|(purl, _)| *purl == returned) {
        return purl.to_string();
    }

    if let Ok(returned_purl) = Purl::parse(returned) {
        let candidates = || {
            requested
                .iter()
                .filter_map(|(purl, parsed)| parsed.as_ref().map(|parsed| (*purl, parsed)))
        };
        let matched = candidates()
            .find(|(_, parsed)| **parsed == returned_purl)
            .or_else(|| candidates().find(|(_, parsed)| parsed.same_package(&returned_purl)));
        if let Some((purl, _)) = matched {
            return purl.to_string();
        }
    }

    warn!(purl = returned, "bulk lookup returned a purl that was not requested");
    returned.to_string()
}
