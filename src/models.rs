//! Records returned by the ecosyste.ms APIs.
//!
//! The backends return large, evolving JSON documents. Each record names the
//! handful of fields callers commonly need; everything else is retained
//! verbatim in its `extra` map so nothing the backend sends is lost.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields of a record not modeled explicitly.
pub type Extra = Map<String, Value>;

/// A package as described by the package metadata API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Name of the package in its registry.
    #[serde(default)]
    pub name: String,

    /// Ecosystem the package belongs to, e.g. `rubygems`.
    #[serde(default)]
    pub ecosystem: String,

    /// Short description.
    pub description: Option<String>,

    /// Project homepage.
    pub homepage: Option<String>,

    /// Source repository URL.
    pub repository_url: Option<String>,

    /// Normalized license expression.
    pub licenses: Option<String>,

    /// Most recently published version number.
    pub latest_release_number: Option<String>,

    /// Number of published versions.
    pub versions_count: Option<u64>,

    /// All other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A package returned by a bulk lookup, including the registry hosting it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageWithRegistry {
    /// The Package URL this record answers.
    #[serde(default)]
    pub purl: String,

    /// The registry hosting the package.
    pub registry: Option<Registry>,

    /// The package itself.
    #[serde(flatten)]
    pub package: Package,
}

/// A published version of a package.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// The version number, as published.
    #[serde(default)]
    pub number: String,

    /// Publication timestamp.
    pub published_at: Option<String>,

    /// Normalized license expression of this version.
    pub licenses: Option<String>,

    /// Package URL of this version.
    pub purl: Option<String>,

    /// All other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A published version of a package along with its declared dependencies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionWithDependencies {
    /// Dependencies declared by this version.
    pub dependencies: Option<Vec<Dependency>>,

    /// The version itself.
    #[serde(flatten)]
    pub version: Version,
}

/// A dependency declared by a package version.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the depended-upon package.
    #[serde(default)]
    pub package_name: String,

    /// Ecosystem of the depended-upon package.
    pub ecosystem: Option<String>,

    /// Version requirement, in the ecosystem's own syntax.
    pub requirements: Option<String>,

    /// Kind of dependency, e.g. `runtime` or `development`.
    pub kind: Option<String>,

    /// Whether the dependency is optional.
    pub optional: Option<bool>,

    /// All other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A package registry known to ecosyste.ms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    /// Registry identifier, e.g. `npmjs.org`.
    #[serde(default)]
    pub name: String,

    /// Registry homepage.
    pub url: Option<String>,

    /// Ecosystem served by the registry.
    pub ecosystem: Option<String>,

    /// Whether this is the default registry for its ecosystem.
    pub default: Option<bool>,

    /// Number of packages indexed.
    pub packages_count: Option<u64>,

    /// All other fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// A source repository as described by the repository metadata API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/name` of the repository.
    pub full_name: Option<String>,

    /// Web URL of the repository.
    pub html_url: Option<String>,

    /// Short description.
    pub description: Option<String>,

    /// Primary language.
    pub language: Option<String>,

    /// Star count.
    pub stargazers_count: Option<u64>,

    /// Whether the repository is archived.
    pub archived: Option<bool>,

    /// All other fields.
    #[serde(flatten)]
    pub extra: Extra,
}
