//! Mapping of Package URLs (PURLs) onto ecosyste.ms registries.
//!
//! See the [Package URL specification](https://github.com/package-url/purl-spec).
//!
//! Exposes the [`Purl`] struct, which is built from an external
//! [`purl::GenericPurl`] parse, and [`PurlType`], the closed table of PURL
//! types this library knows about.
//!
//! Not all PURL types have a registry. Those that don't report an empty
//! registry from [`Purl::registry`] and are rejected with
//! [`Error::UnsupportedEcosystem`] by the client before any request is made.

use std::{borrow::Cow, fmt, str::FromStr};

use bon::Builder;
use compact_str::CompactString;
use enum_assoc::Assoc;
use purl::GenericPurl;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::Error;

/// The scheme every Package URL starts with.
pub const SCHEME: &str = "pkg:";

/// Identifies PURL types known to this library.
///
/// Each type is associated with the ecosyste.ms registry that hosts its packages.
/// Types that exist in the PURL specification but have no single backing registry
/// (for example `generic` or `oci`) are associated with an empty registry.
///
/// ```
/// # use ecosystems::PurlType;
/// assert_eq!(PurlType::Cargo.registry(), "crates.io");
/// assert_eq!(PurlType::Generic.registry(), "");
/// assert_eq!("npm".parse::<PurlType>().unwrap(), PurlType::Npm);
/// ```
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Assoc,
)]
#[func(const fn host(&self) -> &'static str)]
#[non_exhaustive]
pub enum PurlType {
    /// Arch Linux packages.
    #[strum(serialize = "alpm")]
    #[assoc(host = "archlinux.org")]
    Alpm,

    /// Alpine Linux packages.
    #[strum(serialize = "apk")]
    #[assoc(host = "alpine-edge")]
    Apk,

    /// Bitbucket repositories.
    #[strum(serialize = "bitbucket")]
    #[assoc(host = "")]
    Bitbucket,

    /// Bitnami charts.
    #[strum(serialize = "bitnami")]
    #[assoc(host = "")]
    Bitnami,

    /// Bower components.
    #[strum(serialize = "bower")]
    #[assoc(host = "bower.io")]
    Bower,

    /// Homebrew formulae.
    #[strum(serialize = "brew")]
    #[assoc(host = "formulae.brew.sh")]
    Brew,

    /// Rust crates.
    #[strum(serialize = "cargo")]
    #[assoc(host = "crates.io")]
    Cargo,

    /// Carthage dependencies.
    #[strum(serialize = "carthage")]
    #[assoc(host = "carthage")]
    Carthage,

    /// Chef cookbooks.
    #[strum(serialize = "chef")]
    #[assoc(host = "supermarket.chef.io")]
    Chef,

    /// Chocolatey packages.
    #[strum(serialize = "chocolatey")]
    #[assoc(host = "chocolatey.org")]
    Chocolatey,

    /// Clojars jars.
    #[strum(serialize = "clojars")]
    #[assoc(host = "clojars.org")]
    Clojars,

    /// CocoaPods pods.
    #[strum(serialize = "cocoapods")]
    #[assoc(host = "cocoapods.org")]
    Cocoapods,

    /// Composer (PHP) packages.
    #[strum(serialize = "composer")]
    #[assoc(host = "packagist.org")]
    Composer,

    /// Conan C/C++ packages.
    #[strum(serialize = "conan")]
    #[assoc(host = "conan.io")]
    Conan,

    /// Conda packages.
    #[strum(serialize = "conda")]
    #[assoc(host = "anaconda.org")]
    Conda,

    /// CPAN modules.
    #[strum(serialize = "cpan")]
    #[assoc(host = "metacpan.org")]
    Cpan,

    /// CRAN packages.
    #[strum(serialize = "cran")]
    #[assoc(host = "cran.r-project.org")]
    Cran,

    /// Debian packages.
    #[strum(serialize = "deb")]
    #[assoc(host = "debian")]
    Deb,

    /// Docker images.
    #[strum(serialize = "docker")]
    #[assoc(host = "hub.docker.com")]
    Docker,

    /// Elm packages.
    #[strum(serialize = "elm")]
    #[assoc(host = "package.elm-lang.org")]
    Elm,

    /// RubyGems.
    #[strum(serialize = "gem")]
    #[assoc(host = "rubygems.org")]
    Gem,

    /// Plain URLs or other artifacts without a package manager.
    #[strum(serialize = "generic")]
    #[assoc(host = "")]
    Generic,

    /// GitHub repositories.
    #[strum(serialize = "github")]
    #[assoc(host = "")]
    Github,

    /// Go modules.
    #[strum(serialize = "golang")]
    #[assoc(host = "proxy.golang.org")]
    Golang,

    /// Haskell packages.
    #[strum(serialize = "hackage")]
    #[assoc(host = "hackage.haskell.org")]
    Hackage,

    /// Erlang and Elixir packages.
    #[strum(serialize = "hex")]
    #[assoc(host = "hex.pm")]
    Hex,

    /// Hugging Face models.
    #[strum(serialize = "huggingface")]
    #[assoc(host = "")]
    Huggingface,

    /// Julia packages.
    #[strum(serialize = "julia")]
    #[assoc(host = "juliahub.com")]
    Julia,

    /// Maven artifacts.
    #[strum(serialize = "maven")]
    #[assoc(host = "repo1.maven.org")]
    Maven,

    /// npm packages.
    #[strum(serialize = "npm")]
    #[assoc(host = "npmjs.org")]
    Npm,

    /// NuGet packages.
    #[strum(serialize = "nuget")]
    #[assoc(host = "nuget.org")]
    Nuget,

    /// OCI artifacts.
    #[strum(serialize = "oci")]
    #[assoc(host = "")]
    Oci,

    /// Dart and Flutter packages.
    #[strum(serialize = "pub")]
    #[assoc(host = "pub.dev")]
    Pub,

    /// Puppet modules.
    #[strum(serialize = "puppet")]
    #[assoc(host = "forge.puppet.com")]
    Puppet,

    /// Python packages.
    #[strum(serialize = "pypi")]
    #[assoc(host = "pypi.org")]
    Pypi,

    /// RPM packages.
    #[strum(serialize = "rpm")]
    #[assoc(host = "")]
    Rpm,

    /// Swift packages.
    #[strum(serialize = "swift")]
    #[assoc(host = "swiftpackageindex.com")]
    Swift,
}

impl PurlType {
    /// The ecosyste.ms registry hosting packages of this type,
    /// or an empty string if there is none.
    pub const fn registry(&self) -> &'static str {
        self.host()
    }

    /// Whether ecosyste.ms has a registry for this type.
    pub const fn is_supported(&self) -> bool {
        !self.registry().is_empty()
    }

    /// How the namespace and name of a PURL of this type form a registry package name.
    pub const fn name_rule(&self) -> NameRule {
        match self {
            PurlType::Maven => NameRule::Colon,
            PurlType::Apk => NameRule::NameOnly,
            _ => NameRule::Slash,
        }
    }
}

/// Describes how a PURL namespace is combined with its name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum NameRule {
    /// `{namespace}/{name}`
    #[default]
    Slash,

    /// `{namespace}:{name}`, for example Maven's `group:artifact`.
    Colon,

    /// The namespace is discarded.
    NameOnly,
}

impl NameRule {
    /// Combine `namespace` and `name` according to this rule.
    pub fn join(self, namespace: &str, name: &str) -> String {
        match self {
            NameRule::Slash => format!("{namespace}/{name}"),
            NameRule::Colon => format!("{namespace}:{name}"),
            NameRule::NameOnly => name.to_string(),
        }
    }
}

/// All PURL types that map to a registry.
///
/// The order of the returned types is unspecified.
pub fn supported_types() -> Vec<&'static str> {
    PurlType::iter()
        .filter(PurlType::is_supported)
        .map(<&'static str>::from)
        .collect()
}

/// A parsed Package URL.
///
/// Parsing is delegated to the external [`purl`] crate; this struct keeps
/// only the parts needed to address a package in a registry.
/// Parse from a string, with or without the `pkg:` scheme:
/// ```
/// # use ecosystems::Purl;
/// let purl = Purl::parse("gem/rails@7.0.0").unwrap();
/// assert_eq!(purl, Purl::parse("pkg:gem/rails@7.0.0").unwrap());
/// assert_eq!(purl.registry(), "rubygems.org");
/// assert_eq!(purl.version(), Some("7.0.0"));
/// ```
///
/// Or build one directly:
/// ```
/// # use ecosystems::Purl;
/// let purl = Purl::builder()
///     .package_type("maven")
///     .namespace("org.apache.commons")
///     .name("commons-lang3")
///     .build();
/// assert_eq!(purl.registry_name(), "org.apache.commons:commons-lang3");
/// ```
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Builder)]
pub struct Purl {
    #[builder(into)]
    package_type: CompactString,

    #[builder(into)]
    namespace: Option<CompactString>,

    #[builder(into)]
    name: CompactString,

    #[builder(into)]
    version: Option<CompactString>,
}

impl Purl {
    /// Parse a PURL, prepending the `pkg:` scheme if it is missing.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        let input = input.as_ref();
        let text: Cow<'_, str> = if input.starts_with(SCHEME) {
            Cow::Borrowed(input)
        } else {
            Cow::Owned(format!("{SCHEME}{input}"))
        };

        GenericPurl::<String>::from_str(&text)
            .map(Self::from)
            .map_err(|error| Error::MalformedPurl {
                input: input.to_string(),
                error,
            })
    }

    /// The PURL type, e.g. `npm`.
    pub fn package_type(&self) -> &str {
        &self.package_type
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether both PURLs name the same package, regardless of version.
    pub(crate) fn same_package(&self, other: &Purl) -> bool {
        self.package_type == other.package_type
            && self.namespace == other.namespace
            && self.name == other.name
    }

    /// The known [`PurlType`] of this PURL, if the type is in the table.
    pub fn purl_type(&self) -> Option<PurlType> {
        PurlType::from_str(&self.package_type).ok()
    }

    /// The ecosyste.ms registry hosting this package.
    ///
    /// This depends only on the PURL type.
    /// Returns an empty string if the type has no registry.
    pub fn registry(&self) -> &'static str {
        self.purl_type()
            .map(|purl_type| purl_type.registry())
            .unwrap_or_default()
    }

    /// The name of this package as the registry knows it.
    ///
    /// ```
    /// # use ecosystems::Purl;
    /// let purl = Purl::parse("pkg:golang/github.com/go-git/go-git@v5.0.0").unwrap();
    /// assert_eq!(purl.registry_name(), "github.com/go-git/go-git");
    /// ```
    pub fn registry_name(&self) -> String {
        let Some(namespace) = self.namespace() else {
            return self.name.to_string();
        };

        self.purl_type()
            .map(|purl_type| purl_type.name_rule())
            .unwrap_or_default()
            .join(namespace, &self.name)
    }
}

impl From<GenericPurl<String>> for Purl {
    fn from(purl: GenericPurl<String>) -> Self {
        let package_type = purl.package_type().as_str();

        // npm scopes are written `@scope`; the registry namespace is the bare scope.
        let namespace = purl
            .namespace()
            .map(|namespace| match package_type {
                "npm" => namespace.strip_prefix('@').unwrap_or(namespace),
                _ => namespace,
            })
            .filter(|namespace| !namespace.is_empty());

        Self {
            package_type: package_type.into(),
            namespace: namespace.map(CompactString::from),
            name: purl.name().into(),
            version: purl.version().map(CompactString::from),
        }
    }
}

impl FromStr for Purl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders the PURL for messages; components are not percent-encoded.
impl fmt::Display for Purl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/", self.package_type)?;
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}/")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}
