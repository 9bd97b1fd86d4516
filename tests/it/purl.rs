use std::collections::HashSet;

use itertools::Itertools;
use maplit::hashset;
use proptest::{prelude::*, sample::select};
use simple_test_case::test_case;
use strum::IntoEnumIterator;

use ecosystems::*;

#[test]
fn supported_types_match_registries() {
    let supported = supported_types().into_iter().collect::<HashSet<_>>();
    let expected = PurlType::iter()
        .filter(|purl_type| !purl_type.registry().is_empty())
        .map(|purl_type| purl_type.to_string())
        .collect::<HashSet<_>>();
    assert_eq!(
        supported.iter().map(|t| t.to_string()).collect::<HashSet<_>>(),
        expected
    );
}

#[test]
fn unsupported_types_are_excluded() {
    let supported = supported_types();
    for excluded in hashset! {"generic", "oci", "github", "bitbucket", "bitnami", "huggingface", "rpm"} {
        assert!(!supported.contains(&excluded), "{excluded} must not be supported");
    }
}

#[test]
fn supported_types_are_unique() {
    let supported = supported_types();
    assert_eq!(supported.iter().unique().count(), supported.len());
}

#[test_case("pkg:npm/lodash@4.17.21", "npmjs.org", "lodash"; "npm")]
#[test_case("pkg:npm/%40babel/core@7.20.0", "npmjs.org", "babel/core"; "npm_scoped")]
#[test_case("pkg:pypi/requests@2.31.0", "pypi.org", "requests"; "pypi")]
#[test_case("pkg:golang/github.com/go-git/go-git@v5.0.0", "proxy.golang.org", "github.com/go-git/go-git"; "golang")]
#[test_case("pkg:maven/org.apache.commons/commons-lang3@3.12.0", "repo1.maven.org", "org.apache.commons:commons-lang3"; "maven")]
#[test_case("pkg:apk/alpine/curl@8.0.0", "alpine-edge", "curl"; "apk")]
#[test_case("pkg:docker/library/nginx@1.25", "hub.docker.com", "library/nginx"; "docker")]
#[test_case("pkg:generic/openssl@1.1.1", "", "openssl"; "generic")]
#[test]
fn parsed_registry_and_name(input: &str, registry: &str, registry_name: &str) {
    let purl = Purl::parse(input).expect("must parse purl");
    assert_eq!(purl.registry(), registry);
    assert_eq!(purl.registry_name(), registry_name);
}

fn purl_types() -> impl Strategy<Value = PurlType> {
    select(PurlType::iter().collect_vec())
}

proptest! {
    /// The registry of a PURL is determined by its type alone.
    #[test]
    fn registry_depends_only_on_type(
        purl_type in purl_types(),
        namespace in proptest::option::of("[a-z][a-z0-9.]{0,12}"),
        name in "[a-z][a-z0-9_-]{0,16}",
        version in proptest::option::of("[0-9]{1,3}\\.[0-9]{1,3}"),
    ) {
        let purl = Purl::builder()
            .package_type(purl_type.to_string())
            .maybe_namespace(namespace)
            .name(name)
            .maybe_version(version)
            .build();
        prop_assert_eq!(purl.registry(), purl_type.registry());
        prop_assert_eq!(purl.purl_type(), Some(purl_type));
    }
}

proptest! {
    /// A PURL without a namespace is known to its registry by its bare name.
    #[test]
    fn registry_name_without_namespace(purl_type in purl_types(), name in "[a-z][a-z0-9_-]{0,16}") {
        let purl = Purl::builder()
            .package_type(purl_type.to_string())
            .name(name.as_str())
            .build();
        prop_assert_eq!(purl.registry_name(), name);
    }
}
