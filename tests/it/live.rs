//! Tests against the production ecosyste.ms APIs.
//!
//! These make real network requests, so they are ignored by default:
//! run them with `cargo test -- --ignored`.

use pretty_assertions::assert_eq;

use ecosystems::{Client, ClientConfig, Purl};

fn client() -> Client {
    let config = ClientConfig::builder()
        .user_agent("ecosystems-rs-test/1.0")
        .build();
    Client::new(config).expect("must create client")
}

#[test]
#[ignore = "requires network access"]
fn bulk_lookup() {
    let results = client()
        .bulk_lookup(&["pkg:gem/rails", "pkg:npm/lodash", "pkg:pypi/requests"])
        .expect("must look up packages");

    let rails = results.get("pkg:gem/rails").expect("must find rails");
    assert_eq!(rails.package.name, "rails");
    assert_eq!(rails.package.ecosystem, "rubygems");
}

#[test]
#[ignore = "requires network access"]
fn lookup() {
    let package = client()
        .lookup("pkg:gem/rake")
        .expect("must look up package")
        .expect("rake must exist");
    assert_eq!(package.package.name, "rake");
}

#[test]
#[ignore = "requires network access"]
fn get_version() {
    let version = client()
        .get_version("rubygems.org", "rake", "13.0.0")
        .expect("must get version")
        .expect("rake 13.0.0 must exist");
    assert_eq!(version.version.number, "13.0.0");
}

#[test]
#[ignore = "requires network access"]
fn get_all_versions() {
    let versions = client()
        .get_all_versions("rubygems.org", "rake")
        .expect("must list versions");
    assert!(versions.len() >= 10, "rake has many versions, got {}", versions.len());
}

#[test]
#[ignore = "requires network access"]
fn lookup_purl() {
    let purl = Purl::parse("pkg:npm/lodash").expect("must parse purl");
    let package = client()
        .lookup_purl(&purl)
        .expect("must look up package")
        .expect("lodash must exist");
    assert_eq!(package.name, "lodash");
}

#[test]
#[ignore = "requires network access"]
fn get_version_purl() {
    let purl = Purl::parse("pkg:npm/lodash@4.17.21").expect("must parse purl");
    let version = client()
        .get_version_purl(&purl)
        .expect("must get version")
        .expect("lodash 4.17.21 must exist");
    assert_eq!(version.version.number, "4.17.21");
}

#[test]
#[ignore = "requires network access"]
fn list_registries() {
    let registries = client().list_registries().expect("must list registries");
    assert!(registries.iter().any(|registry| registry.name == "crates.io"));
}

#[test]
#[ignore = "requires network access"]
fn missing_package_is_none() {
    let package = client()
        .lookup_by_registry_and_name("rubygems.org", "this-package-should-never-exist-0000")
        .expect("missing package is not an error");
    assert_eq!(package, None);
}

#[test]
#[ignore = "requires network access"]
fn get_repository() {
    let repository = client()
        .get_repository("https://github.com/rails/rails")
        .expect("must look up repository")
        .expect("rails/rails must exist");
    assert_eq!(repository.full_name.as_deref(), Some("rails/rails"));
}
