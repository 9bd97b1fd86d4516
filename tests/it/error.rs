use color_eyre::{Result, eyre::Context};
use pretty_assertions::assert_eq;

use ecosystems::{Client, ClientConfig, Error, Purl};

#[test]
fn error_wrappable_context() -> Result<()> {
    let purl = Purl::parse("pkg:cargo/serde@1.0.0").context("can wrap")?;
    assert_eq!(purl.registry(), "crates.io");

    let purl = Purl::parse("pkg:gem/rails").with_context(|| "can wrap")?;
    assert_eq!(purl.registry_name(), "rails");

    Ok(())
}

#[test]
fn error_context_preserves_source() {
    let report = Purl::parse("pkg:")
        .context("parsing input")
        .expect_err("must not parse");
    assert_eq!(report.to_string(), "parsing input");
    assert!(report.downcast_ref::<Error>().is_some());
}

#[test]
fn configuration_error_has_help() {
    use miette::Diagnostic;

    let err = Client::new(ClientConfig::builder().user_agent("").build())
        .expect_err("must not create client");
    assert!(err.help().is_some());
}
