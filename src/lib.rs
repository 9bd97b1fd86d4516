#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
mod config;
mod error;
mod models;
pub mod purl;

pub use client::*;
pub use config::{
    ClientConfig, DEFAULT_PACKAGES_SERVER, DEFAULT_REPOS_SERVER, DEFAULT_TIMEOUT, ENV_API_KEY,
    ENV_FROM, ENV_PACKAGES_URL, ENV_REPOS_URL, ENV_USER_AGENT,
};
pub use error::*;
pub use models::*;
pub use self::purl::{NameRule, Purl, PurlType, supported_types};
