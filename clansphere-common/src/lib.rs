#[macro_use]
extern crate lazy_static;

use std::env;
use std::time::Duration;

pub mod i18n;
pub mod services;

#[derive(Debug)]
pub enum Error {
    /// A plural-form entry with no forms was found in a catalog payload.
    EmptyForms(String),
    Plural(i18n::plural::PluralError),
    Request(reqwest::Error),
    SerdeJson(serde_json::Error),
    Url,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<i18n::plural::PluralError> for Error {
    fn from(err: i18n::plural::PluralError) -> Self {
        Error::Plural(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerdeJson(err)
    }
}

pub struct Config {
    /// Base URL of the instance, without the service namespace.
    pub root_url: String,
    pub request_timeout: Duration,
    pub proxy: Option<reqwest::Proxy>,
}

impl Config {
    fn from_env() -> Config {
        Config {
            root_url: env::var("SPHERE_ROOT_URL")
                .unwrap_or_else(|_| String::from("http://localhost:8000")),
            request_timeout: Duration::from_secs(
                env::var("SPHERE_REQUEST_TIMEOUT")
                    .ok()
                    .map(|t| {
                        t.parse()
                            .expect("SPHERE_REQUEST_TIMEOUT must be a number of seconds")
                    })
                    .unwrap_or(30),
            ),
            proxy: env::var("SPHERE_PROXY_URL").ok().map(|url| {
                reqwest::Proxy::all(url.as_str()).expect("Invalid SPHERE_PROXY_URL")
            }),
        }
    }
}

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}
