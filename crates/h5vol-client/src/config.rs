// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Endpoint configuration: the base URL, credentials, and logical filepath
//! the test suite (and, more generally, any caller) needs to talk to a
//! concrete server.
//!
//! Grounded on `ah-rest-client::network_config::NetworkConfig`'s small,
//! `serde`-deserializable config-struct style. Environment variables are
//! read first; a constructor argument is the fallback.

use serde::{Deserialize, Serialize};

use h5vol_types::error::{Error, Result};

const ENV_URL: &str = "H5VOL_ENDPOINT_URL";
const ENV_USERNAME: &str = "H5VOL_USERNAME";
const ENV_PASSWORD: &str = "H5VOL_PASSWORD";
const ENV_FILEPATH: &str = "H5VOL_TEST_FILE";

/// The external inputs the (optional) test harness needs: an endpoint URL,
/// a username/password pair, and a filepath naming the logical file a
/// request's `Host` header should identify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub filepath: String,
}

impl Endpoint {
    #[must_use]
    pub fn new(base_url: impl Into<String>, filepath: impl Into<String>) -> Self {
        Endpoint {
            base_url: base_url.into(),
            username: None,
            password: None,
            filepath: filepath.into(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Builds an endpoint from environment variables.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `H5VOL_ENDPOINT_URL` or
    /// `H5VOL_TEST_FILE` is unset — these two have no sensible default,
    /// matching the original test harness's own requirement that both be
    /// supplied before any scenario can run.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| Error::InvalidArgument(format!("{ENV_URL} is not set")))?;
        let filepath = std::env::var(ENV_FILEPATH)
            .map_err(|_| Error::InvalidArgument(format!("{ENV_FILEPATH} is not set")))?;
        let username = std::env::var(ENV_USERNAME).ok();
        let password = std::env::var(ENV_PASSWORD).ok();
        Ok(Endpoint {
            base_url,
            username,
            password,
            filepath,
        })
    }
}
