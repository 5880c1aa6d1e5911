// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::{Credential, RequestSigner};
use awssign_core::utils::Redact;
use awssign_core::{Env, Error, Result};
use log::debug;
use std::fmt::{Debug, Formatter};

/// Config for the aws v4 signer.
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `service` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWSSIGN_SERVICE`]
    pub service: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `strict_aws_ordering` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWSSIGN_STRICT_ORDERING`], `true`, `1` or `on` enable it
    /// - default to `false`
    pub strict_aws_ordering: Option<bool>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("service", &self.service)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(Redact::from),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(Redact::from),
            )
            .field("strict_aws_ordering", &self.strict_aws_ordering)
            .finish()
    }
}

impl Config {
    /// Load config from env, values already set on `self` take precedence.
    pub fn from_env(mut self, env: &dyn Env) -> Self {
        // Empty values count as unset.
        let var = |key: &str| env.var(key).filter(|v| !v.is_empty());

        if self.region.is_none() {
            self.region = var(AWS_REGION).or_else(|| var(AWS_DEFAULT_REGION));
        }
        if self.service.is_none() {
            self.service = var(AWSSIGN_SERVICE);
        }
        if self.access_key_id.is_none() {
            self.access_key_id = var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = var(AWS_SECRET_ACCESS_KEY);
        }
        if self.strict_aws_ordering.is_none() {
            self.strict_aws_ordering = var(AWSSIGN_STRICT_ORDERING)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "on"));
        }

        debug!("loaded config from env: {self:?}");
        self
    }

    /// Build the credential described by this config.
    pub fn credential(&self) -> Result<Credential> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Credential::new(ak, sk)),
            _ => Err(Error::config_invalid(
                "access_key_id and secret_access_key must both be set",
            )),
        }
    }

    /// Build a signer for the configured region and service.
    pub fn signer(&self) -> Result<RequestSigner> {
        let region = self
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("region must be set"))?;
        let service = self
            .service
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("service must be set"))?;

        Ok(RequestSigner::new(service, region)
            .with_strict_ordering(self.strict_aws_ordering.unwrap_or_default()))
    }
}
