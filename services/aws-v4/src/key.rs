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

use crate::constants::AWS4_REQUEST;
use awssign_core::hash::{hmac_sha256, sha256};
use awssign_core::time::{format_date, DateTime};
use awssign_core::Result;
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::RwLock;

/// Derive the SigV4 signing key.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Result<Vec<u8>> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes())?;
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes())?;
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes())?;
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}

/// Caches the last derived signing key of a signer.
///
/// A signer has a fixed region and service, so the key only changes with the
/// secret and the UTC date. The secret is kept as its SHA256 digest.
#[derive(Default)]
pub(crate) struct SigningKeyCache {
    entry: RwLock<Option<CachedKey>>,
}

struct CachedKey {
    secret_digest: Vec<u8>,
    date: String,
    key: Vec<u8>,
}

impl SigningKeyCache {
    pub(crate) fn get_or_derive(
        &self,
        secret: &str,
        time: DateTime,
        region: &str,
        service: &str,
    ) -> Result<Vec<u8>> {
        let secret_digest = sha256(secret.as_bytes());
        let date = format_date(time);

        {
            let entry = self.entry.read().expect("lock poisoned");
            if let Some(cached) = entry.as_ref() {
                if cached.date == date && cached.secret_digest == secret_digest {
                    return Ok(cached.key.clone());
                }
            }
        }

        let key = signing_key(secret, time, region, service)?;
        debug!("derived signing key for {date}/{region}/{service}");

        *self.entry.write().expect("lock poisoned") = Some(CachedKey {
            secret_digest,
            date,
            key: key.clone(),
        });
        Ok(key)
    }
}

impl Debug for SigningKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let date = self
            .entry
            .read()
            .ok()
            .and_then(|v| v.as_ref().map(|v| v.date.clone()));
        f.debug_struct("SigningKeyCache")
            .field("date", &date)
            .finish_non_exhaustive()
    }
}
