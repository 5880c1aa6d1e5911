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

use crate::canonical::{canonical_request, scope, string_to_sign, Ordering};
use crate::constants::{AWS4_HMAC_SHA256, X_AMZ_DATE};
use crate::key::SigningKeyCache;
use crate::{Credential, RequestDescriptor};
use awssign_core::hash::hex_hmac_sha256;
use awssign_core::time::{format_iso8601, now, parse_iso8601, DateTime};
use awssign_core::{Error, Result, SignRequest, SigningCredential};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;

/// Output of a signing call.
///
/// `amz_date` is the timestamp that went into the signature, callers must send
/// it as the `x-amz-date` header next to `authorization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `x-amz-date` header.
    pub amz_date: String,
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    ordering: Ordering,

    time: Option<DateTime>,
    keys: SigningKeyCache,
}

impl RequestSigner {
    /// Create a new signer for `service` in `region`.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            ordering: Ordering::Supplied,

            time: None,
            keys: SigningKeyCache::default(),
        }
    }

    /// Sort and normalize query parameters and headers the way the published
    /// AWS algorithm does.
    ///
    /// Disabled by default: the signer then trusts the order and casing the
    /// caller supplied.
    pub fn with_strict_ordering(mut self, strict: bool) -> Self {
        self.ordering = if strict {
            Ordering::Strict
        } else {
            Ordering::Supplied
        };
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Sign `req` and return the `Authorization` header value.
    ///
    /// The clock is read once, the same instant is used for every stage.
    pub fn sign(&self, cred: &Credential, req: &RequestDescriptor) -> Result<SignedAuthorization> {
        let now = self.time.unwrap_or_else(now);
        self.sign_at(cred, req, now)
    }

    /// Sign `req` as if the current time were `time`.
    pub fn sign_at(
        &self,
        cred: &Credential,
        req: &RequestDescriptor,
        time: DateTime,
    ) -> Result<SignedAuthorization> {
        self.check(cred)?;
        req.validate()?;

        // Task 1: canonical request.
        let creq = canonical_request(req, self.ordering)?;
        debug!("calculated canonical request: {}", creq.value);

        // Task 2: string to sign.
        let string_to_sign = string_to_sign(&creq.value, time, &self.region, &self.service)?;
        debug!("calculated string to sign: {string_to_sign}");

        // Task 3: signature.
        let signing_key =
            self.keys
                .get_or_derive(&cred.secret_access_key, time, &self.region, &self.service)?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        // Task 4: authorization header.
        let authorization = format!(
            "{AWS4_HMAC_SHA256} Credential={}/{},SignedHeaders={},Signature={}",
            cred.access_key_id,
            scope(time, &self.region, &self.service),
            creq.signed_headers,
            signature
        );

        Ok(SignedAuthorization {
            authorization,
            amz_date: format_iso8601(time),
        })
    }

    fn check(&self, cred: &Credential) -> Result<()> {
        if self.region.is_empty() {
            return Err(Error::invalid_input("region must not be empty"));
        }
        if self.service.is_empty() {
            return Err(Error::invalid_input("service must not be empty"));
        }
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };
        // Fail before touching the request.
        self.check(cred)?;

        // A caller-set date is the signing instant.
        let caller_date = match req.headers.get(X_AMZ_DATE) {
            Some(v) => Some(parse_iso8601(v.to_str()?)?),
            None => None,
        };
        let now = caller_date.unwrap_or_else(|| self.time.unwrap_or_else(now));

        // Insert HOST header if not present.
        if req.headers.get(header::HOST).is_none() {
            if let Some(authority) = req.uri.authority() {
                let host = HeaderValue::from_str(authority.as_str())?;
                req.headers.insert(header::HOST, host);
            }
        }

        // Insert DATE header if not present.
        if caller_date.is_none() {
            let date = HeaderValue::try_from(format_iso8601(now))?;
            req.headers.insert(X_AMZ_DATE, date);
        }

        let descriptor = RequestDescriptor::from_parts(req, body)?;
        let signed = self.sign_at(cred, &descriptor, now)?;

        let mut authorization = HeaderValue::from_str(&signed.authorization)?;
        authorization.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

/// Sign `req` with `credential` for `service` in `region`.
///
/// Shorthand for `RequestSigner::new(service, region).sign(credential, req)`.
pub fn sign(
    credential: &Credential,
    region: &str,
    service: &str,
    req: &RequestDescriptor,
) -> Result<SignedAuthorization> {
    RequestSigner::new(service, region).sign(credential, req)
}
