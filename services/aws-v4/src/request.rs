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

use awssign_core::{Error, Result};
use bytes::Bytes;
use serde::Serialize;

/// The parts of an HTTP request that take part in signing.
///
/// Query parameters and headers are kept in the order they were supplied.
/// Unless the signer runs with strict ordering, that order is the canonical
/// order: nothing is sorted, lowercased or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method, used as is.
    pub method: String,
    /// Canonical URI, used as is.
    pub canonical_uri: String,
    /// Query parameters, not yet encoded.
    pub query: Vec<(String, String)>,
    /// Headers to sign.
    pub headers: Vec<(String, String)>,
    /// Request payload. `None` hashes as an empty body.
    pub payload: Option<Bytes>,
}

impl RequestDescriptor {
    /// Create a new descriptor for `method` and `canonical_uri`.
    pub fn new(method: impl Into<String>, canonical_uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            canonical_uri: canonical_uri.into(),
            ..Default::default()
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the raw payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Set the payload to the compact JSON encoding of `value`.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`, `"0"`, `{}` and `[]`) are
    /// treated as no payload at all, so they hash like an empty body.
    pub fn with_json_payload<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|e| {
            Error::invalid_input("payload is not serializable as json").with_source(e)
        })?;

        let empty = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Bool(v) => !v,
            serde_json::Value::Number(v) => v.as_f64() == Some(0.0),
            serde_json::Value::String(v) => v.is_empty() || v == "0",
            serde_json::Value::Array(v) => v.is_empty(),
            serde_json::Value::Object(v) => v.is_empty(),
        };
        if empty {
            self.payload = None;
            return Ok(self);
        }

        let bs = serde_json::to_vec(&value).map_err(|e| {
            Error::invalid_input("payload is not serializable as json").with_source(e)
        })?;
        self.payload = Some(Bytes::from(bs));
        Ok(self)
    }

    /// Build a descriptor from an `http` request head and its body.
    ///
    /// Query pairs are percent decoded so the signer can encode them again.
    /// Headers are taken in the order `http::HeaderMap` yields them, with the
    /// lowercased names it stores.
    pub fn from_parts(parts: &http::request::Parts, body: &[u8]) -> Result<Self> {
        let query = parts
            .uri
            .query()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        let mut headers = Vec::with_capacity(parts.headers.len());
        for (name, value) in parts.headers.iter() {
            let value = value.to_str().map_err(|e| {
                Error::invalid_input(format!("header {name} is not valid visible ascii"))
                    .with_source(e)
            })?;
            headers.push((name.as_str().to_string(), value.to_string()));
        }

        Ok(Self {
            method: parts.method.as_str().to_string(),
            canonical_uri: parts.uri.path().to_string(),
            query,
            headers,
            payload: if body.is_empty() {
                None
            } else {
                Some(Bytes::copy_from_slice(body))
            },
        })
    }

    /// Payload bytes, empty when absent.
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Check the fields that must not be empty.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.method.is_empty() {
            return Err(Error::invalid_input("http method must not be empty"));
        }
        if self.canonical_uri.is_empty() {
            return Err(Error::invalid_input("canonical uri must not be empty"));
        }
        Ok(())
    }
}
