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

//! Canonical request and string to sign.

use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_REQUEST, AWS_QUERY_ENCODE_SET, FORM_QUERY_ENCODE_SET,
};
use crate::RequestDescriptor;
use awssign_core::hash::hex_sha256;
use awssign_core::time::{format_date, format_iso8601, DateTime};
use awssign_core::Result;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;

/// How query parameters and headers are canonicalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    /// Trust the caller: keep supplied order and casing, form-urlencode the
    /// query.
    #[default]
    Supplied,
    /// Follow the published AWS algorithm: sort query and headers, lowercase
    /// and trim headers, AWS UriEncode the query.
    Strict,
}

/// Canonical request built in task 1, together with its signed header list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// The full canonical request text.
    pub value: String,
    /// Header names joined by `;`.
    pub signed_headers: String,
}

/// Build the canonical request for `req`.
///
/// ```text
/// GET
/// /
/// Param1=value1
/// host:example.amazonaws.com
/// x-amz-date:20150830T123600Z
///
/// host;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
pub fn canonical_request(req: &RequestDescriptor, ordering: Ordering) -> Result<CanonicalRequest> {
    let query = canonical_query(&req.query, ordering);
    let headers = canonical_headers(&req.headers, ordering);

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", req.method)?;
    writeln!(f, "{}", req.canonical_uri)?;
    writeln!(f, "{query}")?;
    for (k, v) in headers.iter() {
        writeln!(f, "{k}:{v}")?;
    }
    writeln!(f)?;

    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");
    writeln!(f, "{signed_headers}")?;
    write!(f, "{}", hex_sha256(req.payload_bytes()))?;

    Ok(CanonicalRequest {
        value: f,
        signed_headers,
    })
}

/// Credential scope: `20150830/us-east-1/service/aws4_request`
pub fn scope(time: DateTime, region: &str, service: &str) -> String {
    format!("{}/{region}/{service}/{AWS4_REQUEST}", format_date(time))
}

/// Build the string to sign from the canonical request text.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20150830T123600Z
/// 20150830/us-east-1/service/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(
    canonical_request: &str,
    time: DateTime,
    region: &str,
    service: &str,
) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{}", scope(time, region, service))?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

fn canonical_query(query: &[(String, String)], ordering: Ordering) -> String {
    match ordering {
        Ordering::Supplied => query
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&"),
        Ordering::Strict => {
            let mut pairs = query
                .iter()
                .map(|(k, v)| {
                    (
                        utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                        utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
                    )
                })
                .collect::<Vec<_>>();
            // Sort by param name, then by value.
            pairs.sort();

            pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        }
    }
}

/// Literal `%` is encoded as `%25`, so every `%20` left comes from a space.
fn form_encode(s: &str) -> String {
    utf8_percent_encode(s, &FORM_QUERY_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

fn canonical_headers(headers: &[(String, String)], ordering: Ordering) -> Vec<(String, String)> {
    match ordering {
        Ordering::Supplied => headers.to_vec(),
        Ordering::Strict => {
            let mut normalized = headers
                .iter()
                .map(|(k, v)| (k.to_lowercase(), header_value_normalize(v)))
                .collect::<Vec<_>>();
            // Stable sort keeps the supplied order of repeated names.
            normalized.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut merged: Vec<(String, String)> = Vec::with_capacity(normalized.len());
            for (k, v) in normalized {
                match merged.last_mut() {
                    Some((last, values)) if *last == k => {
                        values.push(',');
                        values.push_str(&v);
                    }
                    _ => merged.push((k, v)),
                }
            }
            merged
        }
    }
}

/// Trim the value and collapse inner whitespace runs into one space.
fn header_value_normalize(v: &str) -> String {
    v.split_whitespace().collect::<Vec<_>>().join(" ")
}
