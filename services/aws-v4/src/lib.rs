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

//! AWS SigV4 signer.
//!
//! ```
//! use awssign_aws_v4::{sign, Credential, RequestDescriptor};
//!
//! # fn main() -> awssign_core::Result<()> {
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//! let req = RequestDescriptor::new("GET", "/")
//!     .with_header("host", "example.amazonaws.com");
//!
//! let signed = sign(&cred, "us-east-1", "service", &req)?;
//! assert!(signed.authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod request;
pub use request::RequestDescriptor;

pub mod canonical;

mod key;
pub use key::signing_key;

mod sign_request;
pub use sign_request::{sign, RequestSigner, SignedAuthorization};

mod constants;
pub use constants::X_AMZ_DATE;
