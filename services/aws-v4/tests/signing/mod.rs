mod http_parts;
mod known_answer;

use awssign_aws_v4::{Credential, RequestDescriptor, RequestSigner};
use awssign_core::time::{parse_iso8601, DateTime};

/// Secret used by the published AWS SigV4 test suite.
pub const SUITE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// Fixed signing time of the published AWS SigV4 test suite.
pub fn suite_time() -> DateTime {
    parse_iso8601("20150830T123600Z").expect("suite time must be valid")
}

/// Credential of the published AWS SigV4 test suite.
pub fn suite_credential() -> Credential {
    Credential::new("AKIDEXAMPLE", SUITE_SECRET)
}

/// Signer pinned to the suite time.
pub fn suite_signer() -> RequestSigner {
    let _ = env_logger::builder().is_test(true).try_init();

    RequestSigner::new("service", "us-east-1").with_time(suite_time())
}

/// `get-vanilla` request of the published suite.
pub fn get_vanilla() -> RequestDescriptor {
    RequestDescriptor::new("GET", "/")
        .with_header("host", "example.amazonaws.com")
        .with_header("x-amz-date", "20150830T123600Z")
}

/// Extract the `Signature=` part of an authorization header.
pub fn signature_of(authorization: &str) -> &str {
    authorization
        .rsplit_once("Signature=")
        .map(|(_, v)| v)
        .expect("authorization must carry a signature")
}

/// Extract the `SignedHeaders=` part of an authorization header.
pub fn signed_headers_of(authorization: &str) -> &str {
    authorization
        .split(',')
        .find_map(|v| v.strip_prefix("SignedHeaders="))
        .expect("authorization must carry signed headers")
}
