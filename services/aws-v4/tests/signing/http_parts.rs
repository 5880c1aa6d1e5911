use super::*;
use anyhow::Result;
use awssign_aws_v4::X_AMZ_DATE;
use awssign_core::time::parse_iso8601;
use awssign_core::SignRequest;
use http::{header, Method, Request};
use log::debug;
use pretty_assertions::assert_eq;

#[test]
fn test_sign_request_matches_descriptor_signing() -> Result<()> {
    let body = br#"{"name":"widget","qty":2}"#;
    let req = Request::builder()
        .method(Method::POST)
        .uri("https://example.amazonaws.com/orders?page=1&size=10")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.to_vec())?;
    let (mut parts, body) = req.into_parts();

    let signer = suite_signer();
    signer.sign_request(&mut parts, &body, Some(&suite_credential()))?;
    debug!("signed request: {parts:?}");

    let expected = signer.sign(
        &suite_credential(),
        &RequestDescriptor::new("POST", "/orders")
            .with_query("page", "1")
            .with_query("size", "10")
            .with_header("content-type", "application/json")
            .with_header("host", "example.amazonaws.com")
            .with_header("x-amz-date", "20150830T123600Z")
            .with_payload(body.clone()),
    )?;

    assert_eq!(parts.headers[X_AMZ_DATE], expected.amz_date.as_str());
    assert_eq!(
        parts.headers[header::AUTHORIZATION].to_str()?,
        expected.authorization
    );
    Ok(())
}

#[test]
fn test_sign_request_signs_at_caller_date() -> Result<()> {
    // The suite signer is pinned to 20150830T123600Z.
    let req = Request::builder()
        .method(Method::GET)
        .uri("https://example.amazonaws.com/")
        .header("host", "example.amazonaws.com")
        .header("x-amz-date", "20150829T000000Z")
        .body(())?;
    let (mut parts, _) = req.into_parts();

    suite_signer().sign_request(&mut parts, b"", Some(&suite_credential()))?;

    let expected = suite_signer().sign_at(
        &suite_credential(),
        &RequestDescriptor::new("GET", "/")
            .with_header("host", "example.amazonaws.com")
            .with_header("x-amz-date", "20150829T000000Z"),
        parse_iso8601("20150829T000000Z")?,
    )?;

    assert_eq!(parts.headers[X_AMZ_DATE], "20150829T000000Z");
    let authorization = parts.headers[header::AUTHORIZATION].to_str()?;
    assert!(
        authorization.contains("Credential=AKIDEXAMPLE/20150829/us-east-1/service/aws4_request,")
    );
    assert_eq!(authorization, expected.authorization);
    assert_eq!(expected.amz_date, "20150829T000000Z");
    Ok(())
}

#[test]
fn test_sign_request_at_suite_date_matches_vanilla() -> Result<()> {
    let req = Request::builder()
        .method(Method::GET)
        .uri("https://example.amazonaws.com/")
        .header("host", "example.amazonaws.com")
        .header("x-amz-date", "20150830T123600Z")
        .body(())?;
    let (mut parts, _) = req.into_parts();

    // The clock is irrelevant once the caller set the date.
    RequestSigner::new("service", "us-east-1").sign_request(
        &mut parts,
        b"",
        Some(&suite_credential()),
    )?;

    assert_eq!(
        signature_of(parts.headers[header::AUTHORIZATION].to_str()?),
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    Ok(())
}

#[test]
fn test_sign_request_rejects_malformed_date() -> Result<()> {
    let req = Request::builder()
        .method(Method::GET)
        .uri("https://example.amazonaws.com/")
        .header("x-amz-date", "Sun, 30 Aug 2015 12:36:00 GMT")
        .body(())?;
    let (mut parts, _) = req.into_parts();

    let err = suite_signer()
        .sign_request(&mut parts, b"", Some(&suite_credential()))
        .expect_err("malformed date must be rejected");
    assert_eq!(err.kind(), awssign_core::ErrorKind::InvalidInput);
    assert_eq!(parts.headers.len(), 1);
    assert!(parts.headers.get(header::AUTHORIZATION).is_none());
    Ok(())
}

#[test]
fn test_sign_request_rejects_invalid_credential() -> Result<()> {
    let req = Request::builder()
        .method(Method::GET)
        .uri("https://example.amazonaws.com/")
        .body(())?;
    let (mut parts, _) = req.into_parts();

    let err = suite_signer()
        .sign_request(
            &mut parts,
            b"",
            Some(&awssign_aws_v4::Credential::default()),
        )
        .expect_err("empty credential must be rejected");
    assert_eq!(err.kind(), awssign_core::ErrorKind::CredentialInvalid);
    assert!(parts.headers.is_empty());
    Ok(())
}
