use super::*;
use anyhow::Result;
use awssign_aws_v4::canonical::{canonical_request, string_to_sign, Ordering};
use awssign_aws_v4::{sign, signing_key};
use pretty_assertions::assert_eq;

#[test]
fn test_get_vanilla() -> Result<()> {
    let signed = suite_signer().sign(&suite_credential(), &get_vanilla())?;

    assert_eq!(
        signed.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request,SignedHeaders=host;x-amz-date,Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    assert_eq!(signed.amz_date, "20150830T123600Z");
    Ok(())
}

#[test]
fn test_get_vanilla_stages() -> Result<()> {
    let creq = canonical_request(&get_vanilla(), Ordering::Supplied)?;
    let sts = string_to_sign(&creq.value, suite_time(), "us-east-1", "service")?;
    assert_eq!(
        sts,
        "AWS4-HMAC-SHA256\n20150830T123600Z\n20150830/us-east-1/service/aws4_request\nbb579772317eb040ac9ed261061d46c1f17a8133879d6129b6e1c25292927e63"
    );

    let key = signing_key(SUITE_SECRET, suite_time(), "us-east-1", "service")?;
    assert_eq!(
        hex::encode(key),
        "938127b5336810ddb6a5d6af445fcac9e371f9ed418ed386b022aed82901be75"
    );
    Ok(())
}

#[test]
fn test_get_vanilla_with_slash_secret() -> Result<()> {
    let cred = awssign_aws_v4::Credential::new(
        "AKIDEXAMPLE",
        "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
    );
    let signed = suite_signer().sign(&cred, &get_vanilla())?;

    assert_eq!(
        signature_of(&signed.authorization),
        "ea21d6f05e96a897f6000a1a293f0a5bf0f92a00343409e820dce329ca6365ea"
    );
    Ok(())
}

#[test]
fn test_get_vanilla_query_order_key_case_strict() -> Result<()> {
    let req = get_vanilla()
        .with_query("Param2", "value2")
        .with_query("Param1", "value1");

    let signed = suite_signer()
        .with_strict_ordering(true)
        .sign(&suite_credential(), &req)?;
    assert_eq!(
        signature_of(&signed.authorization),
        "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
    );
    Ok(())
}

#[test]
fn test_query_in_supplied_order() -> Result<()> {
    let req = get_vanilla()
        .with_query("Param2", "value2")
        .with_query("Param1", "value 1");

    let signed = suite_signer().sign(&suite_credential(), &req)?;
    assert_eq!(
        signed.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request,SignedHeaders=host;x-amz-date,Signature=18fed9d61a131f28c790caf9076a6d251c98a33d323fa63d8190c4d3f32486e0"
    );
    Ok(())
}

#[test]
fn test_post_json_payload() -> Result<()> {
    #[derive(serde::Serialize)]
    struct Order {
        name: &'static str,
        qty: u32,
    }

    let req = RequestDescriptor::new("POST", "/orders")
        .with_header("content-type", "application/json")
        .with_header("host", "example.amazonaws.com")
        .with_header("x-amz-date", "20150830T123600Z")
        .with_json_payload(&Order {
            name: "widget",
            qty: 2,
        })?;

    let signed = suite_signer().sign(&suite_credential(), &req)?;
    assert_eq!(
        signed.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request,SignedHeaders=content-type;host;x-amz-date,Signature=0be276c27764b684b4e6a1954cbb8331026da29620a76abe01f030cd24a9ce37"
    );
    Ok(())
}

#[test]
fn test_free_function_uses_current_time() -> Result<()> {
    let signed = sign(&suite_credential(), "us-east-1", "service", &get_vanilla())?;

    let date = &signed.amz_date[..8];
    assert!(signed
        .authorization
        .starts_with(&format!("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/{date}/us-east-1/service/aws4_request,")));
    Ok(())
}
