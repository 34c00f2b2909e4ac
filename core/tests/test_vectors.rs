//! Verify conversions against JSON test vectors stored in `test-vectors/`.
//!
//! Each case describes a request (method, URL, headers, optional body, TLS
//! flag, optional host for schemeless captures), the options to apply, and the
//! exact command string expected.

use curlify_core::{convert, CurlOption, HttpRequest};

fn build_request(case: &serde_json::Value) -> HttpRequest {
    let mut request = HttpRequest::new(
        case["method"].as_str().unwrap(),
        case["url"].as_str().unwrap(),
    )
    .with_tls(case["tls"].as_bool().unwrap_or(false));

    if let Some(host) = case["host"].as_str() {
        request.url.host = host.to_string();
    }

    for header in case["headers"].as_array().unwrap() {
        let pair = header.as_array().unwrap();
        request
            .headers
            .set(pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
    }

    if let Some(body) = case["body"].as_str() {
        request = request.with_body(body);
    }
    request
}

fn parse_options(case: &serde_json::Value) -> Vec<CurlOption> {
    case["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|name| {
            let name = name.as_str().unwrap();
            CurlOption::from_name(name).unwrap_or_else(|| panic!("unknown option: {name}"))
        })
        .collect()
}

#[test]
fn convert_test_vectors() {
    let raw = include_str!("../../test-vectors/convert.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut request = build_request(case);
        let options = parse_options(case);

        let command = convert(&mut request, &options).unwrap();
        assert_eq!(command.to_string(), case["expected"].as_str().unwrap(), "{name}");
    }
}

#[test]
fn conversion_is_deterministic() {
    let raw = include_str!("../../test-vectors/convert.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let options = parse_options(case);
        let first = convert(&mut build_request(case), &options).unwrap();
        let second = convert(&mut build_request(case), &options).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn converting_twice_reads_the_rebuffered_body() {
    let mut request = HttpRequest::new("POST", "http://example.com").with_body("payload");
    let first = convert(&mut request, &[]).unwrap();
    let second = convert(&mut request, &[]).unwrap();
    assert_eq!(first.to_string(), "curl -X 'POST' -d 'payload' 'http://example.com'");
    assert_eq!(first, second);
}
