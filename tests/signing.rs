use infogram::{
    ApiRequest, Credentials, DigestEncoding, Method, Signer, SigningPolicy, UrlScope,
    API_KEY_PARAM, API_SIG_PARAM,
};

#[test]
fn signs_get_request_through_facade() {
    let creds = Credentials::new("test-key", "shh");
    let signer = Signer::new(&creds, SigningPolicy::default());

    let mut request = ApiRequest::parse(Method::Get, "https://infogr.am/service/v1/infographics")
        .unwrap()
        .with_query([("label", "new label"), ("id", "1")]);
    signer.sign(&mut request).unwrap();

    assert_eq!(request.query_param(API_KEY_PARAM).as_deref(), Some("test-key"));
    assert_eq!(
        request.query_param(API_SIG_PARAM).as_deref(),
        Some("bmy6IPG7dF8AR0bl2TzTZA6AEj4=")
    );
}

#[test]
fn signing_variants_disagree() {
    let creds = Credentials::new("test-key", "shh");
    let hex_path = Signer::new(
        &creds,
        SigningPolicy::new(DigestEncoding::Hex, UrlScope::PathOnly),
    );
    let base64_full = Signer::new(&creds, SigningPolicy::default());

    let request = || {
        ApiRequest::parse(Method::Get, "https://infogr.am/service/v1/infographics")
            .unwrap()
            .with_query([("id", "1"), ("label", "new label")])
    };

    let mut a = request();
    let mut b = request();
    hex_path.sign(&mut a).unwrap();
    base64_full.sign(&mut b).unwrap();

    assert_eq!(
        a.query_param(API_SIG_PARAM).as_deref(),
        Some("26eddc443c36e4650df133b5ba4ccbe51b8de2ca")
    );
    assert_ne!(a.query_param(API_SIG_PARAM), b.query_param(API_SIG_PARAM));
}
