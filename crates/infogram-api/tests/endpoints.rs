use chrono::{TimeZone, Utc};
use infogram_api::{
    ApiError, CancelReason, ClientConfig, Credentials, ExportFormat, HttpTransport, Infogram,
    InfogramClient, Infographic, InfographicExport, RequestContext, Theme, TransportError,
};
use infogram_core::{ParamSet, Signer, SigningPolicy, API_KEY_PARAM, API_SIG_PARAM};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new("test-key", "shh")
}

fn client_for(server: &MockServer) -> InfogramClient {
    InfogramClient::new(
        credentials(),
        ClientConfig::default().with_endpoint(server.uri()),
    )
    .unwrap()
}

fn sample_infographic(id: i64, published: bool) -> Infographic {
    Infographic {
        id,
        title: format!("Number {}", id),
        thumbnail: Some(Url::parse(&format!("https://example.com/{}.png", id)).unwrap()),
        theme_id: 99,
        published,
        modified: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
        url: Some(Url::parse(&format!("https://example.com/{}", id)).unwrap()),
    }
}

fn sample_theme(id: i64) -> Theme {
    Theme {
        id,
        title: format!("Theme {}", id),
        thumbnail: Some(Url::parse(&format!("https://example.com/theme-{}.png", id)).unwrap()),
    }
}

/// The URL the client actually signed. wiremock reports received requests
/// against `localhost` without the port, so rebase them onto the server.
fn signed_url(server: &MockServer, received: &Url) -> Url {
    let mut url = Url::parse(&server.uri()).unwrap();
    url.set_path(received.path());
    url.set_query(received.query());
    url
}

/// Recompute the signature of a received request and compare it with the
/// `api_sig` it carried.
fn assert_validly_signed(server: &MockServer, received: &Url) {
    let url = &signed_url(server, received);
    let params: ParamSet = url
        .query_pairs()
        .filter(|(k, _)| k != API_SIG_PARAM)
        .collect();
    assert_eq!(params.get(API_KEY_PARAM), Some("test-key"));

    let creds = credentials();
    let signer = Signer::new(&creds, SigningPolicy::default());
    let canonical = signer.canonical_string("GET", url, &params);
    let expected = signer.signature(&canonical).unwrap();

    let actual = url
        .query_pairs()
        .find(|(k, _)| k == API_SIG_PARAM)
        .map(|(_, v)| v.into_owned());
    assert_eq!(actual, Some(expected));
}

#[tokio::test]
async fn infographics_are_fetched_and_signed() {
    let server = MockServer::start().await;
    let infographics = vec![sample_infographic(1, false)];

    Mock::given(method("GET"))
        .and(path("/infographics"))
        .and(query_param(API_KEY_PARAM, "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&infographics))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server).infographics().await.unwrap();
    assert_eq!(data, infographics);

    let received = server.received_requests().await.unwrap();
    assert_validly_signed(&server, &received[0].url);
}

#[tokio::test]
async fn single_infographic_is_fetched() {
    let server = MockServer::start().await;
    let infographic = sample_infographic(1, true);

    Mock::given(method("GET"))
        .and(path("/infographics/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&infographic))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server).infographic(1).await.unwrap();
    assert_eq!(data, infographic);
}

#[tokio::test]
async fn user_infographics_are_fetched() {
    let server = MockServer::start().await;
    let infographics = vec![sample_infographic(1, false), sample_infographic(2, true)];

    Mock::given(method("GET"))
        .and(path("/users/12345/infographics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&infographics))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server)
        .user_infographics("12345")
        .await
        .unwrap();
    assert_eq!(data, infographics);
}

#[tokio::test]
async fn themes_are_fetched() {
    let server = MockServer::start().await;
    let themes = vec![sample_theme(1)];

    Mock::given(method("GET"))
        .and(path("/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&themes))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server).themes().await.unwrap();
    assert_eq!(data, themes);

    let received = server.received_requests().await.unwrap();
    assert_validly_signed(&server, &received[0].url);
}

#[tokio::test]
async fn not_found_surfaces_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).infographic(404).await.unwrap_err();

    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn empty_body_decodes_to_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/infographics/7"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let data = client_for(&server).infographic(7).await.unwrap();
    assert_eq!(data, Infographic::default());
}

#[tokio::test]
async fn export_copies_raw_bytes() {
    let server = MockServer::start().await;
    let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    Mock::given(method("GET"))
        .and(path("/infographics/3"))
        .and(query_param("format", "png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let written = sample_infographic(3, true)
        .export(&client, ExportFormat::Png, &mut out)
        .await
        .unwrap();

    assert_eq!(out, png);
    assert_eq!(written, png.len() as u64);
}

#[tokio::test]
async fn transport_timeout_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(Duration::from_millis(100)).unwrap();
    let client = InfogramClient::new(
        credentials(),
        ClientConfig::default()
            .with_transport(transport)
            .with_endpoint(server.uri()),
    )
    .unwrap();

    let err = client.themes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn deadline_reports_cancellation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let ctx = RequestContext::background().with_timeout(Duration::from_millis(50));
    let err = client_for(&server).themes_with(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Cancelled(CancelReason::DeadlineExceeded)
    ));
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = MockServer::start().await;
    let themes = vec![sample_theme(1), sample_theme(2)];

    Mock::given(method("GET"))
        .and(path("/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&themes))
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.themes().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), themes);
    }
}

#[tokio::test]
async fn sdk_filters_results() {
    let server = MockServer::start().await;
    let infographics = vec![sample_infographic(1, false), sample_infographic(2, true)];
    let themes = vec![sample_theme(1), sample_theme(2)];

    Mock::given(method("GET"))
        .and(path("/infographics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&infographics))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/themes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&themes))
        .mount(&server)
        .await;

    let sdk = Infogram::from_client(client_for(&server));

    let published = sdk.published_infographics().await.unwrap();
    assert_eq!(published, vec![sample_infographic(2, true)]);

    assert_eq!(sdk.theme(2).await.unwrap(), Some(sample_theme(2)));
    assert_eq!(sdk.theme(3).await.unwrap(), None);
    assert!(sdk.test_connection().await);
}

#[tokio::test]
async fn sdk_connection_test_reports_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let sdk = Infogram::from_client(client_for(&server));
    assert!(!sdk.test_connection().await);
}
