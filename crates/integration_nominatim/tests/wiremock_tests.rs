//! Integration tests for the Nominatim client (wiremock-based)

use domain::value_objects::{Position, Rectangle};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_nominatim::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, QueryOptions,
};

fn config_for_mock(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        email: "ops@example.com".to_string(),
        user_agent: "nominatim-wiremock/1.0".to_string(),
        ..NominatimConfig::for_testing(base_url)
    }
}

const fn sample_search_json() -> &'static str {
    r#"[
        {
            "place_id": 123,
            "lat": "49.1950602",
            "lon": "16.6068371",
            "display_name": "1, Masarykova, Brno-město, Brno, 602 00, Česko",
            "address": {
                "house_number": "1",
                "road": "Masarykova",
                "suburb": "Brno-město",
                "city": "Brno",
                "postcode": "602 00",
                "country": "Česko",
                "country_code": "cz"
            }
        },
        {
            "place_id": 456,
            "lat": "49.19",
            "lon": "16.60",
            "display_name": "Masarykova, Brno"
        }
    ]"#
}

const fn sample_reverse_json() -> &'static str {
    r#"{
        "place_id": 789,
        "lat": "50.0875",
        "lon": "14.4213",
        "display_name": "Staroměstské náměstí, Praha, 110 00, Česko",
        "address": {
            "square": "Staroměstské náměstí",
            "city": "Praha",
            "postcode": "110 00",
            "country": "Česko",
            "country_code": "cz"
        }
    }"#
}

#[tokio::test]
async fn test_search_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Masarykova 1 Brno"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("email", "ops@example.com"))
        .and(query_param_is_missing("lat"))
        .and(header("user-agent", "nominatim-wiremock/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();

    let response = client
        .resolve_position_full("Masarykova 1, 602 00 Brno 2".into(), QueryOptions::new())
        .await
        .unwrap();

    assert_eq!(response.len(), 2);
    let position = response.position().unwrap();
    assert!((position.latitude() - 49.195_060_2).abs() < 1e-9);
    let address = response.address().unwrap();
    assert_eq!(address.street.as_deref(), Some("Masarykova"));
    assert_eq!(address.city.as_deref(), Some("Brno"));
}

#[tokio::test]
async fn test_reverse_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "50.0875"))
        .and(query_param("lon", "14.4213"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_reverse_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();

    let address = client
        .resolve_address(Position::new(50.0875, 14.4213).unwrap(), QueryOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address.street.as_deref(), Some("Staroměstské náměstí"));
    assert_eq!(address.postcode.as_deref(), Some("110 00"));
}

#[tokio::test]
async fn test_search_with_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("viewboxlbrt", "14.2,49.9,14.7,50.2"))
        .and(query_param("bounded", "1"))
        .and(query_param_is_missing("bounds"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let bounds = Rectangle::new(
        Position::new(49.9, 14.7).unwrap(),
        Position::new(50.2, 14.2).unwrap(),
    );

    let position = client
        .resolve_position("Karlova".into(), QueryOptions::new().with_bounds(bounds))
        .await
        .unwrap();
    assert!(position.is_some());
}

#[tokio::test]
async fn test_bias_sent_until_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("viewbox", "50.2,14.2,49.9,14.7"))
        .and(query_param("bounded", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_is_missing("viewbox"))
        .and(query_param_is_missing("bounded"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    client.set_bias(
        Position::new(50.2, 14.2).unwrap(),
        Position::new(49.9, 14.7).unwrap(),
    );

    assert!(
        client
            .resolve_position("Karlova".into(), QueryOptions::new())
            .await
            .is_ok()
    );

    client.clear_bias();
    let err = client
        .resolve_position("Karlova".into(), QueryOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodingError::NoResults));
}

#[tokio::test]
async fn test_basic_auth_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("authorization", "Basic b3NtOnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_search_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        username: "osm".to_string(),
        password: SecretString::from("secret".to_string()),
        ..config_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    assert!(
        client
            .resolve_position("Karlova".into(), QueryOptions::new())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_empty_result_is_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .resolve_position("Nowhere".into(), QueryOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodingError::NoResults));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_not_found_status_with_body_is_invalid_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404).set_body_string(sample_search_json()))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .resolve_position("Karlova".into(), QueryOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodingError::InvalidStatus { status: 404 }));
}

#[tokio::test]
async fn test_server_error_without_body_is_connection_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .resolve_position("Karlova".into(), QueryOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodingError::Connection(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_html_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .resolve_position("Karlova".into(), QueryOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodingError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let client = NominatimGeocodingClient::new(&config_for_mock("http://127.0.0.1:1")).unwrap();

    let err = client
        .resolve_position("Karlova".into(), QueryOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodingError::Connection(_)));
}

#[tokio::test]
async fn test_resolve_both_on_failure_returns_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500).set_body_string(sample_reverse_json()))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let (position, address) = client
        .resolve_both(Position::new(50.0875, 14.4213).unwrap().into(), QueryOptions::new())
        .await;

    assert!(position.is_none());
    assert!(address.is_none());
}
