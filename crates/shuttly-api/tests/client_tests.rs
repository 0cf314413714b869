//! Integration tests for `ApiClient` against a mock backend.
//!
//! Exercises envelope unwrapping, error normalization (JSON `{message}`
//! vs. status-text fallback, 401 as a session error), bearer-token
//! injection, and the two-arm OTP verification response.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shuttly_api::{ApiClient, Error, OtpOutcome, TransportConfig};

fn client_for(server: &MockServer) -> ApiClient {
    let base = server.uri().parse().unwrap();
    ApiClient::new(base, &TransportConfig::default()).unwrap()
}

fn travel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
}

#[tokio::test]
async fn search_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .and(query_param("origin", "Lucknow"))
        .and(query_param("destination", "Kanpur"))
        .and(query_param("date", "2025-06-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "_id": "64a10f2b9d3e4c0012ab34cd",
                "route": { "origin": "Lucknow", "destination": "Kanpur" },
                "departureDateTime": "2025-06-14T08:30:00Z",
                "arrivalDateTime": "2025-06-14T10:15:00Z",
                "farePerSeat": 301.88,
                "availableSeats": 9,
                "numReviews": 4,
                "averageRating": 4.5
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_token(SecretString::from("tok"));
    let schedules = client
        .search_schedules("Lucknow", "Kanpur", travel_date())
        .await
        .unwrap();

    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].id, "64a10f2b9d3e4c0012ab34cd");
    assert_eq!(schedules[0].fare_per_seat, Some(301.88));
}

#[tokio::test]
async fn empty_result_list_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let schedules = client
        .search_schedules("Lucknow", "Kanpur", travel_date())
        .await
        .unwrap();
    assert!(schedules.is_empty());
}

#[tokio::test]
async fn success_false_surfaces_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "bookings are unavailable right now"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.my_bookings().await.unwrap_err();
    match err {
        Error::Api { message } => assert_eq!(message, "bookings are unavailable right now"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_json_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/my"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database is down" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.my_bookings().await.unwrap_err();
    assert_eq!(err.to_string(), "database is down");
}

#[tokio::test]
async fn non_2xx_without_json_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/my"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.my_bookings().await.unwrap_err();
    assert_eq!(err.to_string(), "Service Unavailable");
}

#[tokio::test]
async fn unauthorized_is_a_session_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_token(SecretString::from("stale"));
    let err = client.current_user().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("jwt expired"));
}

#[tokio::test]
async fn bearer_token_is_sent_on_protected_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer sesame"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "64a10f2b9d3e4c0012ab34ce",
                "name": "Asha",
                "email": "asha@example.com",
                "phone": "9876543210",
                "role": "user"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_token(SecretString::from("sesame"));
    let user = client.current_user().await.unwrap();
    assert_eq!(user.name, "Asha");
}

#[tokio::test]
async fn verify_otp_logged_in_arm() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "loggedIn": true,
            "token": "fresh-token",
            "user": {
                "_id": "64a10f2b9d3e4c0012ab34ce",
                "name": "Asha",
                "phone": "9876543210",
                "role": "user"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.verify_otp("9876543210", "123456").await.unwrap() {
        OtpOutcome::LoggedIn { user, .. } => assert_eq!(user.phone.as_deref(), Some("9876543210")),
        OtpOutcome::NeedsDetails { .. } => panic!("expected logged-in arm"),
    }
}

#[tokio::test]
async fn verify_otp_needs_details_arm() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "needsDetails": true,
            "registrationToken": "reg-abc",
            "phone": "9876543210"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.verify_otp("9876543210", "123456").await.unwrap() {
        OtpOutcome::NeedsDetails {
            registration_token,
            phone,
        } => {
            assert_eq!(registration_token, "reg-abc");
            assert_eq!(phone, "9876543210");
        }
        OtpOutcome::LoggedIn { .. } => panic!("expected needs-details arm"),
    }
}

#[tokio::test]
async fn payment_order_parses_flat_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "order": { "id": "order_9", "amount": 126_000, "currency": "INR" },
            "razorpayKeyId": "rzp_test_key"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_token(SecretString::from("tok"));
    let order = client
        .create_payment_order("64a10f2b9d3e4c0012ab34cf")
        .await
        .unwrap();
    assert_eq!(order.order.id, "order_9");
    assert_eq!(order.order.amount, 126_000);
    assert_eq!(order.gateway_key_id, "rzp_test_key");
}
