use courier_core::config::{Options, SmsOptions, WebhookOptions};
use courier_core::notify::entity::NotificationMessage;
use courier_core::notify::error::NotifyError;
use courier_core::notify::port::{Notifier, SmsClient, WebhookClient};
use courier_notify::builders::{PlainSmsBuilder, SlackMessageBuilder, TeamsMessageBuilder};
use courier_notify::live::LiveClients;
use courier_notify::sms::HttpSmsClient;
use courier_notify::webhook::{HttpWebhookClient, build_http_client};
use courier_notify::{ChannelDispatcher, SmsNotifier};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sms_options(server: &MockServer) -> SmsOptions {
    SmsOptions {
        api_uri: format!("{}/sms/send", server.uri()),
        api_key: "sms-key".to_string(),
    }
}

#[tokio::test]
async fn test_webhook_posts_utf8_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({ "text": "Größe ✓" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpWebhookClient::new().unwrap();
    let response = client
        .post(
            &format!("{}/hook", server.uri()),
            json!({ "text": "Größe ✓" }).to_string(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_webhook_error_status_is_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_team"))
        .mount(&server)
        .await;

    let client = HttpWebhookClient::new().unwrap();
    let response = client
        .post(&format!("{}/hook", server.uri()), "{}".to_string())
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "no_team");
}

#[tokio::test]
async fn test_webhook_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = HttpWebhookClient::from_client(build_http_client(Duration::from_millis(200)).unwrap());
    let err = client
        .post(&format!("{}/hook", server.uri()), "{}".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Timeout(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_webhook_unreachable_endpoint() {
    let client = HttpWebhookClient::new().unwrap();
    let err = client
        .post("http://127.0.0.1:9/hook", "{}".to_string())
        .await
        .unwrap_err();

    assert!(err.is_transmission(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_sms_sends_bearer_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms/send"))
        .and(header("authorization", "Bearer sms-key"))
        .and(body_json(json!({ "to": "+15551234567", "message": "Order shipped" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSmsClient::new(reqwest_client(), &sms_options(&server)).unwrap();
    client.send("+15551234567", "Order shipped").await.unwrap();
}

#[tokio::test]
async fn test_sms_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer wrong"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sms-key"))
        .respond_with(ResponseTemplate::new(500).set_body_string("queue full"))
        .mount(&server)
        .await;

    let bad_key = HttpSmsClient::new(
        reqwest_client(),
        &SmsOptions {
            api_key: "wrong".to_string(),
            ..sms_options(&server)
        },
    )
    .unwrap();
    let err = bad_key.send("+15551234567", "hi").await.unwrap_err();
    assert!(matches!(err, NotifyError::Auth(_)), "unexpected error: {:?}", err);

    let client = HttpSmsClient::new(reqwest_client(), &sms_options(&server)).unwrap();
    let err = client.send("+15551234567", "hi").await.unwrap_err();
    assert!(
        matches!(&err, NotifyError::Platform(m) if m.contains("queue full")),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_dispatcher_over_live_clients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/slack"))
        .and(body_json(json!({ "text": "*Orders*\nOrder shipped" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/teams"))
        .and(body_partial_json(json!({
            "sections": [{ "facts": [{ "name": "order", "value": "42" }] }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sms/send"))
        .and(body_json(json!({ "to": "+15551234567", "message": "Orders: Order shipped" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let options = Options {
        slack: WebhookOptions {
            webhook_uri: format!("{}/slack", server.uri()),
        },
        teams: WebhookOptions {
            webhook_uri: format!("{}/teams", server.uri()),
        },
        sms: sms_options(&server),
        ..Default::default()
    };
    let dispatcher = ChannelDispatcher::builder()
        .slack(Arc::new(SlackMessageBuilder))
        .teams(Arc::new(TeamsMessageBuilder))
        .sms(Arc::new(PlainSmsBuilder))
        .options(Arc::new(options))
        .clients(Arc::new(LiveClients::with_http_client(reqwest_client())))
        .build()
        .unwrap();

    let message = NotificationMessage::new("Order shipped")
        .with_subject("Orders")
        .with_mobile_number("+15551234567")
        .with_metadata("order", "42");
    dispatcher.notify(&message).await.unwrap();
}

#[tokio::test]
async fn test_sms_notifier_surfaces_gateway_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let options = Options {
        sms: sms_options(&server),
        ..Default::default()
    };
    let notifier = SmsNotifier::new(
        Some(Arc::new(PlainSmsBuilder)),
        Some(Arc::new(options)),
        Arc::new(LiveClients::new().unwrap()),
    )
    .unwrap();

    let err = notifier
        .notify(&NotificationMessage::new("Order shipped").with_mobile_number("+15551234567"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Platform(_)), "unexpected error: {:?}", err);
}

fn reqwest_client() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}
