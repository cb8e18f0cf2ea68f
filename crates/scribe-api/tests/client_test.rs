// Integration tests for `DeviceClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribe_api::{ButtonPatch, ButtonsPatch, ConfigPatch, DeviceClient, DevicePatch, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_config() {
    let (server, client) = setup().await;

    let body = json!({
        "device": {
            "owner": "Alice",
            "timezone": "Europe/London",
            "printerTxPin": 21,
            "firmware_version": "0.2.0"
        },
        "wifi": { "ssid": "home", "password": "●●●●●●●●" },
        "buttons": {
            "button1": { "gpio": 5, "shortAction": "/api/joke", "longAction": "" },
            "button2": { "gpio": 6, "shortAction": "/api/riddle", "longAction": "" },
            "button3": { "gpio": 7, "shortAction": "/api/quote", "longAction": "" },
            "button4": { "gpio": 4, "shortAction": "/api/quiz", "longAction": "" }
        },
        "leds": { "enabled": true, "pin": 20, "count": 30 },
        "gpio": {
            "availablePins": [-1, 0, 2, 4, 5, 6, 7, 20, 21],
            "safePins": [-1, 2, 4, 5, 6, 7, 20, 21],
            "pinDescriptions": { "-1": "Not connected", "0": "Avoid: Strapping pin", "2": "Safe" }
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let doc = client.get_config().await.unwrap();

    let device = doc.device.unwrap();
    assert_eq!(device.owner.as_deref(), Some("Alice"));
    assert_eq!(device.printer_tx_pin, Some(21));
    let buttons = doc.buttons.unwrap();
    assert_eq!(buttons.button(4).unwrap().gpio, Some(4));
    assert_eq!(doc.leds.unwrap().enabled, Some(true));
    let gpio = doc.gpio.unwrap();
    assert_eq!(gpio.available_pins.unwrap().len(), 9);
    assert_eq!(gpio.pin_descriptions["0"], "Avoid: Strapping pin");
    assert!(doc.extra.contains_key("wifi"));
}

#[tokio::test]
async fn test_save_config_sends_only_patch() {
    let (server, client) = setup().await;

    let patch = ConfigPatch {
        device: Some(DevicePatch {
            owner: Some("Bob".into()),
            ..DevicePatch::default()
        }),
        buttons: Some(ButtonsPatch {
            button2: Some(ButtonPatch { gpio: 10 }),
            ..ButtonsPatch::default()
        }),
        leds: None,
    };

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({
            "device": { "owner": "Bob" },
            "buttons": { "button2": { "gpio": 10 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Configuration saved successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client.save_config(&patch).await.unwrap();
    assert_eq!(message, "Configuration saved successfully");
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_save_config_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Device owner and timezone cannot be empty"
        })))
        .mount(&server)
        .await;

    let err = client.save_config(&ConfigPatch::default()).await.unwrap_err();
    match err {
        Error::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Device owner and timezone cannot be empty");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_save_config_success_false_is_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": false, "error": "busy" })),
        )
        .mount(&server)
        .await;

    let err = client.save_config(&ConfigPatch::default()).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { status: 200, ref message } if message == "busy"));
}

#[tokio::test]
async fn test_get_config_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Invalid config.json format" })),
        )
        .mount(&server)
        .await;

    let err = client.get_config().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
    assert!(err.to_string().contains("Invalid config.json format"));
}

#[tokio::test]
async fn test_get_config_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.get_config().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>not json</html>"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}
