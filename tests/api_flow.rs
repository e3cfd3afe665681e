//! End-to-end flows against a running mock.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};

use f5_mock::config::MockConfig;
use f5_mock::model::ResourceId;

mod common;
use common::*;

const PROFILES: &str = "/mgmt/tm/ltm/profile/client-ssl";

async fn install(client: &reqwest::Client, server: &TestServer, kind: &str, name: &str, from: &str) -> StatusCode {
    client
        .post(server.url(&format!("/mgmt/tm/sys/crypto/{}", kind)))
        .json(&json!({"command": "install", "name": name, "from-local-file": from}))
        .send()
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_upload_install_create_patch() {
    let server = start_mock(MockConfig::default()).await;
    let client = admin_client();

    let cert = upload(&client, &server, "site.crt", RSA_CERT).await;
    let key = upload(&client, &server, "site.key", RSA_KEY).await;
    assert_eq!(cert, "/var/config/rest/downloads/site.crt");

    assert_eq!(install(&client, &server, "cert", "/Common/site.crt", &cert).await, StatusCode::OK);
    assert_eq!(install(&client, &server, "key", "/Common/site.key", &key).await, StatusCode::OK);
    assert_eq!(install(&client, &server, "cert", "/Common/site.crt", &cert).await, StatusCode::CONFLICT);

    let res = client
        .post(server.url(PROFILES))
        .json(&json!({
            "name": "site",
            "partition": "Common",
            "cert": "/Common/site.crt",
            "key": "/Common/site.key",
            "ciphers": "DEFAULT"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["kind"], "tm:ltm:profile:client-ssl:client-sslstate");

    let res = client
        .patch(server.url(&format!("{}/~Common~site", PROFILES)))
        .json(&json!({"defaultsFrom": "/Common/clientssl"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let profile = server
        .state
        .store
        .get(&ResourceId::new("Common", "site"))
        .unwrap();
    assert_eq!(profile.defaults_from, "/Common/clientssl");
    assert_eq!(profile.ciphers, "DEFAULT");

    let res = client
        .get(server.url("/mgmt/tm/sys/file/ssl-cert/~Common~site.crt"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["cert"].as_str().unwrap().as_bytes(), RSA_CERT);
}

#[tokio::test]
async fn test_version_gates_ecdsa_certificates() {
    let server = start_mock(MockConfig::default()).await;
    let client = admin_client();

    let ecdsa = upload(&client, &server, "ecdsa.crt", ECDSA_CERT).await;
    assert_eq!(install(&client, &server, "cert", "ecdsa.crt", &ecdsa).await, StatusCode::OK);

    let profile = json!({"name": "ec", "partition": "Common", "cert": "ecdsa.crt"});

    let res = client
        .post(server.url(&format!("{}?ver=16.1.0", PROFILES)))
        .json(&profile)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid cert: must have RSA certificate/key pair.");

    let res = client
        .post(server.url(&format!("{}?ver=17.0.0", PROFILES)))
        .json(&profile)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_base_version_from_config() {
    let mut config = MockConfig::default();
    config.api.base_version = Some("15.1".into());
    let server = start_mock(config).await;
    let client = admin_client();

    let ecdsa = upload(&client, &server, "ecdsa.crt", ECDSA_CERT).await;
    install(&client, &server, "cert", "ecdsa.crt", &ecdsa).await;

    let res = client
        .post(server.url(PROFILES))
        .json(&json!({"name": "ec", "partition": "Common", "cert": "ecdsa.crt"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(server.url(&format!("{}?ver=x.y", PROFILES)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_errors_are_json_messages() {
    let server = start_mock(MockConfig::default()).await;
    let client = admin_client();

    let res = client
        .post(server.url(PROFILES))
        .header(CONTENT_TYPE, "text/plain")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "invalid content-type: expected application/json");

    let res = reqwest::get(server.url(PROFILES)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("x-request-id"));
}
