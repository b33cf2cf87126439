mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::spawn().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(reqwest::StatusCode::OK, response.status());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "product-service");

    app.cleanup().await;
}
