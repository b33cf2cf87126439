//! Integration tests for the /init convenience endpoint.

mod common;

use common::TestApp;
use mongodb::bson::doc;

#[tokio::test]
async fn init_seeds_the_sample_product() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/init", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(reqwest::StatusCode::OK, response.status());
    assert_eq!(
        "Sample product initialized",
        response.text().await.expect("Failed to read body")
    );

    let product = app
        .db
        .find_product(1)
        .await
        .unwrap()
        .expect("Sample product not found in DB");

    assert_eq!(product.name, "Laptop");
    assert_eq!(product.price, 999.0);

    app.cleanup().await;
}

#[tokio::test]
async fn init_is_idempotent() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .get(format!("{}/init", app.address))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(reqwest::StatusCode::OK, response.status());
    }

    let count = app
        .db
        .products()
        .count_documents(doc! { "id": 1 }, None)
        .await
        .unwrap();
    assert_eq!(count, 1);

    app.cleanup().await;
}
