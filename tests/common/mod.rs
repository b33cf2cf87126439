use product_service::config::ProductConfig;
use product_service::services::MongoDb;
use product_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");

        let db_name = format!("product_test_{}", Uuid::new_v4());

        let mut config = ProductConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_name,
        }
    }

    /// Drop this test's database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
