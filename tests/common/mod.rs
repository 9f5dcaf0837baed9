use std::sync::Arc;
use std::time::Duration;

use havencart::{
    config::ServerConfig, create_app, observability::Metrics, AppServices,
};
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;

pub const TEST_CDN_URL: &str = "https://cdn.test.example";

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
}

impl TestEnvironment {
    /// Serve the real router over the memory backend on an ephemeral port
    pub async fn new() -> Self {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_seconds: 5,
            max_request_size: 64 * 1024,
        };
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let app = create_app(
            AppServices::in_memory(TEST_CDN_URL.to_string()),
            metrics,
            &server,
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn seed_test_data(&self) {
        let response = self
            .client
            .post(self.url("/api/admin/seed"))
            .send()
            .await
            .expect("Failed to seed test data");

        assert_eq!(response.status().as_u16(), 200);
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// Id of the first entry of a listing
    pub async fn first_id(&self, path: &str) -> String {
        let (_, body) = self.get_json(path).await;
        body["items"][0]["id"]
            .as_str()
            .expect("Listing is empty")
            .to_string()
    }
}
