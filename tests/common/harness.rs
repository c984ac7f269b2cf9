//! In-process HTTP server for end-to-end tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use grader::gateway::{HandlerState, create_router_with_state};
use grader::registry::ModelRegistry;

pub struct TestServer {
    addr: SocketAddr,
    registry: Arc<ModelRegistry>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Binds an ephemeral port and serves the gateway router until dropped.
pub async fn spawn_test_server(registry: ModelRegistry, stub_models: bool) -> TestServer {
    let registry = Arc::new(registry);
    let app = create_router_with_state(HandlerState::new(Arc::clone(&registry), stub_models));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        addr,
        registry,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
