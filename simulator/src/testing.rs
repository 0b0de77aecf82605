use ccloud_sdk::{Client, Config};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The account email accepted by simulators started with [with_server].
pub const EMAIL: &str = "dev@example.com";

/// A test helper to run a server and a test function against it.
///
/// It picks an unused port, generates a random password, and starts the
/// server in the background. It then runs the provided test function with a
/// `Client` configured for the simulator (not yet logged in). When the test
/// function completes, the server is aborted.
///
/// # Panics
///
/// This function will panic if it fails to find an unused port or build the client.
pub async fn with_server<F, Fut>(test_fn: F)
where
    F: FnOnce(Client) -> Fut,
    Fut: Future<Output = ()>,
{
    let port = portpicker::pick_unused_port().expect("failed to find unused port");
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let server_task: JoinHandle<Result<(), crate::server::Error>> = tokio::spawn({
        let password = password.clone();
        async move { crate::server::run(&port, EMAIL.to_string(), password, None).await }
    });

    // Give the server a moment to start up
    tokio::time::sleep(Duration::from_millis(100)).await;

    let config = Config::new(EMAIL, password).base_url(format!("http://127.0.0.1:{port}/api/"));
    let client = Client::with_config(config).expect("failed to build client");
    test_fn(client).await;

    server_task.abort();
}

/// Like [with_server], but hands the test function a logged in `Client`.
pub async fn with_session<F, Fut>(test_fn: F)
where
    F: FnOnce(Client) -> Fut,
    Fut: Future<Output = ()>,
{
    with_server(|client| async move {
        client.login().await.expect("failed to log in");
        test_fn(client).await;
    })
    .await;
}
