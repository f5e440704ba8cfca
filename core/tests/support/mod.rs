//! Shared helpers for the integration tests: background HTTP servers bound
//! to random local ports.

#![allow(dead_code)]

use std::sync::Arc;

use awx_core::Client;
use mock_server::{Db, Store};
use tokio::sync::RwLock;

/// Serve `router` on 127.0.0.1 from a dedicated thread and return its base
/// URL. The server lives until the test process exits.
pub fn serve(router: axum::Router) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, router).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Start the AWX mock with a fresh store. The returned handle lets a test
/// seed or inspect server state.
pub fn spawn_mock() -> (String, Db) {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let base = serve(mock_server::app_with_state(db.clone()));
    (base, db)
}

/// Basic-auth client for the mock's default credentials.
pub fn mock_client(base: &str) -> Client {
    Client::new(
        base,
        mock_server::DEFAULT_USERNAME,
        mock_server::DEFAULT_PASSWORD,
    )
    .unwrap()
}

/// Run `f` against the mock store from a synchronous test.
pub fn with_store<T>(db: &Db, f: impl FnOnce(&mut Store) -> T) -> T {
    let mut store = db.blocking_write();
    f(&mut store)
}

/// Build a payload from a `json!` object literal.
pub fn payload(value: serde_json::Value) -> awx_core::Payload {
    value.as_object().cloned().unwrap()
}
