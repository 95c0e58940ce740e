use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{body::Bytes, http::StatusCode, routing::get, Router};
use tokio::sync::oneshot;
use url::Url;

/// A small HTTP server that answers requests with fixed responses from memory. The server only
/// listens to `127.0.0.1` and uses a random port, so multiple instances can run at the same time.
///
/// The server runs on its own thread with its own runtime which makes it usable from blocking
/// code. Paths that were not registered return `404 Not Found`.
pub struct StaticServer {
    local_addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_sender: Option<oneshot::Sender<()>>,
}

impl StaticServer {
    /// Starts a server that answers `GET` requests for each path with the given status and body.
    pub fn new<'a>(routes: impl IntoIterator<Item = (&'a str, StatusCode, Vec<u8>)>) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));

        let mut app: Router = Router::new();
        for (path, status, body) in routes {
            let body = Bytes::from(body);
            let requests = requests.clone();
            app = app.route(
                path,
                get(move || {
                    requests.fetch_add(1, Ordering::SeqCst);
                    async move { (status, body) }
                }),
            );
        }
        let fallback_requests = requests.clone();
        let app = app.fallback(move || {
            fallback_requests.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::NOT_FOUND }
        });

        // Bind here so the address is known before the server thread starts.
        let listener = std::net::TcpListener::bind(SocketAddr::new([127, 0, 0, 1].into(), 0))
            .expect("failed to bind the test server");
        listener
            .set_nonblocking(true)
            .expect("failed to configure the test server socket");
        let local_addr = listener
            .local_addr()
            .expect("failed to determine the test server address");

        // Setup a graceful shutdown trigger which is fired when this instance is dropped.
        let (tx, rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to start the test server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("failed to register the test server socket");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        rx.await.ok();
                    })
                    .await
                    .expect("test server failed");
            });
        });

        Self {
            local_addr,
            requests,
            shutdown_sender: Some(tx),
        }
    }

    /// Starts a server that answers every request with `404 Not Found`.
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<(&str, StatusCode, Vec<u8>)>())
    }

    /// Returns the url of `path` on this server.
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.local_addr, path)).expect("invalid test url")
    }

    /// Returns the number of requests the server has received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_sender.take() {
            let _ = tx.send(());
        }
    }
}
