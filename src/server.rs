//! HTTP server exposing the store under `/store/{key}`
//!
//! Requests are decoded here and passed to [`crate::handler::handle`]; the
//! tagged result is encoded back into a plain-text response.

use crate::{
    error::Result,
    handler::{self, Body, Operation, Request},
    store::MemoryStore,
};
use actix_web::{
    dev::{Server, ServerHandle},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use futures::StreamExt;
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::Path};
use tracing::info;

/// Server configuration, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Worker threads; 0 keeps the actix default of one per core
    pub workers: usize,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            workers: 0,
            max_connections: 25_000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Register the `/store/{key}` resource for every method
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/store/{key:.*}").to(store_resource));
}

async fn store_resource(
    req: HttpRequest,
    mut payload: web::Payload,
    store: web::Data<MemoryStore>,
) -> HttpResponse {
    let operation = Operation::from_method(req.method().as_str());
    // actix leaves only %25, %2F and %2B escaped in the matched segment,
    // and those always decode to valid UTF-8
    let raw_key = req.match_info().get("key").unwrap_or_default();
    let key = urlencoding::decode(raw_key)
        .map(|key| key.into_owned())
        .unwrap_or_else(|_| raw_key.to_string());

    let body = if operation == Operation::Put {
        let mut bytes = Vec::new();
        let mut failure = None;
        while let Some(chunk) = payload.next().await {
            match chunk {
                Ok(chunk) => bytes.extend_from_slice(&chunk),
                Err(e) => {
                    failure = Some(e.to_string());
                    break;
                }
            }
        }
        match failure {
            Some(reason) => Body::Unreadable(reason),
            None if bytes.is_empty() => Body::Absent,
            None => Body::Bytes(bytes),
        }
    } else {
        Body::Absent
    };

    let method = req.method().clone();
    let result = handler::handle(store.get_ref(), Request::new(operation, key.clone(), body));
    let (status, body) = match result {
        Ok(outcome) => (outcome.status(), outcome.into_body()),
        Err(rejection) => (rejection.status(), rejection.message().to_string()),
    };
    info!(%method, %key, status = status.as_u16(), "handled request");

    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// HTTP server owning the store for its whole lifetime
pub struct KvServer {
    config: ServerConfig,
    store: web::Data<MemoryStore>,
}

impl KvServer {
    /// Create a server with an empty store
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            store: web::Data::new(MemoryStore::new()),
        }
    }

    /// Shared handle to the store served by this instance
    pub fn store(&self) -> web::Data<MemoryStore> {
        self.store.clone()
    }

    /// Bind the listener and start accepting requests.
    ///
    /// The returned server must be awaited (or spawned) to make progress.
    pub fn start(self) -> Result<RunningServer> {
        let store = self.store.clone();
        let mut server = HttpServer::new(move || {
            App::new().app_data(store.clone()).configure(configure)
        })
        .max_connections(self.config.max_connections);
        if self.config.workers > 0 {
            server = server.workers(self.config.workers);
        }

        let server = server.bind(&self.config.bind_addr)?;
        let local_addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| std::io::Error::other("server bound no address"))?;
        info!("key-value server listening on {}", local_addr);

        Ok(RunningServer {
            server: server.run(),
            local_addr,
        })
    }
}

/// A started server: its bound address and the future driving it
pub struct RunningServer {
    server: Server,
    local_addr: SocketAddr,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle used to trigger graceful shutdown
    pub fn handle(&self) -> ServerHandle {
        self.server.handle()
    }

    /// Run until the server is stopped
    pub async fn run(self) -> Result<()> {
        self.server.await?;
        info!("server stopped");
        Ok(())
    }
}
