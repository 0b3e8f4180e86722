//! Server harness and shared world for the blog API behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs over an in-memory
//! store. The `WorldFixture` stops the server even if a test panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use argon2::Params;
use bloglist::Trace;
use bloglist::domain::{CredentialService, TokenConfig};
use bloglist::inbound::http::api_scope;
use bloglist::inbound::http::error::unknown_endpoint;
use bloglist::inbound::http::state::HttpState;
use bloglist::outbound::{Argon2PasswordHasher, InMemoryStore};
use mockable::DefaultClock;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use zeroize::Zeroizing;

pub(crate) struct BlogWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) tokens: HashMap<String, String>,
    pub(crate) created_blog_id: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<BlogWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let credentials = Arc::new(CredentialService::new(
        TokenConfig::new(Zeroizing::new(vec![b'b'; 32]), None),
        Arc::new(DefaultClock),
    ));
    let params = Params::new(8, 1, 1, None).expect("argon2 params");
    HttpState::from_stores(
        store.clone(),
        store.clone(),
        store,
        Arc::new(Argon2PasswordHasher::with_params(params)),
        credentials,
    )
}

async fn spawn_blog_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .wrap(Trace)
            .service(api_scope())
            .default_service(web::to(unknown_endpoint))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_blog_server(memory_state()).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(BlogWorld {
        runtime,
        local,
        base_url,
        server,
        tokens: HashMap::new(),
        created_blog_id: None,
        last_status: None,
        last_body: None,
        last_trace_id: None,
    }));

    WorldFixture { world }
}
