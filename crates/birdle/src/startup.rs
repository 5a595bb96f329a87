use crate::{
    api::routes::{
        filter_form_fragment, filter_page_handler, get_filter_choices, health, submit_filter_form,
        validate_filter,
    },
    config::Settings,
    domain::{BirdStore, RegionFilterValidator},
    infra::{
        db::DBConnection,
        file_utils::create_folder,
    },
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Request},
    http::HeaderValue,
    middleware::{self, AddExtension, Next},
    response::IntoResponse,
    routing::{get, post},
    serve::Serve,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{error, info};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, select};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub struct Application {
    server: Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    cancellation_token: CancellationToken,
    local_addr: SocketAddr,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let bind = config.server.bind;
        let origins = config.server.origins.clone();
        let app_state = build_app(config).await?;
        let listener = TcpListener::bind(bind).await?;
        let local_addr = listener.local_addr()?;
        let server = build_server(listener, app_state, origins);

        Ok(Self {
            server,
            cancellation_token: CancellationToken::new(),
            local_addr,
        })
    }

    /// Address the listener actually bound, useful when the configured port is 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        let token = self.cancellation_token.clone();
        match self
            .server
            .with_graceful_shutdown(shutdown_signal(token))
            .await
        {
            Ok(_) => {
                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub title: String,
    pub birds: Arc<BirdStore>,
}

impl AppState {
    /// Fresh validator for one request
    pub fn validator(&self) -> RegionFilterValidator {
        RegionFilterValidator::new(self.birds.clone())
    }
}

pub async fn build_app(config: Settings) -> Result<AppState, anyhow::Error> {
    if !config.database.in_memory {
        create_folder(&config.database.data_folder);
    }

    let birds_db = DBConnection::connect(&config.database)
        .await
        .map_err(|e| anyhow!("Error setting up birds db: {}", e))?;

    info!("Birds store configured at {}", birds_db.location);

    Ok(AppState {
        title: config.ui.title,
        birds: Arc::new(BirdStore::new(birds_db)),
    })
}

pub fn build_server(
    listener: TcpListener,
    app_state: AppState,
    origins: Vec<String>,
) -> Serve<
    TcpListener,
    IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
    AddExtension<Router, ConnectInfo<SocketAddr>>,
> {
    info!("Setting up service");
    if let Ok(addr) = listener.local_addr() {
        info!("Service running @: http://{}:{}", addr.ip(), addr.port());
    }

    let app = app(app_state, origins);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins));

    let filter_endpoints = Router::new()
        .route("/choices", get(get_filter_choices))
        .route("/validate", post(validate_filter));

    Router::new()
        .route("/", get(filter_page_handler))
        .route("/filter", get(filter_form_fragment).post(submit_filter_form))
        .route("/api/v1/health_check", get(health))
        .nest("/api/v1/filters", filter_endpoints)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

async fn shutdown_signal(token: CancellationToken) {
    let (mut sigint, mut sigterm) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        _ => {
            error!("Failed to install signal handlers, waiting on cancellation only");
            token.cancelled().await;
            return;
        }
    };

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
        _ = token.cancelled() => info!("Shutdown requested"),
    }
}
