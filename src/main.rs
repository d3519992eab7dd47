use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil::api::{self, AppState};
use vigil::config::Config;
use vigil::engine::{Engine, Fanout, LogSink, NotificationSink, TransitionSink, WebhookSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Vigil engine on {}:{}", config.host, config.port);

    // Wire outbound sinks: always log, webhook when configured
    let mut sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(LogSink)];
    if let Some(ref url) = config.notify_webhook_url {
        info!("Notification webhook enabled");
        sinks.push(Arc::new(WebhookSink::new(url.clone())));
    }
    let sink: Arc<dyn NotificationSink> = Arc::new(Fanout::new(sinks));

    let persist: Arc<dyn TransitionSink> = match config.signal_store_url {
        Some(ref url) => {
            info!("Signal store persistence enabled");
            Arc::new(WebhookSink::new(url.clone()))
        }
        None => Arc::new(LogSink),
    };

    // Build and start the engine
    let engine = Engine::new(&config, sink, persist).await;
    engine.start().await;

    // CORS for the external UI layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        config: config.clone(),
        engine: engine.clone(),
    };

    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.stop().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
