use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use megablog::{
    application::{error::AppError, post_form::PostFormService},
    config,
    infra::{
        appwrite::AppwriteClient,
        error::InfraError,
        http::{self, AdminState},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let appwrite = Arc::new(AppwriteClient::new(&settings.appwrite)?);
    let posts = Arc::new(PostFormService::new(appwrite.clone(), appwrite));

    let state = AdminState {
        posts,
        user_header: settings.auth.user_header.clone(),
        public_url: settings.site.public_url.clone(),
    };
    let upload_limit = usize::try_from(settings.uploads.max_request_bytes.get())
        .map_err(|_| AppError::validation("uploads.max_request_bytes exceeds usize"))?;
    let router = http::build_admin_router(state, upload_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| InfraError::bind(settings.server.addr, err))?;
    info!(
        addr = %settings.server.addr,
        appwrite = %settings.appwrite.endpoint,
        "megablog listening"
    );

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move { shutdown.notified().await }
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(InfraError::Serve)?;
        }
        () = drain_after_signal(shutdown, settings.server.graceful_shutdown) => {
            warn!(
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!("megablog stopped");
    Ok(())
}

/// Wait for ctrl-c, ask the server to drain, then give it `grace` to finish.
async fn drain_after_signal(shutdown: Arc<Notify>, grace: Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received; draining connections");
    shutdown.notify_one();
    tokio::time::sleep(grace).await;
}
