//! Follows a running gallery and logs new memories as they arrive.

use std::time::Duration;

use clap::Parser;
use pov_gallery::client::gallery_client::GalleryClient;
use pov_gallery::client::notification::NotificationKind;
use pov_gallery::client::poller::{GalleryPoller, PollEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gallery-watch", about = "Poll the wedding gallery for new uploads")]
struct Args {
    /// Base URL of the gallery service
    #[arg(long, env = "GALLERY_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    /// Seconds between refreshes
    #[arg(long, env = "GALLERY_POLL_SECS", default_value_t = 30)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let client = GalleryClient::new(&args.base_url);
    let poller = GalleryPoller::new(client).with_interval(Duration::from_secs(args.interval_secs.max(1)));

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(poller.run(cancel.clone(), tx));

    tracing::info!(base_url = %args.base_url, every = args.interval_secs, "Watching gallery");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                break;
            }
            event = rx.recv() => match event {
                Some(PollEvent::Updated(uploads)) => {
                    tracing::debug!(total = uploads.len(), "Gallery refreshed");
                }
                Some(PollEvent::Notify(n)) => match n.kind {
                    NotificationKind::Error => tracing::error!("{}", n.message),
                    _ => tracing::info!("{}", n.message),
                },
                None => break,
            }
        }
    }

    if let Err(e) = task.await {
        tracing::error!("Poller task failed: {}", e);
    }
}
