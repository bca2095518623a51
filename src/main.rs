//! GKE operator entry point

use clap::Parser;
use futures::StreamExt;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client, CustomResourceExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gke_operator::controller::{error_policy, reconcile, Context};
use gke_operator::crd::GKEClusterConfig;

/// Operator reconciling GKEClusterConfig resources against Google Kubernetes Engine
#[derive(Parser, Debug)]
#[command(name = "gke-operator", version, about, long_about = None)]
struct Cli {
    /// Generate the CRD manifest and exit
    #[arg(long)]
    crd: bool,

    /// Secret field holding the service-account JSON; the observed synonym
    /// field is always accepted as a fallback
    #[arg(long, env = "GKE_CREDENTIAL_KEY")]
    credential_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "gke_operator=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.crd {
        let crd = serde_yaml::to_string(&GKEClusterConfig::crd())
            .map_err(|e| anyhow::anyhow!("failed to serialize CRD: {e}"))?;
        println!("{crd}");
        return Ok(());
    }

    info!("starting gke operator");

    let client = Client::try_default().await?;
    let configs: Api<GKEClusterConfig> = Api::all(client.clone());
    let ctx = Arc::new(Context::new(client).with_credential_key(cli.credential_key));

    Controller::new(configs, WatcherConfig::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok((obj, _)) => debug!(config = %obj.name, "reconciled"),
                Err(e) => warn!(error = %e, "reconcile error"),
            }
        })
        .await;

    info!("controller stopped");
    Ok(())
}
