use kafkop_api as api;
use kafkopm::Error;
use kafkopm::config::Args;
use kafkopm::manager::KafkaManager;

use clap::Parser;
use kube::Client as KubeClient;
use kube::CustomResourceExt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let args = Args::parse();
    if args.print_crd {
	let crd = serde_json::to_string_pretty(&api::KafkaCluster::crd())
	    .map_err(|err| Error::Other(err.to_string()))?;
	println!("{}", crd);
	return Ok(());
    }

    let kube_client = KubeClient::try_default().await?;

    log::info!("starting kafkopm, watching namespace: {}", args.namespace.as_deref().unwrap_or("<all>"));
    let mgr = KafkaManager::new(kube_client, &args);
    tokio::select! {
	_ = mgr.watcher() => {},
	_ = mgr.controller() => {},

	// handle CTRL^C as gracefully as we can.
	_ = tokio::signal::ctrl_c() => {},
    }
    Ok(())
}
