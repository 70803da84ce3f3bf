use crate::apply::Applier;
use crate::apply::KubeApplier;
use crate::brokerconfig;
use crate::config::Args;
use crate::errors::Error;
use crate::errors::Result;
use crate::ingress;
use crate::membership;
use kafkop_api as api;

use futures::StreamExt;
use kube::Api as KubeApi;
use kube::Client as KubeClient;
use kube::ResourceExt;
use kube::api::Patch as KubePatch;
use kube::api::PatchParams as KubePatchParams;
use kube::runtime::WatchStreamExt;
use kube::runtime::controller::Action as KubeAction;
use kube::runtime::controller::Controller as KubeController;
use kube::runtime::reflector as kube_reflector;
use kube::runtime::watcher as kube_watcher;
use kube::runtime::watcher::Config as KubeWatcherConfig;
use serde_json::json;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/*
 * Outcome of a reconciliation pass that reached the end.
 */
#[derive(Debug, Default)]
pub struct PassReport {
    /* brokers to run: declared ones and the ones still reporting status */
    pub broker_ids: Vec<i32>,

    /* effective configuration of every configurable declared broker */
    pub broker_configs: BTreeMap<i32, api::BrokerConfig>,

    /* declared brokers whose configuration could not be resolved */
    pub unconfigurable: Vec<(i32, Error)>,
}

impl PassReport {

    pub fn failed_reason(&self) -> Option<String> {
	if self.unconfigurable.is_empty() {
	    return None;
	}

	let reasons: Vec<String> = self.unconfigurable.iter().map(|(_, err)| err.to_string()).collect();
	Some(reasons.join("; "))
    }
}

/*
 * One reconciliation pass over a KafkaCluster snapshot.
 *
 * Computes the target membership, resolves every declared broker's
 * configuration and converges the external listeners' ingress. A broker
 * whose configuration cannot be resolved is reported, not defaulted, and
 * does not stop the pass. Ingress failures do.
 */
pub async fn reconcile_pass<A: Applier>(cluster: &api::KafkaCluster, applier: &A) -> Result<PassReport> {
    let mut report = PassReport::default();

    report.broker_ids = membership::broker_ids_from_status_and_spec(&cluster.brokers_state(), &cluster.spec.brokers);
    log::debug!("Target brokers of {}: {:?}", cluster.name_any(), report.broker_ids);

    for broker in &cluster.spec.brokers {
	match brokerconfig::get_broker_config(broker, &cluster.spec) {
	    Ok(config) => {
		report.broker_configs.insert(broker.id, config);
	    }
	    Err(err) => {
		log::warn!("Broker {} of {} is not configurable: {}", broker.id, cluster.name_any(), err);
		report.unconfigurable.push((broker.id, err));
	    }
	}
    }

    ingress::synchronize(cluster, applier).await?;

    Ok(report)
}

/*
 * KafkaManager implementation
 */
#[derive(Clone)]
pub struct KafkaManager {
    kube_client: KubeClient,
    kafka_api: KubeApi<api::KafkaCluster>,
    applier: KubeApplier,

    requeue_interval: u64,
    error_requeue_interval: u64,
}

#[derive(Clone)]
pub struct KafkaManagerCtx {
    manager: KafkaManager,
}

async fn reconcile(cluster: Arc<api::KafkaCluster>, ctx: Arc<KafkaManagerCtx>) -> Result<KubeAction> {
    let name = cluster.name_any();
    let namespace = cluster.namespace().ok_or(Error::MissingObjectKey("metadata.namespace"))?;
    log::debug!("Reconciling KafkaCluster {}/{}", namespace, name);

    match reconcile_pass(&cluster, &ctx.manager.applier).await {
	Ok(report) => {
	    let reason = report.failed_reason();
	    let state = match reason {
		Some(_) => api::ClusterState::FAILED,
		None => api::ClusterState::RECONCILED,
	    };
	    ctx.manager.patch_status_state(&name, &namespace, state, reason).await?;

	    log::info!("KafkaCluster {}/{} reconciled, brokers: {:?}", namespace, name, report.broker_ids);
	    Ok(ctx.manager.requeue())
	}
	Err(err) => {
	    if let Err(patch_err) = ctx.manager.patch_status_state(&name, &namespace, api::ClusterState::FAILED, Some(err.to_string())).await {
		log::error!("Unable to update status of KafkaCluster {}/{}: {}", namespace, name, patch_err);
	    }
	    Err(err)
	}
    }
}

fn error_policy(cluster: Arc<api::KafkaCluster>, error: &Error, ctx: Arc<KafkaManagerCtx>) -> KubeAction {
    log::warn!("Reconciliation of KafkaCluster {} failed: {}", cluster.name_any(), error);
    KubeAction::requeue(Duration::from_secs(ctx.manager.error_requeue_interval))
}

impl KafkaManager {

    pub fn watcher(&self) -> impl Future<Output = ()> {
	let (_reader, writer) = kube_reflector::store();

	let watcher = kube_watcher(self.kafka_api.clone(), KubeWatcherConfig::default());
	kube_reflector::reflector(writer, watcher)
	    .default_backoff()
	    .applied_objects()
	    .for_each(|obj| {
		if let Ok(cluster) = obj {
		    log::debug!("Received an update for KafkaCluster {}/{}",
				cluster.namespace().unwrap_or_default(), cluster.name_any());
		}

		futures::future::ready(())
	    })
    }

    pub fn controller(&self) -> impl Future<Output = ()> {
	let ctx = Arc::new(KafkaManagerCtx{
	    manager: self.clone()
	});

	KubeController::new(self.kafka_api.clone(), KubeWatcherConfig::default())
	    .run(reconcile, error_policy, ctx)
	    .for_each(|reconcile| async move {
		log::debug!("Reconciled finished");

		if let Err(err) = reconcile {
		    log::error!("Failed to reconcile with error {:?}", err);
		}
	    })
    }

    /*
     * Updates the state and failed reason of a KafkaCluster's status, leaving
     * the broker states alone.
     */
    pub async fn patch_status_state(&self, name: &str, namespace: &str, state: api::ClusterState, failed_reason: Option<String>) -> Result<()> {
	let clusters: KubeApi<api::KafkaCluster> = KubeApi::namespaced(self.kube_client.clone(), namespace);
	let patch = json!({
	    "status": {
		"state": state.to_string(),
		"failedReason": failed_reason,
	    }
	});

	clusters.patch_status(name, &KubePatchParams::default(), &KubePatch::Merge(&patch)).await?;
	Ok(())
    }

    pub fn requeue(&self) -> KubeAction {
	KubeAction::requeue(Duration::from_secs(self.requeue_interval))
    }

    pub fn new(kube_client: KubeClient, args: &Args) -> Self {
	let kafka_api = match &args.namespace {
	    Some(namespace) => KubeApi::namespaced(kube_client.clone(), namespace),
	    None => KubeApi::all(kube_client.clone()),
	};

	Self{
	    kube_client: kube_client.clone(),
	    kafka_api: kafka_api,
	    applier: KubeApplier::new(kube_client.clone(), &args.field_manager),

	    requeue_interval: args.requeue_interval,
	    error_requeue_interval: args.error_requeue_interval,
	}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingress::tests::RecordingApplier;
    use crate::ingress::tests::cluster;

    fn load_balanced() -> Option<Vec<api::ExternalListenerConfig>> {
	Some(vec![api::ExternalListenerConfig::new("external", api::AccessMethod::LoadBalancer)])
    }

    #[tokio::test]
    async fn pass_resolves_brokers_and_synchronizes_ingress() {
	let applier = RecordingApplier::default();
	let mut cluster = cluster(load_balanced());
	cluster.spec.broker_config_groups.insert("default".to_string(), api::BrokerConfig {
	    image: Some("kafka:3.7".to_string()),
	    ..Default::default()
	});
	cluster.spec.brokers[0].broker_config_group = Some("default".to_string());
	cluster.status = Some(api::KafkaClusterStatus {
	    brokers_state: BTreeMap::from([
		("2".to_string(), api::BrokerState::new(api::ConfigurationState::ConfigInSync)),
	    ]),
	    ..Default::default()
	});

	let report = reconcile_pass(&cluster, &applier).await.unwrap();

	assert_eq!(report.broker_ids, vec![0, 1, 2]);
	assert_eq!(report.broker_configs.len(), 2);
	assert_eq!(report.broker_configs[&0].image.as_deref(), Some("kafka:3.7"));
	assert_eq!(report.broker_configs[&1], api::BrokerConfig::default());
	assert!(report.failed_reason().is_none());
	assert_eq!(applier.calls().len(), 3);
    }

    #[tokio::test]
    async fn unconfigurable_broker_is_reported_without_stopping_the_pass() {
	let applier = RecordingApplier::default();
	let mut cluster = cluster(load_balanced());
	cluster.spec.brokers[1].broker_config_group = Some("missing".to_string());

	let report = reconcile_pass(&cluster, &applier).await.unwrap();

	assert_eq!(report.broker_configs.keys().copied().collect::<Vec<_>>(), vec![0]);
	assert_eq!(report.unconfigurable.len(), 1);
	assert_eq!(report.unconfigurable[0].0, 1);
	assert!(report.failed_reason().unwrap().contains("missing"));
	assert_eq!(applier.calls().len(), 3);
    }

    #[tokio::test]
    async fn ingress_failure_fails_the_pass() {
	let applier = RecordingApplier::failing_on("external-kafka-meshgateway");

	let err = reconcile_pass(&cluster(load_balanced()), &applier).await.unwrap_err();

	assert!(matches!(err, Error::Synchronization { .. }));
	assert_eq!(applier.calls().len(), 1);
    }
}
