/*
 * Istio based ingress of the load balanced external listeners.
 *
 * Every load balanced listener gets an ordered set of resources, built by the
 * functions in BUILDERS and applied one after the other. Adding a resource
 * kind is a matter of appending its builder.
 */
pub mod gateway;
pub mod meshgateway;
pub mod virtualservice;

use crate::apply::Applier;
use crate::apply::Desired;
use crate::errors::Error;
use crate::errors::Result;
use crate::labels;
use crate::membership;
use kafkop_api as api;

use kube::ResourceExt;
use std::collections::BTreeMap;

pub type Builder = fn(&ListenerContext<'_>) -> Desired;

/* applied in this order, later resources refer to earlier ones */
pub const BUILDERS: [Builder; 3] = [
    meshgateway::build,
    gateway::build,
    virtualservice::build,
];

/*
 * Everything a builder needs to render the resources of one listener.
 */
#[derive(Clone, Debug)]
pub struct ListenerContext<'a> {
    pub cluster_name: &'a str,
    pub namespace: &'a str,
    pub listener: &'a api::ExternalListenerConfig,
    pub ingress: &'a api::IstioIngressConfig,

    /* one port per target broker, then the any-cast port */
    pub ports: Vec<IngressPort>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IngressPort {
    pub name: String,
    pub port: i32,

    /* None for the any-cast port which reaches every broker */
    pub broker_id: Option<i32>,
}

impl<'a> ListenerContext<'a> {

    /*
     * Brokers being decommissioned are part of `broker_ids`, so they stay
     * reachable until they are gone from the status too.
     */
    pub fn new(cluster_name: &'a str, namespace: &'a str, listener: &'a api::ExternalListenerConfig,
	       ingress: &'a api::IstioIngressConfig, broker_ids: &[i32]) -> Result<Self> {
	Ok(Self{
	    cluster_name: cluster_name,
	    namespace: namespace,
	    listener: listener,
	    ingress: ingress,
	    ports: listener_ports(listener, broker_ids)?,
	})
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
	labels::labels_for_istio_ingress(self.cluster_name, &self.listener.name)
    }

    pub fn meshgateway_name(&self) -> String {
	format!("{}-{}-meshgateway", self.listener.name, self.cluster_name)
    }

    pub fn gateway_name(&self) -> String {
	format!("{}-{}-gateway", self.cluster_name, self.listener.name)
    }

    pub fn virtualservice_name(&self) -> String {
	format!("{}-{}-virtualservice", self.cluster_name, self.listener.name)
    }
}

fn valid_port(listener: &api::ExternalListenerConfig, name: &str, port: Option<i32>) -> Result<i32> {
    match port {
	Some(port) if (1..=65535).contains(&port) => Ok(port),
	_ => Err(Error::PortOutOfRange {
	    listener: listener.name.clone(),
	    name: name.to_string(),
	}),
    }
}

/*
 * One port per broker (external starting port + broker id) followed by the
 * any-cast port. Every port must be a valid TCP port.
 */
pub fn listener_ports(listener: &api::ExternalListenerConfig, broker_ids: &[i32]) -> Result<Vec<IngressPort>> {
    let mut ports: Vec<IngressPort> = Vec::with_capacity(broker_ids.len() + 1);

    for id in broker_ids {
	let name = format!("tcp-broker-{}", id);
	let port = valid_port(listener, &name, listener.external_starting_port.checked_add(*id))?;
	ports.push(IngressPort {
	    name: name,
	    port: port,
	    broker_id: Some(*id),
	});
    }

    let name = String::from("tcp-all-broker");
    let port = valid_port(listener, &name, Some(listener.get_any_cast_port()))?;
    ports.push(IngressPort {
	name: name,
	port: port,
	broker_id: None,
    });
    Ok(ports)
}

/*
 * The listener's own istio ingress config, falling back to the cluster wide one.
 */
pub fn ingress_config_for(listener: &api::ExternalListenerConfig, cluster_default: &api::IstioIngressConfig) -> api::IstioIngressConfig {
    match listener.istio_ingress_config() {
	Some(config) => config.clone(),
	None => cluster_default.clone(),
    }
}

/*
 * Drives the istio resources of every load balanced external listener
 * towards their desired state.
 *
 * Listeners are handled in declaration order and each listener's resources
 * in BUILDERS order. The first failing apply aborts the whole pass, resources
 * already applied are left in place: applies are idempotent and the next
 * pass starts over.
 */
pub async fn synchronize<A: Applier>(cluster: &api::KafkaCluster, applier: &A) -> Result<()> {
    let listeners = match &cluster.spec.listeners_config.external_listeners {
	Some(listeners) if !listeners.is_empty() => listeners,
	_ => {
	    log::debug!("No external listeners, nothing to synchronize");
	    return Ok(());
	}
    };

    let cluster_name = cluster.name_any();
    let cluster_default = cluster.spec.istio_ingress_config.clone().unwrap_or_default();
    let broker_ids = membership::broker_ids_from_status_and_spec(&cluster.brokers_state(), &cluster.spec.brokers);

    for listener in listeners {
	if !listener.is_load_balanced() {
	    log::debug!("Skipping external listener '{}', access method is {:?}", listener.name, listener.access_method);
	    continue;
	}

	let namespace = cluster.namespace().ok_or(Error::MissingObjectKey("metadata.namespace"))?;
	let ingress = ingress_config_for(listener, &cluster_default);
	let ctx = ListenerContext::new(&cluster_name, &namespace, listener, &ingress, &broker_ids)?;

	for build in BUILDERS {
	    let desired = build(&ctx);
	    let kind = desired.kind().to_string();
	    let name = desired.name();

	    log::debug!("Applying {} {}/{} for listener '{}'", kind, namespace, name, listener.name);
	    if let Err(err) = applier.apply(desired, cluster).await {
		log::error!("Unable to apply {} {}/{}: {}", kind, namespace, name, err);
		return Err(Error::Synchronization {
		    kind: kind,
		    name: name,
		    source: Box::new(err),
		});
	    }
	}
	log::debug!("External listener '{}' synchronized", listener.name);
    }

    Ok(())
}
