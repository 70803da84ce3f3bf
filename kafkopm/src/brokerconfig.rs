use crate::errors::Error;
use crate::errors::Result;
use kafkop_api as api;

use k8s_openapi::api::core::v1::Affinity;
use k8s_openapi::api::core::v1::NodeAffinity;
use k8s_openapi::api::core::v1::NodeSelector;
use k8s_openapi::api::core::v1::PodAffinity;
use k8s_openapi::api::core::v1::PodAntiAffinity;
use std::collections::BTreeMap;

/*
 * Computes the effective configuration of a broker: its own override merged
 * with the broker config group it references.
 *
 * Scalars of the override win. List valued settings are the union of both
 * segments: storage configs are keyed by mount path (override wins on
 * collision), scheduling terms and tolerations are deduplicated by structural
 * equality. Override entries always come first.
 *
 * A broker referencing a group missing from the cluster spec is not
 * configurable and yields Error::ConfigNotFound, whatever its override holds.
 */
pub fn get_broker_config(broker: &api::Broker, spec: &api::KafkaClusterSpec) -> Result<api::BrokerConfig> {
    let broker_config = broker.broker_config.clone().unwrap_or_default();

    let group_name = match broker.broker_config_group.as_deref() {
	Some(name) if !name.is_empty() => name,
	_ => return Ok(broker_config),
    };

    let group = match spec.broker_config_groups.get(group_name) {
	Some(group) => group,
	None => {
	    return Err(Error::ConfigNotFound {
		broker_id: broker.id,
		group: group_name.to_string(),
	    });
	}
    };

    log::debug!("Merging broker config group '{}' into broker {}", group_name, broker.id);
    Ok(merge_broker_config(broker_config, group))
}

fn merge_broker_config(over: api::BrokerConfig, group: &api::BrokerConfig) -> api::BrokerConfig {
    api::BrokerConfig {
	image: over.image.or_else(|| group.image.clone()),
	config: over.config.or_else(|| group.config.clone()),
	kafka_heap_opts: over.kafka_heap_opts.or_else(|| group.kafka_heap_opts.clone()),
	kafka_jvm_perf_opts: over.kafka_jvm_perf_opts.or_else(|| group.kafka_jvm_perf_opts.clone()),
	service_account_name: over.service_account_name.or_else(|| group.service_account_name.clone()),
	priority_class_name: over.priority_class_name.or_else(|| group.priority_class_name.clone()),
	resource_requirements: over.resource_requirements.or_else(|| group.resource_requirements.clone()),
	storage_configs: merge_storage_configs(over.storage_configs, &group.storage_configs),
	affinity: merge_with(over.affinity, group.affinity.as_ref(), merge_affinity),
	tolerations: merge_with(over.tolerations, group.tolerations.as_ref(), |o, g| union(o, g)),
	node_selector: merge_with(over.node_selector, group.node_selector.as_ref(), merge_map),
	broker_annotations: merge_with(over.broker_annotations, group.broker_annotations.as_ref(), merge_map),
	broker_labels: merge_with(over.broker_labels, group.broker_labels.as_ref(), merge_map),
    }
}

/*
 * Merges an optional setting present on both sides with `merge`, a setting
 * present on one side only is taken as is.
 */
fn merge_with<T: Clone>(over: Option<T>, group: Option<&T>, merge: impl FnOnce(T, &T) -> T) -> Option<T> {
    match (over, group) {
	(Some(over), Some(group)) => Some(merge(over, group)),
	(None, group) => group.cloned(),
	(over, None) => over,
    }
}

/* override entries first, then the group's entries it does not already hold */
fn union<T: Clone + PartialEq>(over: Vec<T>, group: &[T]) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(over.len() + group.len());

    for term in over.into_iter().chain(group.iter().cloned()) {
	if !merged.contains(&term) {
	    merged.push(term);
	}
    }
    merged
}

fn merge_map(over: BTreeMap<String, String>, group: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut merged = group.clone();
    merged.extend(over);
    merged
}

fn merge_storage_configs(over: Vec<api::StorageConfig>, group: &[api::StorageConfig]) -> Vec<api::StorageConfig> {
    let mut merged: Vec<api::StorageConfig> = Vec::with_capacity(over.len() + group.len());

    for storage in over.into_iter().chain(group.iter().cloned()) {
	if merged.iter().any(|s| s.mount_path == storage.mount_path) {
	    continue;
	}
	merged.push(storage);
    }
    merged
}

/*
 * Every term list of the affinity is merged on its own; preferred terms follow
 * the same rule as the required ones.
 */
fn merge_affinity(over: Affinity, group: &Affinity) -> Affinity {
    Affinity {
	node_affinity: merge_with(over.node_affinity, group.node_affinity.as_ref(), merge_node_affinity),
	pod_affinity: merge_with(over.pod_affinity, group.pod_affinity.as_ref(), merge_pod_affinity),
	pod_anti_affinity: merge_with(over.pod_anti_affinity, group.pod_anti_affinity.as_ref(), merge_pod_anti_affinity),
    }
}

fn merge_node_affinity(over: NodeAffinity, group: &NodeAffinity) -> NodeAffinity {
    NodeAffinity {
	required_during_scheduling_ignored_during_execution: merge_with(
	    over.required_during_scheduling_ignored_during_execution,
	    group.required_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| NodeSelector {
		node_selector_terms: union(o.node_selector_terms, &g.node_selector_terms),
	    },
	),
	preferred_during_scheduling_ignored_during_execution: merge_with(
	    over.preferred_during_scheduling_ignored_during_execution,
	    group.preferred_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| union(o, g),
	),
    }
}

fn merge_pod_affinity(over: PodAffinity, group: &PodAffinity) -> PodAffinity {
    PodAffinity {
	required_during_scheduling_ignored_during_execution: merge_with(
	    over.required_during_scheduling_ignored_during_execution,
	    group.required_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| union(o, g),
	),
	preferred_during_scheduling_ignored_during_execution: merge_with(
	    over.preferred_during_scheduling_ignored_during_execution,
	    group.preferred_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| union(o, g),
	),
    }
}

fn merge_pod_anti_affinity(over: PodAntiAffinity, group: &PodAntiAffinity) -> PodAntiAffinity {
    PodAntiAffinity {
	required_during_scheduling_ignored_during_execution: merge_with(
	    over.required_during_scheduling_ignored_during_execution,
	    group.required_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| union(o, g),
	),
	preferred_during_scheduling_ignored_during_execution: merge_with(
	    over.preferred_during_scheduling_ignored_during_execution,
	    group.preferred_during_scheduling_ignored_during_execution.as_ref(),
	    |o, g| union(o, g),
	),
    }
}
