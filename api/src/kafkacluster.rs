use crate::brokerconfig::Broker;
use crate::brokerconfig::BrokerConfig;
use crate::listener::IstioIngressConfig;
use crate::listener::ListenersConfig;
use kube_derive::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConfigurationState {
    /*
     * The broker runs with the configuration declared for it
     */
    ConfigInSync,

    /*
     * The declared configuration changed and the broker was not restarted yet
     */
    #[default]
    ConfigOutOfSync,

    /*
     * The broker configuration could not be applied
     */
    ConfigFailed,
}

/*
 * Last observed runtime state of a broker, KafkaClusterStatus.brokersState
 * keys these by the string encoded broker id.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrokerState {

    #[serde(default)]
    pub configuration_state: ConfigurationState,
}

impl BrokerState {

    pub fn new(configuration_state: ConfigurationState) -> Self {
	Self{
	    configuration_state: configuration_state,
	}
    }
}

#[derive(Debug, Copy, Clone)]
pub enum ClusterState {
    /*
     * The last reconciliation pass converged every resource
     */
    RECONCILED,

    /*
     * The last reconciliation pass stopped on an error, see failedReason
     */
    FAILED,
}

impl ToString for ClusterState {
    fn to_string(&self) -> String {
	match self {
	    ClusterState::RECONCILED => String::from("reconciled"),
	    ClusterState::FAILED => String::from("failed"),
	}
    }
}

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(group = "kafka.kafkop.io", version = "v1beta1", kind = "KafkaCluster", namespaced)]
#[kube(status = "KafkaClusterStatus")]
#[serde(rename_all = "camelCase")]
pub struct KafkaClusterSpec {

    #[serde(default)]
    pub brokers: Vec<Broker>,

    /* named, reusable broker configurations referenced by brokers */
    #[serde(default)]
    pub broker_config_groups: BTreeMap<String, BrokerConfig>,

    #[serde(default)]
    pub listeners_config: ListenersConfig,

    /*
     * Cluster wide istio ingress configuration, used by every external listener
     * which does not define its own.
     */
    pub istio_ingress_config: Option<IstioIngressConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaClusterStatus {

    #[serde(default)]
    pub brokers_state: BTreeMap<String, BrokerState>,

    // reconciled or failed
    pub state: Option<String>,

    // when in failed state, the reason of the last failed pass
    pub failed_reason: Option<String>,
}

impl KafkaCluster {

    /*
     * Returns the live broker states, empty when no status was reported yet.
     */
    pub fn brokers_state(&self) -> BTreeMap<String, BrokerState> {
	match &self.status {
	    Some(status) => status.brokers_state.clone(),
	    None => BTreeMap::new(),
	}
    }
}
