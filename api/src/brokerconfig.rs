use k8s_openapi::api::core::v1::Affinity;
use k8s_openapi::api::core::v1::PersistentVolumeClaimSpec;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::api::core::v1::Toleration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/*
 * A persistent volume mounted into the broker, identified by its mount path.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {

    pub mount_path: String,

    pub pvc_spec: Option<PersistentVolumeClaimSpec>,
}

impl StorageConfig {

    pub fn new(mount_path: &str, pvc_spec: Option<PersistentVolumeClaimSpec>) -> Self {
	Self{
	    mount_path: mount_path.to_string(),
	    pvc_spec: pvc_spec,
	}
    }
}

/*
 * Runtime configuration of a broker. Used both as a named group of defaults
 * (KafkaClusterSpec.brokerConfigGroups) and as a per broker override, every
 * field is therefore optional.
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrokerConfig {

    pub image: Option<String>,

    /* read-only broker configuration in java properties format */
    pub config: Option<String>,

    pub kafka_heap_opts: Option<String>,

    pub kafka_jvm_perf_opts: Option<String>,

    pub service_account_name: Option<String>,

    pub priority_class_name: Option<String>,

    pub resource_requirements: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storage_configs: Vec<StorageConfig>,

    pub affinity: Option<Affinity>,

    pub tolerations: Option<Vec<Toleration>>,

    pub node_selector: Option<BTreeMap<String, String>>,

    pub broker_annotations: Option<BTreeMap<String, String>>,

    pub broker_labels: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Broker {

    pub id: i32,

    /* name of an entry of KafkaClusterSpec.brokerConfigGroups */
    pub broker_config_group: Option<String>,

    pub broker_config: Option<BrokerConfig>,
}

impl Broker {

    pub fn new(id: i32) -> Self {
	Self{
	    id: id,
	    broker_config_group: None,
	    broker_config: None,
	}
    }
}
