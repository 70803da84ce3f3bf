use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::api::core::v1::Toleration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ANY_CAST_PORT: i32 = 29092;

/*
 * How an external listener is reached from outside of the k8s cluster.
 * An unset access method means LoadBalancer.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AccessMethod {
    #[default]
    LoadBalancer,
    NodePort,
    ClusterIP,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IstioIngressTls {

    /* istio gateway tls mode, e.g: PASSTHROUGH */
    pub mode: String,

    pub credential_name: Option<String>,
}

/*
 * Parameters of the istio resources generated for a load balanced external listener
 */
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IstioIngressConfig {

    pub replicas: Option<i32>,

    pub resources: Option<ResourceRequirements>,

    pub node_selector: Option<BTreeMap<String, String>>,

    pub tolerations: Option<Vec<Toleration>>,

    /* annotations of the mesh gateway's pods and service */
    pub annotations: Option<BTreeMap<String, String>>,

    pub virtual_service_annotations: Option<BTreeMap<String, String>>,

    pub tls: Option<IstioIngressTls>,
}

impl IstioIngressConfig {

    pub fn get_replicas(&self) -> i32 {
	self.replicas.unwrap_or(1)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalListenerOverrides {

    pub istio_ingress_config: Option<IstioIngressConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalListenerConfig {

    pub name: String,

    pub container_port: i32,

    /* broker N is exposed on external_starting_port + N */
    pub external_starting_port: i32,

    /* port exposing every broker behind a single endpoint */
    pub any_cast_port: Option<i32>,

    #[serde(default)]
    pub access_method: AccessMethod,

    pub config: Option<ExternalListenerOverrides>,
}

impl ExternalListenerConfig {

    pub fn new(name: &str, access_method: AccessMethod) -> Self {
	Self{
	    name: name.to_string(),
	    container_port: 9094,
	    external_starting_port: 19090,
	    any_cast_port: None,
	    access_method: access_method,
	    config: None,
	}
    }

    pub fn get_any_cast_port(&self) -> i32 {
	self.any_cast_port.unwrap_or(DEFAULT_ANY_CAST_PORT)
    }

    pub fn is_load_balanced(&self) -> bool {
	self.access_method == AccessMethod::LoadBalancer
    }

    /*
     * The listener scoped istio ingress override, if any.
     */
    pub fn istio_ingress_config(&self) -> Option<&IstioIngressConfig> {
	self.config.as_ref().and_then(|cfg| cfg.istio_ingress_config.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListenersConfig {

    pub external_listeners: Option<Vec<ExternalListenerConfig>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_method_defaults_to_load_balancer() {
	let listener: ExternalListenerConfig = serde_json::from_value(serde_json::json!({
	    "name": "external",
	    "containerPort": 9094,
	    "externalStartingPort": 19090,
	})).unwrap();

	assert_eq!(listener.access_method, AccessMethod::LoadBalancer);
	assert!(listener.is_load_balanced());
	assert_eq!(listener.get_any_cast_port(), DEFAULT_ANY_CAST_PORT);
    }

    #[test]
    fn node_port_listener_is_not_load_balanced() {
	let listener: ExternalListenerConfig = serde_json::from_value(serde_json::json!({
	    "name": "external",
	    "containerPort": 9094,
	    "externalStartingPort": 19090,
	    "accessMethod": "NodePort",
	})).unwrap();

	assert!(!listener.is_load_balanced());
    }
}
