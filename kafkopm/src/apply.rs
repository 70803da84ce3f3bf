use crate::errors::Error;
use crate::errors::Result;
use kafkop_api as api;

use kube::Api as KubeApi;
use kube::Client as KubeClient;
use kube::Resource;
use kube::ResourceExt;
use kube::api::ApiResource;
use kube::api::DynamicObject;
use kube::api::GroupVersionKind;
use kube::api::Patch as KubePatch;
use kube::api::PatchParams as KubePatchParams;
use std::future::Future;

/*
 * A desired child resource of a KafkaCluster, ready to be applied.
 */
#[derive(Clone, Debug)]
pub struct Desired {
    pub resource: ApiResource,
    pub object: DynamicObject,
}

impl Desired {

    pub fn new(group: &str, version: &str, kind: &str, name: &str, namespace: &str) -> Self {
	let resource = ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, kind));
	let object = DynamicObject::new(name, &resource).within(namespace);

	Self{
	    resource: resource,
	    object: object,
	}
    }

    pub fn kind(&self) -> &str {
	self.resource.kind.as_str()
    }

    pub fn name(&self) -> String {
	self.object.name_any()
    }

    /*
     * Records `owner` as the controller of the object, which requires the
     * owner to have been persisted (it needs a uid).
     */
    pub fn owned_by(mut self, owner: &api::KafkaCluster) -> Result<Self> {
	let owner_ref = owner.controller_owner_ref(&()).ok_or(Error::MissingObjectKey("metadata.uid"))?;

	self.object.metadata.owner_references = Some(vec![owner_ref]);
	Ok(self)
    }
}

/*
 * Idempotent create-or-update of a desired object, recording `owner` as its
 * owner so it gets garbage collected together with the KafkaCluster.
 */
pub trait Applier {
    fn apply(&self, desired: Desired, owner: &api::KafkaCluster) -> impl Future<Output = Result<()>> + Send;
}

/*
 * Applier backed by kubernetes server side apply.
 */
#[derive(Clone)]
pub struct KubeApplier {
    kube_client: KubeClient,
    field_manager: String,
}

impl KubeApplier {

    pub fn new(kube_client: KubeClient, field_manager: &str) -> Self {
	Self{
	    kube_client: kube_client,
	    field_manager: field_manager.to_string(),
	}
    }
}

impl Applier for KubeApplier {

    async fn apply(&self, desired: Desired, owner: &api::KafkaCluster) -> Result<()> {
	let desired = desired.owned_by(owner)?;
	let namespace = desired.object.namespace().ok_or(Error::MissingObjectKey("metadata.namespace"))?;
	let name = desired.name();

	let api: KubeApi<DynamicObject> = KubeApi::namespaced_with(self.kube_client.clone(), &namespace, &desired.resource);
	let params = KubePatchParams::apply(&self.field_manager).force();
	api.patch(&name, &params, &KubePatch::Apply(&desired.object)).await?;

	log::debug!("Applied {} {}/{}", desired.resource.kind, namespace, name);
	Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desired_carries_type_and_location() {
	let desired = Desired::new("networking.istio.io", "v1alpha3", "Gateway", "kafka-external-gateway", "kafka");

	assert_eq!(desired.kind(), "Gateway");
	assert_eq!(desired.name(), "kafka-external-gateway");
	assert_eq!(desired.resource.api_version, "networking.istio.io/v1alpha3");
	assert_eq!(desired.resource.plural, "gateways");
	assert_eq!(desired.object.namespace().as_deref(), Some("kafka"));

	let types = desired.object.types.clone().unwrap();
	assert_eq!(types.kind, "Gateway");
	assert_eq!(types.api_version, "networking.istio.io/v1alpha3");
    }

    fn owner(uid: Option<&str>) -> api::KafkaCluster {
	let mut cluster = api::KafkaCluster::new("kafka", api::KafkaClusterSpec::default());
	cluster.metadata.namespace = Some("kafka".to_string());
	cluster.metadata.uid = uid.map(String::from);
	cluster
    }

    #[test]
    fn owned_by_sets_the_cluster_as_controller() {
	let desired = Desired::new("networking.istio.io", "v1alpha3", "Gateway", "kafka-external-gateway", "kafka")
	    .owned_by(&owner(Some("8d1f6a2c-0000-0000-0000-000000000002")))
	    .unwrap();

	let refs = desired.object.metadata.owner_references.unwrap();
	assert_eq!(refs.len(), 1);
	assert_eq!(refs[0].kind, "KafkaCluster");
	assert_eq!(refs[0].api_version, "kafka.kafkop.io/v1beta1");
	assert_eq!(refs[0].name, "kafka");
	assert_eq!(refs[0].uid, "8d1f6a2c-0000-0000-0000-000000000002");
	assert_eq!(refs[0].controller, Some(true));
    }

    #[test]
    fn owned_by_requires_a_persisted_owner() {
	let desired = Desired::new("networking.istio.io", "v1alpha3", "Gateway", "kafka-external-gateway", "kafka");

	let err = desired.owned_by(&owner(None)).unwrap_err();

	assert!(matches!(err, Error::MissingObjectKey("metadata.uid")));
    }
}
