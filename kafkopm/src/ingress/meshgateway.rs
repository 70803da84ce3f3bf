use crate::apply::Desired;
use crate::ingress::ListenerContext;

use serde_json::json;

pub const GROUP: &str = "servicemesh.cisco.com";
pub const VERSION: &str = "v1alpha1";
pub const KIND: &str = "IstioMeshGateway";

/*
 * The ingress gateway deployment and its LoadBalancer service, exposing
 * every broker port of the listener.
 */
pub fn build(ctx: &ListenerContext<'_>) -> Desired {
    let mut desired = Desired::new(GROUP, VERSION, KIND, &ctx.meshgateway_name(), ctx.namespace);
    let labels = ctx.labels();

    let ports: Vec<serde_json::Value> = ctx.ports.iter()
	.map(|p| json!({
	    "name": p.name,
	    "port": p.port,
	    "targetPort": p.port,
	    "protocol": "TCP",
	}))
	.collect();

    desired.object.metadata.labels = Some(labels.clone());
    desired.object.data = json!({
	"spec": {
	    "type": "ingress",
	    "deployment": {
		"metadata": {
		    "labels": labels,
		    "annotations": ctx.ingress.annotations,
		},
		"replicas": {
		    "count": ctx.ingress.get_replicas(),
		},
		"resources": ctx.ingress.resources,
		"nodeSelector": ctx.ingress.node_selector,
		"tolerations": ctx.ingress.tolerations,
	    },
	    "service": {
		"metadata": {
		    "annotations": ctx.ingress.annotations,
		},
		"type": "LoadBalancer",
		"ports": ports,
	    },
	},
    });
    desired
}
