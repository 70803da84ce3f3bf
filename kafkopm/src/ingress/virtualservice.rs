use crate::apply::Desired;
use crate::ingress::ListenerContext;

use serde_json::json;

pub const GROUP: &str = "networking.istio.io";
pub const VERSION: &str = "v1alpha3";
pub const KIND: &str = "VirtualService";

/*
 * Routes each gateway port to its broker's service, the any-cast port to
 * the all-broker service.
 */
pub fn build(ctx: &ListenerContext<'_>) -> Desired {
    let mut desired = Desired::new(GROUP, VERSION, KIND, &ctx.virtualservice_name(), ctx.namespace);

    let routes: Vec<serde_json::Value> = ctx.ports.iter()
	.map(|p| {
	    let host = match p.broker_id {
		Some(id) => format!("{}-{}", ctx.cluster_name, id),
		None => format!("{}-all-broker", ctx.cluster_name),
	    };
	    json!({
		"match": [{ "port": p.port }],
		"route": [{
		    "destination": {
			"host": host,
			"port": { "number": ctx.listener.container_port },
		    },
		}],
	    })
	})
	.collect();

    desired.object.metadata.labels = Some(ctx.labels());
    desired.object.metadata.annotations = ctx.ingress.virtual_service_annotations.clone();
    desired.object.data = json!({
	"spec": {
	    "hosts": ["*"],
	    "gateways": [ctx.gateway_name()],
	    "tcp": routes,
	},
    });
    desired
}
