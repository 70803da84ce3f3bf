use crate::apply::Desired;
use crate::ingress::ListenerContext;

use serde_json::json;

pub const GROUP: &str = "networking.istio.io";
pub const VERSION: &str = "v1alpha3";
pub const KIND: &str = "Gateway";

pub fn build(ctx: &ListenerContext<'_>) -> Desired {
    let mut desired = Desired::new(GROUP, VERSION, KIND, &ctx.gateway_name(), ctx.namespace);
    let labels = ctx.labels();

    let servers: Vec<serde_json::Value> = ctx.ports.iter()
	.map(|p| match &ctx.ingress.tls {
	    Some(tls) => json!({
		"port": { "number": p.port, "name": p.name, "protocol": "TLS" },
		"hosts": ["*"],
		"tls": { "mode": tls.mode, "credentialName": tls.credential_name },
	    }),
	    None => json!({
		"port": { "number": p.port, "name": p.name, "protocol": "TCP" },
		"hosts": ["*"],
	    }),
	})
	.collect();

    desired.object.metadata.labels = Some(labels.clone());
    desired.object.data = json!({
	"spec": {
	    // served by the mesh gateway pods carrying the same labels
	    "selector": labels,
	    "servers": servers,
	},
    });
    desired
}
