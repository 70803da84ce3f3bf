use std::collections::BTreeMap;

/*
 * Labels selecting the istio ingress resources of one external listener
 * of the given KafkaCluster.
 */
pub fn labels_for_istio_ingress(cr_name: &str, listener_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();

    labels.insert(String::from("app"), String::from("istioingress"));
    labels.insert(String::from("eListenerName"), listener_name.to_string());
    labels.insert(String::from("kafka_cr"), cr_name.to_string());
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn istio_ingress_labels() {
	let labels = labels_for_istio_ingress("kafka", "external");

	assert_eq!(labels.get("app").map(String::as_str), Some("istioingress"));
	assert_eq!(labels.get("eListenerName").map(String::as_str), Some("external"));
	assert_eq!(labels.get("kafka_cr").map(String::as_str), Some("kafka"));
    }
}
