use kafkop_api as api;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/*
 * Returns the ascending, deduplicated union of the broker ids found in the
 * live status and the ones declared in the KafkaCluster spec.
 *
 * A broker removed from the KafkaCluster spec is still tracked while it shows up in the
 * status (it must be decommissioned, not dropped), and a freshly declared
 * broker is tracked before it reports any status.
 */
pub fn broker_ids_from_status_and_spec(states: &BTreeMap<String, api::BrokerState>, brokers: &[api::Broker]) -> Vec<i32> {
    let mut ids: BTreeSet<i32> = BTreeSet::new();

    for key in states.keys() {
	match key.parse::<i32>() {
	    Ok(id) => {
		ids.insert(id);
	    }
	    Err(err) => {
		log::warn!("Ignoring broker state with non numeric id '{}': {}", key, err);
	    }
	}
    }
    ids.extend(brokers.iter().map(|broker| broker.id));

    ids.into_iter().collect()
}
