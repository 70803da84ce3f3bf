use clap::Parser;

/*
 * Command line configuration of the operator
 */
#[derive(Parser, Debug, Clone)]
#[command(name = "kafkopm", version, about = "Keeps KafkaClusters aligned with their declared state")]
pub struct Args {

    /// Seconds between two reconciliation passes of a KafkaCluster
    #[arg(long, default_value_t = 30)]
    pub requeue_interval: u64,

    /// Seconds before retrying a KafkaCluster whose last pass failed
    #[arg(long, default_value_t = 60)]
    pub error_requeue_interval: u64,

    /// Field manager used for server side apply
    #[arg(long, default_value = "kafkopm")]
    pub field_manager: String,

    /// Only watch KafkaClusters of this namespace (default: all namespaces)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Print the KafkaCluster CRD and exit
    #[arg(long)]
    pub print_crd: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
	let args = Args::try_parse_from(["kafkopm"]).unwrap();

	assert_eq!(args.requeue_interval, 30);
	assert_eq!(args.error_requeue_interval, 60);
	assert_eq!(args.field_manager, "kafkopm");
	assert_eq!(args.namespace, None);
	assert!(!args.print_crd);
    }

    #[test]
    fn overrides() {
	let args = Args::try_parse_from([
	    "kafkopm",
	    "--requeue-interval", "10",
	    "--namespace", "kafka",
	    "--field-manager", "ops",
	]).unwrap();

	assert_eq!(args.requeue_interval, 10);
	assert_eq!(args.namespace.as_deref(), Some("kafka"));
	assert_eq!(args.field_manager, "ops");
    }
}
