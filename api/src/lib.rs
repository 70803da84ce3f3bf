/*
 * kafkop/api - the KafkaCluster custom resource and the types it is made of,
 * shared by every part of the kafkop ecosystem
 */

pub mod brokerconfig;
pub use brokerconfig::Broker;
pub use brokerconfig::BrokerConfig;
pub use brokerconfig::StorageConfig;

pub mod kafkacluster;
pub use kafkacluster::BrokerState;
pub use kafkacluster::ClusterState;
pub use kafkacluster::ConfigurationState;
pub use kafkacluster::KafkaCluster;
pub use kafkacluster::KafkaClusterSpec;
pub use kafkacluster::KafkaClusterStatus;

pub mod listener;
pub use listener::AccessMethod;
pub use listener::ExternalListenerConfig;
pub use listener::ExternalListenerOverrides;
pub use listener::IstioIngressConfig;
pub use listener::IstioIngressTls;
pub use listener::ListenersConfig;
