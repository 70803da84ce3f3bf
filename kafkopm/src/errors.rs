use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {

    /* encapsulate a kube-rust error */
    #[error("kube error: {0}")]
    Kube(#[from] kube::Error),

    /* a broker references a broker config group which is not declared */
    #[error("broker config group `{group}` referenced by broker {broker_id} does not exist")]
    ConfigNotFound {
	broker_id: i32,
	group: String,
    },

    /* applying a desired resource failed, the rest of the pass was abandoned */
    #[error("unable to apply {kind} `{name}`: {source}")]
    Synchronization {
	kind: String,
	name: String,
	#[source]
	source: Box<Error>,
    },

    /* a listener port computed from the broker ids is not a valid tcp port */
    #[error("port `{name}` of external listener `{listener}` is outside of 1-65535")]
    PortOutOfRange {
	listener: String,
	name: String,
    },

    #[error("object has no `{0}`")]
    MissingObjectKey(&'static str),

    #[error("`{0}`")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
