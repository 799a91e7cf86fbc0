use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl GenError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GenError::InvalidConfiguration(msg.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0:?} was never added to the graph")]
    UnknownNode(NodeId),
    #[error("node {0:?} cannot be linked to itself")]
    SelfLink(NodeId),
}
