use super::node::NodeKey;

/// Failures raised while mutating an editor state inside an update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeKey),
    #[error("node {0} is not attached to the document")]
    Detached(NodeKey),
    #[error("node {0} is not a text node")]
    NotText(NodeKey),
    #[error("node {parent} cannot hold {child}")]
    InvalidChild { parent: NodeKey, child: NodeKey },
    #[error("the root node cannot be removed or replaced")]
    RootImmutable,
    #[error("{0}")]
    Other(String),
}
