use pillbug_msg::Status;
use pillbug_ref::StatusId;
use serde::Serialize;
use thiserror::Error as ThisError;

mod builder;
mod patch;

pub use builder::build_thread_tree;
pub use patch::patch_new_reply;

#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ThreadError {
    #[error("Status {0} was reached twice while walking the reply chain")]
    CycleDetected(StatusId),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContent {
    Status(Box<Status>),
    Placeholder { message: String },
}

/// One node of a reconstructed conversation.
///
/// Children are kept in the order they were attached, which is discovery
/// order and not chronological.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostTreeNode {
    pub content: NodeContent,
    pub highlighted: bool,
    pub children: Vec<PostTreeNode>,
}

impl PostTreeNode {
    pub fn status(status: Status, highlighted: bool) -> Self {
        Self {
            content: NodeContent::Status(Box::new(status)),
            highlighted,
            children: Vec::new(),
        }
    }

    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            content: NodeContent::Placeholder {
                message: message.into(),
            },
            highlighted: false,
            children: Vec::new(),
        }
    }

    /// The tree shown when the requested status loaded but its conversation
    /// did not: the status itself with the reason hanging underneath.
    pub fn failed_context(status: Status, message: impl Into<String>) -> Self {
        let mut root = Self::status(status, true);
        root.children.push(Self::placeholder(message));
        root
    }

    pub fn try_get_status(&self) -> Option<&Status> {
        match &self.content {
            NodeContent::Status(status) => Some(status.as_ref()),
            NodeContent::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, NodeContent::Placeholder { .. })
    }

    /// Depth-first, pre-order walk over this node and everything below it.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    pub fn find(&self, id: &StatusId) -> Option<&PostTreeNode> {
        self.iter()
            .find(|node| node.try_get_status().map(|status| &status.id) == Some(id))
    }

    pub fn status_ids(&self) -> Vec<&StatusId> {
        self.iter()
            .filter_map(|node| node.try_get_status())
            .map(|status| &status.id)
            .collect()
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a PostTreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a PostTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
