use log::{debug, trace, warn};
use pillbug_msg::Status;
use pillbug_ref::StatusId;
use std::collections::HashSet;

use crate::{NodeContent, PostTreeNode, ThreadError};

/// Hang a freshly created reply into an already built tree.
///
/// The reply lands, highlighted, under the status it answers. When that
/// status is not part of the tree the reply goes directly under the root
/// rather than being dropped. A reply that is already in the tree leaves
/// the tree unchanged.
pub fn patch_new_reply(tree: &mut PostTreeNode, reply: Status) -> Result<(), ThreadError> {
    if tree.find(&reply.id).is_some() {
        warn!("Status {} is already in the thread, not adding it again", reply.id);
        return Ok(());
    }

    let Some(parent_id) = reply.in_reply_to_id.clone() else {
        debug!("New post is not a reply, adding it under the root");
        tree.children.push(PostTreeNode::status(reply, true));
        return Ok(());
    };
    let node = PostTreeNode::status(reply, true);

    let mut seen = HashSet::new();
    match attach(tree, &parent_id, node, &mut seen)? {
        None => Ok(()),
        Some(node) => {
            debug!("Parent {} is not in the thread, adding reply under the root", parent_id);
            tree.children.push(node);
            Ok(())
        }
    }
}

// Hands the node back when no attachment point was found below `tree`.
fn attach(
    tree: &mut PostTreeNode,
    parent_id: &StatusId,
    node: PostTreeNode,
    seen: &mut HashSet<StatusId>,
) -> Result<Option<PostTreeNode>, ThreadError> {
    if let NodeContent::Status(status) = &tree.content {
        if !seen.insert(status.id.clone()) {
            return Err(ThreadError::CycleDetected(status.id.clone()));
        }
        if &status.id == parent_id {
            trace!("attach new reply under {}", parent_id);
            tree.children.push(node);
            return Ok(None);
        }
    }

    let mut node = node;
    for child in tree.children.iter_mut() {
        match attach(child, parent_id, node, seen)? {
            None => return Ok(None),
            Some(unplaced) => node = unplaced,
        }
    }
    Ok(Some(node))
}
