use log::{debug, trace, warn};
use pillbug_msg::Status;
use pillbug_ref::StatusId;
use std::{
    collections::{HashMap, HashSet},
    mem,
};

use crate::{NodeContent, PostTreeNode, ThreadError};

type NodeIndex = usize;

struct ArenaNode {
    content: NodeContent,
    highlighted: bool,
    children: Vec<NodeIndex>,
}

#[derive(Default)]
struct Arena {
    nodes: Vec<ArenaNode>,
}

impl Arena {
    fn push_status(&mut self, status: Status, highlighted: bool) -> NodeIndex {
        self.push(NodeContent::Status(Box::new(status)), highlighted)
    }

    fn push_placeholder(&mut self, message: String) -> NodeIndex {
        self.push(NodeContent::Placeholder { message }, false)
    }

    fn push(&mut self, content: NodeContent, highlighted: bool) -> NodeIndex {
        self.nodes.push(ArenaNode {
            content,
            highlighted,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[parent].children.push(child);
    }

    fn into_tree(mut self, root: NodeIndex) -> PostTreeNode {
        self.take(root)
    }

    // every node has exactly one parent, so each slot is taken once
    fn take(&mut self, index: NodeIndex) -> PostTreeNode {
        let node = &mut self.nodes[index];
        let content = mem::replace(
            &mut node.content,
            NodeContent::Placeholder {
                message: String::new(),
            },
        );
        let highlighted = node.highlighted;
        let children = mem::take(&mut node.children);

        PostTreeNode {
            content,
            highlighted,
            children: children
                .into_iter()
                .map(|child| self.take(child))
                .collect(),
        }
    }
}

/// Rebuild a conversation from the requested status and the unordered
/// ancestors and descendants the server reported for it.
///
/// The walk first climbs from the requested status towards the root as far
/// as the fetched ancestors allow, then drains everything else into the
/// tree. Posts whose parent never shows up are hung under the root behind a
/// placeholder, one at a time, until the pool is empty. Replies to a post
/// placed that way attach to its placeholder.
pub fn build_thread_tree(
    requested: Status,
    ancestors: Vec<Status>,
    descendants: Vec<Status>,
) -> Result<PostTreeNode, ThreadError> {
    let mut pool: Vec<Status> = ancestors.into_iter().chain(descendants).collect();
    let mut arena = Arena::default();
    let mut index: HashMap<StatusId, NodeIndex> = HashMap::new();

    let requested_id = requested.id.clone();
    let mut parent_id = requested.in_reply_to_id.clone();
    let mut root = arena.push_status(requested, true);
    index.insert(requested_id, root);

    // root location
    while let Some(id) = parent_id {
        if index.contains_key(&id) {
            return Err(ThreadError::CycleDetected(id));
        }
        let Some(position) = pool.iter().position(|status| status.id == id) else {
            trace!("parent {} of the thread root was not fetched", id);
            break;
        };

        let parent = pool.remove(position);
        parent_id = parent.in_reply_to_id.clone();

        trace!("climb to {}", id);
        let node = arena.push_status(parent, false);
        arena.attach(node, root);
        index.insert(id, node);
        root = node;
    }

    // attachment
    let mut placeholders = 0;
    while !pool.is_empty() {
        let mut progressed = false;
        let mut position = 0;

        while position < pool.len() {
            let status = &pool[position];

            if index.contains_key(&status.id) {
                let duplicate = pool.remove(position);
                warn!("Dropping duplicate status {} from thread", duplicate.id);
                progressed = true;
                continue;
            }

            let parent = match &status.in_reply_to_id {
                None => Some(root),
                Some(parent_id) => index.get(parent_id).copied(),
            };

            match parent {
                Some(parent) => {
                    let status = pool.remove(position);
                    let id = status.id.clone();
                    trace!("attach {}", id);
                    let node = arena.push_status(status, false);
                    arena.attach(parent, node);
                    index.insert(id, node);
                    progressed = true;
                }
                None => position += 1,
            }
        }

        if progressed {
            continue;
        }

        // nothing left can be placed, so hang one post behind a placeholder
        if let Some(orphan) = take_chain_start(&mut pool) {
            let message = match &orphan.in_reply_to_id {
                Some(parent_id) => format!("Missing post id {}", parent_id),
                None => "Missing post".to_string(),
            };
            trace!("{}, placing {} behind a placeholder", message, orphan.id);

            let placeholder = arena.push_placeholder(message);
            arena.attach(root, placeholder);

            // replies to the orphan become its siblings under the placeholder
            let id = orphan.id.clone();
            let node = arena.push_status(orphan, false);
            arena.attach(placeholder, node);
            index.insert(id, placeholder);
            placeholders += 1;
        }
    }

    debug!(
        "Built thread of {} posts with {} placeholders",
        index.len(),
        placeholders
    );

    Ok(arena.into_tree(root))
}

/// Remove the last post whose parent is not waiting in the pool itself.
///
/// Such a post starts a chain whose parent was never fetched, so the
/// placeholder names an id that is really missing. When every remaining
/// post waits on another one (a reply loop) the last post is taken.
fn take_chain_start(pool: &mut Vec<Status>) -> Option<Status> {
    let waiting: HashSet<&StatusId> = pool.iter().map(|status| &status.id).collect();
    let position = pool
        .iter()
        .rposition(|status| match &status.in_reply_to_id {
            Some(parent_id) => parent_id == &status.id || !waiting.contains(parent_id),
            None => true,
        })
        .or_else(|| pool.len().checked_sub(1))?;

    Some(pool.remove(position))
}
