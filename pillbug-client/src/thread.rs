use log::{debug, warn};
use pillbug_ref::StatusId;
use pillbug_threads::{build_thread_tree, PostTreeNode};

use crate::{Error, StatusSource};

/// Fetch a status and its conversation, and reconstruct the thread.
///
/// Failing to fetch the status itself is an error for the caller to show.
/// Failing to fetch the conversation is not: the status is returned alone
/// with a placeholder explaining what is missing.
pub async fn load_thread<S>(source: &S, id: &StatusId) -> Result<PostTreeNode, Error>
where
    S: StatusSource + ?Sized,
{
    let status = source.get_status(id).await?;
    let context_id = status.context_id().clone();
    if status.is_reblog() {
        debug!("{} is a reblog, loading the conversation of {}", id, context_id);
    }

    let context = match source.get_status_context(&context_id).await {
        Ok(context) => context,
        Err(error) => {
            warn!("Failed to load context of {}: {}", context_id, error);
            return Ok(PostTreeNode::failed_context(
                status,
                format!("Could not load conversation: {}", error),
            ));
        }
    };

    debug!(
        "Context of {} has {} ancestors and {} descendants",
        context_id,
        context.ancestors.len(),
        context.descendants.len()
    );

    let requested = match status.reblog {
        Some(original) => *original,
        None => status,
    };

    let tree = build_thread_tree(requested, context.ancestors, context.descendants)?;
    debug!("Thread of {} holds {} posts", id, tree.status_ids().len());

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{reblog, status};
    use crate::MemorySource;
    use pillbug_msg::Context;
    use pillbug_threads::{NodeContent, ThreadError};
    use pretty_assertions::assert_eq;

    fn conversation() -> MemorySource {
        let source = MemorySource::new();
        source.insert_status(status("P", Some("Q"))).unwrap();
        source
            .insert_context(
                "P".parse().unwrap(),
                Context {
                    ancestors: vec![status("Q", None)],
                    descendants: vec![status("R", Some("P"))],
                },
            )
            .unwrap();
        source
    }

    #[tokio::test]
    async fn test_load_thread() {
        let source = conversation();
        let tree = load_thread(&source, &"P".parse().unwrap()).await.unwrap();

        assert_eq!(tree.try_get_status().unwrap().id.as_str(), "Q");
        assert!(!tree.highlighted);
        let requested = &tree.children[0];
        assert_eq!(requested.try_get_status().unwrap().id.as_str(), "P");
        assert!(requested.highlighted);
        assert_eq!(
            requested.children[0].try_get_status().unwrap().id.as_str(),
            "R"
        );
    }

    #[tokio::test]
    async fn test_reblog_loads_original_context() {
        let source = conversation();
        source
            .insert_status(reblog("B", status("P", Some("Q"))))
            .unwrap();

        let tree = load_thread(&source, &"B".parse().unwrap()).await.unwrap();

        assert_eq!(tree.try_get_status().unwrap().id.as_str(), "Q");
        let requested = tree.find(&"P".parse().unwrap()).unwrap();
        assert!(requested.highlighted);
        assert!(tree.find(&"B".parse().unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_context_failure_degrades_to_placeholder() {
        let source = conversation();
        source.fail_context("P".parse().unwrap()).unwrap();

        let tree = load_thread(&source, &"P".parse().unwrap()).await.unwrap();

        assert_eq!(tree.try_get_status().unwrap().id.as_str(), "P");
        assert!(tree.highlighted);
        assert_eq!(tree.children.len(), 1);
        match &tree.children[0].content {
            NodeContent::Placeholder { message } => {
                assert!(message.starts_with("Could not load conversation"))
            }
            NodeContent::Status(_) => panic!("expected a placeholder"),
        }
    }

    #[tokio::test]
    async fn test_reblog_context_failure_keeps_wrapper() {
        let source = conversation();
        source
            .insert_status(reblog("B", status("P", Some("Q"))))
            .unwrap();
        source.fail_context("P".parse().unwrap()).unwrap();

        let tree = load_thread(&source, &"B".parse().unwrap()).await.unwrap();

        assert_eq!(tree.try_get_status().unwrap().id.as_str(), "B");
        assert!(tree.children[0].is_placeholder());
    }

    #[tokio::test]
    async fn test_missing_status_is_an_error() {
        let source = MemorySource::new();
        let result = load_thread(&source, &"X".parse().unwrap()).await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cycle_aborts() {
        let source = MemorySource::new();
        source.insert_status(status("A", Some("B"))).unwrap();
        source
            .insert_context(
                "A".parse().unwrap(),
                Context {
                    ancestors: vec![status("B", Some("A"))],
                    descendants: vec![],
                },
            )
            .unwrap();

        let result = load_thread(&source, &"A".parse().unwrap()).await;

        assert!(matches!(
            result,
            Err(Error::Thread(ThreadError::CycleDetected(_)))
        ));
    }
}
