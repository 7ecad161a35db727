use futures::future::join_all;
use log::{debug, warn};
use pillbug_feed::{evaluate, AnnotatedPost, FeedConfig, FeedError, FeedRule};
use pillbug_msg::Status;
use pillbug_ref::StatusId;
use std::collections::{BTreeSet, HashMap};

use crate::{Error, StatusSource, TimelineParams};

/// A fetched timeline window and the rules it is to be shown with.
#[derive(Clone, Debug, Default)]
pub struct Feed {
    pub statuses: Vec<Status>,
    pub rules: Vec<FeedRule>,
}

impl Feed {
    /// Run the rules over the fetched statuses. The annotations drive both
    /// rendering and [`resolve_linked`].
    pub fn annotate(&self) -> Result<Vec<AnnotatedPost<'_>>, FeedError> {
        evaluate(&self.statuses, &self.rules)
    }
}

pub async fn load_feed<S>(source: &S, config: &FeedConfig) -> Result<Feed, Error>
where
    S: StatusSource + ?Sized,
{
    let statuses = source
        .get_home_timeline(&TimelineParams::from(config))
        .await?;
    debug!("Fetched {} statuses for feed", statuses.len());

    Ok(Feed {
        statuses,
        rules: config.rules(),
    })
}

/// Collect the posts that annotated posts want attached.
///
/// Posts already in the list are reused; the rest are fetched. Fetches
/// that fail are logged and left out.
pub async fn resolve_linked<S>(
    source: &S,
    annotated: &[AnnotatedPost<'_>],
) -> HashMap<StatusId, Status>
where
    S: StatusSource + ?Sized,
{
    let known: HashMap<&StatusId, &Status> = annotated
        .iter()
        .map(|post| (&post.post.id, post.post))
        .collect();
    let wanted: BTreeSet<&StatusId> = annotated
        .iter()
        .filter_map(AnnotatedPost::linked_id)
        .collect();

    let mut linked = HashMap::new();
    let mut missing = Vec::new();
    for id in wanted {
        match known.get(id) {
            Some(status) => {
                linked.insert(id.clone(), (*status).clone());
            }
            None => missing.push(id),
        }
    }

    let fetched = join_all(missing.iter().map(|id| source.get_status(id))).await;
    for (id, result) in missing.into_iter().zip(fetched) {
        match result {
            Ok(status) => {
                linked.insert(id.clone(), status);
            }
            Err(error) => warn!("Failed to fetch linked status {}: {}", id, error),
        }
    }

    linked
}
