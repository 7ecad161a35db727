use log::{debug, trace};
use pillbug_msg::Status;
use pillbug_ref::StatusId;
use serde::Serialize;

use crate::{Action, FeedError, FeedRule};

/// A post together with what the rules decided about it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotatedPost<'a> {
    pub post: &'a Status,
    pub hide: bool,
    pub labels: Vec<String>,
    pub attach_linked: bool,
}

impl<'a> AnnotatedPost<'a> {
    pub fn new(post: &'a Status) -> Self {
        Self {
            post,
            hide: false,
            labels: Vec::new(),
            attach_linked: false,
        }
    }

    /// The post that should be fetched and shown next to this one, if the
    /// rules asked for it.
    pub fn linked_id(&self) -> Option<&'a StatusId> {
        if self.attach_linked && self.post.is_reply() {
            self.post.in_reply_to_id.as_ref()
        } else {
            None
        }
    }

    fn apply(&mut self, action: &Action) {
        match action {
            Action::HidePost => self.hide = true,
            Action::AttachLinked => self.attach_linked = true,
            Action::ApplyLabel { label } => {
                if !self.labels.contains(label) {
                    self.labels.push(label.clone());
                }
            }
        }
    }
}

pub fn evaluate<'a>(
    posts: &'a [Status],
    rules: &[FeedRule],
) -> Result<Vec<AnnotatedPost<'a>>, FeedError> {
    let annotated = posts
        .iter()
        .map(|post| annotate(post, rules))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Evaluated {} rules over {} posts, {} hidden",
        rules.len(),
        annotated.len(),
        annotated.iter().filter(|post| post.hide).count()
    );

    Ok(annotated)
}

pub fn annotate<'a>(post: &'a Status, rules: &[FeedRule]) -> Result<AnnotatedPost<'a>, FeedError> {
    let fields = serde_json::to_value(post)?;
    let mut annotated = AnnotatedPost::new(post);

    for rule in rules {
        if rule.condition.matches(&fields) {
            trace!("rule {:?} matched post {}", rule.name, post.id);
            annotated.apply(&rule.action);
        }
    }

    Ok(annotated)
}
