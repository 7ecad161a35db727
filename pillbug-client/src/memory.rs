use async_trait::async_trait;
use pillbug_msg::{Context, Status};
use pillbug_ref::StatusId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::{Error, StatusSource, TimelineParams};

#[derive(Default)]
struct Db {
    statuses: HashMap<StatusId, Status>,
    contexts: HashMap<StatusId, Context>,
    timeline: Vec<Status>,
    failing_contexts: HashSet<StatusId>,
}

/// Statuses held in memory, for tests.
#[derive(Clone, Default)]
pub struct MemorySource {
    db: Arc<RwLock<Db>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert_status(&self, status: Status) -> Result<(), Error> {
        let mut db = self.db.write().map_err(|_| Error::Poisoned)?;
        db.statuses.insert(status.id.clone(), status);
        Ok(())
    }

    pub fn insert_context(&self, id: StatusId, context: Context) -> Result<(), Error> {
        let mut db = self.db.write().map_err(|_| Error::Poisoned)?;
        db.contexts.insert(id, context);
        Ok(())
    }

    /// Append to the home timeline; the status is also made fetchable by id.
    pub fn push_timeline(&self, status: Status) -> Result<(), Error> {
        let mut db = self.db.write().map_err(|_| Error::Poisoned)?;
        db.statuses.insert(status.id.clone(), status.clone());
        db.timeline.push(status);
        Ok(())
    }

    /// Make context lookups for `id` fail like an unavailable server would.
    pub fn fail_context(&self, id: StatusId) -> Result<(), Error> {
        let mut db = self.db.write().map_err(|_| Error::Poisoned)?;
        db.failing_contexts.insert(id);
        Ok(())
    }
}

#[async_trait]
impl StatusSource for MemorySource {
    async fn get_status(&self, id: &StatusId) -> Result<Status, Error> {
        let db = self.db.read().map_err(|_| Error::Poisoned)?;
        db.statuses
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    async fn get_status_context(&self, id: &StatusId) -> Result<Context, Error> {
        let db = self.db.read().map_err(|_| Error::Poisoned)?;

        if db.failing_contexts.contains(id) {
            return Err(Error::Server {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }

        match db.contexts.get(id) {
            Some(context) => Ok(context.clone()),
            None if db.statuses.contains_key(id) => Ok(Context::default()),
            None => Err(Error::NotFound(id.clone())),
        }
    }

    async fn get_home_timeline(&self, params: &TimelineParams) -> Result<Vec<Status>, Error> {
        let db = self.db.read().map_err(|_| Error::Poisoned)?;
        Ok(db
            .timeline
            .iter()
            .take(params.limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::status;

    fn params(limit: u32) -> TimelineParams {
        TimelineParams {
            limit,
            since_id: None,
            max_id: None,
        }
    }

    #[tokio::test]
    async fn test_get_status() {
        let source = MemorySource::new();
        source.insert_status(status("1", None)).unwrap();

        let found = source.get_status(&"1".parse().unwrap()).await.unwrap();
        assert_eq!(found.id.as_str(), "1");
        assert!(matches!(
            source.get_status(&"2".parse().unwrap()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_context_lookup() {
        let source = MemorySource::new();
        source.insert_status(status("1", None)).unwrap();
        source.insert_status(status("2", Some("1"))).unwrap();
        source
            .insert_context(
                "2".parse().unwrap(),
                Context {
                    ancestors: vec![status("1", None)],
                    descendants: vec![],
                },
            )
            .unwrap();
        source.fail_context("1".parse().unwrap()).unwrap();

        let context = source
            .get_status_context(&"2".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(context.ancestors.len(), 1);

        assert!(matches!(
            source.get_status_context(&"1".parse().unwrap()).await,
            Err(Error::Server { status: 503, .. })
        ));
        assert!(matches!(
            source.get_status_context(&"3".parse().unwrap()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_timeline_limit() {
        let source = MemorySource::new();
        for id in ["1", "2", "3"] {
            source.push_timeline(status(id, None)).unwrap();
        }

        let timeline = source.get_home_timeline(&params(2)).await.unwrap();
        assert_eq!(timeline.len(), 2);
        assert!(source.get_status(&"3".parse().unwrap()).await.is_ok());
    }
}
