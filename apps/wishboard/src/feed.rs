//! # Live Request Feed
//!
//! A watch channel carrying the full request listing, newest first.
//!
//! Every mutation republishes the listing; SSE subscribers each hold a
//! receiver and see the latest snapshot plus all subsequent updates. A
//! watch channel keeps only the newest value, so slow consumers skip
//! intermediate states instead of lagging.

use tokio::sync::watch;
use wishboard_core::{FeatureRequest, Registry};

/// Sending half of the feed.
pub type FeedSender = watch::Sender<Vec<FeatureRequest>>;

/// Receiving half of the feed.
pub type FeedReceiver = watch::Receiver<Vec<FeatureRequest>>;

/// Create a feed channel seeded with an empty listing.
#[must_use]
pub fn channel() -> (FeedSender, FeedReceiver) {
    watch::channel(Vec::new())
}

/// Republish the current listing after a mutation.
///
/// A listing failure leaves the previous snapshot in place; subscribers
/// never observe a partial state.
pub fn publish(sender: &FeedSender, registry: &Registry) {
    match registry.list() {
        Ok(requests) => {
            sender.send_replace(requests);
        }
        Err(e) => {
            tracing::warn!(error = %e, "feed republish skipped: listing failed");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wishboard_core::{Identity, NewRequest, UserPriority};

    fn draft(title: &str) -> NewRequest {
        NewRequest {
            title: title.to_string(),
            description: "a description".to_string(),
            app_id: "app-1".to_string(),
            app_name: "Demo".to_string(),
            user_priority: UserPriority::Medium,
            tester_email: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn publish_replaces_snapshot() {
        let (sender, receiver) = channel();
        let mut registry = Registry::new();
        registry.submit(draft("one"), &Identity::Guest, false, 1).unwrap();
        registry.submit(draft("two"), &Identity::Guest, false, 2).unwrap();

        publish(&sender, &registry);

        let snapshot = receiver.borrow();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].title, "two");
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let (sender, mut receiver) = channel();
        let mut registry = Registry::new();

        registry.submit(draft("one"), &Identity::Guest, false, 1).unwrap();
        publish(&sender, &registry);

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().len(), 1);
    }
}
