use std::fmt;
use std::sync::{Arc, Weak};

use tracing::trace;

use super::subscription_node::{Cancellable, SubscriptionNode};

/// Handle returned by [`Channel::subscribe`](super::Channel::subscribe).
///
/// The only thing a subscription can do is cancel itself. Cancelling is
/// idempotent. Dropping the handle does not cancel.
///
/// The handle refers to its node weakly: it keeps neither the subscriber nor
/// the rest of the chain alive once the channel has unlinked the node.
///
pub struct Subscription {
    node: Weak<dyn Cancellable>,
}

impl Subscription {
    pub(super) fn new<V: 'static>(node: &Arc<SubscriptionNode<V>>) -> Self {
        let node: Weak<SubscriptionNode<V>> = Arc::downgrade(node);
        Subscription { node }
    }

    /// Stops further notifications to the subscriber.
    ///
    /// A dispatch that already checked the subscriber's liveness may still
    /// deliver one last notification.
    ///
    pub fn cancel(&self) {
        if let Some(node) = self.node.upgrade() {
            if node.cancel() {
                trace!("subscription cancelled");
            }
        }
    }

    /// True once cancelled, or once the channel that issued the
    /// subscription is gone.
    pub fn is_cancelled(&self) -> bool {
        self.node.upgrade().is_none_or(|node| node.is_cancelled())
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
