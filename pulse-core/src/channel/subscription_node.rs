use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;

use crate::event::{Name, Orientation};
use crate::subscriber::Subscriber;

pub(super) type NodeLink<V> = Option<Arc<SubscriptionNode<V>>>;

// =============================================================================
// SUBSCRIPTION CHAIN
// =============================================================================
//
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ head │───►│  S3  │───►│  S2  │───►│  S1  │───► None
// └──────┘    └──────┘    └──────┘    └──────┘
//   (CAS)     (newest)                (oldest)
//
// Cancellation sets the tombstone flag of a node and nothing else. The node
// stays linked until a traversal walks past it:
//
//          head ──► S3 ──► S2(✝) ──► S1
//
// Dispatch with prev = S3 stores scan(S2) = S1 into S3.next:
//
//          head ──► S3 ─────────────► S1
//                          S2(✝) ──► S1   (freed when the last Arc drops)
//
// Interior links are plain stores, not CAS. A stale store from a slower
// traversal can re-link a tombstone that another traversal already skipped,
// but it only ever skips nodes that were observed dead, so it can neither
// drop a live node nor create a cycle. The re-linked tombstone is removed by
// a later pass.
//
// Nodes are reference counted. A traversal holds a strong reference to the
// node it stands on, so a node spliced out concurrently stays valid until
// that traversal moves on.
//
// =============================================================================

/// A cell in a channel's subscriber chain.
///
pub(super) struct SubscriptionNode<V> {
    subscriber: Arc<dyn Subscriber<V>>,
    cancelled: AtomicBool,
    next: ArcSwapOption<SubscriptionNode<V>>,
}

impl<V> SubscriptionNode<V> {
    pub(super) fn new(subscriber: Arc<dyn Subscriber<V>>, next: NodeLink<V>) -> Self {
        SubscriptionNode {
            subscriber,
            cancelled: AtomicBool::new(false),
            next: ArcSwapOption::new(next),
        }
    }

    #[inline]
    pub(super) fn is_tombstone(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Turns the node into a tombstone.
    ///
    /// Returns true only for the call that performed the transition.
    ///
    #[inline]
    pub(super) fn tombstone(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    // =========================================================================
    // Next link accessors
    // =========================================================================

    #[inline]
    pub(super) fn get_next(&self) -> NodeLink<V> {
        self.next.load_full()
    }

    #[inline]
    pub(super) fn set_next(&self, next: NodeLink<V>) {
        self.next.store(next)
    }

    #[inline]
    pub(super) fn notify(&self, name: &Name, orientation: Orientation, value: &V) {
        self.subscriber.notify(name, orientation, value)
    }

    /// Walks forward from `candidate` past tombstones.
    ///
    /// Returns the first live node, or `None` when only tombstones (or
    /// nothing) remain.
    ///
    pub(super) fn scan(mut candidate: NodeLink<V>) -> NodeLink<V> {
        while let Some(node) = candidate {
            if !node.is_tombstone() {
                return Some(node);
            }
            candidate = node.get_next();
        }
        None
    }
}

impl<V> Drop for SubscriptionNode<V> {
    fn drop(&mut self) {
        // Unwind the tail iteratively; the default drop would recurse once
        // per node.
        //
        let mut next = self.next.swap(None);
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(node) => next = node.next.swap(None),
                Err(_) => break,
            }
        }
    }
}

/// Cancellation side of a node, independent of the value type.
pub(super) trait Cancellable: Send + Sync {
    fn cancel(&self) -> bool;

    fn is_cancelled(&self) -> bool;
}

impl<V> Cancellable for SubscriptionNode<V> {
    fn cancel(&self) -> bool {
        self.tombstone()
    }

    fn is_cancelled(&self) -> bool {
        self.is_tombstone()
    }
}

/// Pointer identity of two links.
#[inline]
pub(super) fn same_link<V>(left: &NodeLink<V>, right: &NodeLink<V>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => Arc::ptr_eq(left, right),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> Arc<dyn Subscriber<u32>> {
        Arc::new(|_: &Name, _: Orientation, _: &u32| {})
    }

    // Builds a chain from `live` flags, head first.
    fn chain(live: &[bool]) -> NodeLink<u32> {
        let mut next = None;
        for &is_live in live.iter().rev() {
            let node = Arc::new(SubscriptionNode::new(silent(), next));
            if !is_live {
                node.tombstone();
            }
            next = Some(node);
        }
        next
    }

    #[test]
    fn test_tombstone_is_one_way() {
        let node = SubscriptionNode::new(silent(), None);

        assert!(!node.is_tombstone());
        assert!(node.tombstone());
        assert!(node.is_tombstone());
        assert!(!node.tombstone());
        assert!(node.is_tombstone());
    }

    #[test]
    fn test_scan_empty() {
        assert!(SubscriptionNode::<u32>::scan(None).is_none());
    }

    #[test]
    fn test_scan_returns_live_candidate() {
        let head = chain(&[true, false]);
        let found = SubscriptionNode::scan(head.clone());

        assert!(same_link(&found, &head));
    }

    #[test]
    fn test_scan_skips_leading_tombstones() {
        let head = chain(&[false, false, true, false]);
        let third = head
            .as_ref()
            .and_then(|n| n.get_next())
            .and_then(|n| n.get_next());

        let found = SubscriptionNode::scan(head);

        assert!(same_link(&found, &third));
        assert!(!found.as_ref().is_some_and(|n| n.is_tombstone()));
    }

    #[test]
    fn test_scan_only_tombstones() {
        let head = chain(&[false, false, false]);

        assert!(SubscriptionNode::scan(head).is_none());
    }

    #[test]
    fn test_cancellable_view() {
        let node: Arc<dyn Cancellable> = Arc::new(SubscriptionNode::new(silent(), None));

        assert!(!node.is_cancelled());
        assert!(node.cancel());
        assert!(!node.cancel());
        assert!(node.is_cancelled());
    }

    #[test]
    fn test_drop_long_chain() {
        let live = vec![true; 200_000];
        let head = chain(&live);

        drop(head);
    }

    #[test]
    fn test_drop_stops_at_shared_node() {
        let head = chain(&[true, true, true]);
        let second = head.as_ref().and_then(|n| n.get_next());

        drop(head);

        let second = second.unwrap();
        assert_eq!(Arc::strong_count(&second), 1);
        assert!(second.get_next().is_some());
    }
}
