use std::fmt;
use std::sync::Arc;

use arc_swap::{ArcSwapOption, Guard};
use tracing::{debug, trace};

use super::Channel;
use super::subscription::Subscription;
use super::subscription_node::{NodeLink, SubscriptionNode, same_link};
use crate::event::{Name, Orientation};
use crate::subscriber::Subscriber;

type NodeRef<V> = Arc<SubscriptionNode<V>>;

/// Creates an empty in-memory channel.
pub fn memory<V: 'static>() -> MemoryChannel<V> {
    MemoryChannel::new()
}

/// A [`Channel`] that dispatches every change immediately, on the thread
/// that dispatches it.
///
/// Subscribers are kept in a lock-free singly linked chain. `subscribe`
/// pushes at the head with compare-and-swap; `dispatch` walks the chain from
/// a single snapshot of the head and unlinks cancelled subscriptions it
/// passes, so no separate cleanup pass is needed.
///
/// # Example
///
/// ```
/// use pulse_core::{Channel, Name, Orientation, memory};
///
/// let channel = memory::<u64>();
/// let subscription = channel.subscribe_fn(|name, orientation, value| {
///     println!("{name} went {orientation}: {value}");
/// });
///
/// channel.dispatch(&Name::from("svc"), Orientation::Rising, &1);
/// subscription.cancel();
/// ```
///
pub struct MemoryChannel<V> {
    head: ArcSwapOption<SubscriptionNode<V>>,
}

impl<V: 'static> MemoryChannel<V> {
    pub fn new() -> Self {
        MemoryChannel {
            head: ArcSwapOption::empty(),
        }
    }

    /// True when no subscription, live or cancelled, is linked.
    pub fn is_empty(&self) -> bool {
        self.head.load().is_none()
    }

    /// Number of nodes reachable from the head, tombstones included.
    pub fn reachable_nodes(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|_| count += 1);
        count
    }

    /// Number of live subscriptions reachable from the head.
    pub fn subscriber_count(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|node| {
            if !node.is_tombstone() {
                count += 1;
            }
        });
        count
    }

    fn for_each_node(&self, mut f: impl FnMut(&SubscriptionNode<V>)) {
        let mut current = self.head.load_full();
        while let Some(node) = current {
            f(&node);
            current = node.get_next();
        }
    }

    /// Pushes a new node at the head.
    ///
    /// Leading tombstones are trimmed before the node is linked. The node is
    /// allocated once; a lost CAS only re-points its `next` link.
    ///
    fn push(&self, subscriber: Arc<dyn Subscriber<V>>) -> NodeRef<V> {
        let node = Arc::new(SubscriptionNode::new(subscriber, None));
        let mut current = self.head.load_full();
        let mut retries = 0usize;

        loop {
            node.set_next(SubscriptionNode::scan(current.clone()));

            let previous = self
                .head
                .compare_and_swap(&current, Some(Arc::clone(&node)));

            if same_link(&previous, &current) {
                trace!(retries, "subscription pushed");
                return node;
            }

            // Another subscribe or a dispatch moved the head; retry against
            // the value it left behind.
            //
            current = Guard::into_inner(previous);
            retries += 1;
        }
    }

    fn dispatch_from(&self, head: NodeRef<V>, name: &Name, orientation: Orientation, value: &V) {
        let mut prev: Option<NodeRef<V>> = None;
        let mut current = Arc::clone(&head);
        let mut spliced = 0usize;

        loop {
            if current.is_tombstone() {
                let next = SubscriptionNode::scan(current.get_next());
                self.remove(prev.as_deref(), next.clone(), &head);
                spliced += 1;

                match next {
                    Some(node) => current = node,
                    None => break,
                }
            }

            current.notify(name, orientation, value);

            let Some(next) = current.get_next() else {
                break;
            };
            prev = Some(std::mem::replace(&mut current, next));
        }

        if spliced > 0 {
            debug!(spliced, "unlinked cancelled subscriptions during dispatch");
        }
    }

    /// Unlinks the tombstones between `prev` and `next`.
    ///
    /// Without a predecessor the dead node is the snapshot head, which is
    /// only replaced if the head has not moved since the snapshot.
    ///
    fn remove(&self, prev: Option<&SubscriptionNode<V>>, next: NodeLink<V>, head: &NodeRef<V>) {
        match prev {
            Some(prev) => prev.set_next(next),
            None => {
                let previous = self.head.compare_and_swap(head, next);
                if !matches!(&*previous, Some(previous) if Arc::ptr_eq(previous, head)) {
                    trace!("head moved during dispatch, leaving tombstone for a later pass");
                }
            }
        }
    }
}

impl<V: 'static> Channel<V> for MemoryChannel<V> {
    /// With no subscribers this only reads the head and allocates nothing.
    /// The first head read on a thread lets `arc-swap` allocate its
    /// per-thread debt record once; later dispatches on that thread reuse it.
    ///
    fn dispatch(&self, name: &Name, orientation: Orientation, value: &V) {
        if let Some(head) = self.head.load_full() {
            self.dispatch_from(head, name, orientation, value);
        }
    }

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<V>>) -> Subscription {
        let node = self.push(subscriber);
        Subscription::new(&node)
    }
}

impl<V: 'static> Default for MemoryChannel<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> fmt::Debug for MemoryChannel<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryChannel")
            .field("reachable_nodes", &self.reachable_nodes())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
