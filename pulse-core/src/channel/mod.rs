//! Channels for dispatching and subscribing to changes.
//!
//! # Design
//!
//! ```text
//! Channel<V>
//!     │
//!     └── MemoryChannel<V>   lock-free, same-thread dispatch
//! ```
//!
//! A [`MemoryChannel`] keeps its subscribers in a singly linked chain whose
//! head is swapped with compare-and-swap. Newest subscribers sit at the head
//! and are notified first. Cancelling a [`Subscription`] only tombstones its
//! node; the node is unlinked by the next subscribe or dispatch that walks
//! past it.

mod memory_channel;
mod subscription;
mod subscription_node;

use std::sync::Arc;

use crate::event::{Name, Orientation};
use crate::subscriber::Subscriber;

pub use memory_channel::{MemoryChannel, memory};
pub use subscription::Subscription;

/// A channel for dispatching changes of monitored entities and for
/// subscribing to them.
///
pub trait Channel<V>: Send + Sync {
    /// Dispatches a change to every subscriber that is live when the
    /// traversal reaches it.
    ///
    /// Subscribers run on the calling thread before this returns.
    ///
    fn dispatch(&self, name: &Name, orientation: Orientation, value: &V);

    /// Adds a subscriber to the channel.
    ///
    /// The subscriber is visited by every dispatch that begins after this
    /// returns. A dispatch already in flight may or may not reach it.
    ///
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<V>>) -> Subscription;

    /// Adds a closure as a subscriber.
    fn subscribe_fn<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(&Name, Orientation, &V) + Send + Sync + 'static,
        Self: Sized,
    {
        self.subscribe(Arc::new(subscriber))
    }
}

impl<V, C> Channel<V> for Arc<C>
where
    C: Channel<V> + ?Sized,
{
    #[inline]
    fn dispatch(&self, name: &Name, orientation: Orientation, value: &V) {
        (**self).dispatch(name, orientation, value)
    }

    #[inline]
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<V>>) -> Subscription {
        (**self).subscribe(subscriber)
    }
}

impl<V, C> Channel<V> for Box<C>
where
    C: Channel<V> + ?Sized,
{
    #[inline]
    fn dispatch(&self, name: &Name, orientation: Orientation, value: &V) {
        (**self).dispatch(name, orientation, value)
    }

    #[inline]
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<V>>) -> Subscription {
        (**self).subscribe(subscriber)
    }
}
