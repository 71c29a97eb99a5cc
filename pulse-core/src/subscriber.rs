use crate::event::{Name, Orientation};

/// Receives changes dispatched through a channel.
///
/// `notify` runs inline with dispatch, on whatever thread dispatched the
/// change. Implementations must not assume a particular thread and should
/// return promptly: a slow subscriber delays every subscriber after it.
///
/// Closures with the matching signature are subscribers:
///
/// ```
/// use std::sync::Arc;
/// use pulse_core::{Channel, Name, Orientation, Subscriber, memory};
///
/// let channel = memory::<u64>();
/// let subscriber: Arc<dyn Subscriber<u64>> =
///     Arc::new(|name: &Name, orientation: Orientation, value: &u64| {
///         println!("{name} {orientation} {value}");
///     });
/// let _subscription = channel.subscribe(subscriber);
/// channel.dispatch(&Name::from("svc"), Orientation::Rising, &1);
/// ```
///
pub trait Subscriber<V>: Send + Sync {
    fn notify(&self, name: &Name, orientation: Orientation, value: &V);
}

impl<V, F> Subscriber<V> for F
where
    F: Fn(&Name, Orientation, &V) + Send + Sync,
{
    #[inline]
    fn notify(&self, name: &Name, orientation: Orientation, value: &V) {
        self(name, orientation, value)
    }
}
