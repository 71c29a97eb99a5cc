//! In-process signal channels.
//!
//! A [`Channel`] lets any number of observers subscribe to changes of
//! monitored entities. Dispatch is synchronous, runs on the caller's thread
//! and never takes a lock.
//!
//! # Organization
//!
//! - [`channel`] - Channel capability, lock-free memory channel, subscriptions
//! - [`event`] - Identity types carried by a dispatched change
//! - [`subscriber`] - Subscriber callback capability
//! - [`common_tests`] - Generic test bodies shared by channel implementations

pub mod channel;
pub mod common_tests;
pub mod event;
pub mod subscriber;

pub use channel::{Channel, MemoryChannel, Subscription, memory};
pub use event::{Name, Orientation};
pub use subscriber::Subscriber;
