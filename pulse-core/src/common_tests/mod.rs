//! Test bodies shared by every [`Channel`](crate::Channel) implementation.
//!
//! Each function takes the channel under test (or builds one through
//! `Default`) so integration tests can run the same checks against plain,
//! shared and type-erased channels.
