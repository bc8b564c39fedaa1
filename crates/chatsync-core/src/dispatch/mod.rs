//! Trigger dispatch.
//!
//! The routing table binding change events to handlers lives here, built
//! declaratively at startup. The delivery mechanism (how events reach the
//! process) is owned by the hosting infrastructure and stays out of this
//! module; it hands raw [`ChangeEvent`]s to [`TriggerRouter::dispatch`].
//!
//! [`ChangeEvent`]: chatsync_types::event::ChangeEvent

pub mod path;
pub mod router;

pub use path::PathPattern;
pub use router::{DispatchOutcome, TriggerRouter};
