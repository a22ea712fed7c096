// ============================================================================
// EVENTS - In-process publish/subscribe between loosely coupled views
// ============================================================================

pub mod bus;
pub mod topics;

pub use bus::{EventBus, Subscription};
pub use topics::TopicSet;
