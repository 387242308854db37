//! Feed core
//!
//! Coordinator state machine, selection reconciliation, consumer events,
//! and the top-level feed manager.

pub mod coordinator;
pub mod events;
pub mod feed;
pub mod selection;

pub use coordinator::{
    Exchange, FeedState, FetchMode, PRICE_NOT_LOADED, REAL_TIME_UPDATE_INTERVAL,
};
pub use events::{feed_channel, FeedEvent, FeedEventReceiver, FeedEventSender};
pub use feed::PriceFeed;
pub use selection::{default_pair, reconcile, MAX_SELECTED_PAIRS};
