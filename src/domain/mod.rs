//! Domain records and the mock dataset
//!
//! The types here carry no UI or scheduling concerns; the controller owns
//! them through [`crate::state::AppState`].

mod model;
pub mod seed;

pub use model::{
    ActivityEvent, ActivityKind, ChatMessage, ChatRole, Connection, ConnectionStatus,
    ConnectionUsage, Pool, PoolRole, PoolUsage, Provider, RouterSettings, RoutingStrategy,
    RoutingTarget, Theme, UsagePeriod, UsageRecord, User, MAX_RETRY_ATTEMPTS,
};
