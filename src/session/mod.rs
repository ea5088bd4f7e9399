//! Usage: Current-user session state and identity models.

pub mod store;
pub mod user;

pub use store::UserSession;
pub use user::{FollowMetrics, User, UserList, UserSummary};
