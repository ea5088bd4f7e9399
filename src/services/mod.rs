//! Usage: Typed Twitter v2 API calls built on the authenticated executor.

pub mod follows;
pub mod users;

pub use follows::{DefaultFollowSearchService, FollowSearchService};
pub use users::{DefaultUserService, UserService};

pub(crate) const API_HOST: &str = "api.twitter.com";
