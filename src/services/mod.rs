pub mod comments;
pub mod follow;
pub mod groups;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use follow::{FollowGraph, FollowService, PgFollowGraph};
pub use groups::GroupService;
pub use posts::{PostFilter, PostService};
pub use users::UserService;
