//! Read-only blog and community content.

mod posts;
mod search;

pub use posts::{blog_post, BlogPost, CommunityPost, BLOG_POSTS, COMMUNITY_POSTS};
pub use search::{matches, search, Searchable};
