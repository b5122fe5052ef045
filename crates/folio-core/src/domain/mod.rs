//! Domain entities - the core business objects.

mod collection;
mod post;

pub use collection::{Collection, Updated};
pub use post::{NewPost, Post, PostChanges, PostId};
