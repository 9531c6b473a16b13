//! Domain entities - the core business objects.

mod category;
mod post;
mod slug;
mod user;

pub use category::Category;
pub use post::{Comment, Post};
pub use slug::slugify;
pub use user::{Role, User};
