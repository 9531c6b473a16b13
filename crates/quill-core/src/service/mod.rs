//! Domain services - the operations behind the API layer.
//!
//! Services are stateless between requests; they hold only the repository
//! ports they operate through.

mod categories;
mod posts;

pub use categories::CategoryService;
pub use posts::PostService;
