pub mod model;
pub mod repository;

pub use model::{Role, User};
pub use repository::UserRepository;
