pub mod service;

pub use service::{AuthResult, CreateUser, UpdateUser, UserService};
