pub mod model;
pub mod repository;

pub use model::{Registration, RegistrationStatus};
pub use repository::RegistrationRepository;
