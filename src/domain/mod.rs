pub mod error;
pub mod event;
pub mod registration;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use event::{Event, EventRepository, EventSearch};
pub use registration::{Registration, RegistrationRepository, RegistrationStatus};
pub use repositories::RepositoryProvider;
pub use user::{Role, User, UserRepository};
