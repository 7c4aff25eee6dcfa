pub mod events;
pub mod identity;
pub mod registrations;

#[cfg(test)]
pub mod testing;

pub use events::{CreateEvent, EventDetails, EventService, UpdateEvent};
pub use identity::{AuthResult, CreateUser, UpdateUser, UserService};
pub use registrations::RegistrationService;
