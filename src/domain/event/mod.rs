pub mod model;
pub mod repository;

pub use model::Event;
pub use repository::{EventRepository, EventSearch};
