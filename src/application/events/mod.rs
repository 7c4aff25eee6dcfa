pub mod service;

pub use service::{CreateEvent, EventDetails, EventService, UpdateEvent};
