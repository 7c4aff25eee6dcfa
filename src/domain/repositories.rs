//! Repository access for the domain layer
//!
//! `RepositoryProvider` bundles the per-aggregate repositories behind one
//! injection point. Services hold an `Arc<dyn RepositoryProvider>` and ask
//! for the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) -> DomainResult<()> {
//!     let event = repos.events().find_by_id("ev-1").await?;
//!     let count = repos.registrations().count_confirmed_for_event("ev-1").await?;
//!     Ok(())
//! }
//! ```

use super::event::EventRepository;
use super::registration::RegistrationRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn events(&self) -> &dyn EventRepository;
    fn registrations(&self) -> &dyn RegistrationRepository;
}
