//! Service configuration reconciliation.
//!
//! Finds the local `docker-compose.yml` among an ordered list of candidate
//! locations and points one named service at the freshly built image.

mod locate;
mod reconcile;

pub use locate::{COMPOSE_FILE, LocatorContext, ServiceConfigLocation, candidates, locate};
pub use reconcile::{DEFAULT_SERVICE, ServiceConfigPatch, reconcile, set_service_image};
