//! Controllers that update aspects of the [`AstronomerModel`]: its time,
//! location or direction of pointing.
//!
//! Every controller holds a shared handle to the model and can be enabled,
//! disabled, started and stopped independently; [`ControllerGroup`] wires a
//! complete set together behind one facade.

mod group;
mod location;
mod manual;
mod sensor;
mod teleport;
mod zoom;

pub use group::ControllerGroup;
pub use location::LocationController;
pub use manual::ManualOrientationController;
pub use sensor::SensorOrientationController;
pub use teleport::TeleportingController;
pub use zoom::ZoomController;

use crate::astronomer::AstronomerModel;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The model handle controllers share with the renderer and each other.
pub type SharedModel = Arc<Mutex<AstronomerModel>>;

/// Creates a [`SharedModel`] from a model instance.
pub fn shared(model: AstronomerModel) -> SharedModel {
    Arc::new(Mutex::new(model))
}

pub(crate) fn lock_model(model: &SharedModel) -> MutexGuard<'_, AstronomerModel> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Common lifecycle for everything that drives the model.
///
/// A disabled controller may keep computing updates but must not pass them
/// on. `start`/`stop` bracket the application's active phase and are
/// idempotent; expensive resources are held only between the two.
pub trait Controller {
    fn set_enabled(&mut self, enabled: bool);

    fn enabled(&self) -> bool;

    /// Called when the application becomes active.
    fn start(&mut self) {}

    /// Called when the application goes inactive.
    fn stop(&mut self) {}
}
