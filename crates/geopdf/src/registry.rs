//! Initialize-once guard around driver registration.

use std::sync::Mutex;

use geopdf_common::{GeoPdfError, GeoPdfResult};
use tracing::{debug, info};

use crate::library::GeoLibrary;

/// Registers the library's drivers exactly once.
///
/// A failed registration is not remembered, so the next call tries again.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    registered: Mutex<Option<usize>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register drivers on first use and return the registered driver count.
    pub fn ensure_registered(&self, library: &dyn GeoLibrary) -> GeoPdfResult<usize> {
        let mut registered = self
            .registered
            .lock()
            .map_err(|_| GeoPdfError::InternalError("driver registry lock poisoned".into()))?;

        if let Some(count) = *registered {
            debug!(count, "Drivers already registered");
            return Ok(count);
        }

        let count = library
            .register_drivers()
            .map_err(|e| GeoPdfError::NativeLibrary(e.message))?;
        info!(backend = library.backend_name(), count, "Registered drivers");
        *registered = Some(count);
        Ok(count)
    }

    pub fn is_registered(&self) -> bool {
        self.registered
            .lock()
            .map(|registered| registered.is_some())
            .unwrap_or(false)
    }
}
