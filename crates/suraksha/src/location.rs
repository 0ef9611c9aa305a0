//! Device location abstraction.
//!
//! Reports are always stamped with the position of the device at submission
//! time. This module defines the coordinates type and the provider trait the
//! submission and SOS flows pull a position from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, -90 to 90.
    pub latitude: f64,
    /// Longitude, -180 to 180.
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create coordinates, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationUnavailable`] if either value is not finite or
    /// is out of range.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::location_unavailable(format!(
                "latitude {latitude} is outside -90..=90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::location_unavailable(format!(
                "longitude {longitude} is outside -180..=180"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Re-check coordinates that were built without [`Coordinates::validated`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationUnavailable`] if either value is not finite or
    /// is out of range.
    pub fn checked(self) -> Result<Self> {
        Self::validated(self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Outcome of asking the user for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    /// Access granted.
    Granted,
    /// Access refused.
    Denied,
}

impl LocationPermission {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A source of the device's current position.
///
/// Implementors wrap whatever positioning facility the host offers.
#[async_trait]
pub trait LocationProvider: Send + Sync + std::fmt::Debug {
    /// Ask for permission to read the device location.
    async fn request_permission(&self) -> LocationPermission;

    /// Read the current position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationPermissionDenied`] if access was refused, or
    /// [`Error::LocationUnavailable`] if no fix could be obtained.
    async fn current_position(&self) -> Result<Coordinates>;

    /// Request permission and, if granted, read the current position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationPermissionDenied`] if access was refused, or
    /// any error from [`LocationProvider::current_position`].
    async fn locate(&self) -> Result<Coordinates> {
        if !self.request_permission().await.is_granted() {
            debug!("Location permission denied");
            return Err(Error::LocationPermissionDenied);
        }
        self.current_position().await
    }
}

/// Internal state of a [`StaticLocation`].
#[derive(Debug, Clone, Copy, PartialEq)]
enum StaticState {
    Fixed(Coordinates),
    Denied,
    Unavailable,
}

/// A location provider that always answers the same way.
///
/// Used by the command-line front end, where the position comes from flags
/// or configuration, and by tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLocation {
    state: StaticState,
}

impl StaticLocation {
    /// A provider that always reports the given position.
    #[must_use]
    pub const fn fixed(position: Coordinates) -> Self {
        Self {
            state: StaticState::Fixed(position),
        }
    }

    /// A provider whose permission request is always refused.
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            state: StaticState::Denied,
        }
    }

    /// A provider with permission but no position fix.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            state: StaticState::Unavailable,
        }
    }

    /// Build a provider from an optional position; `None` means no fix.
    #[must_use]
    pub fn from_option(position: Option<Coordinates>) -> Self {
        match position {
            Some(position) => Self::fixed(position),
            None => Self::unavailable(),
        }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn request_permission(&self) -> LocationPermission {
        match self.state {
            StaticState::Denied => LocationPermission::Denied,
            StaticState::Fixed(_) | StaticState::Unavailable => LocationPermission::Granted,
        }
    }

    async fn current_position(&self) -> Result<Coordinates> {
        match self.state {
            StaticState::Fixed(position) => Ok(position),
            StaticState::Denied => Err(Error::LocationPermissionDenied),
            StaticState::Unavailable => Err(Error::location_unavailable(
                "no position configured; pass --lat/--lon or set [location] in the config",
            )),
        }
    }
}
