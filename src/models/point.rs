//! Geofence point DTOs.

use serde::{Deserialize, Serialize};

/// Whether a geofence accepts checkins or checkouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointKind {
    #[default]
    Checkin,
    Checkout,
}

impl PointKind {
    /// URL path segment for this point kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            PointKind::Checkin => "checkin",
            PointKind::Checkout => "checkout",
        }
    }

    /// Get the display name for the point kind.
    pub fn name(&self) -> &'static str {
        match self {
            PointKind::Checkin => "Checkin Points",
            PointKind::Checkout => "Checkout Points",
        }
    }
}

/// A geofenced location where attendance events are permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofencePoint {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub location_name: String,
    pub allowed_department: Vec<i32>,
}

/// DTO for creating a geofence point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePointRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub location_name: String,
    pub allowed_department: Vec<i32>,
}

/// DTO for updating a geofence point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePointRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub location_name: String,
    pub allowed_department: Vec<i32>,
}
