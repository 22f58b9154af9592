use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    participant::{Position, Telemetry},
    Timestamp,
};

/// Radio metadata for one gateway that received the uplink.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReception {
    pub rssi: Option<f64>,
    pub snr: Option<f64>,
}

/// An uplink as posted by the network bridge.
///
/// Everything is optional at the wire level; [`RawReport::validate`] decides
/// what is actually required and turns the rest into explicit optionals.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    pub device_id: Option<String>,
    pub status_code: Option<i32>,
    pub timestamp: Option<Timestamp>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub battery: Option<f64>,
    pub satellite_count: Option<i32>,
    #[serde(default)]
    pub gateways: Vec<GatewayReception>,
}

/// A report that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPayload {
    pub device_id: String,
    pub status_code: Option<i32>,
    pub timestamp: Timestamp,
    pub position: Option<Position>,
    pub telemetry: Telemetry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReport {
    MissingDeviceId,
    MissingTimestamp,
    UnpairedCoordinates,
    CoordinatesOutOfRange { longitude: f64, latitude: f64 },
}

impl fmt::Display for InvalidReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReport::MissingDeviceId => {
                write!(f, "report carries no device id")
            }
            InvalidReport::MissingTimestamp => {
                write!(f, "report carries no usable timestamp")
            }
            InvalidReport::UnpairedCoordinates => {
                write!(f, "longitude and latitude must be supplied together")
            }
            InvalidReport::CoordinatesOutOfRange {
                longitude,
                latitude,
            } => {
                write!(
                    f,
                    "coordinates ({}, {}) are outside the valid range",
                    longitude, latitude
                )
            }
        }
    }
}

impl std::error::Error for InvalidReport {}

impl RawReport {
    /// Validates the wire shape into a [`ReportPayload`].
    ///
    /// Device id and timestamp are required. Coordinates are optional but
    /// must arrive as a finite in-range pair. Signal quality is derived here
    /// as the maximum over all per-gateway SNR/RSSI readings; a report with
    /// no gateway metadata simply has no signal quality.
    pub fn validate(self) -> Result<ReportPayload, InvalidReport> {
        let device_id = match self.device_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(InvalidReport::MissingDeviceId),
        };

        let timestamp = match self.timestamp {
            Some(timestamp) if timestamp.is_finite() => timestamp,
            _ => return Err(InvalidReport::MissingTimestamp),
        };

        let position = match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => {
                let valid = longitude.is_finite()
                    && latitude.is_finite()
                    && (-180.0..=180.0).contains(&longitude)
                    && (-90.0..=90.0).contains(&latitude);
                if !valid {
                    return Err(InvalidReport::CoordinatesOutOfRange {
                        longitude,
                        latitude,
                    });
                }
                Some(Position {
                    longitude,
                    latitude,
                })
            }
            (None, None) => None,
            _ => return Err(InvalidReport::UnpairedCoordinates),
        };

        let signal_quality = self
            .gateways
            .iter()
            .flat_map(|gateway| [gateway.rssi, gateway.snr])
            .flatten()
            .fold(None, |best: Option<f64>, value| {
                Some(match best {
                    Some(best) => best.max(value),
                    None => value,
                })
            });

        Ok(ReportPayload {
            device_id,
            status_code: self.status_code,
            timestamp,
            position,
            telemetry: Telemetry {
                altitude: self.altitude,
                temperature: self.temperature,
                battery: self.battery,
                satellite_count: self.satellite_count,
                signal_quality,
                status_code: self.status_code,
            },
        })
    }
}
