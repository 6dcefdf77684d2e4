//! Network device (field equipment) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LintasError, LintasResult};

/// Physical plant equipment categories. ODC/ODP keep their industry
/// capitalization on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceType {
    #[serde(rename = "ODC")]
    Odc,
    #[serde(rename = "ODP")]
    Odp,
    #[serde(rename = "closure")]
    Closure,
    #[serde(rename = "router")]
    Router,
    #[serde(rename = "switch")]
    Switch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Inactive,
    Maintenance,
}

/// A piece of deployed network equipment with its map position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDevice {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub status: DeviceStatus,
    /// Total subscriber ports, where the device has any.
    pub port_count: Option<u32>,
    /// Ports currently patched to customers.
    pub ports_used: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNetworkDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    /// Defaults to [`DeviceStatus::Active`] when omitted.
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    pub port_count: Option<u32>,
    /// Defaults to 0 when omitted.
    #[serde(default)]
    pub ports_used: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields that can be updated on an existing device.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateNetworkDevice {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<DeviceType>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub status: Option<DeviceStatus>,
    pub port_count: Option<u32>,
    pub ports_used: Option<u32>,
    pub notes: Option<String>,
}

impl CreateNetworkDevice {
    pub fn validate(&self) -> LintasResult<()> {
        validate_name(&self.name)?;
        validate_coordinates(self.latitude, self.longitude)?;
        if let Some(port_count) = self.port_count {
            validate_port_count(port_count)?;
        }
        Ok(())
    }
}

impl UpdateNetworkDevice {
    pub fn validate(&self) -> LintasResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(latitude) = self.latitude {
            validate_latitude(latitude)?;
        }
        if let Some(longitude) = self.longitude {
            validate_longitude(longitude)?;
        }
        if let Some(port_count) = self.port_count {
            validate_port_count(port_count)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> LintasResult<()> {
    if name.trim().is_empty() {
        return Err(LintasError::validation("name", "name is required"));
    }
    if name.len() > 255 {
        return Err(LintasError::validation(
            "name",
            "name must not exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_coordinates(latitude: f64, longitude: f64) -> LintasResult<()> {
    validate_latitude(latitude)?;
    validate_longitude(longitude)
}

fn validate_latitude(latitude: f64) -> LintasResult<()> {
    // `contains` also rejects NaN.
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(LintasError::validation(
            "latitude",
            "latitude must be between -90 and 90",
        ));
    }
    Ok(())
}

fn validate_longitude(longitude: f64) -> LintasResult<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(LintasError::validation(
            "longitude",
            "longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

fn validate_port_count(port_count: u32) -> LintasResult<()> {
    if port_count == 0 {
        return Err(LintasError::validation(
            "port_count",
            "port_count must be at least 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateNetworkDevice {
        CreateNetworkDevice {
            name: "ODP-BDG-017".into(),
            device_type: DeviceType::Odp,
            latitude: -6.914744,
            longitude: 107.609810,
            address: None,
            status: None,
            port_count: Some(8),
            ports_used: None,
            notes: None,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut d = input();
        d.latitude = 90.5;
        let err = d.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "latitude"));

        let mut d = input();
        d.longitude = -180.001;
        let err = d.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "longitude"));

        let mut d = input();
        d.latitude = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn zero_port_count_is_rejected() {
        let mut d = input();
        d.port_count = Some(0);
        let err = d.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "port_count"));

        d.port_count = None;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn device_type_keeps_industry_capitalization() {
        assert_eq!(serde_json::to_string(&DeviceType::Odc).unwrap(), "\"ODC\"");
        assert_eq!(
            serde_json::to_string(&DeviceType::Closure).unwrap(),
            "\"closure\""
        );
        let back: DeviceType = serde_json::from_str("\"ODP\"").unwrap();
        assert_eq!(back, DeviceType::Odp);
    }
}
