//! Sensor projections over the latest telemetry snapshot
//!
//! Each station exposes four read-only sensors. They share one descriptor type
//! (metric, unit, extractor, default) and are recomputed on every read; none
//! of them holds state of its own.

use crate::api::TelemetrySnapshot;
use crate::coordinator::CoordinatorState;
use crate::status::{UNKNOWN_LABEL, label_for};
use serde::Serialize;

/// Integration domain, used for device identifiers
pub const DOMAIN: &str = "starcharge";

/// Manufacturer reported on the device
pub const MANUFACTURER: &str = "StarCharge";

/// Station id used when the first snapshot carries none
pub const UNKNOWN_STATION_ID: &str = "unknown";

/// Value reported by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorMetric {
    Voltage,
    Current,
    Power,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Voltage,
    Current,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// Static description of one sensor kind
#[derive(Debug)]
pub struct SensorDescriptor {
    pub metric: SensorMetric,
    /// Suffix of the unique id, e.g. `voltage` in `A1_voltage`
    pub key: &'static str,
    /// Metric part of the display name
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub default: SensorValue,
    extract: fn(&TelemetrySnapshot) -> Option<SensorValue>,
}

impl SensorDescriptor {
    /// Value for `snapshot`, or the descriptor default when nothing applies
    pub fn read(&self, snapshot: Option<&TelemetrySnapshot>) -> SensorValue {
        snapshot
            .and_then(|s| (self.extract)(s))
            .unwrap_or(self.default)
    }
}

fn order_metric(snapshot: &TelemetrySnapshot, field: &str) -> Option<SensorValue> {
    snapshot.order_number(field).map(SensorValue::Number)
}

fn extract_voltage(snapshot: &TelemetrySnapshot) -> Option<SensorValue> {
    order_metric(snapshot, "voltage")
}

fn extract_current(snapshot: &TelemetrySnapshot) -> Option<SensorValue> {
    order_metric(snapshot, "current")
}

fn extract_power(snapshot: &TelemetrySnapshot) -> Option<SensorValue> {
    order_metric(snapshot, "kw")
}

fn extract_status(snapshot: &TelemetrySnapshot) -> Option<SensorValue> {
    Some(SensorValue::Text(label_for(
        snapshot.stub_status().unwrap_or_default(),
    )))
}

pub static VOLTAGE: SensorDescriptor = SensorDescriptor {
    metric: SensorMetric::Voltage,
    key: "voltage",
    name: "电压",
    unit: Some("V"),
    device_class: Some(DeviceClass::Voltage),
    state_class: Some(StateClass::Measurement),
    default: SensorValue::Number(0.0),
    extract: extract_voltage,
};

pub static CURRENT: SensorDescriptor = SensorDescriptor {
    metric: SensorMetric::Current,
    key: "current",
    name: "电流",
    unit: Some("A"),
    device_class: Some(DeviceClass::Current),
    state_class: Some(StateClass::Measurement),
    default: SensorValue::Number(0.0),
    extract: extract_current,
};

pub static POWER: SensorDescriptor = SensorDescriptor {
    metric: SensorMetric::Power,
    key: "power",
    name: "功率",
    unit: Some("kW"),
    device_class: Some(DeviceClass::Power),
    state_class: Some(StateClass::Measurement),
    default: SensorValue::Number(0.0),
    extract: extract_power,
};

pub static STATUS: SensorDescriptor = SensorDescriptor {
    metric: SensorMetric::Status,
    key: "status",
    name: "状态",
    unit: None,
    device_class: None,
    state_class: None,
    default: SensorValue::Text(UNKNOWN_LABEL),
    extract: extract_status,
};

/// Every sensor a station exposes, in registration order
pub static DESCRIPTORS: [&SensorDescriptor; 4] = [&VOLTAGE, &CURRENT, &POWER, &STATUS];

/// Device the sensors are grouped under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
}

/// Serializable view of one sensor at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub metric: SensorMetric,
    pub value: SensorValue,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    /// False while the last poll failed; `value` is then last-known
    pub available: bool,
}

/// One sensor bound to a station
#[derive(Debug, Clone)]
pub struct StationSensor {
    descriptor: &'static SensorDescriptor,
    station_id: String,
    unique_id: String,
    name: String,
}

impl StationSensor {
    pub fn new(descriptor: &'static SensorDescriptor, station_id: &str) -> Self {
        Self {
            descriptor,
            station_id: station_id.to_string(),
            unique_id: format!("{}_{}", station_id, descriptor.key),
            name: format!("{} {}", device_name(station_id), descriptor.name),
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.descriptor.unit
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), self.station_id.clone())],
            name: device_name(&self.station_id),
            manufacturer: MANUFACTURER.to_string(),
        }
    }

    pub fn read(&self, snapshot: Option<&TelemetrySnapshot>) -> SensorValue {
        self.descriptor.read(snapshot)
    }

    pub fn state(&self, coordinator: &CoordinatorState) -> SensorState {
        SensorState {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            metric: self.descriptor.metric,
            value: self.read(coordinator.snapshot.as_deref()),
            unit: self.descriptor.unit,
            device_class: self.descriptor.device_class,
            state_class: self.descriptor.state_class,
            available: coordinator.last_update_success,
        }
    }
}

fn device_name(station_id: &str) -> String {
    format!("充电桩{}", station_id)
}

/// Station id taken from a snapshot, or `unknown`
pub fn station_id_from(snapshot: Option<&TelemetrySnapshot>) -> String {
    snapshot
        .and_then(TelemetrySnapshot::stub_id)
        .unwrap_or_else(|| UNKNOWN_STATION_ID.to_string())
}

/// The four sensors of a station
pub fn build_sensors(station_id: &str) -> Vec<StationSensor> {
    DESCRIPTORS
        .iter()
        .copied()
        .map(|d| StationSensor::new(d, station_id))
        .collect()
}
