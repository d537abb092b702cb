//! Wiring of one configured station: coordinator plus its sensors

use crate::api::{ApiConfig, HttpTransport, PollingFetcher};
use crate::coordinator::{CoordinatorState, StationCoordinator};
use crate::error::Result;
use crate::logging::get_logger;
use crate::sensor::{SensorState, StationSensor, build_sensors, station_id_from};
use std::sync::Arc;
use std::time::Duration;

pub struct Station {
    coordinator: Arc<StationCoordinator>,
    sensors: Arc<Vec<StationSensor>>,
    station_id: String,
}

impl Station {
    /// Build the coordinator, run the first refresh and register the sensors.
    ///
    /// Fails when the first refresh fails; the caller may retry later.
    pub async fn setup(
        config: ApiConfig,
        transport: Arc<dyn HttpTransport>,
        update_interval: Duration,
    ) -> Result<Self> {
        let coordinator = Arc::new(StationCoordinator::new(
            PollingFetcher::new(config, transport),
            update_interval,
        ));
        Self::from_coordinator(coordinator).await
    }

    /// Same as [`Station::setup`] for an already constructed coordinator
    pub async fn from_coordinator(coordinator: Arc<StationCoordinator>) -> Result<Self> {
        let first = coordinator.first_refresh().await?;
        let station_id = station_id_from(Some(first.as_ref()));
        coordinator.set_station_id(&station_id);
        let sensors = build_sensors(&station_id);

        get_logger("station").for_station(&station_id).info(&format!(
            "Registered {} sensors: {}",
            sensors.len(),
            sensors
                .iter()
                .map(StationSensor::unique_id)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        Ok(Self {
            coordinator,
            sensors: Arc::new(sensors),
            station_id,
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn coordinator(&self) -> Arc<StationCoordinator> {
        self.coordinator.clone()
    }

    pub fn sensors(&self) -> Arc<Vec<StationSensor>> {
        self.sensors.clone()
    }

    /// Current state of every sensor
    pub fn sensor_states(&self) -> Vec<SensorState> {
        sensor_states(&self.sensors, &self.coordinator.state())
    }
}

pub fn sensor_states(sensors: &[StationSensor], state: &CoordinatorState) -> Vec<SensorState> {
    sensors.iter().map(|s| s.state(state)).collect()
}
