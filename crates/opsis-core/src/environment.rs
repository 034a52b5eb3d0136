// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The physical tracking environment: sensors and coexistence calibration.

use std::sync::{Arc, Mutex};

use crate::dirty::DirtyFlags;
use crate::error::EnvironmentError;
use crate::math::Mat4;
use crate::policies::CoexistenceCenterPolicy;

/// The default number of sensor slots in a fresh environment.
pub const DEFAULT_SENSOR_COUNT: usize = 3;

/// A latest-value cell holding the most recent reading of one tracking
/// device.
///
/// A device or driver thread publishes readings with [`Sensor::update`];
/// the snapshot pass consumes the latest one with [`Sensor::read`]. The
/// reading for a head tracker is the head-tracker-to-tracker-base
/// transform.
#[derive(Debug)]
pub struct Sensor {
    reading: Mutex<Mat4>,
}

impl Sensor {
    /// Creates a sensor whose initial reading is the identity transform.
    pub fn new() -> Self {
        Self {
            reading: Mutex::new(Mat4::IDENTITY),
        }
    }

    /// Publishes a new reading, replacing the previous one.
    pub fn update(&self, reading: Mat4) {
        *self.reading.lock().unwrap() = reading;
    }

    /// Returns the latest published reading.
    pub fn read(&self) -> Mat4 {
        *self.reading.lock().unwrap()
    }
}

impl Default for Sensor {
    fn default() -> Self {
        Self::new()
    }
}

/// The physical environment a view is displayed in: registered tracking
/// sensors, which of them tracks the head, and the calibration aligning
/// coexistence coordinates with tracker-base coordinates.
#[derive(Debug)]
pub struct PhysicalEnvironment {
    state: Mutex<EnvironmentState>,
}

#[derive(Debug)]
struct EnvironmentState {
    coexistence_to_tracker_base: Mat4,
    sensors: Vec<Option<Arc<Sensor>>>,
    head_index: usize,
    coexistence_center_policy: CoexistenceCenterPolicy,
    dirty: DirtyFlags,
}

/// One-lock copy of the environment fields plus the drained pending mask.
///
/// `head_index` and `head_tracker_to_tracker_base` carry values only when
/// head tracking resolved to active for this snapshot; otherwise the cache
/// keeps its previous head index and stores the identity reading.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvironmentSample {
    pub coexistence_to_tracker_base: Mat4,
    pub coexistence_center_policy: CoexistenceCenterPolicy,
    pub tracking_available: bool,
    pub do_head_tracking: bool,
    pub head_index: Option<usize>,
    pub head_tracker_to_tracker_base: Option<Mat4>,
    pub dirty: DirtyFlags,
}

impl PhysicalEnvironment {
    /// Creates an environment with [`DEFAULT_SENSOR_COUNT`] empty sensor
    /// slots.
    ///
    /// A fresh environment reports all of its categories as pending so the
    /// first snapshot observing it recomputes everything.
    pub fn new() -> Self {
        Self::with_sensor_count(DEFAULT_SENSOR_COUNT)
    }

    /// Creates an environment with `sensor_count` empty sensor slots.
    pub fn with_sensor_count(sensor_count: usize) -> Self {
        Self {
            state: Mutex::new(EnvironmentState {
                coexistence_to_tracker_base: Mat4::IDENTITY,
                sensors: vec![None; sensor_count],
                head_index: 0,
                coexistence_center_policy: CoexistenceCenterPolicy::default(),
                dirty: DirtyFlags::ALL_ENVIRONMENT,
            }),
        }
    }

    /// Returns the coexistence-to-tracker-base calibration transform.
    pub fn coexistence_to_tracker_base(&self) -> Mat4 {
        self.state.lock().unwrap().coexistence_to_tracker_base
    }

    /// Sets the coexistence-to-tracker-base calibration transform.
    pub fn set_coexistence_to_tracker_base(&self, transform: Mat4) {
        let mut state = self.state.lock().unwrap();
        state.coexistence_to_tracker_base = transform;
        state.dirty.insert(DirtyFlags::TRACKER_CALIBRATION);
    }

    /// Returns the number of sensor slots.
    pub fn sensor_count(&self) -> usize {
        self.state.lock().unwrap().sensors.len()
    }

    /// Resizes the sensor slot array, dropping any sensors registered
    /// beyond the new count.
    pub fn set_sensor_count(&self, sensor_count: usize) {
        let mut state = self.state.lock().unwrap();
        state.sensors.resize(sensor_count, None);
        state.dirty.insert(DirtyFlags::TRACKER_CALIBRATION);
    }

    /// Returns the sensor registered in `index`, if any.
    pub fn sensor(&self, index: usize) -> Option<Arc<Sensor>> {
        self.state
            .lock()
            .unwrap()
            .sensors
            .get(index)
            .and_then(|slot| slot.clone())
    }

    /// Registers `sensor` in slot `index`, replacing any previous one.
    /// Registering `None` empties the slot.
    ///
    /// # Panics
    /// Panics if `index` is not below the sensor count.
    pub fn set_sensor(&self, index: usize, sensor: Option<Arc<Sensor>>) {
        let mut state = self.state.lock().unwrap();
        let count = state.sensors.len();
        if index >= count {
            panic!("Sensor slot {index} out of range (sensor count {count})");
        }
        state.sensors[index] = sensor;
        state.dirty.insert(DirtyFlags::TRACKER_CALIBRATION);
    }

    /// Returns the slot index of the head tracker.
    pub fn head_index(&self) -> usize {
        self.state.lock().unwrap().head_index
    }

    /// Sets the slot index of the head tracker.
    pub fn set_head_index(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.head_index = index;
        state.dirty.insert(DirtyFlags::TRACKER_CALIBRATION);
    }

    /// Returns the coexistence center policy.
    pub fn coexistence_center_policy(&self) -> CoexistenceCenterPolicy {
        self.state.lock().unwrap().coexistence_center_policy
    }

    /// Sets the coexistence center policy.
    pub fn set_coexistence_center_policy(&self, policy: CoexistenceCenterPolicy) {
        let mut state = self.state.lock().unwrap();
        state.coexistence_center_policy = policy;
        state.dirty.insert(DirtyFlags::COEXISTENCE_CENTER_POLICY);
    }

    /// Whether the environment can track at all: true iff at least one
    /// sensor is registered.
    pub fn tracking_available(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .sensors
            .iter()
            .any(|slot| slot.is_some())
    }

    /// Copies the fields, resolves head tracking, and consumes the pending
    /// dirty mask, all under one lock acquisition.
    ///
    /// Head tracking resolves to active iff the view has tracking enabled
    /// AND a sensor is available; resolving it here keeps the decision and
    /// the sensor read under the same lock, so a concurrently deregistered
    /// sensor cannot be read. The sensor lock nests inside the environment
    /// lock; nothing takes them in the other order. The pending mask is
    /// consumed only on success: a failed read leaves every change pending
    /// for the next snapshot.
    pub(crate) fn sample(
        &self,
        tracking_enable: bool,
    ) -> Result<EnvironmentSample, EnvironmentError> {
        let mut state = self.state.lock().unwrap();

        let tracking_available = state.sensors.iter().any(|slot| slot.is_some());
        let do_head_tracking = tracking_enable && tracking_available;

        let (head_index, head_tracker_to_tracker_base) = if do_head_tracking {
            let index = state.head_index;
            let sensor = state
                .sensors
                .get(index)
                .and_then(|slot| slot.as_ref())
                .ok_or(EnvironmentError::SensorUnavailable { index })?;
            (Some(index), Some(sensor.read()))
        } else {
            (None, None)
        };

        let dirty = state.dirty;
        state.dirty = DirtyFlags::EMPTY;
        Ok(EnvironmentSample {
            coexistence_to_tracker_base: state.coexistence_to_tracker_base,
            coexistence_center_policy: state.coexistence_center_policy,
            tracking_available,
            do_head_tracking,
            head_index,
            head_tracker_to_tracker_base,
            dirty,
        })
    }
}

impl Default for PhysicalEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_fresh_environment() {
        let env = PhysicalEnvironment::new();
        assert_eq!(env.sensor_count(), DEFAULT_SENSOR_COUNT);
        assert_eq!(env.head_index(), 0);
        assert!(!env.tracking_available());
        assert_eq!(env.coexistence_to_tracker_base(), Mat4::IDENTITY);
    }

    #[test]
    fn test_sensor_registration_drives_availability() {
        let env = PhysicalEnvironment::new();
        let sensor = Arc::new(Sensor::new());

        env.set_sensor(1, Some(sensor.clone()));
        assert!(env.tracking_available());
        assert!(env.sensor(1).is_some());
        assert!(env.sensor(0).is_none());

        env.set_sensor(1, None);
        assert!(!env.tracking_available());
    }

    #[test]
    #[should_panic]
    fn test_set_sensor_out_of_range_panics() {
        let env = PhysicalEnvironment::with_sensor_count(1);
        env.set_sensor(1, Some(Arc::new(Sensor::new())));
    }

    #[test]
    fn test_sample_without_tracking() {
        let env = PhysicalEnvironment::new();
        let sample = env.sample(true).unwrap();
        assert!(!sample.do_head_tracking); // enabled but no sensor
        assert!(sample.head_tracker_to_tracker_base.is_none());
        assert_eq!(sample.dirty, DirtyFlags::ALL_ENVIRONMENT);

        let sample = env.sample(false).unwrap();
        assert!(!sample.do_head_tracking);
        assert!(sample.dirty.is_empty()); // consumed by the first sample
    }

    #[test]
    fn test_sample_reads_head_sensor() {
        let env = PhysicalEnvironment::new();
        let sensor = Arc::new(Sensor::new());
        sensor.update(Mat4::from_translation(Vec3::new(0.0, 1.7, 0.0)));
        env.set_sensor(0, Some(sensor));

        let sample = env.sample(true).unwrap();
        assert!(sample.do_head_tracking);
        assert_eq!(sample.head_index, Some(0));
        assert_eq!(
            sample.head_tracker_to_tracker_base.unwrap().translation(),
            Vec3::new(0.0, 1.7, 0.0)
        );
    }

    #[test]
    fn test_sample_empty_head_slot_fails() {
        let env = PhysicalEnvironment::new();
        env.set_sensor(1, Some(Arc::new(Sensor::new())));
        env.set_head_index(0); // available via slot 1, but head slot is empty

        let err = env.sample(true).unwrap_err();
        assert_eq!(err, EnvironmentError::SensorUnavailable { index: 0 });

        // The failure must not consume the pending changes.
        let sample = env.sample(false).unwrap();
        assert!(sample.dirty.contains(DirtyFlags::ALL_ENVIRONMENT));
    }

    #[test]
    fn test_sample_head_index_out_of_range_fails() {
        let env = PhysicalEnvironment::with_sensor_count(2);
        env.set_sensor(0, Some(Arc::new(Sensor::new())));
        env.set_head_index(7);

        let err = env.sample(true).unwrap_err();
        assert_eq!(err, EnvironmentError::SensorUnavailable { index: 7 });
    }

    #[test]
    fn test_sensor_latest_value_semantics() {
        let sensor = Sensor::new();
        assert_eq!(sensor.read(), Mat4::IDENTITY);

        sensor.update(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        sensor.update(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(sensor.read().translation(), Vec3::new(2.0, 0.0, 0.0));
    }
}
