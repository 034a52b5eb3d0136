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

//! Integration tests for the per-frame snapshot pipeline: a render loop
//! consuming a [`ViewCache`] while application and tracker threads keep
//! mutating the live view objects.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use approx::assert_relative_eq;
use opsis_core::environment::Sensor;
use opsis_core::math::{Mat4, Vec3, EPSILON, FRAC_PI_4};
use opsis_core::viewpoint::Viewpoint;
use opsis_core::{DirtyFlags, EnvironmentError, View, ViewCache, ViewCacheError};

fn tracked_view() -> (Arc<View>, Arc<Sensor>) {
    let view = Arc::new(View::new());
    view.attach_viewpoint(Arc::new(Viewpoint::new()));
    let sensor = Arc::new(Sensor::new());
    view.physical_environment().set_sensor(0, Some(sensor.clone()));
    view.set_tracking_enable(true);
    (view, sensor)
}

fn assert_mat4_near(actual: &Mat4, expected: &Mat4) {
    for col in 0..4 {
        for row in 0..4 {
            assert_relative_eq!(
                actual.cols[col].get(row),
                expected.cols[col].get(row),
                epsilon = EPSILON
            );
        }
    }
}

#[test]
fn test_frame_loop_reports_exact_changes() {
    let (view, sensor) = tracked_view();
    let cache = ViewCache::new(view.clone());

    // Frame 1: everything is new.
    cache.snapshot().expect("snapshot failed");
    cache.compute_derived_data().expect("derive failed");
    assert_eq!(cache.frame().drain_dirty(), DirtyFlags::ALL);

    // Frame 2: the application is quiet, but tracking is engaged, so the
    // fresh sensor reading still counts as a change.
    cache.snapshot().expect("snapshot failed");
    assert_eq!(cache.frame().drain_dirty(), DirtyFlags::TRACKING_ENABLE);

    // Frame 3: one view change and one body change land together with the
    // latest tracker reading.
    view.set_field_of_view(1.1);
    view.physical_body()
        .set_left_eye_position(Vec3::new(-0.031, 0.0, 0.0));
    sensor.update(Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0)));

    cache.snapshot().expect("snapshot failed");
    cache.compute_derived_data().expect("derive failed");

    let mut frame = cache.frame();
    assert_eq!(
        frame.drain_dirty(),
        DirtyFlags::FIELD_OF_VIEW | DirtyFlags::BODY_GEOMETRY | DirtyFlags::TRACKING_ENABLE
    );
    assert_relative_eq!(frame.field_of_view(), 1.1, epsilon = EPSILON);
    assert_eq!(
        *frame.left_eye_position_in_head(),
        Vec3::new(-0.031, 0.0, 0.0)
    );
    assert_eq!(
        frame.tracker_base_to_head_tracker().translation(),
        Vec3::new(0.0, -1.6, 0.0)
    );
}

#[test]
fn test_sensor_unplug_and_replug_recovers_without_losing_changes() {
    let (view, sensor) = tracked_view();
    let env = view.physical_environment();
    // A second sensor keeps tracking available while the head slot is empty.
    env.set_sensor(1, Some(Arc::new(Sensor::new())));
    sensor.update(Mat4::from_translation(Vec3::new(0.0, 1.55, 0.0)));

    let cache = ViewCache::new(view.clone());
    cache.snapshot().expect("snapshot failed");
    cache.compute_derived_data().expect("derive failed");
    cache.frame().drain_dirty();

    // The head sensor is unplugged and a view change lands before the
    // next frame.
    env.set_sensor(0, None);
    view.set_field_of_view(0.9);

    let err = cache.snapshot().expect_err("head slot is empty");
    assert_eq!(
        err,
        ViewCacheError::Environment(EnvironmentError::SensorUnavailable { index: 0 })
    );

    // The failed frame keeps rendering with the previous tracker data; the
    // view section had already been copied.
    {
        let frame = cache.frame();
        assert_relative_eq!(frame.field_of_view(), 0.9, epsilon = EPSILON);
        assert_eq!(
            frame.head_tracker_to_tracker_base().translation(),
            Vec3::new(0.0, 1.55, 0.0)
        );
    }

    // Replugging recovers, and no change bit was dropped on the way: the
    // view change was folded in by the failed snapshot and the environment
    // kept its calibration change pending.
    env.set_sensor(0, Some(sensor));
    cache.snapshot().expect("snapshot failed");
    cache.compute_derived_data().expect("derive failed");

    let drained = cache.frame().drain_dirty();
    assert!(drained.contains(DirtyFlags::FIELD_OF_VIEW));
    assert!(drained.contains(DirtyFlags::TRACKER_CALIBRATION));
    assert!(drained.contains(DirtyFlags::TRACKING_ENABLE));
}

#[test]
fn test_concurrent_tracker_and_application_threads() {
    let (view, sensor) = tracked_view();
    let cache = Arc::new(ViewCache::new(view.clone()));

    // Tracker thread: a head bobbing upward, one reading at a time.
    let tracker_sensor = sensor.clone();
    let tracker = thread::spawn(move || {
        for step in 0..300 {
            let y = 1.5 + step as f32 * 0.001;
            tracker_sensor.update(Mat4::from_translation(Vec3::new(0.0, y, 0.0)));
            thread::sleep(Duration::from_micros(50));
        }
    });

    // Application thread: toggles the field of view a few times.
    let app_view = view.clone();
    let app = thread::spawn(move || {
        for step in 0..20 {
            let fov = if step % 2 == 0 { 0.9 } else { 1.2 };
            app_view.set_field_of_view(fov);
            thread::sleep(Duration::from_micros(500));
        }
    });

    // Render loop: snapshot, derive, read. Every frame must be internally
    // consistent no matter how the writers interleave.
    let mut seen = DirtyFlags::EMPTY;
    for _ in 0..100 {
        cache.snapshot().expect("snapshot failed");
        cache.compute_derived_data().expect("derive failed");

        let mut frame = cache.frame();
        seen |= frame.drain_dirty();

        // The derived inverse must match the snapshotted reading, not
        // whatever the sensor holds by now.
        let product = *frame.tracker_base_to_head_tracker() * *frame.head_tracker_to_tracker_base();
        assert_mat4_near(&product, &Mat4::IDENTITY);

        let fov = frame.field_of_view();
        assert!(
            (fov - FRAC_PI_4).abs() < EPSILON
                || (fov - 0.9).abs() < EPSILON
                || (fov - 1.2).abs() < EPSILON,
            "torn field of view: {fov}"
        );
        drop(frame);

        thread::sleep(Duration::from_micros(200));
    }

    tracker.join().expect("Tracker thread join failed");
    app.join().expect("Application thread join failed");

    // One last frame observes anything the loop raced past.
    cache.snapshot().expect("snapshot failed");
    cache.compute_derived_data().expect("derive failed");
    let mut frame = cache.frame();
    seen |= frame.drain_dirty();

    assert!(seen.contains(DirtyFlags::FIELD_OF_VIEW));
    assert!(seen.contains(DirtyFlags::TRACKING_ENABLE));
    assert_eq!(
        frame.head_tracker_to_tracker_base().translation(),
        Vec3::new(0.0, 1.5 + 299.0 * 0.001, 0.0)
    );
}
