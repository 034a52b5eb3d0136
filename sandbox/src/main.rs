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

// Opsis Sandbox
// Main binary for testing and demos: a fake render loop consuming a
// ViewCache while a tracker thread and an application thread keep
// mutating the live view objects.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use opsis_core::environment::Sensor;
use opsis_core::math::{Mat4, Vec3};
use opsis_core::policies::MonoscopicViewPolicy;
use opsis_core::viewpoint::Viewpoint;
use opsis_core::{View, ViewCache};

const TRACKER_STEPS: usize = 600;
const RENDER_FRAMES: usize = 120;

/// Simulated head tracker: a gentle sway around a standing viewer, with a
/// brief unplug in the middle of the run.
fn run_tracker(view: Arc<View>, head_sensor: Arc<Sensor>) {
    let env = view.physical_environment();
    for step in 0..TRACKER_STEPS {
        let t = step as f32 * 0.05;
        let sway = Mat4::from_translation(Vec3::new(
            0.05 * t.sin(),
            1.6 + 0.02 * (2.0 * t).sin(),
            0.0,
        )) * Mat4::from_rotation_y(0.1 * t.sin());
        head_sensor.update(sway);

        if step == TRACKER_STEPS / 2 {
            log::info!("tracker: unplugging the head sensor");
            env.set_sensor(0, None);
        }
        if step == TRACKER_STEPS / 2 + 30 {
            log::info!("tracker: head sensor is back");
            env.set_sensor(0, Some(head_sensor.clone()));
        }

        thread::sleep(Duration::from_millis(2));
    }
}

/// Simulated application logic: reconfigures the view a few times while
/// the render loop is running.
fn run_application(view: Arc<View>) {
    let changes: [(&str, &dyn Fn(&View)); 5] = [
        ("zoom in", &|v| v.set_field_of_view(0.6)),
        ("push back clip out", &|v| v.set_back_clip_distance(30.0)),
        ("switch to left eye view", &|v| {
            v.set_monoscopic_view_policy(MonoscopicViewPolicy::LeftEyeView)
        }),
        ("narrow the eye base", &|v| {
            v.physical_body()
                .set_left_eye_position(Vec3::new(-0.030, 0.0, 0.0));
            v.physical_body()
                .set_right_eye_position(Vec3::new(0.030, 0.0, 0.0));
        }),
        ("zoom back out", &|v| v.set_field_of_view(0.9)),
    ];

    for (what, change) in changes {
        thread::sleep(Duration::from_millis(150));
        log::info!("app: {what}");
        change(&view);
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    // One view, one scene anchor, one tracked head sensor plus a wand in
    // slot 1 so tracking stays available while the head slot is empty.
    let view = Arc::new(View::new());
    view.attach_viewpoint(Arc::new(Viewpoint::new()));

    let head_sensor = Arc::new(Sensor::new());
    let env = view.physical_environment();
    env.set_sensor(0, Some(head_sensor.clone()));
    env.set_sensor(1, Some(Arc::new(Sensor::new())));
    view.set_tracking_enable(true);

    let cache = ViewCache::new(view.clone());

    let tracker = {
        let view = view.clone();
        thread::spawn(move || run_tracker(view, head_sensor))
    };
    let app = {
        let view = view.clone();
        thread::spawn(move || run_application(view))
    };

    // The render loop. A failed snapshot or derivation skips the frame and
    // keeps presenting the previous one.
    let mut skipped = 0usize;
    for frame_index in 0..RENDER_FRAMES {
        if let Err(err) = cache.snapshot().and_then(|_| cache.compute_derived_data()) {
            log::warn!("frame {frame_index}: skipped ({err})");
            skipped += 1;
            thread::sleep(Duration::from_millis(8));
            continue;
        }

        let mut frame = cache.frame();
        let changed = frame.drain_dirty();
        if !changed.is_empty() {
            let head = frame.tracker_base_to_head_tracker().translation();
            log::info!(
                "frame {frame_index}: changed {changed:?}, tracking {}, fov {:.3}, head at ({:.3}, {:.3}, {:.3})",
                frame.do_head_tracking(),
                frame.field_of_view(),
                head.x,
                head.y,
                head.z,
            );
        }
        drop(frame);

        thread::sleep(Duration::from_millis(8));
    }

    tracker.join().expect("Tracker thread join failed");
    app.join().expect("Application thread join failed");

    log::info!(
        "rendered {} frames, skipped {skipped}",
        RENDER_FRAMES - skipped
    );
    Ok(())
}
