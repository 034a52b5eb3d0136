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

//! The physical geometry of the viewer's body.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::dirty::DirtyFlags;
use crate::math::{Mat4, Vec3};

/// A serializable calibration profile for a [`PhysicalBody`].
///
/// Positions are in head coordinates and meters; the defaults describe a
/// nominal adult viewer seated in front of a desktop screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    /// The left eye's position in head coordinates.
    pub left_eye_position: Vec3,
    /// The right eye's position in head coordinates.
    pub right_eye_position: Vec3,
    /// The left ear's position in head coordinates.
    pub left_ear_position: Vec3,
    /// The right ear's position in head coordinates.
    pub right_ear_position: Vec3,
    /// The nominal eye height measured from the ground plane.
    pub nominal_eye_height_from_ground: f32,
    /// The offset between the system's viewpoint and the user's eye-point,
    /// allowing an over-the-shoulder view of the scene.
    pub nominal_eye_offset_from_nominal_screen: f32,
}

impl Default for BodyProfile {
    fn default() -> Self {
        Self {
            left_eye_position: Vec3::new(-0.033, 0.0, 0.0),
            right_eye_position: Vec3::new(0.033, 0.0, 0.0),
            left_ear_position: Vec3::new(-0.080, -0.030, 0.095),
            right_ear_position: Vec3::new(0.080, -0.030, 0.095),
            nominal_eye_height_from_ground: 1.68,
            nominal_eye_offset_from_nominal_screen: 0.4572,
        }
    }
}

/// The viewer's body geometry: eye and ear positions in head coordinates
/// plus the head-to-head-tracker calibration transform.
///
/// An input or calibration thread may update any field at any time; the
/// snapshot pass copies everything under one lock acquisition.
#[derive(Debug)]
pub struct PhysicalBody {
    state: Mutex<BodyState>,
}

#[derive(Debug)]
struct BodyState {
    profile: BodyProfile,
    head_to_head_tracker: Mat4,
    dirty: DirtyFlags,
}

/// One-lock copy of the body fields plus the drained pending mask.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BodySample {
    pub profile: BodyProfile,
    pub head_to_head_tracker: Mat4,
    pub dirty: DirtyFlags,
}

impl PhysicalBody {
    /// Creates a body with the nominal viewer geometry.
    ///
    /// A fresh body reports all of its categories as pending so the first
    /// snapshot observing it recomputes everything.
    pub fn new() -> Self {
        Self::from_profile(BodyProfile::default())
    }

    /// Creates a body from a stored calibration profile.
    pub fn from_profile(profile: BodyProfile) -> Self {
        Self {
            state: Mutex::new(BodyState {
                profile,
                head_to_head_tracker: Mat4::IDENTITY,
                dirty: DirtyFlags::ALL_BODY,
            }),
        }
    }

    /// Returns the current calibration profile.
    pub fn profile(&self) -> BodyProfile {
        self.state.lock().unwrap().profile
    }

    /// Replaces the whole calibration profile.
    pub fn set_profile(&self, profile: BodyProfile) {
        let mut state = self.state.lock().unwrap();
        state.profile = profile;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the left eye's position in head coordinates.
    pub fn left_eye_position(&self) -> Vec3 {
        self.state.lock().unwrap().profile.left_eye_position
    }

    /// Sets the left eye's position in head coordinates.
    pub fn set_left_eye_position(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.profile.left_eye_position = position;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the right eye's position in head coordinates.
    pub fn right_eye_position(&self) -> Vec3 {
        self.state.lock().unwrap().profile.right_eye_position
    }

    /// Sets the right eye's position in head coordinates.
    pub fn set_right_eye_position(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.profile.right_eye_position = position;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the left ear's position in head coordinates.
    pub fn left_ear_position(&self) -> Vec3 {
        self.state.lock().unwrap().profile.left_ear_position
    }

    /// Sets the left ear's position in head coordinates.
    pub fn set_left_ear_position(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.profile.left_ear_position = position;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the right ear's position in head coordinates.
    pub fn right_ear_position(&self) -> Vec3 {
        self.state.lock().unwrap().profile.right_ear_position
    }

    /// Sets the right ear's position in head coordinates.
    pub fn set_right_ear_position(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.profile.right_ear_position = position;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the nominal eye height from the ground plane.
    pub fn nominal_eye_height_from_ground(&self) -> f32 {
        self.state
            .lock()
            .unwrap()
            .profile
            .nominal_eye_height_from_ground
    }

    /// Sets the nominal eye height from the ground plane.
    pub fn set_nominal_eye_height_from_ground(&self, height: f32) {
        let mut state = self.state.lock().unwrap();
        state.profile.nominal_eye_height_from_ground = height;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the nominal eye offset from the nominal screen.
    pub fn nominal_eye_offset_from_nominal_screen(&self) -> f32 {
        self.state
            .lock()
            .unwrap()
            .profile
            .nominal_eye_offset_from_nominal_screen
    }

    /// Sets the nominal eye offset from the nominal screen.
    pub fn set_nominal_eye_offset_from_nominal_screen(&self, offset: f32) {
        let mut state = self.state.lock().unwrap();
        state.profile.nominal_eye_offset_from_nominal_screen = offset;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Returns the head-to-head-tracker calibration transform.
    ///
    /// This transform is a calibration constant consulted only while head
    /// tracking is active in screen-view mode.
    pub fn head_to_head_tracker(&self) -> Mat4 {
        self.state.lock().unwrap().head_to_head_tracker
    }

    /// Sets the head-to-head-tracker calibration transform.
    pub fn set_head_to_head_tracker(&self, transform: Mat4) {
        let mut state = self.state.lock().unwrap();
        state.head_to_head_tracker = transform;
        state.dirty.insert(DirtyFlags::BODY_GEOMETRY);
    }

    /// Copies the fields and consumes the pending dirty mask, all under
    /// one lock acquisition.
    pub(crate) fn sample(&self) -> BodySample {
        let mut state = self.state.lock().unwrap();
        let dirty = state.dirty;
        state.dirty = DirtyFlags::EMPTY;
        BodySample {
            profile: state.profile,
            head_to_head_tracker: state.head_to_head_tracker,
            dirty,
        }
    }
}

impl Default for PhysicalBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_nominal_viewer_defaults() {
        let body = PhysicalBody::new();
        assert_eq!(body.left_eye_position(), Vec3::new(-0.033, 0.0, 0.0));
        assert_eq!(body.right_eye_position(), Vec3::new(0.033, 0.0, 0.0));
        assert_eq!(body.left_ear_position(), Vec3::new(-0.080, -0.030, 0.095));
        assert_eq!(body.right_ear_position(), Vec3::new(0.080, -0.030, 0.095));
        assert!(approx_eq(body.nominal_eye_height_from_ground(), 1.68));
        assert!(approx_eq(
            body.nominal_eye_offset_from_nominal_screen(),
            0.4572
        ));
        assert_eq!(body.head_to_head_tracker(), Mat4::IDENTITY);
    }

    #[test]
    fn test_fresh_body_is_fully_pending() {
        let body = PhysicalBody::new();
        assert_eq!(body.sample().dirty, DirtyFlags::ALL_BODY);
        assert!(body.sample().dirty.is_empty());
    }

    #[test]
    fn test_setters_raise_body_geometry() {
        let body = PhysicalBody::new();
        body.sample();

        body.set_right_eye_position(Vec3::new(0.031, 0.0, 0.0));
        let sample = body.sample();
        assert!(sample.dirty.contains(DirtyFlags::BODY_GEOMETRY));
        assert_eq!(sample.profile.right_eye_position, Vec3::new(0.031, 0.0, 0.0));

        body.set_head_to_head_tracker(Mat4::from_translation(Vec3::new(0.0, 0.1, 0.0)));
        assert!(body.sample().dirty.contains(DirtyFlags::BODY_GEOMETRY));
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let mut profile = BodyProfile::default();
        profile.nominal_eye_height_from_ground = 1.75;

        let json = serde_json::to_string(&profile).unwrap();
        let back: BodyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);

        let body = PhysicalBody::from_profile(back);
        assert!(approx_eq(body.nominal_eye_height_from_ground(), 1.75));
    }
}
