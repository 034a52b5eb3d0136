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

//! The per-frame cache of view state and its derived transforms.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::dirty::DirtyFlags;
use crate::error::ViewCacheError;
use crate::math::{Mat4, Vec3};
use crate::policies::{
    ClipPolicy, CoexistenceCenterPolicy, MonoscopicViewPolicy, ProjectionPolicy,
    ScreenScalePolicy, ViewAttachPolicy, ViewPolicy, VisibilityPolicy, WindowEyepointPolicy,
    WindowMovementPolicy, WindowResizePolicy,
};
use crate::view::View;
use crate::viewpoint::Viewpoint;

/// A per-view cache of everything canvas-independent the renderer needs
/// for one frame.
///
/// Once per frame the render thread calls [`snapshot`](Self::snapshot) to
/// copy the volatile configuration out of the view and its collaborators,
/// then [`compute_derived_data`](Self::compute_derived_data) to resolve
/// the head-tracking transforms, and finally reads the consistent result
/// through [`frame`](Self::frame). Application, input, and tracker threads
/// keep mutating the live objects concurrently; they are never blocked for
/// longer than one collaborator copy.
#[derive(Debug)]
pub struct ViewCache {
    view: Arc<View>,
    state: Mutex<CacheState>,
}

/// The cached fields. Everything here is written only by `snapshot` and
/// `compute_derived_data`, under the cache's own lock.
#[derive(Debug, Default)]
struct CacheState {
    // Aggregate change mask; accumulates across snapshots until drained.
    dirty: DirtyFlags,

    // From the View.
    view_policy: ViewPolicy,
    projection_policy: ProjectionPolicy,
    screen_scale_policy: ScreenScalePolicy,
    screen_scale: f32,
    window_resize_policy: WindowResizePolicy,
    window_movement_policy: WindowMovementPolicy,
    window_eyepoint_policy: WindowEyepointPolicy,
    monoscopic_view_policy: MonoscopicViewPolicy,
    field_of_view: f32,
    front_clip_distance: f32,
    back_clip_distance: f32,
    front_clip_policy: ClipPolicy,
    back_clip_policy: ClipPolicy,
    visibility_policy: VisibilityPolicy,
    tracking_enable: bool,
    user_head_to_vworld_enable: bool,
    compatibility_mode_enable: bool,
    compat_vpc_to_ec: Mat4,
    compat_left_projection: Mat4,
    compat_right_projection: Mat4,
    coexistence_centering_enable: bool,
    left_manual_eye_in_coexistence: Vec3,
    right_manual_eye_in_coexistence: Vec3,

    // From the Viewpoint. The cache retains the node it observed so the
    // consumer sees a stable reference for the frame.
    viewpoint: Option<Arc<Viewpoint>>,
    view_attach_policy: ViewAttachPolicy,

    // From the PhysicalEnvironment.
    coexistence_to_tracker_base: Mat4,
    coexistence_center_policy: CoexistenceCenterPolicy,
    tracking_available: bool,
    head_index: usize,
    head_tracker_to_tracker_base: Mat4,

    // From the PhysicalBody.
    left_eye_position_in_head: Vec3,
    right_eye_position_in_head: Vec3,
    left_ear_position_in_head: Vec3,
    right_ear_position_in_head: Vec3,
    nominal_eye_height_from_ground: f32,
    nominal_eye_offset_from_nominal_screen: f32,
    head_to_head_tracker: Mat4,

    // Derived data.
    do_head_tracking: bool,
    tracker_base_to_head_tracker: Mat4,
    user_head_to_vworld: Mat4,
}

impl ViewCache {
    /// Creates a cache bound to `view` for its whole lifetime.
    ///
    /// The cached values are zeros, identities, and default policies until
    /// the first [`snapshot`](Self::snapshot) runs.
    pub fn new(view: Arc<View>) -> Self {
        log::trace!("ViewCache: constructed");
        Self {
            view,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Returns the view this cache is bound to.
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Takes a snapshot of all per-view parameters and input values.
    ///
    /// Collaborators are visited in a fixed order, each under its own lock:
    /// view, viewpoint, physical environment, physical body. Each visit
    /// folds the collaborator's pending change mask into the aggregate and
    /// copies its fields. When no viewpoint is attached the remaining
    /// sections are skipped and keep their previous values; that is not an
    /// error. Head tracking is resolved inside the environment visit, and
    /// a fresh tracker reading raises [`DirtyFlags::TRACKING_ENABLE`].
    ///
    /// The collaborators are copied one after another, not atomically as a
    /// group: a mutation landing between two visits is split across this
    /// snapshot and the next.
    ///
    /// # Errors
    ///
    /// Returns the environment's own error unchanged when tracking is
    /// engaged but the head sensor slot is empty or out of range. Sections
    /// copied before the failure stay copied; their consumed change bits
    /// are already in the aggregate, so nothing is lost.
    pub fn snapshot(&self) -> Result<(), ViewCacheError> {
        let mut cache = self.state.lock().unwrap();

        // View parameters.
        let vs = self.view.sample();
        cache.dirty |= vs.dirty;
        cache.view_policy = vs.view_policy;
        cache.projection_policy = vs.projection_policy;
        cache.screen_scale_policy = vs.screen_scale_policy;
        cache.screen_scale = vs.screen_scale;
        cache.window_resize_policy = vs.window_resize_policy;
        cache.window_movement_policy = vs.window_movement_policy;
        cache.window_eyepoint_policy = vs.window_eyepoint_policy;
        cache.monoscopic_view_policy = vs.monoscopic_view_policy;
        cache.field_of_view = vs.field_of_view;
        cache.front_clip_distance = vs.front_clip_distance;
        cache.back_clip_distance = vs.back_clip_distance;
        cache.front_clip_policy = vs.front_clip_policy;
        cache.back_clip_policy = vs.back_clip_policy;
        cache.visibility_policy = vs.visibility_policy;
        cache.tracking_enable = vs.tracking_enable;
        cache.user_head_to_vworld_enable = vs.user_head_to_vworld_enable;
        cache.compatibility_mode_enable = vs.compatibility_mode_enable;
        cache.compat_vpc_to_ec = vs.compat_vpc_to_ec;
        cache.compat_left_projection = vs.compat_left_projection;
        cache.compat_right_projection = vs.compat_right_projection;
        cache.coexistence_centering_enable = vs.coexistence_centering_enable;
        cache.left_manual_eye_in_coexistence = vs.left_manual_eye_in_coexistence;
        cache.right_manual_eye_in_coexistence = vs.right_manual_eye_in_coexistence;

        // Viewpoint parameters. Detached is a legal transient state; the
        // remaining sections keep the previous frame's values.
        let viewpoint = match self.view.viewpoint() {
            Some(viewpoint) => viewpoint,
            None => {
                log::trace!("ViewCache: no viewpoint attached, snapshot kept previous values");
                return Ok(());
            }
        };
        let vps = viewpoint.sample();
        cache.dirty |= vps.dirty;
        cache.view_attach_policy = vps.view_attach_policy;
        cache.viewpoint = Some(viewpoint);

        // PhysicalEnvironment parameters. Head tracking is resolved under
        // the environment lock so the decision and the sensor read cannot
        // be torn apart by a concurrent deregistration.
        let es = self.view.physical_environment().sample(vs.tracking_enable)?;
        cache.dirty |= es.dirty;
        cache.coexistence_to_tracker_base = es.coexistence_to_tracker_base;
        cache.coexistence_center_policy = es.coexistence_center_policy;
        cache.tracking_available = es.tracking_available;
        cache.do_head_tracking = es.do_head_tracking;
        if let Some(index) = es.head_index {
            cache.head_index = index;
        }
        match es.head_tracker_to_tracker_base {
            Some(reading) => {
                cache.head_tracker_to_tracker_base = reading;
                // A fresh reading changes the eye positions downstream even
                // though no policy setter ran.
                cache.dirty |= DirtyFlags::TRACKING_ENABLE;
            }
            None => {
                cache.head_tracker_to_tracker_base = Mat4::IDENTITY;
            }
        }

        // PhysicalBody parameters.
        let bs = self.view.physical_body().sample();
        cache.dirty |= bs.dirty;
        cache.left_eye_position_in_head = bs.profile.left_eye_position;
        cache.right_eye_position_in_head = bs.profile.right_eye_position;
        cache.left_ear_position_in_head = bs.profile.left_ear_position;
        cache.right_ear_position_in_head = bs.profile.right_ear_position;
        cache.nominal_eye_height_from_ground = bs.profile.nominal_eye_height_from_ground;
        cache.nominal_eye_offset_from_nominal_screen =
            bs.profile.nominal_eye_offset_from_nominal_screen;
        cache.head_to_head_tracker = bs.head_to_head_tracker;

        Ok(())
    }

    /// Computes derived data from the current snapshot.
    ///
    /// While head tracking is engaged the tracker-base-to-head-tracker
    /// transform is the inverse of the snapshotted sensor reading;
    /// otherwise it is the identity. Idempotent between snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`ViewCacheError::SingularHeadTracker`] when the sensor
    /// reading cannot be inverted. The frame must not fall back to a
    /// default transform: rendering with a stale or made-up viewer pose
    /// is worse than failing the frame.
    pub fn compute_derived_data(&self) -> Result<(), ViewCacheError> {
        let mut cache = self.state.lock().unwrap();

        if cache.do_head_tracking {
            cache.tracker_base_to_head_tracker = cache
                .head_tracker_to_tracker_base
                .inverse()
                .ok_or(ViewCacheError::SingularHeadTracker)?;
        } else {
            cache.tracker_base_to_head_tracker = Mat4::IDENTITY;
        }

        // TODO: derive user_head_to_vworld from the tracker data when
        // user_head_to_vworld_enable is set.
        cache.user_head_to_vworld = Mat4::IDENTITY;

        Ok(())
    }

    /// Locks the cache for reading and returns the accessor guard.
    ///
    /// The borrow rules make the frame contract explicit: every value read
    /// through the guard is valid exactly as long as the guard lives, and
    /// the next `snapshot` cannot start until it is dropped. Values are
    /// meaningful once `snapshot` has run.
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            state: self.state.lock().unwrap(),
        }
    }
}

/// Read access to the cached values of one frame.
///
/// Returned by [`ViewCache::frame`]. Scalar and policy values are returned
/// by copy; transforms and positions are borrowed from the cache and live
/// as long as the guard.
#[derive(Debug)]
pub struct FrameView<'a> {
    state: MutexGuard<'a, CacheState>,
}

impl FrameView<'_> {
    /// The accumulated change mask, left in place.
    pub fn dirty(&self) -> DirtyFlags {
        self.state.dirty
    }

    /// Returns the accumulated change mask and clears it.
    ///
    /// The mask is additive across snapshots, so a consumer draining once
    /// per frame sees exactly what changed since its previous frame. There
    /// is one aggregate mask per cache: a second reader draining it would
    /// starve the first.
    pub fn drain_dirty(&mut self) -> DirtyFlags {
        let drained = self.state.dirty;
        self.state.dirty = DirtyFlags::EMPTY;
        drained
    }

    // --- View parameters ---

    /// The major view computation mode.
    pub fn view_policy(&self) -> ViewPolicy {
        self.state.view_policy
    }

    /// The projection policy.
    pub fn projection_policy(&self) -> ProjectionPolicy {
        self.state.projection_policy
    }

    /// The screen scale policy.
    pub fn screen_scale_policy(&self) -> ScreenScalePolicy {
        self.state.screen_scale_policy
    }

    /// The explicit screen scale value.
    pub fn screen_scale(&self) -> f32 {
        self.state.screen_scale
    }

    /// The window resize policy.
    pub fn window_resize_policy(&self) -> WindowResizePolicy {
        self.state.window_resize_policy
    }

    /// The window movement policy.
    pub fn window_movement_policy(&self) -> WindowMovementPolicy {
        self.state.window_movement_policy
    }

    /// The window eyepoint policy.
    pub fn window_eyepoint_policy(&self) -> WindowEyepointPolicy {
        self.state.window_eyepoint_policy
    }

    /// The monoscopic view policy.
    pub fn monoscopic_view_policy(&self) -> MonoscopicViewPolicy {
        self.state.monoscopic_view_policy
    }

    /// The field of view in radians.
    pub fn field_of_view(&self) -> f32 {
        self.state.field_of_view
    }

    /// The front clip distance.
    pub fn front_clip_distance(&self) -> f32 {
        self.state.front_clip_distance
    }

    /// The back clip distance.
    pub fn back_clip_distance(&self) -> f32 {
        self.state.back_clip_distance
    }

    /// The space the front clip distance is measured in.
    pub fn front_clip_policy(&self) -> ClipPolicy {
        self.state.front_clip_policy
    }

    /// The space the back clip distance is measured in.
    pub fn back_clip_policy(&self) -> ClipPolicy {
        self.state.back_clip_policy
    }

    /// The visibility policy.
    pub fn visibility_policy(&self) -> VisibilityPolicy {
        self.state.visibility_policy
    }

    /// Whether the application had tracking enabled at snapshot time.
    pub fn tracking_enable(&self) -> bool {
        self.state.tracking_enable
    }

    /// Whether continuous head-to-world updating was requested.
    pub fn user_head_to_vworld_enable(&self) -> bool {
        self.state.user_head_to_vworld_enable
    }

    /// Whether compatibility mode was enabled.
    pub fn compatibility_mode_enable(&self) -> bool {
        self.state.compatibility_mode_enable
    }

    /// The compatibility-mode view transform.
    pub fn compat_vpc_to_ec(&self) -> &Mat4 {
        &self.state.compat_vpc_to_ec
    }

    /// The compatibility-mode left projection transform.
    pub fn compat_left_projection(&self) -> &Mat4 {
        &self.state.compat_left_projection
    }

    /// The compatibility-mode right projection transform.
    pub fn compat_right_projection(&self) -> &Mat4 {
        &self.state.compat_right_projection
    }

    /// Whether coexistence centering was enabled.
    pub fn coexistence_centering_enable(&self) -> bool {
        self.state.coexistence_centering_enable
    }

    /// The manual left eye position in coexistence coordinates.
    pub fn left_manual_eye_in_coexistence(&self) -> &Vec3 {
        &self.state.left_manual_eye_in_coexistence
    }

    /// The manual right eye position in coexistence coordinates.
    pub fn right_manual_eye_in_coexistence(&self) -> &Vec3 {
        &self.state.right_manual_eye_in_coexistence
    }

    // --- Viewpoint parameters ---

    /// The viewpoint observed by the last snapshot that saw one.
    pub fn viewpoint(&self) -> Option<&Arc<Viewpoint>> {
        self.state.viewpoint.as_ref()
    }

    /// The view attach policy.
    pub fn view_attach_policy(&self) -> ViewAttachPolicy {
        self.state.view_attach_policy
    }

    // --- PhysicalEnvironment parameters ---

    /// The coexistence-to-tracker-base calibration transform.
    pub fn coexistence_to_tracker_base(&self) -> &Mat4 {
        &self.state.coexistence_to_tracker_base
    }

    /// The coexistence center policy.
    pub fn coexistence_center_policy(&self) -> CoexistenceCenterPolicy {
        self.state.coexistence_center_policy
    }

    /// Whether the environment had a sensor available at snapshot time.
    pub fn tracking_available(&self) -> bool {
        self.state.tracking_available
    }

    /// The head tracker's sensor slot index, as of the last snapshot that
    /// engaged tracking.
    pub fn head_index(&self) -> usize {
        self.state.head_index
    }

    /// The raw head tracker reading; identity when the last snapshot did
    /// not engage tracking.
    pub fn head_tracker_to_tracker_base(&self) -> &Mat4 {
        &self.state.head_tracker_to_tracker_base
    }

    // --- PhysicalBody parameters ---

    /// The left eye's position in head coordinates.
    pub fn left_eye_position_in_head(&self) -> &Vec3 {
        &self.state.left_eye_position_in_head
    }

    /// The right eye's position in head coordinates.
    pub fn right_eye_position_in_head(&self) -> &Vec3 {
        &self.state.right_eye_position_in_head
    }

    /// The left ear's position in head coordinates.
    pub fn left_ear_position_in_head(&self) -> &Vec3 {
        &self.state.left_ear_position_in_head
    }

    /// The right ear's position in head coordinates.
    pub fn right_ear_position_in_head(&self) -> &Vec3 {
        &self.state.right_ear_position_in_head
    }

    /// The nominal eye height from the ground plane.
    pub fn nominal_eye_height_from_ground(&self) -> f32 {
        self.state.nominal_eye_height_from_ground
    }

    /// The nominal eye offset from the nominal screen.
    pub fn nominal_eye_offset_from_nominal_screen(&self) -> f32 {
        self.state.nominal_eye_offset_from_nominal_screen
    }

    /// The head-to-head-tracker calibration transform.
    pub fn head_to_head_tracker(&self) -> &Mat4 {
        &self.state.head_to_head_tracker
    }

    // --- Derived data ---

    /// Whether head tracking was engaged for this frame (enabled by the
    /// view AND available in the environment at snapshot time).
    pub fn do_head_tracking(&self) -> bool {
        self.state.do_head_tracking
    }

    /// The inverse of the head tracker reading; identity while tracking
    /// is not engaged.
    pub fn tracker_base_to_head_tracker(&self) -> &Mat4 {
        &self.state.tracker_base_to_head_tracker
    }

    /// The user-head-to-virtual-world transform. Continuous updating is
    /// not implemented; this is always the identity.
    pub fn user_head_to_vworld(&self) -> &Mat4 {
        &self.state.user_head_to_vworld
    }
}
