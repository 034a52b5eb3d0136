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

//! The live, application-mutable view configuration.

use std::sync::{Arc, Mutex};

use crate::body::PhysicalBody;
use crate::dirty::DirtyFlags;
use crate::environment::PhysicalEnvironment;
use crate::math::{Mat4, Vec3, FRAC_PI_4};
use crate::policies::{
    ClipPolicy, MonoscopicViewPolicy, ProjectionPolicy, ScreenScalePolicy, ViewPolicy,
    VisibilityPolicy, WindowEyepointPolicy, WindowMovementPolicy, WindowResizePolicy,
};
use crate::viewpoint::Viewpoint;

/// The live view configuration the application mutates between frames.
///
/// A view owns every per-view policy and transform, an optional attachment
/// to a [`Viewpoint`], and fixed bindings to the [`PhysicalEnvironment`]
/// and [`PhysicalBody`] it is displayed in. Every setter raises the
/// matching [`DirtyFlags`] category in the view's pending mask, which the
/// next snapshot consumes.
///
/// All methods take `&self`; the mutable state sits behind the view's own
/// lock so application, input, and render threads never require exclusive
/// ownership.
#[derive(Debug)]
pub struct View {
    state: Mutex<ViewState>,
    viewpoint: Mutex<Option<Arc<Viewpoint>>>,
    environment: Arc<PhysicalEnvironment>,
    body: Arc<PhysicalBody>,
}

#[derive(Debug)]
struct ViewState {
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
    dirty: DirtyFlags,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_policy: ViewPolicy::default(),
            projection_policy: ProjectionPolicy::default(),
            screen_scale_policy: ScreenScalePolicy::default(),
            screen_scale: 1.0,
            window_resize_policy: WindowResizePolicy::default(),
            window_movement_policy: WindowMovementPolicy::default(),
            window_eyepoint_policy: WindowEyepointPolicy::default(),
            monoscopic_view_policy: MonoscopicViewPolicy::default(),
            field_of_view: FRAC_PI_4,
            front_clip_distance: 0.1,
            back_clip_distance: 10.0,
            front_clip_policy: ClipPolicy::default(),
            back_clip_policy: ClipPolicy::default(),
            visibility_policy: VisibilityPolicy::default(),
            tracking_enable: false,
            user_head_to_vworld_enable: false,
            compatibility_mode_enable: false,
            compat_vpc_to_ec: Mat4::IDENTITY,
            compat_left_projection: Mat4::IDENTITY,
            compat_right_projection: Mat4::IDENTITY,
            coexistence_centering_enable: true,
            left_manual_eye_in_coexistence: Vec3::new(0.142, 0.135, 0.4572),
            right_manual_eye_in_coexistence: Vec3::new(0.208, 0.135, 0.4572),
            dirty: DirtyFlags::ALL_VIEW,
        }
    }
}

/// One-lock copy of the view fields plus the drained pending mask.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ViewSample {
    pub view_policy: ViewPolicy,
    pub projection_policy: ProjectionPolicy,
    pub screen_scale_policy: ScreenScalePolicy,
    pub screen_scale: f32,
    pub window_resize_policy: WindowResizePolicy,
    pub window_movement_policy: WindowMovementPolicy,
    pub window_eyepoint_policy: WindowEyepointPolicy,
    pub monoscopic_view_policy: MonoscopicViewPolicy,
    pub field_of_view: f32,
    pub front_clip_distance: f32,
    pub back_clip_distance: f32,
    pub front_clip_policy: ClipPolicy,
    pub back_clip_policy: ClipPolicy,
    pub visibility_policy: VisibilityPolicy,
    pub tracking_enable: bool,
    pub user_head_to_vworld_enable: bool,
    pub compatibility_mode_enable: bool,
    pub compat_vpc_to_ec: Mat4,
    pub compat_left_projection: Mat4,
    pub compat_right_projection: Mat4,
    pub coexistence_centering_enable: bool,
    pub left_manual_eye_in_coexistence: Vec3,
    pub right_manual_eye_in_coexistence: Vec3,
    pub dirty: DirtyFlags,
}

impl View {
    /// Creates a view with default policies, a fresh default
    /// [`PhysicalEnvironment`] and [`PhysicalBody`], and no viewpoint
    /// attached.
    ///
    /// A fresh view reports all of its categories as pending so the first
    /// snapshot observing it recomputes everything.
    pub fn new() -> Self {
        Self::with_physical(
            Arc::new(PhysicalEnvironment::new()),
            Arc::new(PhysicalBody::new()),
        )
    }

    /// Creates a view bound to an existing environment and body, so
    /// several views can share one physical setup.
    pub fn with_physical(environment: Arc<PhysicalEnvironment>, body: Arc<PhysicalBody>) -> Self {
        Self {
            state: Mutex::new(ViewState::default()),
            viewpoint: Mutex::new(None),
            environment,
            body,
        }
    }

    /// Returns the physical environment this view is displayed in.
    pub fn physical_environment(&self) -> &Arc<PhysicalEnvironment> {
        &self.environment
    }

    /// Returns the physical body viewing this view.
    pub fn physical_body(&self) -> &Arc<PhysicalBody> {
        &self.body
    }

    // --- Viewpoint attachment ---

    /// Attaches the view to a viewpoint node, replacing any previous
    /// attachment. The viewpoint's categories are marked pending so the
    /// next snapshot re-observes them.
    pub fn attach_viewpoint(&self, viewpoint: Arc<Viewpoint>) {
        viewpoint.mark_pending();
        *self.viewpoint.lock().unwrap() = Some(viewpoint);
    }

    /// Detaches the view from its viewpoint, if any.
    ///
    /// A detached view stays valid: snapshots succeed and keep the last
    /// observed viewpoint-dependent values until a new node is attached.
    pub fn detach_viewpoint(&self) {
        *self.viewpoint.lock().unwrap() = None;
    }

    /// Returns the currently attached viewpoint, if any.
    pub fn viewpoint(&self) -> Option<Arc<Viewpoint>> {
        self.viewpoint.lock().unwrap().clone()
    }

    // --- Policies ---

    /// Returns the major view computation mode.
    pub fn view_policy(&self) -> ViewPolicy {
        self.state.lock().unwrap().view_policy
    }

    /// Sets the major view computation mode.
    pub fn set_view_policy(&self, policy: ViewPolicy) {
        let mut state = self.state.lock().unwrap();
        state.view_policy = policy;
        state.dirty.insert(DirtyFlags::VIEW_POLICY);
    }

    /// Returns the projection policy.
    pub fn projection_policy(&self) -> ProjectionPolicy {
        self.state.lock().unwrap().projection_policy
    }

    /// Sets the projection policy.
    pub fn set_projection_policy(&self, policy: ProjectionPolicy) {
        let mut state = self.state.lock().unwrap();
        state.projection_policy = policy;
        state.dirty.insert(DirtyFlags::PROJECTION_POLICY);
    }

    /// Returns the screen scale policy.
    pub fn screen_scale_policy(&self) -> ScreenScalePolicy {
        self.state.lock().unwrap().screen_scale_policy
    }

    /// Sets the screen scale policy.
    pub fn set_screen_scale_policy(&self, policy: ScreenScalePolicy) {
        let mut state = self.state.lock().unwrap();
        state.screen_scale_policy = policy;
        state.dirty.insert(DirtyFlags::SCREEN_SCALE);
    }

    /// Returns the explicit screen scale value, consulted when the scale
    /// policy is [`ScreenScalePolicy::ScaleExplicit`].
    pub fn screen_scale(&self) -> f32 {
        self.state.lock().unwrap().screen_scale
    }

    /// Sets the explicit screen scale value.
    pub fn set_screen_scale(&self, scale: f32) {
        let mut state = self.state.lock().unwrap();
        state.screen_scale = scale;
        state.dirty.insert(DirtyFlags::SCREEN_SCALE);
    }

    /// Returns the window resize policy.
    pub fn window_resize_policy(&self) -> WindowResizePolicy {
        self.state.lock().unwrap().window_resize_policy
    }

    /// Sets the window resize policy.
    pub fn set_window_resize_policy(&self, policy: WindowResizePolicy) {
        let mut state = self.state.lock().unwrap();
        state.window_resize_policy = policy;
        state.dirty.insert(DirtyFlags::WINDOW_POLICY);
    }

    /// Returns the window movement policy.
    pub fn window_movement_policy(&self) -> WindowMovementPolicy {
        self.state.lock().unwrap().window_movement_policy
    }

    /// Sets the window movement policy.
    pub fn set_window_movement_policy(&self, policy: WindowMovementPolicy) {
        let mut state = self.state.lock().unwrap();
        state.window_movement_policy = policy;
        state.dirty.insert(DirtyFlags::WINDOW_POLICY);
    }

    /// Returns the window eyepoint policy.
    pub fn window_eyepoint_policy(&self) -> WindowEyepointPolicy {
        self.state.lock().unwrap().window_eyepoint_policy
    }

    /// Sets the window eyepoint policy.
    pub fn set_window_eyepoint_policy(&self, policy: WindowEyepointPolicy) {
        let mut state = self.state.lock().unwrap();
        state.window_eyepoint_policy = policy;
        state.dirty.insert(DirtyFlags::WINDOW_POLICY);
    }

    /// Returns the monoscopic view policy.
    pub fn monoscopic_view_policy(&self) -> MonoscopicViewPolicy {
        self.state.lock().unwrap().monoscopic_view_policy
    }

    /// Sets the monoscopic view policy.
    pub fn set_monoscopic_view_policy(&self, policy: MonoscopicViewPolicy) {
        let mut state = self.state.lock().unwrap();
        state.monoscopic_view_policy = policy;
        state.dirty.insert(DirtyFlags::MONOSCOPIC_VIEW_POLICY);
    }

    /// Returns the visibility policy.
    pub fn visibility_policy(&self) -> VisibilityPolicy {
        self.state.lock().unwrap().visibility_policy
    }

    /// Sets the visibility policy.
    pub fn set_visibility_policy(&self, policy: VisibilityPolicy) {
        let mut state = self.state.lock().unwrap();
        state.visibility_policy = policy;
        state.dirty.insert(DirtyFlags::VISIBILITY_POLICY);
    }

    // --- Field of view and clipping ---

    /// Returns the field of view in radians.
    pub fn field_of_view(&self) -> f32 {
        self.state.lock().unwrap().field_of_view
    }

    /// Sets the field of view in radians.
    pub fn set_field_of_view(&self, radians: f32) {
        let mut state = self.state.lock().unwrap();
        state.field_of_view = radians;
        state.dirty.insert(DirtyFlags::FIELD_OF_VIEW);
    }

    /// Returns the front clip distance.
    pub fn front_clip_distance(&self) -> f32 {
        self.state.lock().unwrap().front_clip_distance
    }

    /// Sets the front clip distance.
    pub fn set_front_clip_distance(&self, distance: f32) {
        let mut state = self.state.lock().unwrap();
        state.front_clip_distance = distance;
        state.dirty.insert(DirtyFlags::CLIP);
    }

    /// Returns the back clip distance.
    pub fn back_clip_distance(&self) -> f32 {
        self.state.lock().unwrap().back_clip_distance
    }

    /// Sets the back clip distance.
    pub fn set_back_clip_distance(&self, distance: f32) {
        let mut state = self.state.lock().unwrap();
        state.back_clip_distance = distance;
        state.dirty.insert(DirtyFlags::CLIP);
    }

    /// Returns the space the front clip distance is measured in.
    pub fn front_clip_policy(&self) -> ClipPolicy {
        self.state.lock().unwrap().front_clip_policy
    }

    /// Sets the space the front clip distance is measured in.
    pub fn set_front_clip_policy(&self, policy: ClipPolicy) {
        let mut state = self.state.lock().unwrap();
        state.front_clip_policy = policy;
        state.dirty.insert(DirtyFlags::CLIP);
    }

    /// Returns the space the back clip distance is measured in.
    pub fn back_clip_policy(&self) -> ClipPolicy {
        self.state.lock().unwrap().back_clip_policy
    }

    /// Sets the space the back clip distance is measured in.
    pub fn set_back_clip_policy(&self, policy: ClipPolicy) {
        let mut state = self.state.lock().unwrap();
        state.back_clip_policy = policy;
        state.dirty.insert(DirtyFlags::CLIP);
    }

    // --- Tracking ---

    /// Whether the application has asked for head tracking.
    ///
    /// Tracking actually engages only when the environment also has a
    /// sensor available; the snapshot resolves the two into
    /// `do_head_tracking`.
    pub fn tracking_enable(&self) -> bool {
        self.state.lock().unwrap().tracking_enable
    }

    /// Enables or disables head tracking.
    pub fn set_tracking_enable(&self, enable: bool) {
        let mut state = self.state.lock().unwrap();
        state.tracking_enable = enable;
        state.dirty.insert(DirtyFlags::TRACKING_ENABLE);
    }

    /// Whether continuous head-to-world updating is requested.
    pub fn user_head_to_vworld_enable(&self) -> bool {
        self.state.lock().unwrap().user_head_to_vworld_enable
    }

    /// Enables or disables continuous head-to-world updating.
    pub fn set_user_head_to_vworld_enable(&self, enable: bool) {
        let mut state = self.state.lock().unwrap();
        state.user_head_to_vworld_enable = enable;
        state.dirty.insert(DirtyFlags::HEAD_TO_VWORLD_ENABLE);
    }

    // --- Compatibility mode ---

    /// Whether compatibility mode is enabled. In compatibility mode the
    /// application supplies the view and projection transforms directly
    /// instead of having them derived from the physical configuration.
    pub fn compatibility_mode_enable(&self) -> bool {
        self.state.lock().unwrap().compatibility_mode_enable
    }

    /// Enables or disables compatibility mode.
    pub fn set_compatibility_mode_enable(&self, enable: bool) {
        let mut state = self.state.lock().unwrap();
        state.compatibility_mode_enable = enable;
        state.dirty.insert(DirtyFlags::COMPATIBILITY_MODE);
    }

    /// Returns the compatibility-mode view transform (view platform
    /// coordinates to eye coordinates).
    pub fn compat_vpc_to_ec(&self) -> Mat4 {
        self.state.lock().unwrap().compat_vpc_to_ec
    }

    /// Sets the compatibility-mode view transform.
    pub fn set_compat_vpc_to_ec(&self, transform: Mat4) {
        let mut state = self.state.lock().unwrap();
        state.compat_vpc_to_ec = transform;
        state.dirty.insert(DirtyFlags::COMPATIBILITY_MODE);
    }

    /// Returns the compatibility-mode left projection transform.
    pub fn compat_left_projection(&self) -> Mat4 {
        self.state.lock().unwrap().compat_left_projection
    }

    /// Sets the compatibility-mode left projection transform.
    pub fn set_compat_left_projection(&self, transform: Mat4) {
        let mut state = self.state.lock().unwrap();
        state.compat_left_projection = transform;
        state.dirty.insert(DirtyFlags::COMPATIBILITY_MODE);
    }

    /// Returns the compatibility-mode right projection transform.
    pub fn compat_right_projection(&self) -> Mat4 {
        self.state.lock().unwrap().compat_right_projection
    }

    /// Sets the compatibility-mode right projection transform.
    pub fn set_compat_right_projection(&self, transform: Mat4) {
        let mut state = self.state.lock().unwrap();
        state.compat_right_projection = transform;
        state.dirty.insert(DirtyFlags::COMPATIBILITY_MODE);
    }

    // --- Coexistence centering ---

    /// Whether the center of coexistence coordinates is placed by policy
    /// rather than by the manual eye points.
    pub fn coexistence_centering_enable(&self) -> bool {
        self.state.lock().unwrap().coexistence_centering_enable
    }

    /// Enables or disables coexistence centering.
    pub fn set_coexistence_centering_enable(&self, enable: bool) {
        let mut state = self.state.lock().unwrap();
        state.coexistence_centering_enable = enable;
        state.dirty.insert(DirtyFlags::COEXISTENCE_CENTERING);
    }

    /// Returns the manual left eye position in coexistence coordinates.
    pub fn left_manual_eye_in_coexistence(&self) -> Vec3 {
        self.state.lock().unwrap().left_manual_eye_in_coexistence
    }

    /// Sets the manual left eye position in coexistence coordinates.
    pub fn set_left_manual_eye_in_coexistence(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.left_manual_eye_in_coexistence = position;
        state.dirty.insert(DirtyFlags::COEXISTENCE_CENTERING);
    }

    /// Returns the manual right eye position in coexistence coordinates.
    pub fn right_manual_eye_in_coexistence(&self) -> Vec3 {
        self.state.lock().unwrap().right_manual_eye_in_coexistence
    }

    /// Sets the manual right eye position in coexistence coordinates.
    pub fn set_right_manual_eye_in_coexistence(&self, position: Vec3) {
        let mut state = self.state.lock().unwrap();
        state.right_manual_eye_in_coexistence = position;
        state.dirty.insert(DirtyFlags::COEXISTENCE_CENTERING);
    }

    /// Copies the fields and consumes the pending dirty mask, all under
    /// one lock acquisition.
    pub(crate) fn sample(&self) -> ViewSample {
        let mut state = self.state.lock().unwrap();
        let dirty = state.dirty;
        state.dirty = DirtyFlags::EMPTY;
        ViewSample {
            view_policy: state.view_policy,
            projection_policy: state.projection_policy,
            screen_scale_policy: state.screen_scale_policy,
            screen_scale: state.screen_scale,
            window_resize_policy: state.window_resize_policy,
            window_movement_policy: state.window_movement_policy,
            window_eyepoint_policy: state.window_eyepoint_policy,
            monoscopic_view_policy: state.monoscopic_view_policy,
            field_of_view: state.field_of_view,
            front_clip_distance: state.front_clip_distance,
            back_clip_distance: state.back_clip_distance,
            front_clip_policy: state.front_clip_policy,
            back_clip_policy: state.back_clip_policy,
            visibility_policy: state.visibility_policy,
            tracking_enable: state.tracking_enable,
            user_head_to_vworld_enable: state.user_head_to_vworld_enable,
            compatibility_mode_enable: state.compatibility_mode_enable,
            compat_vpc_to_ec: state.compat_vpc_to_ec,
            compat_left_projection: state.compat_left_projection,
            compat_right_projection: state.compat_right_projection,
            coexistence_centering_enable: state.coexistence_centering_enable,
            left_manual_eye_in_coexistence: state.left_manual_eye_in_coexistence,
            right_manual_eye_in_coexistence: state.right_manual_eye_in_coexistence,
            dirty,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use crate::policies::ViewAttachPolicy;

    #[test]
    fn test_desktop_defaults() {
        let view = View::new();
        assert_eq!(view.view_policy(), ViewPolicy::ScreenView);
        assert_eq!(view.projection_policy(), ProjectionPolicy::Perspective);
        assert!(approx_eq(view.field_of_view(), FRAC_PI_4));
        assert!(approx_eq(view.front_clip_distance(), 0.1));
        assert!(approx_eq(view.back_clip_distance(), 10.0));
        assert!(approx_eq(view.screen_scale(), 1.0));
        assert!(!view.tracking_enable());
        assert!(!view.compatibility_mode_enable());
        assert!(view.coexistence_centering_enable());
        assert_eq!(
            view.left_manual_eye_in_coexistence(),
            Vec3::new(0.142, 0.135, 0.4572)
        );
        assert_eq!(
            view.right_manual_eye_in_coexistence(),
            Vec3::new(0.208, 0.135, 0.4572)
        );
        assert!(view.viewpoint().is_none());
    }

    #[test]
    fn test_fresh_view_is_fully_pending() {
        let view = View::new();
        assert_eq!(view.sample().dirty, DirtyFlags::ALL_VIEW);
        assert!(view.sample().dirty.is_empty());
    }

    #[test]
    fn test_each_setter_raises_its_category() {
        let view = View::new();
        view.sample();

        view.set_view_policy(ViewPolicy::HmdView);
        assert_eq!(view.sample().dirty, DirtyFlags::VIEW_POLICY);

        view.set_field_of_view(1.0);
        assert_eq!(view.sample().dirty, DirtyFlags::FIELD_OF_VIEW);

        view.set_front_clip_distance(0.5);
        view.set_back_clip_policy(ClipPolicy::PhysicalScreen);
        assert_eq!(view.sample().dirty, DirtyFlags::CLIP);

        view.set_screen_scale(2.0);
        assert_eq!(view.sample().dirty, DirtyFlags::SCREEN_SCALE);

        view.set_window_eyepoint_policy(WindowEyepointPolicy::RelativeToScreen);
        assert_eq!(view.sample().dirty, DirtyFlags::WINDOW_POLICY);

        view.set_monoscopic_view_policy(MonoscopicViewPolicy::RightEyeView);
        assert_eq!(view.sample().dirty, DirtyFlags::MONOSCOPIC_VIEW_POLICY);

        view.set_visibility_policy(VisibilityPolicy::DrawAll);
        assert_eq!(view.sample().dirty, DirtyFlags::VISIBILITY_POLICY);

        view.set_tracking_enable(true);
        assert_eq!(view.sample().dirty, DirtyFlags::TRACKING_ENABLE);

        view.set_user_head_to_vworld_enable(true);
        assert_eq!(view.sample().dirty, DirtyFlags::HEAD_TO_VWORLD_ENABLE);

        view.set_compat_vpc_to_ec(Mat4::from_translation(Vec3::X));
        assert_eq!(view.sample().dirty, DirtyFlags::COMPATIBILITY_MODE);

        view.set_left_manual_eye_in_coexistence(Vec3::ZERO);
        assert_eq!(view.sample().dirty, DirtyFlags::COEXISTENCE_CENTERING);
    }

    #[test]
    fn test_setters_accumulate_until_sampled() {
        let view = View::new();
        view.sample();

        view.set_field_of_view(0.9);
        view.set_screen_scale(3.0);
        view.set_tracking_enable(true);

        let dirty = view.sample().dirty;
        assert!(dirty.contains(
            DirtyFlags::FIELD_OF_VIEW | DirtyFlags::SCREEN_SCALE | DirtyFlags::TRACKING_ENABLE
        ));
        assert!(!dirty.contains(DirtyFlags::CLIP));
    }

    #[test]
    fn test_viewpoint_attachment() {
        let view = View::new();
        let vp = Arc::new(Viewpoint::with_attach_policy(ViewAttachPolicy::NominalFeet));

        view.attach_viewpoint(vp.clone());
        assert!(view.viewpoint().is_some());

        // Attachment re-marks the node pending even if consumed before.
        vp.sample();
        view.attach_viewpoint(vp.clone());
        assert!(vp
            .sample()
            .dirty
            .contains(DirtyFlags::VIEW_ATTACH_POLICY));

        view.detach_viewpoint();
        assert!(view.viewpoint().is_none());
    }

    #[test]
    fn test_shared_physical_parts() {
        let env = Arc::new(PhysicalEnvironment::new());
        let body = Arc::new(PhysicalBody::new());
        let a = View::with_physical(env.clone(), body.clone());
        let b = View::with_physical(env.clone(), body.clone());

        assert!(Arc::ptr_eq(a.physical_environment(), b.physical_environment()));
        assert!(Arc::ptr_eq(a.physical_body(), b.physical_body()));
    }
}
