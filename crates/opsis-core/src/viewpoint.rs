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

//! The scene-graph node a view is attached to.

use std::sync::Mutex;

use crate::dirty::DirtyFlags;
use crate::policies::ViewAttachPolicy;

/// The retained scene-graph node a [`View`](crate::view::View) looks out from.
///
/// A view without an attached viewpoint is a legal transient state (the
/// application may detach it at any time); the snapshot pass simply skips
/// the viewpoint-dependent sections until one is attached again.
#[derive(Debug)]
pub struct Viewpoint {
    state: Mutex<ViewpointState>,
}

#[derive(Debug)]
struct ViewpointState {
    view_attach_policy: ViewAttachPolicy,
    dirty: DirtyFlags,
}

/// One-lock copy of the viewpoint fields plus the drained pending mask.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ViewpointSample {
    pub view_attach_policy: ViewAttachPolicy,
    pub dirty: DirtyFlags,
}

impl Viewpoint {
    /// Creates a viewpoint with the default attach policy.
    ///
    /// A fresh viewpoint reports all of its categories as pending so the
    /// first snapshot observing it recomputes everything.
    pub fn new() -> Self {
        Self::with_attach_policy(ViewAttachPolicy::default())
    }

    /// Creates a viewpoint with the given attach policy.
    pub fn with_attach_policy(policy: ViewAttachPolicy) -> Self {
        Self {
            state: Mutex::new(ViewpointState {
                view_attach_policy: policy,
                dirty: DirtyFlags::ALL_VIEWPOINT,
            }),
        }
    }

    /// Returns the current view attach policy.
    pub fn view_attach_policy(&self) -> ViewAttachPolicy {
        self.state.lock().unwrap().view_attach_policy
    }

    /// Sets the view attach policy.
    pub fn set_view_attach_policy(&self, policy: ViewAttachPolicy) {
        let mut state = self.state.lock().unwrap();
        state.view_attach_policy = policy;
        state.dirty.insert(DirtyFlags::VIEW_ATTACH_POLICY);
    }

    /// Marks every viewpoint category pending again. Called when the
    /// viewpoint is attached to a view, so the next snapshot re-observes
    /// a node that may have been consumed elsewhere before.
    pub(crate) fn mark_pending(&self) {
        self.state
            .lock()
            .unwrap()
            .dirty
            .insert(DirtyFlags::ALL_VIEWPOINT);
    }

    /// Copies the fields and consumes the pending dirty mask, all under
    /// one lock acquisition.
    pub(crate) fn sample(&self) -> ViewpointSample {
        let mut state = self.state.lock().unwrap();
        let dirty = state.dirty;
        state.dirty = DirtyFlags::EMPTY;
        ViewpointSample {
            view_attach_policy: state.view_attach_policy,
            dirty,
        }
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_viewpoint_is_fully_pending() {
        let vp = Viewpoint::new();
        let sample = vp.sample();
        assert_eq!(sample.view_attach_policy, ViewAttachPolicy::NominalHead);
        assert_eq!(sample.dirty, DirtyFlags::ALL_VIEWPOINT);

        // Consuming read: nothing pending on the second sample.
        assert!(vp.sample().dirty.is_empty());
    }

    #[test]
    fn test_setter_raises_dirty_bit() {
        let vp = Viewpoint::new();
        vp.sample();

        vp.set_view_attach_policy(ViewAttachPolicy::NominalFeet);
        assert_eq!(vp.view_attach_policy(), ViewAttachPolicy::NominalFeet);

        let sample = vp.sample();
        assert_eq!(sample.view_attach_policy, ViewAttachPolicy::NominalFeet);
        assert!(sample.dirty.contains(DirtyFlags::VIEW_ATTACH_POLICY));
    }
}
