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

//! Policy enumerations governing how the view model resolves the viewer,
//! the projection, and the physical-to-virtual calibration.
//!
//! Each policy defaults to the conventional desktop ("fish-tank VR")
//! configuration: a non-tracked viewer in front of a single nominal screen.

use serde::{Deserialize, Serialize};

/// How the viewpoint node places the view relative to its scene-graph
/// attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewAttachPolicy {
    /// The origin of the view is the user's nominal head position.
    #[default]
    NominalHead,
    /// The origin of the view is the user's nominal feet position.
    NominalFeet,
    /// The origin of the view is the center of the nominal screen.
    NominalScreen,
}

/// The major mode of view computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewPolicy {
    /// Screen or "fish-tank VR" viewing: the display is a fixed window
    /// into the virtual world.
    #[default]
    ScreenView,
    /// Head-mounted display viewing: the display moves with the head.
    HmdView,
}

/// The projection the per-canvas stage derives from the cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionPolicy {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Parallel (orthographic) projection.
    Parallel,
}

/// How the scale from physical to virtual space is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenScalePolicy {
    /// Scale is taken from the physical screen size.
    #[default]
    ScaleScreenSize,
    /// Scale is the explicitly set screen scale value.
    ScaleExplicit,
}

/// How a window resize is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowResizePolicy {
    /// Resizing changes the portion of the physical world seen.
    #[default]
    PhysicalWorld,
    /// Resizing rescales the virtual world to fit the window.
    VirtualWorld,
}

/// How a window move is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowMovementPolicy {
    /// Moving the window pans across the physical world.
    #[default]
    PhysicalWorld,
    /// The virtual world follows the window.
    VirtualWorld,
}

/// How the eyepoint is positioned relative to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowEyepointPolicy {
    /// The eyepoint is derived from the field of view and window width.
    #[default]
    RelativeToFieldOfView,
    /// The eyepoint is fixed relative to the physical screen.
    RelativeToScreen,
    /// The eyepoint is fixed relative to coexistence coordinates.
    RelativeToCoexistence,
    /// The eyepoint follows the window as it moves.
    RelativeToWindow,
}

/// Which eye a monoscopic canvas renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonoscopicViewPolicy {
    /// Render the view between the two eyes.
    #[default]
    CyclopeanEyeView,
    /// Render the left-eye view.
    LeftEyeView,
    /// Render the right-eye view.
    RightEyeView,
}

/// The space in which a clip distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClipPolicy {
    /// Measured in the physical world, relative to the eye.
    #[default]
    PhysicalEye,
    /// Measured in the physical world, relative to the screen.
    PhysicalScreen,
    /// Measured in the virtual world, relative to the eye.
    VirtualEye,
    /// Measured in the virtual world, relative to the screen.
    VirtualScreen,
}

/// Which objects the renderer draws based on their visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisibilityPolicy {
    /// Draw only visible objects.
    #[default]
    DrawVisible,
    /// Draw only invisible objects.
    DrawInvisible,
    /// Draw all objects regardless of visibility.
    DrawAll,
}

/// Where the center of coexistence coordinates is placed in the
/// physical world during calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoexistenceCenterPolicy {
    /// Centered on the nominal screen.
    #[default]
    NominalScreen,
    /// Centered on the user's nominal head.
    NominalHead,
    /// Centered on the user's nominal feet.
    NominalFeet,
}
