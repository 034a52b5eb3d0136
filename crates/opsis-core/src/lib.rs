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

//! # Opsis Core
//!
//! Per-frame view-state snapshotting for stereo and head-tracked rendering.
//!
//! A [`View`] aggregates the live, independently mutable viewing objects:
//! a [`Viewpoint`](viewpoint::Viewpoint) scene anchor, a
//! [`PhysicalEnvironment`](environment::PhysicalEnvironment) with its
//! tracker sensors, and a [`PhysicalBody`](body::PhysicalBody) profile.
//! Once per frame a [`ViewCache`] copies their state under their own locks,
//! resolves the head-tracking transforms, and hands the renderer one
//! consistent, lock-free-to-read frame of values together with an
//! accumulated change mask.

#![warn(missing_docs)]

pub mod body;
pub mod cache;
pub mod dirty;
pub mod environment;
pub mod error;
pub mod math;
pub mod policies;
pub mod view;
pub mod viewpoint;

pub use cache::{FrameView, ViewCache};
pub use dirty::DirtyFlags;
pub use error::{EnvironmentError, ViewCacheError};
pub use view::View;
