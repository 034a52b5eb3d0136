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

//! Flags signaling which categories of cached view state have changed.

/// Flags signaling which categories of view state changed since the mask was
/// last drained.
///
/// Every mutable object feeding the snapshot keeps its own pending mask and
/// raises the matching flag in its setters. [`ViewCache::snapshot`] folds
/// those pending masks into one aggregate, which downstream per-canvas code
/// drains once per frame to decide which view matrices need recomputing.
/// Multiple categories combine using bitwise operations.
///
/// [`ViewCache::snapshot`]: crate::cache::ViewCache::snapshot
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyFlags {
    bits: u32,
}

impl DirtyFlags {
    /// No categories changed.
    pub const EMPTY: Self = Self { bits: 0 };

    // Raised by the View.
    /// The screen/HMD view policy changed.
    pub const VIEW_POLICY: Self = Self { bits: 1 << 0 };
    /// A front or back clip distance or clip policy changed.
    pub const CLIP: Self = Self { bits: 1 << 1 };
    /// The projection policy changed.
    pub const PROJECTION_POLICY: Self = Self { bits: 1 << 2 };
    /// The screen scale policy or explicit scale value changed.
    pub const SCREEN_SCALE: Self = Self { bits: 1 << 3 };
    /// The field of view changed.
    pub const FIELD_OF_VIEW: Self = Self { bits: 1 << 4 };
    /// Head tracking was enabled or disabled, or a fresh tracker
    /// reading was snapshotted.
    pub const TRACKING_ENABLE: Self = Self { bits: 1 << 5 };
    /// Continuous head-to-world updating was enabled or disabled.
    pub const HEAD_TO_VWORLD_ENABLE: Self = Self { bits: 1 << 6 };
    /// A window resize, movement, or eyepoint policy changed.
    pub const WINDOW_POLICY: Self = Self { bits: 1 << 7 };
    /// The monoscopic view policy changed.
    pub const MONOSCOPIC_VIEW_POLICY: Self = Self { bits: 1 << 8 };
    /// The visibility policy changed.
    pub const VISIBILITY_POLICY: Self = Self { bits: 1 << 9 };
    /// Compatibility mode was toggled or one of its transforms changed.
    pub const COMPATIBILITY_MODE: Self = Self { bits: 1 << 10 };
    /// Coexistence centering was toggled or a manual eye point changed.
    pub const COEXISTENCE_CENTERING: Self = Self { bits: 1 << 11 };

    // Raised by the Viewpoint.
    /// The view attach policy changed.
    pub const VIEW_ATTACH_POLICY: Self = Self { bits: 1 << 12 };

    // Raised by the PhysicalEnvironment.
    /// The coexistence-to-tracker-base calibration or sensor
    /// registration changed.
    pub const TRACKER_CALIBRATION: Self = Self { bits: 1 << 13 };
    /// The coexistence center policy changed.
    pub const COEXISTENCE_CENTER_POLICY: Self = Self { bits: 1 << 14 };

    // Raised by the PhysicalBody.
    /// Eye or ear geometry, a nominal measurement, or the
    /// head-to-head-tracker calibration changed.
    pub const BODY_GEOMETRY: Self = Self { bits: 1 << 15 };

    /// Every category the View raises.
    pub const ALL_VIEW: Self = Self {
        bits: Self::VIEW_POLICY.bits
            | Self::CLIP.bits
            | Self::PROJECTION_POLICY.bits
            | Self::SCREEN_SCALE.bits
            | Self::FIELD_OF_VIEW.bits
            | Self::TRACKING_ENABLE.bits
            | Self::HEAD_TO_VWORLD_ENABLE.bits
            | Self::WINDOW_POLICY.bits
            | Self::MONOSCOPIC_VIEW_POLICY.bits
            | Self::VISIBILITY_POLICY.bits
            | Self::COMPATIBILITY_MODE.bits
            | Self::COEXISTENCE_CENTERING.bits,
    };
    /// Every category the Viewpoint raises.
    pub const ALL_VIEWPOINT: Self = Self {
        bits: Self::VIEW_ATTACH_POLICY.bits,
    };
    /// Every category the PhysicalEnvironment raises.
    pub const ALL_ENVIRONMENT: Self = Self {
        bits: Self::TRACKER_CALIBRATION.bits | Self::COEXISTENCE_CENTER_POLICY.bits,
    };
    /// Every category the PhysicalBody raises.
    pub const ALL_BODY: Self = Self {
        bits: Self::BODY_GEOMETRY.bits,
    };
    /// All categories.
    pub const ALL: Self = Self {
        bits: Self::ALL_VIEW.bits
            | Self::ALL_VIEWPOINT.bits
            | Self::ALL_ENVIRONMENT.bits
            | Self::ALL_BODY.bits,
    };

    /// Creates a new set of dirty flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain all flags of `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if these flags share at least one flag with `other`.
    pub const fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    /// Adds all flags of `other` to this set.
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Removes all flags of `other` from this set.
    pub fn remove(&mut self, other: Self) {
        self.bits &= !other.bits;
    }

    /// Checks if these flags are empty (no categories changed).
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for DirtyFlags {
    /// Returns [`DirtyFlags::EMPTY`].
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::ops::BitOr for DirtyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for DirtyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl std::fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMED: &[(DirtyFlags, &str)] = &[
            (DirtyFlags::VIEW_POLICY, "VIEW_POLICY"),
            (DirtyFlags::CLIP, "CLIP"),
            (DirtyFlags::PROJECTION_POLICY, "PROJECTION_POLICY"),
            (DirtyFlags::SCREEN_SCALE, "SCREEN_SCALE"),
            (DirtyFlags::FIELD_OF_VIEW, "FIELD_OF_VIEW"),
            (DirtyFlags::TRACKING_ENABLE, "TRACKING_ENABLE"),
            (DirtyFlags::HEAD_TO_VWORLD_ENABLE, "HEAD_TO_VWORLD_ENABLE"),
            (DirtyFlags::WINDOW_POLICY, "WINDOW_POLICY"),
            (DirtyFlags::MONOSCOPIC_VIEW_POLICY, "MONOSCOPIC_VIEW_POLICY"),
            (DirtyFlags::VISIBILITY_POLICY, "VISIBILITY_POLICY"),
            (DirtyFlags::COMPATIBILITY_MODE, "COMPATIBILITY_MODE"),
            (DirtyFlags::COEXISTENCE_CENTERING, "COEXISTENCE_CENTERING"),
            (DirtyFlags::VIEW_ATTACH_POLICY, "VIEW_ATTACH_POLICY"),
            (DirtyFlags::TRACKER_CALIBRATION, "TRACKER_CALIBRATION"),
            (
                DirtyFlags::COEXISTENCE_CENTER_POLICY,
                "COEXISTENCE_CENTER_POLICY",
            ),
            (DirtyFlags::BODY_GEOMETRY, "BODY_GEOMETRY"),
        ];

        let mut remaining = self.bits;
        let mut first = true;
        write!(f, "DirtyFlags {{ ")?;
        for (flag, name) in NAMED {
            if remaining & flag.bits == flag.bits && flag.bits != 0 {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                remaining &= !flag.bits;
                first = false;
            }
        }
        if remaining != 0 {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "UNKNOWN({:#x})", remaining)?;
            first = false;
        }
        if first {
            write!(f, "EMPTY")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_default() {
        assert!(DirtyFlags::EMPTY.is_empty());
        assert_eq!(DirtyFlags::default(), DirtyFlags::EMPTY);
        assert_eq!(DirtyFlags::EMPTY.bits(), 0);
    }

    #[test]
    fn test_union_and_contains() {
        let mask = DirtyFlags::CLIP | DirtyFlags::FIELD_OF_VIEW;
        assert!(mask.contains(DirtyFlags::CLIP));
        assert!(mask.contains(DirtyFlags::FIELD_OF_VIEW));
        assert!(!mask.contains(DirtyFlags::VIEW_POLICY));
        assert!(mask.contains(DirtyFlags::CLIP | DirtyFlags::FIELD_OF_VIEW));
        assert!(!mask.contains(DirtyFlags::CLIP | DirtyFlags::BODY_GEOMETRY));
    }

    #[test]
    fn test_intersects() {
        let mask = DirtyFlags::TRACKER_CALIBRATION | DirtyFlags::BODY_GEOMETRY;
        assert!(mask.intersects(DirtyFlags::ALL_ENVIRONMENT));
        assert!(mask.intersects(DirtyFlags::ALL_BODY));
        assert!(!mask.intersects(DirtyFlags::ALL_VIEW));
    }

    #[test]
    fn test_insert_remove() {
        let mut mask = DirtyFlags::EMPTY;
        mask.insert(DirtyFlags::SCREEN_SCALE);
        mask |= DirtyFlags::VISIBILITY_POLICY;
        assert!(mask.contains(DirtyFlags::SCREEN_SCALE | DirtyFlags::VISIBILITY_POLICY));
        mask.remove(DirtyFlags::SCREEN_SCALE);
        assert!(!mask.contains(DirtyFlags::SCREEN_SCALE));
        assert!(mask.contains(DirtyFlags::VISIBILITY_POLICY));
    }

    #[test]
    fn test_owner_unions_are_disjoint() {
        assert!(!DirtyFlags::ALL_VIEW.intersects(DirtyFlags::ALL_VIEWPOINT));
        assert!(!DirtyFlags::ALL_VIEW.intersects(DirtyFlags::ALL_ENVIRONMENT));
        assert!(!DirtyFlags::ALL_VIEW.intersects(DirtyFlags::ALL_BODY));
        assert!(!DirtyFlags::ALL_ENVIRONMENT.intersects(DirtyFlags::ALL_BODY));
        assert_eq!(
            DirtyFlags::ALL.bits(),
            DirtyFlags::ALL_VIEW.bits()
                | DirtyFlags::ALL_VIEWPOINT.bits()
                | DirtyFlags::ALL_ENVIRONMENT.bits()
                | DirtyFlags::ALL_BODY.bits()
        );
    }

    #[test]
    fn test_debug_lists_flag_names() {
        let mask = DirtyFlags::CLIP | DirtyFlags::BODY_GEOMETRY;
        let s = format!("{:?}", mask);
        assert!(s.contains("CLIP"));
        assert!(s.contains("BODY_GEOMETRY"));
        assert_eq!(format!("{:?}", DirtyFlags::EMPTY), "DirtyFlags { EMPTY }");

        let unknown = DirtyFlags::from_bits(1 << 30);
        assert!(format!("{:?}", unknown).contains("UNKNOWN"));
    }
}
