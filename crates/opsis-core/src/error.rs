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

//! Defines the hierarchy of error types for the view snapshot pipeline.

use std::fmt;

/// An error raised by a [`PhysicalEnvironment`](crate::environment::PhysicalEnvironment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// The requested sensor slot is out of range or has no sensor
    /// registered in it.
    SensorUnavailable {
        /// The sensor slot index that was requested.
        index: usize,
    },
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::SensorUnavailable { index } => {
                write!(f, "No sensor registered in slot {index}")
            }
        }
    }
}

impl std::error::Error for EnvironmentError {}

/// An error raised while snapshotting view state or computing derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCacheError {
    /// The physical environment could not supply the head tracker reading.
    Environment(EnvironmentError),
    /// The snapshotted head-tracker-to-tracker-base transform is singular,
    /// so the tracker-base-to-head-tracker transform cannot be derived.
    SingularHeadTracker,
}

impl fmt::Display for ViewCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewCacheError::Environment(err) => {
                write!(f, "Physical environment error: {err}")
            }
            ViewCacheError::SingularHeadTracker => {
                write!(
                    f,
                    "Head-tracker-to-tracker-base transform is singular and cannot be inverted"
                )
            }
        }
    }
}

impl std::error::Error for ViewCacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewCacheError::Environment(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EnvironmentError> for ViewCacheError {
    fn from(err: EnvironmentError) -> Self {
        ViewCacheError::Environment(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn environment_error_display() {
        let err = EnvironmentError::SensorUnavailable { index: 2 };
        assert_eq!(format!("{err}"), "No sensor registered in slot 2");
    }

    #[test]
    fn view_cache_error_display() {
        let err = ViewCacheError::SingularHeadTracker;
        assert_eq!(
            format!("{err}"),
            "Head-tracker-to-tracker-base transform is singular and cannot be inverted"
        );

        let err = ViewCacheError::from(EnvironmentError::SensorUnavailable { index: 0 });
        assert_eq!(
            format!("{err}"),
            "Physical environment error: No sensor registered in slot 0"
        );
    }

    #[test]
    fn view_cache_error_source_chain() {
        let inner = EnvironmentError::SensorUnavailable { index: 1 };
        let err = ViewCacheError::from(inner.clone());
        let source = err.source().unwrap();
        assert_eq!(format!("{source}"), format!("{inner}"));

        assert!(ViewCacheError::SingularHeadTracker.source().is_none());
    }
}
