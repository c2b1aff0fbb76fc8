// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors.
//!
//! Misuse of a handle (a stale [`NodeId`], attaching a node twice) panics,
//! as documented on the methods involved. The errors here cover requests
//! that can legitimately fail at run time, chiefly binding an animation to
//! a property by name.

use alloc::string::String;
use core::fmt;

use crate::animation::AnimationId;
use crate::scene::{NodeId, NodeType, Property};
use crate::surface::SurfaceId;

/// Binding an animation to a node property failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyError {
    /// No property has this name.
    UnknownProperty {
        /// The name that was looked up.
        name: String,
    },
    /// The node's type has no such property.
    Unsupported {
        /// The requested property.
        property: Property,
        /// The type of the target node.
        node_type: NodeType,
    },
    /// The target node no longer exists.
    StaleNode(NodeId),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty { name } => write!(f, "unknown property `{name}`"),
            Self::Unsupported {
                property,
                node_type,
            } => write!(
                f,
                "{} nodes have no `{}` property",
                node_type.name(),
                property.name()
            ),
            Self::StaleNode(id) => write!(f, "node {id} no longer exists"),
        }
    }
}

impl core::error::Error for PropertyError {}

/// An [`Engine`](crate::engine::Engine) request referred to something it
/// does not know, or could not be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// No surface has this id.
    UnknownSurface(SurfaceId),
    /// No animation has this id.
    UnknownAnimation(AnimationId),
    /// Property binding failed.
    Property(PropertyError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSurface(id) => write!(f, "unknown surface {id}"),
            Self::UnknownAnimation(id) => write!(f, "unknown animation {id}"),
            Self::Property(err) => write!(f, "property binding failed: {err}"),
        }
    }
}

impl core::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Property(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PropertyError> for EngineError {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = PropertyError::Unsupported {
            property: Property::Radius,
            node_type: NodeType::Rect,
        };
        assert_eq!(err.to_string(), "rect nodes have no `radius` property");

        let err = EngineError::from(PropertyError::UnknownProperty {
            name: "colour".into(),
        });
        assert_eq!(
            err.to_string(),
            "property binding failed: unknown property `colour`"
        );
    }
}
