//! Timeline composition: the data model and the composer that derives it.

/// Composer deriving a [`model::Timeline`] from a [`model::CompositionRequest`].
pub mod compose;
/// Placements, roles, layers and the immutable timeline.
pub mod model;
