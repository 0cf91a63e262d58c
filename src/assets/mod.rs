//! Content asset selection and the image conversion collaborator.

/// Image conversion collaborator contract and conversion mapping.
pub mod convert;
/// Deterministic selection of the content slots.
pub mod resolver;
