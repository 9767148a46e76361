//! Data models for stored entities and request bodies.

/// Blog article entity and its validation rules
pub mod article;
/// Admin token claims
pub mod claims;
