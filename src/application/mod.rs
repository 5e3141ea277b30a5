//! Application layer
//!
//! Use cases that turn submitted invoice forms into domain operations and
//! map every outcome to something the HTTP adapter can render.

pub mod invoice;
