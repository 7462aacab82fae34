//! Domain value types and pure logic
//!
//! Nothing in this module performs I/O. Collections, feed value types and
//! the ranking function are all synchronously testable.

pub mod collections;
pub mod feed;
pub mod ranking;
