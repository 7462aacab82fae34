//! Process-wide shared repositories

pub mod mutation;
