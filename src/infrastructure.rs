//! Background services driving the feed engine

pub mod poll;
