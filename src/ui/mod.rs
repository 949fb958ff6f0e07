//! UI module - shared widgets used by the app screens

pub mod components;
