//! Presentation layer: form parsing and HTML pages

pub mod form;
pub mod handlers;
