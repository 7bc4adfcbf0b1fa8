//! Painting session lifecycle.
//!
//! Wraps the stroke engine together with damage tracking and the injected
//! random source, and exposes the operations a host UI wires to its buttons:
//! load, brush, transform, clear, auto-paint, pointer input, and export.

mod painting;

pub use painting::PaintingSession;

#[cfg(test)]
mod tests;
