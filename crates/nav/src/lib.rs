//! Scroll-linked navigation highlighting.
pub mod controller;
pub mod highlighter;

pub use controller::{MemoryNavSurface, NavController, NavSurface};
pub use highlighter::{ActiveLink, Highlighter, SectionBounds, spanning_section};
