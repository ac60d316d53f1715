pub mod event;
pub mod geometry;
pub mod layer;
