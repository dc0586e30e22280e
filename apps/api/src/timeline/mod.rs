// Blueprint timelines: normalize a planner payload, lay it out, render it.
// Everything below `handlers` is pure and synchronous.

pub mod handlers;
pub mod hover;
pub mod layout;
pub mod normalize;
pub mod palette;
pub mod render;
pub mod summary;
