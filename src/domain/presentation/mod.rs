//! Presentation domain module

mod view;

pub use view::{PresentationState, View};
