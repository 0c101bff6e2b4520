mod input;
mod layout;
mod render;
mod types;

pub use input::*;
pub use layout::*;
pub use render::*;
pub use types::*;
