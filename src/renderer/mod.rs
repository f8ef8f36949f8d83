pub mod components;
pub mod layout;
pub mod renderer;
pub mod renders;
pub mod traits;
pub mod truncate;

pub use components::*;
pub use layout::*;
pub use renderer::*;
pub use renders::*;
pub use traits::*;
pub use truncate::*;
