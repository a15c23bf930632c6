pub mod color;
pub mod config;
pub mod debounce;
pub mod grid;
pub mod painter;
pub mod pointer;
pub mod rain;
pub mod surface;

pub use config::{Config, Preset, Settings};
pub use painter::{Painter, Pen};
pub use surface::{Lifecycle, RainGrid};
