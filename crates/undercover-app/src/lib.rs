pub mod audio;
pub mod dispatch;

pub use audio::BackgroundMusic;
pub use dispatch::{fallback_categories, Action, Dispatcher, Outcome};
