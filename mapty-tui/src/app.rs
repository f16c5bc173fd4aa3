// mapty-tui/src/app.rs
mod actions;
mod input;
mod navigation;
pub mod state;

pub use state::{ActiveModal, App, Focus};
