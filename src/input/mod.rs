pub mod handler;
pub mod queue;

pub use handler::{InputHandler, KeyAction, TextAction};
pub use queue::InputQueue;
