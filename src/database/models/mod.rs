pub mod note;
pub mod reminder;
pub mod task;

pub use note::*;
pub use reminder::*;
pub use task::*;
