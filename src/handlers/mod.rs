pub mod upload;
pub mod session;
pub mod conversation;

pub use upload::*;
pub use session::*;
pub use conversation::*;
