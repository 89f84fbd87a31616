pub mod action;
pub mod requests;
pub mod responses;
pub mod selector;
pub mod session;

pub use action::*;
pub use requests::*;
pub use responses::*;
pub use selector::*;
pub use session::*;
