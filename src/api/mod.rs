pub mod login_form;
pub mod session;

pub use session::{login, Session};
