mod store;
mod validator;

pub use store::*;
pub use validator::*;
