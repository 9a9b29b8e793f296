mod site;
mod usage;
mod user;

pub use site::*;
pub use usage::*;
pub use user::*;
