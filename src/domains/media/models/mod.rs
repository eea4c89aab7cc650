pub mod resource;
pub mod token;

pub use resource::*;
pub use token::*;
