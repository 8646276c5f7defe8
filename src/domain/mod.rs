pub mod book;
pub mod commands;
pub mod errors;
pub mod events;
pub mod loan;
pub mod membership;
pub mod user;
pub mod value_objects;

pub use book::Book;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
