pub mod course;
pub mod tutor;

pub use course::*;
pub use tutor::*;
