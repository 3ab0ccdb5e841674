pub mod course_catalog;
pub mod tutor;

pub use course_catalog::CourseCatalog;
pub use tutor::{GenerationBackend, OllamaClient, TutorService};
