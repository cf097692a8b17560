pub mod store;

pub use store::{AnnotationStore, DESTINATION_LABEL};
