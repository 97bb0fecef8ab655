pub mod record;
pub mod result;
pub mod taxonomy;

pub use record::{Outcome, SourceKind, StoredRecord};
pub use result::{ClassificationResult, EmailClassification, Method, RecordReport};
pub use taxonomy::{DocumentType, EmailIntent, Urgency};
