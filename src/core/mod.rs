//! Table pipeline: type inference, column editing, preview, analysis and the session that ties them together

pub mod analysis;
pub mod editor;
pub mod inference;
pub mod preview;
pub mod session;

pub use analysis::AnalysisKind;
pub use editor::{Edit, EditOutcome, Fill};
pub use inference::Inferencer;
pub use preview::Preview;
pub use session::{ActivityLog, Document, LogEntry, LogLevel, Session};
