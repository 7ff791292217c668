//! Entity structs for all Soliloan domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip, Change
//! payloads, and schema validation.

mod change;
mod configuration;
mod file;
mod lender;
mod loan;
mod note;
mod project;
mod template;
mod transaction;
mod user;
mod view;

pub use change::Change;
pub use configuration::Configuration;
pub use file::FileRecord;
pub use lender::Lender;
pub use loan::Loan;
pub use note::Note;
pub use project::{Project, ProjectMember};
pub use template::CommunicationTemplate;
pub use transaction::Transaction;
pub use user::{Session, User};
pub use view::SavedView;
