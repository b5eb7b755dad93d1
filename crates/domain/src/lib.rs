//! Oxidns Domain Layer
//!
//! DNS value types shared by the iterative resolver and its cache.
pub mod errors;
pub mod name;
pub mod name_server;
pub mod query_result;
pub mod question;
pub mod record;

pub use errors::DomainError;
pub use name::{name_is_beneath, normalize_name};
pub use name_server::NameServer;
pub use query_result::{QueryResult, ResponseFlags};
pub use question::Question;
pub use record::{Answer, RecordData, RecordType};
