use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::normalize_name;
use crate::record::RecordType;

/// What was asked: a (name, record-type) pair.
///
/// The name is normalized on construction so two spellings of the same
/// question compare and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub name: String,
    pub qtype: RecordType,
}

impl Question {
    pub fn new(name: &str, qtype: RecordType) -> Self {
        Self {
            name: normalize_name(name),
            qtype,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.qtype)
    }
}
