// Process Target - which process(es) a PM2 command acts on

use super::error::DomainError;
use super::process::ProcessId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Process selector passed to `pm2 <action> <target>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcessTarget {
    Id(ProcessId),
    Name(String),
    All,
}

impl ProcessTarget {
    /// Argument as PM2 expects it on the command line
    pub fn as_arg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProcessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessTarget::Id(id) => write!(f, "{}", id),
            ProcessTarget::Name(name) => f.write_str(name),
            ProcessTarget::All => f.write_str("all"),
        }
    }
}

impl FromStr for ProcessTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidTarget(s.to_string()));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(ProcessTarget::All);
        }
        match s.parse::<ProcessId>() {
            Ok(id) => Ok(ProcessTarget::Id(id)),
            Err(_) => Ok(ProcessTarget::Name(s.to_string())),
        }
    }
}

impl From<ProcessId> for ProcessTarget {
    fn from(id: ProcessId) -> Self {
        ProcessTarget::Id(id)
    }
}

/// Wire form: UIs send either the numeric id or a string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ProcessTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTarget::deserialize(deserializer)? {
            RawTarget::Number(n) => ProcessId::try_from(n)
                .map(ProcessTarget::Id)
                .map_err(|_| serde::de::Error::custom(format!("process id out of range: {}", n))),
            RawTarget::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for ProcessTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProcessTarget::Id(id) => serializer.serialize_u32(*id),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}
