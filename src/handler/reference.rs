use std::fmt;
use std::str::FromStr;

use super::HandlerError;

/// Separator between namespace segments and the entry name.
pub const SEPARATOR: char = '.';

/// A dotted reference split into namespace path and entry name.
///
/// The split happens at the last separator, so `pkg.sub.Handler` names
/// entry `Handler` in namespace `pkg.sub`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerReference {
    namespace: String,
    entry: String,
}

impl HandlerReference {
    pub fn parse(reference: &str) -> Result<Self, HandlerError> {
        let Some((namespace, entry)) = reference.rsplit_once(SEPARATOR) else {
            return Err(HandlerError::MissingSeparator {
                reference: reference.to_string(),
            });
        };
        if namespace.is_empty() || entry.is_empty() {
            return Err(HandlerError::EmptyPart {
                reference: reference.to_string(),
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            entry: entry.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }
}

impl FromStr for HandlerReference {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HandlerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.entry)
    }
}
