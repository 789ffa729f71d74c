use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access annotation carried by a store field.
///
/// There is no ordering between permissions; the engine only asks whether a
/// permission belongs to the set allowed for a given operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    ReadOnly,
    WriteOnly,
    ReadWrite,
    None,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::ReadOnly,
        Permission::WriteOnly,
        Permission::ReadWrite,
        Permission::None,
    ];

    /// `read-only` or `read-write`.
    #[must_use]
    pub fn allows_read(self) -> bool {
        matches!(self, Permission::ReadOnly | Permission::ReadWrite)
    }

    /// `write-only` or `read-write`.
    #[must_use]
    pub fn allows_write(self) -> bool {
        matches!(self, Permission::WriteOnly | Permission::ReadWrite)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ReadOnly => "read-only",
            Permission::WriteOnly => "write-only",
            Permission::ReadWrite => "read-write",
            Permission::None => "none",
        }
    }
}

impl Default for Permission {
    fn default() -> Self {
        Permission::ReadWrite
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission '{}'", s))
    }
}
