//! Static path-prefix rights.
//!
//! Uppercase letters grant rights on collections directly below the root,
//! lowercase letters on everything deeper.

use std::fmt;

use serde::Serialize;

/// Rights granted on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rights {
    /// Nothing.
    None,
    /// `R`: read a top-level collection.
    CollectionRead,
    /// `RW`: read and write a top-level collection.
    CollectionReadWrite,
    /// `r`: read nested collections and items.
    Read,
    /// `rw`: read and write nested collections and items.
    ReadWrite,
}

impl Rights {
    /// Permission string in the `R`/`W`/`r`/`w` notation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::CollectionRead => "R",
            Self::CollectionReadWrite => "RW",
            Self::Read => "r",
            Self::ReadWrite => "rw",
        }
    }

    /// Whether any read right is granted.
    pub fn can_read(self) -> bool {
        self != Self::None
    }

    /// Whether any write right is granted.
    pub fn can_write(self) -> bool {
        matches!(self, Self::CollectionReadWrite | Self::ReadWrite)
    }
}

impl fmt::Display for Rights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rights policy keyed on the authenticated user and the request path.
#[derive(Debug, Clone)]
pub struct PathRights {
    /// Shared top-level collection readable by everyone.
    shared: String,
}

impl PathRights {
    /// Policy with `shared` as the shared top-level collection name.
    pub fn new(shared: impl Into<String>) -> Self {
        Self {
            shared: shared.into(),
        }
    }

    /// Rights of `user` on `path`.
    pub fn authorization(&self, user: &str, path: &str) -> Rights {
        if user.is_empty() {
            return Rights::None;
        }
        let own = format!("/{user}/");
        if path == "/" || path == format!("/{}/", self.shared) {
            Rights::CollectionRead
        } else if path == own {
            Rights::CollectionReadWrite
        } else if path.starts_with(&own) {
            Rights::ReadWrite
        } else if is_nested(path) {
            Rights::Read
        } else {
            Rights::None
        }
    }
}

impl Default for PathRights {
    fn default() -> Self {
        Self::new("domain")
    }
}

/// Whether `path` starts with `/<a>/<b>` for non-empty `a` and `b`.
fn is_nested(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    match rest.split_once('/') {
        Some((first, second)) => !first.is_empty() && !second.is_empty() && !second.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let rights = PathRights::default();
        let cases = [
            ("", "/", Rights::None),
            ("alice", "/", Rights::CollectionRead),
            ("alice", "/domain/", Rights::CollectionRead),
            ("alice", "/alice/", Rights::CollectionReadWrite),
            ("alice", "/alice/book/", Rights::ReadWrite),
            ("alice", "/alice/book/x.vcf", Rights::ReadWrite),
            ("alice", "/bob/book/", Rights::Read),
            ("alice", "/domain/shared/", Rights::Read),
            ("alice", "/bob/", Rights::None),
            ("alice", "/bob", Rights::None),
            ("alice", "//x", Rights::None),
        ];
        for (user, path, expected) in cases {
            assert_eq!(rights.authorization(user, path), expected, "{user} {path}");
        }
    }

    #[test]
    fn test_rights_notation() {
        assert_eq!(Rights::CollectionReadWrite.to_string(), "RW");
        assert!(Rights::ReadWrite.can_write());
        assert!(!Rights::Read.can_write());
        assert!(!Rights::None.can_read());
    }
}
