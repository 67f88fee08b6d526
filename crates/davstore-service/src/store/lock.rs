//! Collection lock placeholder.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use davstore_core::error::AppError;

/// Requested lock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Shared (`r`).
    Read,
    /// Exclusive (`w`).
    Write,
}

impl FromStr for LockMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Self::Read),
            "w" => Ok(Self::Write),
            other => Err(AppError::validation(format!("Invalid lock mode: {other}"))),
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "r",
            Self::Write => "w",
        })
    }
}

/// Guard returned by [`CollectionStore::acquire_lock`].
///
/// Grants no mutual exclusion: concurrent writers are serialized only by
/// transaction isolation and unique constraints.
///
/// [`CollectionStore::acquire_lock`]: super::CollectionStore::acquire_lock
#[derive(Debug)]
#[must_use]
pub struct StoreLock {
    mode: LockMode,
    user: String,
}

impl StoreLock {
    pub(crate) fn new(mode: LockMode, user: &str) -> Self {
        debug!(mode = %mode, user, "Lock acquired");
        Self {
            mode,
            user: user.to_string(),
        }
    }

    /// Mode the guard was requested with.
    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        debug!(mode = %self.mode, user = %self.user, "Lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("r".parse::<LockMode>().unwrap(), LockMode::Read);
        assert_eq!("w".parse::<LockMode>().unwrap(), LockMode::Write);
        assert!("x".parse::<LockMode>().is_err());
    }

    #[test]
    fn test_guards_do_not_exclude() {
        let a = StoreLock::new(LockMode::Write, "alice");
        let b = StoreLock::new(LockMode::Write, "bob");
        assert_eq!(a.mode(), b.mode());
    }
}
