use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Client = 0,
    Admin = 1,
    Root = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Client => "client",
            Admin => "admin",
            Root => "root",
        }
    }

    /// Role as carried in access-token claims. Clients carry no role claim.
    #[inline]
    pub const fn claim_value(&self) -> Option<&'static str> {
        use UserRole::*;
        match self {
            Client => None,
            Admin => Some("admin"),
            Root => Some("root"),
        }
    }

    /// Derive the role from the persisted grant flags. Root wins over admin.
    #[inline]
    pub const fn from_flags(is_admin: bool, is_root: bool) -> Self {
        if is_root {
            UserRole::Root
        } else if is_admin {
            UserRole::Admin
        } else {
            UserRole::Client
        }
    }

    #[inline]
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some("root") => UserRole::Root,
            Some("admin") => UserRole::Admin,
            _ => UserRole::Client,
        }
    }

    #[inline]
    pub const fn is_admin_or_higher(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | Root)
    }

    #[inline]
    pub const fn is_root(&self) -> bool {
        matches!(self, UserRole::Root)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_flags() {
        assert_eq!(UserRole::from_flags(false, false), UserRole::Client);
        assert_eq!(UserRole::from_flags(true, false), UserRole::Admin);
        assert_eq!(UserRole::from_flags(false, true), UserRole::Root);
        // Root grant dominates a stale admin flag
        assert_eq!(UserRole::from_flags(true, true), UserRole::Root);
    }

    #[test]
    fn test_user_role_from_claim() {
        assert_eq!(UserRole::from_claim(None), UserRole::Client);
        assert_eq!(UserRole::from_claim(Some("admin")), UserRole::Admin);
        assert_eq!(UserRole::from_claim(Some("root")), UserRole::Root);
        assert_eq!(UserRole::from_claim(Some("bogus")), UserRole::Client);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Client.to_string(), "client");
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Root.to_string(), "root");
    }

    #[test]
    fn test_user_role_checks() {
        assert!(!UserRole::Client.is_admin_or_higher());
        assert!(UserRole::Admin.is_admin_or_higher());
        assert!(UserRole::Root.is_admin_or_higher());
        assert!(!UserRole::Client.is_root());
        assert!(!UserRole::Admin.is_root());
        assert!(UserRole::Root.is_root());
    }

    #[test]
    fn test_user_role_claim_value() {
        assert_eq!(UserRole::Client.claim_value(), None);
        assert_eq!(UserRole::Admin.claim_value(), Some("admin"));
        assert_eq!(UserRole::Root.claim_value(), Some("root"));
    }
}
