use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// CRUD-style access right over an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRight {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessRight::Create => "Create",
            AccessRight::Read => "Read",
            AccessRight::Update => "Update",
            AccessRight::Delete => "Delete",
        };
        f.write_str(s)
    }
}

impl FromStr for AccessRight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Create" => Ok(AccessRight::Create),
            "Read" => Ok(AccessRight::Read),
            "Update" => Ok(AccessRight::Update),
            "Delete" => Ok(AccessRight::Delete),
            other => Err(format!("unknown access right: {}", other)),
        }
    }
}

/// Permission grant attached to a role: one access right over one named
/// aggregate (a resource category such as "Events").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Privilege {
    pub aggregate: String,
    pub right: AccessRight,
}

impl Privilege {
    pub fn new(aggregate: impl Into<String>, right: AccessRight) -> Self {
        Self {
            aggregate: aggregate.into(),
            right,
        }
    }
}

/// Role with its owned privileges.
///
/// Roles are administered out of band; this core only reads them.
#[derive(Debug, Clone)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub privileges: Vec<Privilege>,
}

/// Pure role/privilege lookup built once from store data.
///
/// A caller's effective permission for an (aggregate, right) pair is the
/// union over all its roles: permitted iff any role grants a matching
/// privilege. No I/O, no mutation.
#[derive(Debug, Default)]
pub struct PermissionSet {
    grants: HashMap<String, HashSet<Privilege>>,
}

impl PermissionSet {
    pub fn new(roles: Vec<Role>) -> Self {
        let grants = roles
            .into_iter()
            .map(|role| (role.name, role.privileges.into_iter().collect()))
            .collect();
        Self { grants }
    }

    /// Check whether any of the given roles grants the access right over
    /// the aggregate. Unknown role names simply grant nothing.
    pub fn is_permitted(&self, roles: &[String], aggregate: &str, right: AccessRight) -> bool {
        let wanted = Privilege::new(aggregate, right);
        roles
            .iter()
            .filter_map(|name| self.grants.get(name))
            .any(|privileges| privileges.contains(&wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_role() -> Role {
        Role {
            id: Uuid::new_v4(),
            name: "Manager".to_string(),
            privileges: vec![
                Privilege::new("Events", AccessRight::Update),
                Privilege::new("Events", AccessRight::Read),
            ],
        }
    }

    #[test]
    fn test_granted_and_denied_rights() {
        let permissions = PermissionSet::new(vec![manager_role()]);
        let roles = vec!["Manager".to_string()];

        assert!(permissions.is_permitted(&roles, "Events", AccessRight::Update));
        assert!(!permissions.is_permitted(&roles, "Events", AccessRight::Delete));
        assert!(!permissions.is_permitted(&roles, "Venues", AccessRight::Update));
    }

    #[test]
    fn test_union_across_roles() {
        let auditor = Role {
            id: Uuid::new_v4(),
            name: "Auditor".to_string(),
            privileges: vec![Privilege::new("Credentials", AccessRight::Read)],
        };
        let permissions = PermissionSet::new(vec![manager_role(), auditor]);
        let roles = vec!["Manager".to_string(), "Auditor".to_string()];

        assert!(permissions.is_permitted(&roles, "Events", AccessRight::Update));
        assert!(permissions.is_permitted(&roles, "Credentials", AccessRight::Read));
        assert!(!permissions.is_permitted(&roles, "Credentials", AccessRight::Delete));
    }

    #[test]
    fn test_unknown_role_grants_nothing() {
        let permissions = PermissionSet::new(vec![manager_role()]);
        let roles = vec!["Ghost".to_string()];

        assert!(!permissions.is_permitted(&roles, "Events", AccessRight::Update));
    }

    #[test]
    fn test_empty_roles_denied() {
        let permissions = PermissionSet::new(vec![manager_role()]);

        assert!(!permissions.is_permitted(&[], "Events", AccessRight::Update));
    }

    #[test]
    fn test_access_right_round_trip() {
        for right in [
            AccessRight::Create,
            AccessRight::Read,
            AccessRight::Update,
            AccessRight::Delete,
        ] {
            assert_eq!(right.to_string().parse::<AccessRight>().unwrap(), right);
        }
        assert!("Modify".parse::<AccessRight>().is_err());
    }
}
