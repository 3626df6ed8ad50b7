//! Role assignment requests.
//!
//! A role change is an ordered list of `(role, action)` items applied to one
//! user inside a single transaction.

use std::fmt;
use std::str::FromStr;

use super::{Error, RoleId, UserId};

/// Whether an item attaches or detaches its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleChangeAction {
    /// Attach the role; already attached roles are left as they are.
    Add,
    /// Detach the role.
    Remove,
}

impl RoleChangeAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for RoleChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleChangeAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(Error::invalid_request("invalid action")),
        }
    }
}

/// One role reference with the action to apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChangeItem {
    pub role_id: RoleId,
    pub action: RoleChangeAction,
}

/// Ordered role mutations for a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRoleRequest {
    pub user_id: UserId,
    pub items: Vec<RoleChangeItem>,
}

/// Validated roles partitioned by action, ready to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChangeSet {
    pub add: Vec<RoleId>,
    pub remove: Vec<RoleId>,
}

impl RoleChangeSet {
    /// Record a validated role under its action.
    pub fn push(&mut self, role_id: RoleId, action: RoleChangeAction) {
        match action {
            RoleChangeAction::Add => self.add.push(role_id),
            RoleChangeAction::Remove => self.remove.push(role_id),
        }
    }
}
