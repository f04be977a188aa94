//! Role-based access control.
//!
//! Accounts carry a set of [`Role`]s. Each role expands to a fixed set of
//! [`Operation`]s; every active account additionally holds the baseline set.
//! Handlers declare the operation they perform and check it against the
//! caller's [`PermissionSet`] before touching storage.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Waybill,
    Booking,
    Settlement,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Waybill, Role::Booking, Role::Settlement];

    /// Stable code stored in the database and returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Waybill => "waybill",
            Role::Booking => "booking",
            Role::Settlement => "settlement",
        }
    }

    /// Display label used by the management console.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::Waybill => "运单管理",
            Role::Booking => "订舱管理",
            Role::Settlement => "结算单管理",
        }
    }

    /// Operations granted by this role on top of the baseline.
    pub fn grants(&self) -> &'static [Operation] {
        match self {
            Role::Admin => &Operation::ALL,
            Role::Waybill => &[Operation::WaybillManage],
            Role::Booking => &[Operation::BookingManage],
            Role::Settlement => &[Operation::SettlementManage],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

impl FromStr for Role {
    type Err = AuthError;

    /// Accepts either the code or the console label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(s) || r.label() == s)
            .ok_or_else(|| AuthError::Validation(format!("unknown role: {s}")))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a list of role codes/labels, dropping duplicates and keeping a stable order.
pub fn parse_roles<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Role>, AuthError> {
    let set = raw
        .iter()
        .map(|s| s.as_ref().parse::<Role>())
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(set.into_iter().collect())
}

/// Decode the JSON role column. Unknown codes are ignored so a stale value
/// can never grant more than it names.
pub fn roles_from_json(raw: &str) -> Vec<Role> {
    let codes: Vec<String> = serde_json::from_str(raw).unwrap_or_default();
    let set: BTreeSet<Role> = codes.iter().filter_map(|c| c.parse().ok()).collect();
    set.into_iter().collect()
}

pub fn roles_to_json(roles: &[Role]) -> String {
    let codes: Vec<&str> = roles.iter().map(|r| r.code()).collect();
    serde_json::to_string(&codes).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SelfService,
    CustomerRead,
    CustomerWrite,
    CustomerDelete,
    BusinessConfig,
    ParameterRead,
    ParameterWrite,
    AccountManage,
    DepartmentManage,
    WaybillManage,
    BookingManage,
    SettlementManage,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::SelfService,
        Operation::CustomerRead,
        Operation::CustomerWrite,
        Operation::CustomerDelete,
        Operation::BusinessConfig,
        Operation::ParameterRead,
        Operation::ParameterWrite,
        Operation::AccountManage,
        Operation::DepartmentManage,
        Operation::WaybillManage,
        Operation::BookingManage,
        Operation::SettlementManage,
    ];

    /// Held by every authenticated, active account.
    pub const BASELINE: [Operation; 5] = [
        Operation::SelfService,
        Operation::CustomerRead,
        Operation::CustomerWrite,
        Operation::BusinessConfig,
        Operation::ParameterRead,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(self, f) }
}

/// Resolved operations for one principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Operation>);

impl PermissionSet {
    pub fn from_roles(roles: &[Role]) -> Self {
        let mut ops: BTreeSet<Operation> = Operation::BASELINE.into_iter().collect();
        for role in roles {
            ops.extend(role.grants().iter().copied());
        }
        Self(ops)
    }

    pub fn allows(&self, op: Operation) -> bool { self.0.contains(&op) }

    pub fn check(&self, op: Operation) -> Result<(), AuthError> {
        if self.allows(op) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(op))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ { self.0.iter().copied() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_without_roles() {
        let p = PermissionSet::from_roles(&[]);
        for op in Operation::BASELINE {
            assert!(p.allows(op), "{op} should be baseline");
        }
        assert!(!p.allows(Operation::AccountManage));
        assert!(!p.allows(Operation::DepartmentManage));
        assert!(!p.allows(Operation::CustomerDelete));
        assert!(!p.allows(Operation::ParameterWrite));
    }

    #[test]
    fn admin_gets_everything() {
        let p = PermissionSet::from_roles(&[Role::Admin]);
        assert!(Operation::ALL.iter().all(|op| p.allows(*op)));
    }

    #[test]
    fn business_roles_add_their_own_operation() {
        let p = PermissionSet::from_roles(&[Role::Waybill, Role::Settlement]);
        assert!(p.allows(Operation::WaybillManage));
        assert!(p.allows(Operation::SettlementManage));
        assert!(!p.allows(Operation::BookingManage));
        assert!(matches!(p.check(Operation::AccountManage), Err(AuthError::Forbidden(Operation::AccountManage))));
    }

    #[test]
    fn roles_parse_from_codes_and_labels() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("运单管理".parse::<Role>().unwrap(), Role::Waybill);
        assert_eq!(" Booking ".parse::<Role>().unwrap(), Role::Booking);
        assert!("superuser".parse::<Role>().is_err());

        let roles = parse_roles(&["结算单管理", "admin", "settlement"]).unwrap();
        assert_eq!(roles, vec![Role::Admin, Role::Settlement]);
    }

    #[test]
    fn json_column_round_trip_ignores_unknown_codes() {
        let raw = roles_to_json(&[Role::Booking, Role::Admin]);
        assert_eq!(raw, r#"["booking","admin"]"#);
        assert_eq!(roles_from_json(r#"["admin","root"]"#), vec![Role::Admin]);
        assert!(roles_from_json("not json").is_empty());
    }
}
