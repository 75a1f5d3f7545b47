use serde::{Deserialize, Serialize};

/// Caller roles. ADMIN implicitly satisfies any role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// May request rewards for their own account
    User,
    /// May create events and rewards and record attendance
    Operator,
    /// May inspect claim history
    Auditor,
    /// Full access to every operation
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Operator => "OPERATOR",
            Role::Auditor => "AUDITOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when the caller's role set satisfies a required-role set.
///
/// An empty requirement allows everyone, ADMIN allows everything, and
/// otherwise a non-empty intersection is required.
pub fn satisfies(caller: &[Role], required: &[Role]) -> bool {
    if required.is_empty() {
        return true;
    }
    if caller.contains(&Role::Admin) {
        return true;
    }
    required.iter().any(|r| caller.contains(r))
}

pub fn describe(required: &[Role]) -> String {
    required
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
