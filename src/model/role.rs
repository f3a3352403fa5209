use std::str::FromStr;

use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Viewer,
}

impl Role {
    pub fn from_name(name: &str) -> Option<Self> {
        Role::from_str(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for role in [Role::Superadmin, Role::Admin, Role::Viewer] {
            assert_eq!(Role::from_name(&role.to_string()), Some(role));
        }
        assert_eq!(Role::from_name("root"), None);
    }
}
