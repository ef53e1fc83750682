//! Role catalog shown on the role-selection screen.

use serde::Serialize;

/// A selectable interview role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoleInfo {
    /// Key of the role's pool in the question document.
    pub key: &'static str,
    pub title: &'static str,
    /// Short code printed on the role card.
    pub code: &'static str,
    pub description: &'static str,
    /// Difficulty, 1 to 3 hearts.
    pub hearts: u8,
}

/// Every role, in card order.
pub const ROLES: [RoleInfo; 6] = [
    RoleInfo {
        key: "developer",
        title: "Developer",
        code: "DEV",
        description: "Writes, tests and maintains the code behind a product.",
        hearts: 3,
    },
    RoleInfo {
        key: "general",
        title: "General",
        code: "GENERAL",
        description: "Common interview questions that fit any position.",
        hearts: 1,
    },
    RoleInfo {
        key: "designer",
        title: "Designer",
        code: "DESIGNER",
        description: "Shapes how a product looks, feels and is used.",
        hearts: 2,
    },
    RoleInfo {
        key: "project manager",
        title: "Project Manager",
        code: "PM",
        description: "Plans the work and keeps the team on schedule.",
        hearts: 2,
    },
    RoleInfo {
        key: "quality assurance",
        title: "Quality Assurance",
        code: "QA",
        description: "Finds defects before the users do.",
        hearts: 1,
    },
    RoleInfo {
        key: "data analyst",
        title: "Data Analyst",
        code: "DATA",
        description: "Turns raw data into answers the business can act on.",
        hearts: 2,
    },
];

impl RoleInfo {
    /// Find a role by key, title or card code (case-insensitive).
    #[must_use]
    pub fn lookup(name: &str) -> Option<&'static RoleInfo> {
        let name = name.trim();
        ROLES.iter().find(|role| {
            role.key.eq_ignore_ascii_case(name)
                || role.title.eq_ignore_ascii_case(name)
                || role.code.eq_ignore_ascii_case(name)
        })
    }
}

impl std::fmt::Display for RoleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_any_name() {
        assert_eq!(RoleInfo::lookup("DEV").map(|r| r.key), Some("developer"));
        assert_eq!(RoleInfo::lookup("project manager").map(|r| r.code), Some("PM"));
        assert_eq!(RoleInfo::lookup(" Quality Assurance ").map(|r| r.hearts), Some(1));
        assert!(RoleInfo::lookup("astronaut").is_none());
    }

    #[test]
    fn test_hearts_in_range() {
        assert!(ROLES.iter().all(|r| (1..=3).contains(&r.hearts)));
        assert_eq!(RoleInfo::lookup("developer").map(|r| r.hearts), Some(3));
    }
}
