use serde::{Deserialize, Serialize};

/// Generic `{id, name}` reference used for roles, groups and org units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: &str, name: &str) -> Self {
        NamedRef {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// A platform user with its current role/group/org-unit memberships.
///
/// Never mutated in place: every update clones the user with the changed
/// field overwritten, so a failed save leaves the loaded value intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub user_roles: Vec<NamedRef>,
    #[serde(default)]
    pub user_groups: Vec<NamedRef>,
    #[serde(default)]
    pub organisation_units: Vec<NamedRef>,
}

impl User {
    pub fn with_disabled(&self, disabled: bool) -> User {
        User { disabled, ..self.clone() }
    }

    pub fn with_roles(&self, user_roles: Vec<NamedRef>) -> User {
        User { user_roles, ..self.clone() }
    }

    pub fn with_groups(&self, user_groups: Vec<NamedRef>) -> User {
        User { user_groups, ..self.clone() }
    }

    pub fn role_ids(&self) -> Vec<String> {
        self.user_roles.iter().map(|r| r.id.clone()).collect()
    }
}

/// A UI locale available on the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub locale: String,
    pub name: String,
}

/// Metadata type keys this app browses, mapped to the object API's
/// plural endpoint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataKind {
    UserRoles,
    UserGroups,
    OrganisationUnits,
}

impl MetadataKind {
    /// Endpoint segment and response key on the object API.
    pub fn key(&self) -> &'static str {
        match self {
            MetadataKind::UserRoles => "userRoles",
            MetadataKind::UserGroups => "userGroups",
            MetadataKind::OrganisationUnits => "organisationUnits",
        }
    }
}

/// How a newly selected reference set combines with a user's existing set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStrategy {
    Merge,
    Replace,
}

impl UpdateStrategy {
    /// Default strategy for a given number of target users: merging into a
    /// single target is meaningless, so one target forces `Replace`.
    pub fn default_for(target_count: usize) -> UpdateStrategy {
        if target_count > 1 {
            UpdateStrategy::Merge
        } else {
            UpdateStrategy::Replace
        }
    }

    /// Combine `existing` and `selected` reference sets.
    ///
    /// `Replace` yields the selection verbatim; `Merge` yields the union
    /// deduplicated by id, keeping existing entries first.
    pub fn apply(&self, existing: &[NamedRef], selected: &[NamedRef]) -> Vec<NamedRef> {
        match self {
            UpdateStrategy::Replace => selected.to_vec(),
            UpdateStrategy::Merge => {
                let mut out = existing.to_vec();
                for r in selected {
                    if !out.iter().any(|e| e.id == r.id) {
                        out.push(r.clone());
                    }
                }
                out
            }
        }
    }
}

/// Filter for paginated user listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFilter {
    pub query: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl Default for ListFilter {
    fn default() -> Self {
        ListFilter { query: None, page: 1, page_size: 25 }
    }
}

impl ListFilter {
    /// Clamp pagination params to sane bounds.
    pub fn normalized(&self) -> ListFilter {
        ListFilter {
            query: self
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, 100),
        }
    }
}

/// One page of users plus pager info from the remote listing.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<User>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Descriptor of the remote instance a composition root targets.
#[derive(Debug, Clone)]
pub struct Instance {
    pub base_url: String,
    pub username: String,
    pub password: String,
}
