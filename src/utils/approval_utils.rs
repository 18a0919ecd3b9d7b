use crate::models::user_models::Role;

/// Whether a song or album is visible to (or can be collected by) a viewer.
///
/// Admins see everything. Everyone else sees items whose flag is `true` or
/// missing: rows created before moderation existed carry no flag and stay public.
/// Only an explicit `false` hides an item.
pub fn is_visible(approval_flag: Option<bool>, viewer_role: Option<Role>) -> bool {
    viewer_role == Some(Role::Admin) || approval_flag != Some(false)
}

/// Row filter applied by list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Everything,
    ApprovedOnly,
}

impl Visibility {
    pub fn for_role(viewer_role: Option<Role>) -> Self {
        match viewer_role {
            Some(Role::Admin) => Visibility::Everything,
            _ => Visibility::ApprovedOnly,
        }
    }

    pub fn admits(self, approval_flag: Option<bool>) -> bool {
        match self {
            Visibility::Everything => true,
            Visibility::ApprovedOnly => approval_flag != Some(false),
        }
    }
}
