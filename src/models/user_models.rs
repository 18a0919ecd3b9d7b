use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::mysql::{Mysql, MysqlValue};
use diesel::prelude::{Insertable, Queryable};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privilege level of a local user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Artist,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Artist => "artist",
            Role::Admin => "admin",
        }
    }

    pub fn is_artist_or_admin(&self) -> bool {
        matches!(self, Role::Artist | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "artist" => Ok(Role::Artist),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

impl ToSql<Text, Mysql> for Role {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Mysql>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Mysql> for Role {
    fn from_sql(bytes: MysqlValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Mysql>>::from_sql(bytes)?;
        raw.parse::<Role>().map_err(Into::into)
    }
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub clerk_id: String,
    pub full_name: String,
    pub image_url: String,
    /// `None` only for rows created before roles existed.
    pub role: Option<Role>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: String,
    pub clerk_id: String,
    pub full_name: String,
    pub image_url: String,
    pub role: Option<Role>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewUser {
    pub fn new(clerk_id: &str, full_name: String, image_url: String, role: Role) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            clerk_id: clerk_id.to_owned(),
            full_name,
            image_url,
            role: Some(role),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Joins first and last name the way the sign-up flow stores them.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let joined = format!("{} {}", first_name.unwrap_or(""), last_name.unwrap_or(""));
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        "User".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Deserialize)]
pub struct UpdateUserRole {
    pub role: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallbackRequest {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize)]
pub struct RoleSummary {
    pub role: Role,
}

#[derive(Serialize)]
pub struct AuthCallbackResponse {
    pub success: bool,
    pub user: RoleSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_lowercase_names_only() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("artist".parse::<Role>(), Ok(Role::Artist));
        assert!("Admin".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn display_name_falls_back_to_user() {
        assert_eq!(display_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(display_name(Some("Ada"), None), "Ada");
        assert_eq!(display_name(None, Some("  ")), "User");
        assert_eq!(display_name(None, None), "User");
    }

    #[test]
    fn legacy_user_without_role_acts_as_plain_user() {
        let mut user = NewUser::new("user_1", "Ada".into(), String::new(), Role::Admin);
        user.role = None;
        let user = User {
            id: user.id,
            clerk_id: user.clerk_id,
            full_name: user.full_name,
            image_url: user.image_url,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        assert_eq!(user.effective_role(), Role::User);
    }
}
