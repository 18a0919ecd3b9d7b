/// Claims read from an identity-provider session token.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct SessionClaims {
    pub sid: Option<String>, // session ID
    pub sub: Option<String>, // user ID
    pub exp: Option<i64>,
}
