use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

use crate::models::token_models::SessionClaims;

/// Reads the claims of a session token without checking its signature.
///
/// The token only tells us which session to ask the identity provider about;
/// liveness is decided by that lookup, not by anything in the payload.
pub fn decode_session_claims(token: &str) -> Option<SessionClaims> {
    let header = decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

/// The `sid` claim, if the token carries a non-empty one.
pub fn session_id_from_token(token: &str) -> Option<String> {
    decode_session_claims(token)?
        .sid
        .filter(|sid| !sid.is_empty())
}
