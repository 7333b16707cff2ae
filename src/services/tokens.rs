//! Bearer tokens binding a caller to a principal.
//!
//! A token is `<principal>.<signature>` where the signature is the standard
//! base64 HMAC-SHA1 of the principal under the deployment secret. Principals
//! may contain dots; the signature never does.

use anyhow::Context;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::models::Principal;

type HmacSha1 = Hmac<Sha1>;

fn mac_for(secret: &str, principal: &Principal) -> anyhow::Result<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).context("invalid token secret")?;
    mac.update(principal.as_str().as_bytes());
    Ok(mac)
}

pub fn mint(secret: &str, principal: &Principal) -> anyhow::Result<String> {
    let signature = mac_for(secret, principal)?.finalize().into_bytes();
    let encoded = base64::engine::general_purpose::STANDARD.encode(signature);
    Ok(format!("{principal}.{encoded}"))
}

/// Returns the principal a token was minted for, or `None` if the token is
/// malformed or was not signed with `secret`.
pub fn verify(secret: &str, token: &str) -> Option<Principal> {
    let (raw_principal, signature) = token.rsplit_once('.')?;
    let principal = Principal::parse(raw_principal)?;
    let signature = base64::engine::general_purpose::STANDARD
        .decode(signature)
        .ok()?;

    // verify_slice compares in constant time
    mac_for(secret, &principal)
        .ok()?
        .verify_slice(&signature)
        .ok()?;

    Some(principal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_token_verifies() {
        let principal = Principal::parse("rider.one").unwrap();
        let token = mint("s3cret", &principal).unwrap();
        assert_eq!(verify("s3cret", &token), Some(principal));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let principal = Principal::parse("rider").unwrap();
        let token = mint("other", &principal).unwrap();
        assert_eq!(verify("s3cret", &token), None);
    }

    #[test]
    fn test_swapped_principal_rejected() {
        let token = mint("s3cret", &Principal::parse("rider").unwrap()).unwrap();
        let (_, signature) = token.rsplit_once('.').unwrap();
        let forged = format!("owner.{signature}");
        assert_eq!(verify("s3cret", &forged), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(verify("s3cret", ""), None);
        assert_eq!(verify("s3cret", "no-signature"), None);
        assert_eq!(verify("s3cret", ".c2ln"), None);
        assert_eq!(verify("s3cret", "rider.%%%"), None);
    }
}
