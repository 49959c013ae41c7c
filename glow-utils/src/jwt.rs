//! JSON Web Token (JWT) utilities for encoding and decoding tokens.
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    TokenData, Validation,
};
use serde::{de::DeserializeOwned, Serialize};

#[inline]
pub fn encode_jwt<T: Serialize>(
    claims: &T,
    secret: &[u8],
    algorithm: Option<Algorithm>,
) -> Result<String, JwtError> {
    let header = Header::new(algorithm.unwrap_or(Algorithm::HS256));
    encode(&header, claims, &EncodingKey::from_secret(secret))
}

#[inline]
pub fn decode_jwt<T: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    validation: Option<Validation>,
) -> Result<TokenData<T>, JwtError> {
    let validation = validation.unwrap_or_default();
    decode::<T>(token, &DecodingKey::from_secret(secret), &validation)
}

/// HS256 validation pinned to a single issuer
pub fn issuer_validation(issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        iss: String,
        exp: i64,
    }

    fn claims(iss: &str, exp: i64) -> TestClaims {
        TestClaims {
            sub: "1".into(),
            iss: iss.into(),
            exp,
        }
    }

    #[test]
    fn test_issuer_validation() {
        let exp = chrono::Utc::now().timestamp() + 600;
        let token = encode_jwt(&claims("glow", exp), b"secret", None).unwrap();

        let data =
            decode_jwt::<TestClaims>(&token, b"secret", Some(issuer_validation("glow"))).unwrap();
        assert_eq!(data.claims, claims("glow", exp));

        assert!(
            decode_jwt::<TestClaims>(&token, b"secret", Some(issuer_validation("other"))).is_err()
        );
        assert!(
            decode_jwt::<TestClaims>(&token, b"wrong", Some(issuer_validation("glow"))).is_err()
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = encode_jwt(&claims("glow", exp), b"secret", None).unwrap();
        assert!(
            decode_jwt::<TestClaims>(&token, b"secret", Some(issuer_validation("glow"))).is_err()
        );
    }
}
