use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

/// `sha256=<hex HMAC-SHA256(secret, body)>`
pub fn sign(secret: &str, body: &[u8]) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
}

/// True iff `provided` is exactly the signature of `body` under `secret`.
pub fn verify(secret: &str, body: &[u8], provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    match sign(secret, body) {
        Ok(expected) => expected.as_bytes().ct_eq(provided.as_bytes()).into(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"_type":"product","_id":"abc"}"#;

    #[test]
    fn known_vector() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn accepts_matching_signature() {
        let sig = sign("s3cret", BODY).unwrap();
        assert!(verify("s3cret", BODY, Some(&sig)));
    }

    #[test]
    fn rejects_any_single_byte_mutation() {
        let sig = sign("s3cret", BODY).unwrap();
        for i in 0..BODY.len() {
            let mut mutated = BODY.to_vec();
            mutated[i] ^= 0x01;
            assert!(!verify("s3cret", &mutated, Some(&sig)), "byte {i}");
        }
    }

    #[test]
    fn rejects_wrong_secret_missing_or_unprefixed_signature() {
        let sig = sign("s3cret", BODY).unwrap();
        assert!(!verify("other", BODY, Some(&sig)));
        assert!(!verify("s3cret", BODY, None));
        assert!(!verify("s3cret", BODY, Some(sig.trim_start_matches(SIGNATURE_PREFIX))));
        assert!(!verify("s3cret", BODY, Some(&sig.to_uppercase())));
    }
}
