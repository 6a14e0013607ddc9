//! TME request signing.
//!
//! TME authenticates each POST with an OAuth-1 style HMAC-SHA1 signature over the
//! method, the endpoint URL and the sorted request parameters:
//!
//! ```text
//! POST&<encode(url)>&<encode(k1=v1&k2=v2...)>
//! ```
//!
//! Keys and values are percent-encoded per RFC 3986 (space is `%20`). The base64
//! digest travels with the other parameters as `ApiSignature`.

use std::collections::BTreeMap;

use base64::Engine;
use sha1::{Digest, Sha1};

pub const TOKEN_PARAM: &str = "Token";
pub const SIGNATURE_PARAM: &str = "ApiSignature";

const METHOD: &str = "POST";
const SHA1_BLOCK_SIZE: usize = 64;

/// A parameter set ready to be posted: `Token` and `ApiSignature` included.
///
/// Built once per call and consumed by the send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub params: BTreeMap<String, String>,
}

impl SignedRequest {
    pub fn new(
        url: impl Into<String>,
        mut params: BTreeMap<String, String>,
        token: &str,
        secret: &str,
    ) -> Self {
        let url = url.into();
        params.insert(TOKEN_PARAM.to_string(), token.to_string());
        let signature = sign(
            &url,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            secret,
        );
        params.insert(SIGNATURE_PARAM.to_string(), signature);
        Self { url, params }
    }

    pub fn method(&self) -> &'static str {
        METHOD
    }

    pub fn signature(&self) -> Option<&str> {
        self.params.get(SIGNATURE_PARAM).map(String::as_str)
    }
}

/// Base64 HMAC-SHA1 signature of a POST to `url` carrying `params`.
///
/// The parameters are sorted by key before encoding, so insertion order does not
/// matter. `params` must already contain the `Token` credential.
pub fn sign<'a>(
    url: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
    secret: &str,
) -> String {
    let base = signature_base(url, params);
    let digest = hmac_sha1(secret.as_bytes(), base.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(digest)
}

pub fn signature_base<'a>(
    url: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut params: Vec<(&str, &str)> = params.into_iter().collect();
    params.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let encoded_params = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        METHOD,
        urlencoding::encode(url),
        urlencoding::encode(&encoded_params)
    )
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut ipad = [0x36u8; SHA1_BLOCK_SIZE];
    let mut opad = [0x5cu8; SHA1_BLOCK_SIZE];

    let key = if key.len() > SHA1_BLOCK_SIZE {
        Sha1::digest(key).to_vec()
    } else {
        key.to_vec()
    };

    for (i, &b) in key.iter().enumerate() {
        ipad[i] ^= b;
        opad[i] ^= b;
    }

    let mut inner = Sha1::new();
    inner.update(ipad);
    inner.update(data);
    let inner_hash = inner.finalize();

    let mut outer = Sha1::new();
    outer.update(opad);
    outer.update(inner_hash);
    outer.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.tme.eu/Products/GetProducts.json";

    fn products_params(language: &'static str) -> Vec<(&'static str, &'static str)> {
        vec![
            ("SymbolList[0]", "HA50151V4"),
            ("Country", "ES"),
            ("Language", language),
            ("Token", "abc123token"),
        ]
    }

    #[test]
    fn base_string_sorts_and_double_encodes() {
        insta::assert_snapshot!(
            signature_base(URL, products_params("EN")),
            @"POST&https%3A%2F%2Fapi.tme.eu%2FProducts%2FGetProducts.json&Country%3DES%26Language%3DEN%26SymbolList%255B0%255D%3DHA50151V4%26Token%3Dabc123token"
        );
    }

    #[test]
    fn known_signature() {
        assert_eq!(
            sign(URL, products_params("EN"), "s3cr3t"),
            "yhXk3oDRBNeDtnkK3daOalhF14M="
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let first = sign(URL, products_params("EN"), "s3cr3t");
        for _ in 0..3 {
            assert_eq!(sign(URL, products_params("EN"), "s3cr3t"), first);
        }
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut reversed = products_params("EN");
        reversed.reverse();
        assert_eq!(
            sign(URL, reversed, "s3cr3t"),
            sign(URL, products_params("EN"), "s3cr3t")
        );
    }

    #[test]
    fn one_changed_byte_changes_signature() {
        let signature = sign(URL, products_params("EM"), "s3cr3t");
        assert_eq!(signature, "/SqHYrUKFfMTrP06HuAyD/SKeR0=");
        assert_ne!(signature, sign(URL, products_params("EN"), "s3cr3t"));
    }

    #[test]
    fn spaces_encode_as_percent_20() {
        let params = [("Token", "t"), ("Note", "a b/c")];
        let base = signature_base(URL, params);
        assert!(base.ends_with("&Note%3Da%2520b%252Fc%26Token%3Dt"));
        assert_eq!(sign(URL, params, "k"), "l1jPJdgSK3XFgLEL11GmbEUuaVs=");
    }

    #[test]
    fn long_secret_is_hashed_first() {
        let secret = "k".repeat(100);
        assert_eq!(
            sign(URL, [("Token", "t")], &secret),
            "GXU3fla0Z+8QjEYeBsrCBtcfAqI="
        );
    }

    #[test]
    fn signed_request_carries_token_and_signature() {
        let params = BTreeMap::from([
            ("SymbolList[0]".to_string(), "HA50151V4".to_string()),
            ("Country".to_string(), "ES".to_string()),
            ("Language".to_string(), "EN".to_string()),
        ]);
        let request = SignedRequest::new(URL, params, "abc123token", "s3cr3t");

        assert_eq!(request.method(), "POST");
        assert_eq!(
            request.params.get("Token").map(String::as_str),
            Some("abc123token")
        );
        assert_eq!(request.signature(), Some("yhXk3oDRBNeDtnkK3daOalhF14M="));
        assert_eq!(request.params.len(), 5);
    }
}
