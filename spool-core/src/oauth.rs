//! OAuth 1.0a request signing for user-context API calls

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

use crate::error::PostError;
use crate::twitter::Credentials;

/// RFC 3986 unreserved characters stay bare; everything else is
/// percent-encoded, as RFC 5849 section 3.6 requires.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build the `Authorization` header for a signed request.
///
/// `extra_params` carries query or form parameters that participate in
/// the signature base string; a JSON body does not.
pub(crate) fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    extra_params: &[(String, String)],
) -> Result<String, PostError> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| PostError::Auth(format!("system clock before unix epoch: {e}")))?
        .as_secs()
        .to_string();
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    sign(credentials, method, url, extra_params, &timestamp, &nonce)
}

fn sign(
    credentials: &Credentials,
    method: &str,
    url: &str,
    extra_params: &[(String, String)],
    timestamp: &str,
    nonce: &str,
) -> Result<String, PostError> {
    let oauth_params: [(&str, &str); 6] = [
        ("oauth_consumer_key", &credentials.consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", &credentials.access_token),
        ("oauth_version", "1.0"),
    ];

    let mut signed: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(extra_params.iter().cloned())
        .collect();
    signed.sort();
    let param_string = signed
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_token_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PostError::Auth(format!("cannot derive signing key: {e}")))?;
    mac.update(base.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header = oauth_params
        .iter()
        .map(|(k, v)| (*k, v.to_string()))
        .chain(std::iter::once(("oauth_signature", signature)))
        .map(|(k, v)| format!(r#"{}="{}""#, encode(k), encode(&v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {header}"))
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}
