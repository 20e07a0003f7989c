//! SigV4 signing for the bodiless GET requests the Top Sites API takes.

use std::time::SystemTime;

pub use aws_credential_types::Credentials;
use aws_sigv4::http_request::SignableBody;
use aws_sigv4::http_request::SignableRequest;
use aws_sigv4::http_request::SigningSettings;
use aws_sigv4::http_request::sign;
use aws_sigv4::sign::v4;
use chrono::DateTime;
use chrono::Utc;

use crate::Error;
use crate::Result;

const PROVIDER_NAME: &str = "alexa-top-sites";

/// Static credentials from the command line or environment.
pub fn static_credentials(
    access_key_id: impl Into<String>,
    secret_access_key: impl Into<String>,
) -> Credentials {
    Credentials::new(access_key_id, secret_access_key, None, None, PROVIDER_NAME)
}

/// Headers produced by signing, to attach to the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub headers: Vec<(String, String)>,
    pub signature: String,
}

impl SignedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
    service: String,
}

impl Signer {
    pub fn new(credentials: Credentials, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Signs a GET of `url` at `now`. Only `host` and `x-amz-date` are signed.
    pub fn sign_get(&self, url: &str, now: DateTime<Utc>) -> Result<SignedRequest> {
        let signable_request = SignableRequest::new(
            "GET",
            url,
            std::iter::empty::<(&str, &str)>(),
            SignableBody::Bytes(&[]),
        )
        .map_err(|e| Error::Signing(e.to_string()))?;

        let identity = self.credentials.clone().into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::from(now))
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| Error::Signing(e.to_string()))?
            .into();

        let (instructions, signature) = sign(signable_request, &signing_params)
            .map_err(|e| Error::Signing(e.to_string()))?
            .into_parts();

        Ok(SignedRequest {
            headers: instructions
                .headers()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            signature,
        })
    }
}
