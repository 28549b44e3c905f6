use std::time::Duration;

use reqwest::blocking::Client;

use crate::VaudenayError;

/// Route served by the demo padding oracle.
pub const DEFAULT_ORACLE_URL: &str = "http://localhost:1234/check";

/// Answer of a padding oracle for one ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingVerdict {
    /// The plaintext ends with valid PKCS#7 padding.
    Valid,
    /// Decryption hit a padding error.
    Invalid,
}

impl PaddingVerdict {
    /// True for `PaddingVerdict::Valid`.
    pub fn is_valid(self) -> bool {
        self == PaddingVerdict::Valid
    }
}

impl From<bool> for PaddingVerdict {
    fn from(valid: bool) -> Self {
        if valid {
            PaddingVerdict::Valid
        } else {
            PaddingVerdict::Invalid
        }
    }
}

/// `Oracle` tells whether a ciphertext decrypts to validly padded plaintext.
///
/// The first block of `ciphertext` is the IV. Anything that is not a verdict
/// must be reported as `VaudenayError::OracleTransport`.
pub trait Oracle {
    /// Submit `ciphertext` and report the padding verdict.
    fn check(&self, ciphertext: &[u8]) -> Result<PaddingVerdict, VaudenayError>;
}

impl<F> Oracle for F
where
    F: Fn(&[u8]) -> Result<PaddingVerdict, VaudenayError>,
{
    fn check(&self, ciphertext: &[u8]) -> Result<PaddingVerdict, VaudenayError> {
        self(ciphertext)
    }
}

/// `HttpOracle` submits ciphertexts to a remote padding oracle.
///
/// Each query is a `POST` with an urlencoded form whose single field holds
/// the hex encoded ciphertext. The response status is the verdict.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    url: String,
    field: String,
    valid_status: u16,
    padding_error_status: u16,
}

impl HttpOracle {
    /// Return an HttpOracle querying `url`
    ///
    /// # Arguments
    ///
    /// * `url` - Full URL of the check endpoint.
    ///
    pub fn new(url: &str) -> Result<Self, VaudenayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| VaudenayError::transport(format!("cannot build HTTP client: {}", e)))?;
        Ok(HttpOracle {
            client,
            url: url.to_owned(),
            field: "ciphertext".to_owned(),
            valid_status: 200,
            padding_error_status: 599,
        })
    }

    /// Use `field` as the form field carrying the ciphertext.
    pub fn with_field(mut self, field: &str) -> Self {
        self.field = field.to_owned();
        self
    }

    /// Map `valid` to `PaddingVerdict::Valid` and `padding_error` to
    /// `PaddingVerdict::Invalid`.
    pub fn with_statuses(mut self, valid: u16, padding_error: u16) -> Self {
        self.valid_status = valid;
        self.padding_error_status = padding_error;
        self
    }

    /// Give up on a query after `timeout`, reported as a transport error.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, VaudenayError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaudenayError::transport(format!("cannot build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// URL of the check endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Oracle for HttpOracle {
    fn check(&self, ciphertext: &[u8]) -> Result<PaddingVerdict, VaudenayError> {
        let form = [(self.field.as_str(), hex::encode(ciphertext))];
        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .map_err(|e| VaudenayError::transport(format!("{} unreachable: {}", self.url, e)))?;

        let status = response.status().as_u16();
        if status == self.valid_status {
            Ok(PaddingVerdict::Valid)
        } else if status == self.padding_error_status {
            Ok(PaddingVerdict::Invalid)
        } else {
            Err(VaudenayError::transport(format!(
                "{} answered with unexpected status {}",
                self.url, status
            )))
        }
    }
}
