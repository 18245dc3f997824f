//! HTTP replies and the exchange error taxonomy

use heapless::Vec;

use crate::records::DecodeError;

/// Maximum response body kept from the service
pub const MAX_BODY_SIZE: usize = 2048;

/// The only status code treated as success
pub const HTTP_OK: u16 = 200;

/// Why an exchange produced nothing usable
///
/// None of these are fatal: the caller leaves its state unchanged and the
/// exchange is repeated on the next due period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExchangeError {
    /// No HTTP response (DNS, TCP, timeout, or a body that did not fit)
    Transport,
    /// The service answered with a status other than 200
    Status(u16),
    /// The body is not a JSON array
    Decode(DecodeError),
}

impl From<DecodeError> for ExchangeError {
    fn from(e: DecodeError) -> Self {
        ExchangeError::Decode(e)
    }
}

/// A received HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8, MAX_BODY_SIZE>,
}

impl HttpReply {
    /// Create a reply from a status code and body bytes
    ///
    /// A body longer than [`MAX_BODY_SIZE`] counts as a transport failure:
    /// a truncated JSON document is of no use.
    pub fn new(status: u16, body: &[u8]) -> Result<Self, ExchangeError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(body)
            .map_err(|_| ExchangeError::Transport)?;
        Ok(Self { status, body: buf })
    }

    /// Body of a successful reply
    pub fn ok_body(&self) -> Result<&[u8], ExchangeError> {
        if self.status == HTTP_OK {
            Ok(&self.body)
        } else {
            Err(ExchangeError::Status(self.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_body() {
        let reply = HttpReply::new(200, b"[]").unwrap();
        assert_eq!(reply.ok_body(), Ok(&b"[]"[..]));
    }

    #[test]
    fn test_non_ok_status_is_protocol_failure() {
        // Body content is irrelevant when the status is not 200
        let reply = HttpReply::new(204, b"[{\"sala\":\"07\"}]").unwrap();
        assert_eq!(reply.ok_body(), Err(ExchangeError::Status(204)));

        let reply = HttpReply::new(500, b"").unwrap();
        assert_eq!(reply.ok_body(), Err(ExchangeError::Status(500)));
    }

    #[test]
    fn test_oversized_body() {
        let body = [b' '; MAX_BODY_SIZE + 1];
        assert_eq!(HttpReply::new(200, &body), Err(ExchangeError::Transport));
    }
}
