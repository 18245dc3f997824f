//! HTTP transport abstraction
//!
//! The pager only ever issues body-less `GET` requests. Implementations
//! wrap whatever HTTP client the board provides; DNS, TCP and HTTP framing
//! are their business.

use crate::reply::{ExchangeError, HttpReply};

/// HTTP GET collaborator
#[allow(async_fn_in_trait)]
pub trait HttpGet {
    /// Perform a GET request
    ///
    /// Returns the status and body of whatever the server answered, or
    /// [`ExchangeError::Transport`] when no response was received.
    async fn get(&mut self, url: &str) -> Result<HttpReply, ExchangeError>;
}

/// Perform one exchange and accept only an HTTP 200 answer
///
/// Exactly one request is made; there is no retry loop.
pub async fn fetch<H: HttpGet>(http: &mut H, url: &str) -> Result<HttpReply, ExchangeError> {
    let reply = http.get(url).await?;
    reply.ok_body()?;
    Ok(reply)
}
