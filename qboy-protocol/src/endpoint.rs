//! Endpoint URLs for the dispatch service

use core::fmt::Write;

use heapless::String;

/// Maximum length of a request URL
pub const MAX_URL_LEN: usize = 192;

/// Request URL buffer
pub type Url = String<MAX_URL_LEN>;

/// Path of the pairing endpoint, relative to the service base URL
pub const PAIRING_PATH: &str = "/dispositivo/parear/";

/// Path of the call-check endpoint, relative to the service base URL
pub const CALL_CHECK_PATH: &str = "/dispositivo/checar/";

/// The two exchanges a pager performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exchange {
    /// Registration: binds the device to a work order
    Pairing,
    /// "Is there a call for me"
    CallCheck,
}

/// URL construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrlError {
    /// The URL does not fit in [`MAX_URL_LEN`] bytes
    TooLong,
}

/// Build the pairing URL: `{base}/dispositivo/parear/{device_id}`
pub fn pairing_url(base: &str, device_id: &str) -> Result<Url, UrlError> {
    let mut url = Url::new();
    write!(url, "{}{}{}", trim_base(base), PAIRING_PATH, device_id)
        .map_err(|_| UrlError::TooLong)?;
    Ok(url)
}

/// Build the call-check URL: `{base}/dispositivo/checar/{device_id}&{order_id}`
///
/// The `&` separator is what the service expects; it is part of the path,
/// not a query string.
pub fn call_check_url(base: &str, device_id: &str, order_id: &str) -> Result<Url, UrlError> {
    let mut url = Url::new();
    write!(
        url,
        "{}{}{}&{}",
        trim_base(base),
        CALL_CHECK_PATH,
        device_id,
        order_id
    )
    .map_err(|_| UrlError::TooLong)?;
    Ok(url)
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://easystop.com.br/api/qboy";

    #[test]
    fn test_pairing_url() {
        let url = pairing_url(BASE, "QB-0001").unwrap();
        assert_eq!(
            url.as_str(),
            "http://easystop.com.br/api/qboy/dispositivo/parear/QB-0001"
        );
    }

    #[test]
    fn test_call_check_url() {
        let url = call_check_url(BASE, "QB-0001", "1450").unwrap();
        assert_eq!(
            url.as_str(),
            "http://easystop.com.br/api/qboy/dispositivo/checar/QB-0001&1450"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let url = pairing_url("http://host/api/", "abc").unwrap();
        assert_eq!(url.as_str(), "http://host/api/dispositivo/parear/abc");
    }

    #[test]
    fn test_url_too_long() {
        let bytes = [b'x'; 200];
        let long_id = core::str::from_utf8(&bytes).unwrap();
        assert_eq!(pairing_url(BASE, long_id), Err(UrlError::TooLong));
    }
}
