//! Qboy dispatch service protocol
//!
//! This crate defines the HTTP exchanges between a Qboy pager and the
//! dispatch service. Both exchanges are plain `GET` requests without a body;
//! the service answers with a JSON array.
//!
//! # Protocol Overview
//!
//! ```text
//! GET {base}/dispositivo/parear/{device_id}
//!     []                              -> device not associated with an order
//!     [{"id_pedido_exame": "1450"}]   -> device paired with order 1450
//!
//! GET {base}/dispositivo/checar/{device_id}&{order_id}
//!     []                              -> no active call
//!     [{"sala": "07", "mensagem1": "Sala A", ...}]  -> call for this device
//! ```
//!
//! Only an HTTP 200 answer is accepted; any other status is a protocol
//! failure regardless of the body. Missing or malformed fields inside a
//! record decode to documented defaults; only a body that is not a JSON
//! array is rejected.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod endpoint;
pub mod records;
pub mod reply;
pub mod transport;

pub use endpoint::{call_check_url, pairing_url, Exchange, Url, UrlError, MAX_URL_LEN};
pub use records::{
    decode_call, decode_pairing, CallRecord, CallReply, DecodeError, MessageRecord, OrderId,
    PairingReply, MAX_MESSAGE_LEN, MAX_ORDER_ID_LEN, MAX_ROOM_LEN, ORDER_ID_FALLBACK,
};
pub use reply::{ExchangeError, HttpReply, HTTP_OK, MAX_BODY_SIZE};
pub use transport::{fetch, HttpGet};
