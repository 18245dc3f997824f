//! Typed records decoded from service replies
//!
//! Every reply is a JSON array. An empty array is a normal "nothing to do"
//! answer; otherwise only the first element is used and the rest is
//! skipped without being built. Fields inside that element are decoded
//! leniently into fixed-size buffers:
//!
//! | Kind    | Accepts                           | Default  |
//! |---------|-----------------------------------|----------|
//! | text    | string, number                    | `""`     |
//! | count   | non-negative number, digit string | `0`      |
//! | order   | string, number (non-empty)        | `"ERRO"` |
//!
//! A first element that is not an object decodes as a record with every
//! field at its default. Text longer than its buffer is truncated at a
//! character boundary, numbers shown as text keep their leading digits.

use core::fmt::{self, Write};
use core::marker::PhantomData;

use heapless::String;
use serde::de::{self, DeserializeOwned, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;

/// Maximum order identifier length
pub const MAX_ORDER_ID_LEN: usize = 24;

/// Maximum room label length
pub const MAX_ROOM_LEN: usize = 16;

/// Maximum message text length
pub const MAX_MESSAGE_LEN: usize = 96;

/// Order identifier used when the pairing record carries no usable one
pub const ORDER_ID_FALLBACK: &str = "ERRO";

/// Order identifier assigned by the service
pub type OrderId = String<MAX_ORDER_ID_LEN>;

/// Structural decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Body is not valid JSON
    InvalidJson,
    /// Top-level value is not an array
    NotAnArray,
}

/// Answer to a pairing request
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingReply {
    /// Empty array: no order is associated with this device
    Unassigned,
    /// The device is associated with this order
    Assigned(OrderId),
}

/// One message of a call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageRecord {
    /// Text to show
    pub text: String<MAX_MESSAGE_LEN>,
    /// How long to show it, in seconds
    pub duration_s: u16,
    /// How many times the call should be repeated
    pub repeat: u16,
}

/// A call addressed to this device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallRecord {
    /// Room the holder should go to
    pub room: String<MAX_ROOM_LEN>,
    /// First message
    pub primary: MessageRecord,
    /// Second message (may be empty)
    pub secondary: MessageRecord,
    /// Vibration pulses per alert iteration
    pub vibration_pulses: u16,
}

/// Answer to a call-check request
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallReply {
    /// Empty array: nothing to do
    NoCall,
    /// A call is waiting
    Call(CallRecord),
}

/// First element of a pairing reply
#[derive(Debug, Default, Deserialize)]
struct PairingFields {
    #[serde(rename = "id_pedido_exame", default, deserialize_with = "lenient_text")]
    order_id: OrderId,
}

/// First element of a call-check reply
#[derive(Debug, Default, Deserialize)]
struct CallFields {
    #[serde(rename = "sala", default, deserialize_with = "lenient_text")]
    room: String<MAX_ROOM_LEN>,
    #[serde(rename = "mensagem1", default, deserialize_with = "lenient_text")]
    primary_text: String<MAX_MESSAGE_LEN>,
    #[serde(rename = "tempo1", default, deserialize_with = "lenient_count")]
    primary_duration_s: u16,
    #[serde(rename = "repeticoes1", default, deserialize_with = "lenient_count")]
    primary_repeat: u16,
    #[serde(rename = "mensagem2", default, deserialize_with = "lenient_text")]
    secondary_text: String<MAX_MESSAGE_LEN>,
    #[serde(rename = "tempo2", default, deserialize_with = "lenient_count")]
    secondary_duration_s: u16,
    #[serde(rename = "repeticoes2", default, deserialize_with = "lenient_count")]
    secondary_repeat: u16,
    #[serde(rename = "vibracao", default, deserialize_with = "lenient_count")]
    vibration_pulses: u16,
}

/// Decode a pairing reply body
pub fn decode_pairing(body: &[u8]) -> Result<PairingReply, DecodeError> {
    let Some(record) = first_record::<PairingFields>(body)? else {
        return Ok(PairingReply::Unassigned);
    };

    let order = if record.order_id.is_empty() {
        truncated(ORDER_ID_FALLBACK)
    } else {
        record.order_id
    };
    Ok(PairingReply::Assigned(order))
}

/// Decode a call-check reply body
pub fn decode_call(body: &[u8]) -> Result<CallReply, DecodeError> {
    let Some(record) = first_record::<CallFields>(body)? else {
        return Ok(CallReply::NoCall);
    };

    Ok(CallReply::Call(CallRecord {
        room: record.room,
        primary: MessageRecord {
            text: record.primary_text,
            duration_s: record.primary_duration_s,
            repeat: record.primary_repeat,
        },
        secondary: MessageRecord {
            text: record.secondary_text,
            duration_s: record.secondary_duration_s,
            repeat: record.secondary_repeat,
        },
        vibration_pulses: record.vibration_pulses,
    }))
}

/// Parse the body as an array and keep its first element
///
/// Syntax errors are invalid JSON; a well-formed document of the wrong
/// shape is not an array.
fn first_record<T: DeserializeOwned + Default>(body: &[u8]) -> Result<Option<T>, DecodeError> {
    let first: FirstElement<T> = serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => DecodeError::NotAnArray,
        _ => DecodeError::InvalidJson,
    })?;

    Ok(first.0.map(|element| match element {
        Element::Record(record) => record,
        Element::Other(_) => T::default(),
    }))
}

/// An array element: a record, or anything else
#[derive(Deserialize)]
#[serde(untagged)]
enum Element<T> {
    Record(T),
    Other(IgnoredAny),
}

struct FirstElement<T>(Option<Element<T>>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FirstElement<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(FirstElementVisitor(PhantomData))
    }
}

struct FirstElementVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for FirstElementVisitor<T> {
    type Value = FirstElement<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let first = seq.next_element::<Element<T>>()?;
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FirstElement(first))
    }
}

fn lenient_text<'de, D, const N: usize>(deserializer: D) -> Result<String<N>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

/// Text from a string or a number; anything else is empty
struct TextVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for TextVisitor<N> {
    type Value = String<N>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("text or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(truncated(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(displayed(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(displayed(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(displayed(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        skip_seq(seq).map(|()| String::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        skip_map(map).map(|()| String::new())
    }
}

/// Count from a non-negative number or a digit string; anything else is 0
///
/// Numbers above `u16::MAX` saturate.
struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = u16;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative count")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u16, E> {
        Ok(u16::try_from(v).unwrap_or(u16::MAX))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u16, E> {
        Ok(match u64::try_from(v) {
            Ok(v) => u16::try_from(v).unwrap_or(u16::MAX),
            Err(_) => 0,
        })
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<u16, E> {
        Ok(0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u16, E> {
        Ok(v.trim().parse().unwrap_or(0))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<u16, E> {
        Ok(0)
    }

    fn visit_unit<E: de::Error>(self) -> Result<u16, E> {
        Ok(0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<u16, A::Error> {
        skip_seq(seq).map(|()| 0)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<u16, A::Error> {
        skip_map(map).map(|()| 0)
    }
}

fn skip_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn skip_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

/// Writer that keeps whole characters while they fit and drops the rest
struct Clipped<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Clipped<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn displayed<const N: usize>(value: impl fmt::Display) -> String<N> {
    let mut out = String::new();
    let _ = write!(Clipped(&mut out), "{}", value);
    out
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_empty_array() {
        assert_eq!(decode_pairing(b"[]"), Ok(PairingReply::Unassigned));
        assert_eq!(decode_pairing(b"  [ ]\n"), Ok(PairingReply::Unassigned));
    }

    #[test]
    fn test_pairing_with_order() {
        let reply = decode_pairing(br#"[{"id_pedido_exame": "1450"}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated("1450")));
    }

    #[test]
    fn test_pairing_numeric_order() {
        let reply = decode_pairing(br#"[{"id_pedido_exame": 1450}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated("1450")));
    }

    #[test]
    fn test_pairing_missing_order_falls_back() {
        let reply = decode_pairing(br#"[{"paciente": "Maria"}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated(ORDER_ID_FALLBACK)));

        // Malformed values fall back as well
        let reply = decode_pairing(br#"[{"id_pedido_exame": null}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated(ORDER_ID_FALLBACK)));

        let reply = decode_pairing(br#"[{"id_pedido_exame": ""}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated(ORDER_ID_FALLBACK)));

        // First element not even an object
        let reply = decode_pairing(br#"[42]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated(ORDER_ID_FALLBACK)));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(decode_pairing(b"not json"), Err(DecodeError::InvalidJson));
        assert_eq!(decode_pairing(b""), Err(DecodeError::InvalidJson));
        assert_eq!(
            decode_pairing(br#"{"id_pedido_exame": "1"}"#),
            Err(DecodeError::NotAnArray)
        );
        assert_eq!(decode_call(b"null"), Err(DecodeError::NotAnArray));
    }

    #[test]
    fn test_call_empty_array() {
        assert_eq!(decode_call(b"[]"), Ok(CallReply::NoCall));
    }

    #[test]
    fn test_call_full_record() {
        let body = br#"[{
            "sala": "07",
            "mensagem1": "Sala A", "tempo1": 5, "repeticoes1": 2,
            "mensagem2": "Dr. Silva", "tempo2": "3", "repeticoes2": 1,
            "vibracao": 4
        }]"#;

        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };

        assert_eq!(call.room.as_str(), "07");
        assert_eq!(call.primary.text.as_str(), "Sala A");
        assert_eq!(call.primary.duration_s, 5);
        assert_eq!(call.primary.repeat, 2);
        assert_eq!(call.secondary.text.as_str(), "Dr. Silva");
        assert_eq!(call.secondary.duration_s, 3); // numeric string accepted
        assert_eq!(call.secondary.repeat, 1);
        assert_eq!(call.vibration_pulses, 4);
    }

    #[test]
    fn test_call_partial_record_defaults() {
        let body = br#"[{"sala": 12, "repeticoes1": "dois", "vibracao": -3}]"#;

        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };

        assert_eq!(call.room.as_str(), "12");
        assert_eq!(call.primary.text.as_str(), "");
        assert_eq!(call.primary.repeat, 0);
        assert_eq!(call.secondary, MessageRecord::default());
        assert_eq!(call.vibration_pulses, 0);
    }

    #[test]
    fn test_only_first_element_used() {
        let body = br#"[{"sala": "01"}, {"sala": "02"}]"#;
        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.room.as_str(), "01");
    }

    #[test]
    fn test_long_text_truncated() {
        let body = br#"[{"sala": "SALA DE ESPERA DO TERCEIRO ANDAR"}]"#;
        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.room.len(), MAX_ROOM_LEN);
        assert_eq!(call.room.as_str(), "SALA DE ESPERA D");
    }

    #[test]
    fn test_long_number_keeps_leading_digits() {
        let body = br#"[{"sala": 12345678901234567890}]"#;
        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.room.as_str(), "1234567890123456");

        let reply = decode_pairing(br#"[{"id_pedido_exame": -1450}]"#).unwrap();
        assert_eq!(reply, PairingReply::Assigned(truncated("-1450")));
    }

    #[test]
    fn test_odd_field_types_default() {
        let body = br#"[{
            "sala": {"andar": 3},
            "mensagem1": ["a", "b"],
            "tempo1": 2.5,
            "repeticoes1": true,
            "mensagem2": false,
            "tempo2": null,
            "vibracao": " 3 "
        }, 42, "x"]"#;
        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.room.as_str(), "");
        assert_eq!(call.primary, MessageRecord::default());
        assert_eq!(call.secondary, MessageRecord::default());
        assert_eq!(call.vibration_pulses, 3);
    }

    #[test]
    fn test_accented_text_kept() {
        let body = r#"[{"mensagem1": "DIRIJA-SE AO CONSULTÓRIO"}]"#;
        let CallReply::Call(call) = decode_call(body.as_bytes()).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.primary.text.as_str(), "DIRIJA-SE AO CONSULTÓRIO");
    }

    #[test]
    fn test_trailing_garbage_is_invalid() {
        assert_eq!(decode_call(b"[] x"), Err(DecodeError::InvalidJson));
        assert_eq!(decode_call(b"[{\"sala\": \"07\"}"), Err(DecodeError::InvalidJson));
    }

    #[test]
    fn test_huge_count_saturates() {
        let body = br#"[{"repeticoes1": 1000000}]"#;
        let CallReply::Call(call) = decode_call(body).unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(call.primary.repeat, u16::MAX);
    }
}
