//! Built-in value serialization.
//!
//! Payloads are big-endian. Strings and arrays are length-prefixed with a
//! signed 32-bit count. Types outside the built-in set (portable, compact,
//! data-serializable and every application serializer) are reported as
//! [`ProtoError::UnsupportedType`]; callers decide how to degrade.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::data::Data;
use crate::error::{ProtoError, Result};
use crate::types::ValueType;
use crate::value::Value;

/// Decode a blob into a native value.
///
/// # Errors
///
/// Returns an error if the type is unsupported or the payload is malformed.
pub fn decode(data: &Data) -> Result<Value> {
    if data.is_null() {
        return Ok(Value::Null);
    }
    let ty = data.value_type();
    let mut r = Reader::new(ty, data.payload());
    let value = match ty {
        ValueType::NULL => Value::Null,
        ValueType::BOOL => Value::Bool(r.u8()? != 0),
        ValueType::INT8 => Value::Int8(i8::from_be_bytes(r.array()?)),
        ValueType::UINT16 => {
            let unit = u16::from_be_bytes(r.array()?);
            let c = char::from_u32(u32::from(unit)).ok_or_else(|| r.invalid(format!(
                "{unit:#06x} is not a scalar value"
            )))?;
            Value::Char(c)
        }
        ValueType::INT16 => Value::Int16(i16::from_be_bytes(r.array()?)),
        ValueType::INT32 => Value::Int32(r.i32()?),
        ValueType::INT64 => Value::Int64(i64::from_be_bytes(r.array()?)),
        ValueType::FLOAT32 => Value::Float32(f32::from_be_bytes(r.array()?)),
        ValueType::FLOAT64 => Value::Float64(f64::from_be_bytes(r.array()?)),
        ValueType::STRING => Value::String(r.string()?),
        ValueType::JSON => Value::Json(r.string()?),
        ValueType::INT8_ARRAY => {
            let len = r.len()?;
            Value::Bytes(r.take(len)?.to_vec())
        }
        ValueType::STRING_ARRAY => {
            let count = r.len()?;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push(r.string()?);
            }
            Value::StringArray(items)
        }
        ValueType::JAVA_LOCAL_DATE_TIME => Value::DateTime(r.date_time()?),
        other => return Err(ProtoError::UnsupportedType(other)),
    };
    Ok(value)
}

/// Serialize a native value into a blob.
///
/// # Errors
///
/// Returns an error for the undecodable placeholder, which has no payload.
pub fn encode(value: &Value) -> Result<Data> {
    let data = match value {
        Value::Null => Data::null(),
        Value::Bool(b) => Data::from_parts(ValueType::BOOL, &[u8::from(*b)]),
        Value::Int8(n) => Data::from_parts(ValueType::INT8, &n.to_be_bytes()),
        Value::Char(c) => {
            let unit = u16::try_from(u32::from(*c)).map_err(|_| {
                ProtoError::Encoding(format!("{c:?} does not fit in one UTF-16 unit"))
            })?;
            Data::from_parts(ValueType::UINT16, &unit.to_be_bytes())
        }
        Value::Int16(n) => Data::from_parts(ValueType::INT16, &n.to_be_bytes()),
        Value::Int32(n) => Data::from_parts(ValueType::INT32, &n.to_be_bytes()),
        Value::Int64(n) => Data::from_parts(ValueType::INT64, &n.to_be_bytes()),
        Value::Float32(n) => Data::from_parts(ValueType::FLOAT32, &n.to_be_bytes()),
        Value::Float64(n) => Data::from_parts(ValueType::FLOAT64, &n.to_be_bytes()),
        Value::String(s) => Data::from_parts(ValueType::STRING, &string_payload(s)?),
        Value::Json(s) => Data::from_parts(ValueType::JSON, &string_payload(s)?),
        Value::Bytes(bytes) => {
            let mut payload = len_prefix(bytes.len())?;
            payload.extend_from_slice(bytes);
            Data::from_parts(ValueType::INT8_ARRAY, &payload)
        }
        Value::StringArray(items) => {
            let mut payload = len_prefix(items.len())?;
            for item in items {
                payload.extend(string_payload(item)?);
            }
            Data::from_parts(ValueType::STRING_ARRAY, &payload)
        }
        Value::DateTime(dt) => Data::from_parts(ValueType::JAVA_LOCAL_DATE_TIME, &date_time_payload(dt)),
        Value::Undecodable { type_name } => {
            return Err(ProtoError::Encoding(format!(
                "placeholder for {type_name} has no payload"
            )));
        }
    };
    Ok(data)
}

fn len_prefix(len: usize) -> Result<Vec<u8>> {
    let len = i32::try_from(len)
        .map_err(|_| ProtoError::Encoding(format!("length {len} exceeds i32")))?;
    Ok(len.to_be_bytes().to_vec())
}

fn string_payload(s: &str) -> Result<Vec<u8>> {
    let mut payload = len_prefix(s.len())?;
    payload.extend_from_slice(s.as_bytes());
    Ok(payload)
}

fn date_time_payload(dt: &NaiveDateTime) -> Vec<u8> {
    use chrono::{Datelike, Timelike};

    let mut payload = Vec::with_capacity(13);
    payload.extend_from_slice(&dt.year().to_be_bytes());
    payload.push(dt.month() as u8);
    payload.push(dt.day() as u8);
    payload.push(dt.hour() as u8);
    payload.push(dt.minute() as u8);
    payload.push(dt.second() as u8);
    payload.extend_from_slice(&(dt.nanosecond() as i32).to_be_bytes());
    payload
}

/// Cursor over a payload that reports short reads against the value type.
struct Reader<'a> {
    ty: ValueType,
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    const fn new(ty: ValueType, buf: &'a [u8]) -> Self {
        Self { ty, buf }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(ProtoError::Truncated {
                ty: self.ty,
                needed: n,
                remaining: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    fn len(&mut self) -> Result<usize> {
        let n = self.i32()?;
        usize::try_from(n).map_err(|_| self.invalid(format!("negative length {n}")))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.len()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| self.invalid(e.to_string()))
    }

    fn date_time(&mut self) -> Result<NaiveDateTime> {
        let year = self.i32()?;
        let [month, day, hour, minute, second] = self.array::<5>()?;
        let nano = self.i32()?;
        let date = NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
            .ok_or_else(|| self.invalid(format!("invalid date {year}-{month}-{day}")))?;
        let nano = u32::try_from(nano).map_err(|_| self.invalid(format!("negative nanos {nano}")))?;
        let time = NaiveTime::from_hms_nano_opt(
            u32::from(hour),
            u32::from(minute),
            u32::from(second),
            nano,
        )
        .ok_or_else(|| self.invalid(format!("invalid time {hour}:{minute}:{second}")))?;
        Ok(NaiveDateTime::new(date, time))
    }

    fn invalid(&self, reason: String) -> ProtoError {
        ProtoError::InvalidPayload {
            ty: self.ty,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Value::Bool(true))]
    #[test_case(Value::Int8(-5))]
    #[test_case(Value::Char('λ'))]
    #[test_case(Value::Int16(-300))]
    #[test_case(Value::Int32(123_456))]
    #[test_case(Value::Int64(-9_000_000_000))]
    #[test_case(Value::Float64(2.5))]
    #[test_case(Value::String("héllo".into()))]
    #[test_case(Value::Json(r#"{"k":[1,2]}"#.into()))]
    #[test_case(Value::Bytes(vec![1, 2, 3]))]
    #[test_case(Value::StringArray(vec!["x".into(), String::new()]))]
    fn built_in_values_survive_encoding(value: Value) {
        let data = encode(&value).expect("encode");
        assert_eq!(decode(&data).expect("decode"), value);
    }

    #[test]
    fn date_time_survives_encoding() {
        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_nano_opt(23, 59, 58, 1_000))
            .expect("valid date");
        let data = encode(&Value::DateTime(dt)).expect("encode");
        assert_eq!(data.value_type(), ValueType::JAVA_LOCAL_DATE_TIME);
        assert_eq!(decode(&data).expect("decode"), Value::DateTime(dt));
    }

    #[test]
    fn null_blob_decodes_to_null() {
        assert_eq!(decode(&Data::null()).expect("decode"), Value::Null);
    }

    #[test]
    fn custom_type_is_unsupported() {
        let data = Data::from_parts(ValueType::new(1001), &[1, 2, 3, 4]);
        let err = decode(&data).expect_err("custom types have no decoder");
        assert!(matches!(err, ProtoError::UnsupportedType(ty) if ty == ValueType::new(1001)));
    }

    #[test]
    fn compact_is_unsupported() {
        let data = Data::from_parts(ValueType::COMPACT, &[0; 16]);
        assert!(matches!(decode(&data), Err(ProtoError::UnsupportedType(_))));
    }

    #[test]
    fn truncated_string_is_reported() {
        let data = Data::from_parts(ValueType::STRING, &[0, 0, 0, 10, b'a']);
        let err = decode(&data).expect_err("truncated");
        assert!(matches!(
            err,
            ProtoError::Truncated {
                needed: 10,
                remaining: 1,
                ..
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let data = Data::from_parts(ValueType::STRING, &[0, 0, 0, 2, 0xff, 0xfe]);
        assert!(matches!(
            decode(&data),
            Err(ProtoError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn negative_length_is_reported() {
        let data = Data::from_parts(ValueType::INT8_ARRAY, &(-1_i32).to_be_bytes());
        assert!(matches!(
            decode(&data),
            Err(ProtoError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn placeholder_cannot_be_encoded() {
        let result = encode(&Value::undecodable("PORTABLE"));
        assert!(matches!(result, Err(ProtoError::Encoding(_))));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strings_survive_encoding(s in ".*") {
                let value = Value::String(s);
                let data = encode(&value).expect("encode");
                prop_assert_eq!(decode(&data).expect("decode"), value);
            }

            #[test]
            fn arbitrary_payloads_never_panic(ty in -130_i32..16, payload in proptest::collection::vec(any::<u8>(), 0..64)) {
                let data = Data::from_parts(ValueType::new(ty), &payload);
                let _ = decode(&data);
            }
        }
    }
}
