//! Element-to-bytes conversion

use std::borrow::Cow;

use crate::error::Result;

/// Trait for types that can be added to or queried against a filter.
///
/// Membership is defined over the produced bytes: two values are the
/// same element iff their byte forms are equal. Integers use their
/// little-endian encoding, strings their UTF-8 bytes.
///
/// The conversion is fallible only for adapter types that serialize
/// arbitrary values (see [`JsonElement`]); the std implementations
/// never fail.
pub trait FilterElement {
    /// Raw byte representation used for hashing
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>>;
}

impl FilterElement for [u8] {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl FilterElement for &[u8] {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(*self))
    }
}

impl<const N: usize> FilterElement for [u8; N] {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl FilterElement for Vec<u8> {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl FilterElement for str {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl FilterElement for &str {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl FilterElement for String {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

macro_rules! impl_element_for_int {
    ($($ty:ty),*) => {
        $(
            impl FilterElement for $ty {
                fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
                    Ok(Cow::Owned(self.to_le_bytes().to_vec()))
                }
            }
        )*
    };
}

impl_element_for_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

/// Adapter that hashes any serializable value by its canonical JSON
/// encoding.
///
/// Serialization failure surfaces as `HashInput`: the element could
/// not be turned into bytes, so neither `add` nor `contains` can be
/// answered for it.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy)]
pub struct JsonElement<'a, T: serde::Serialize>(pub &'a T);

#[cfg(feature = "json")]
impl<T: serde::Serialize> FilterElement for JsonElement<'_, T> {
    fn element_bytes(&self) -> Result<Cow<'_, [u8]>> {
        serde_json::to_vec(self.0)
            .map(Cow::Owned)
            .map_err(|e| crate::error::FilterError::HashInput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_bytes() {
        assert_eq!(
            "alpha".element_bytes().unwrap().as_ref(),
            b"alpha".as_slice()
        );
    }

    #[test]
    fn test_int_bytes_little_endian() {
        assert_eq!(
            0x0102_0304u32.element_bytes().unwrap().as_ref(),
            &[0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_same_value_same_bytes() {
        let a = 42u64.element_bytes().unwrap().into_owned();
        let b = 42u64.element_bytes().unwrap().into_owned();
        assert_eq!(a, b);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_element() {
        #[derive(serde::Serialize)]
        struct Ip {
            octets: [u8; 4],
        }
        let ip = Ip {
            octets: [10, 0, 0, 1],
        };
        let element = JsonElement(&ip);
        let bytes = element.element_bytes().unwrap();
        assert!(!bytes.is_empty());
    }
}
