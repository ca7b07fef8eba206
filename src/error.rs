use std::fmt;

use serde::{de, ser};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Input ended before the marker byte's declared tail, or before any marker byte at all.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// Marker byte lies in a range the encoder never produces.
    ReservedMarker(u8),
    /// The bytes are well-formed but are not the encoding the encoder would have produced.
    BadEncode(String),
    /// A value does not fit into the requested integer type, or outside of a signed 64-bit
    /// integer.
    OutOfRange(String),
    /// Occurs when serde serialization or deserialization fails
    SerdeFail(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::ReservedMarker(marker) => write!(f, "Reserved marker byte 0x{:02x}", marker),
            Error::BadEncode(ref err) => write!(f, "Basic data encoding failure: {}", err),
            Error::OutOfRange(ref err) => write!(f, "Integer out of range: {}", err),
            Error::SerdeFail(ref msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = Error::LengthTooShort {
            step: "decode Pos2Byte tail",
            actual: 0,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "Expected data length 1, but got 0 on step [decode Pos2Byte tail]"
        );
        assert_eq!(
            Error::ReservedMarker(0x0e).to_string(),
            "Reserved marker byte 0x0e"
        );
    }

    #[test]
    fn serde_custom() {
        let err = <Error as ser::Error>::custom("nope");
        assert_eq!(err, Error::SerdeFail("nope".to_string()));
        let err = <Error as de::Error>::custom("nope");
        assert_eq!(err, Error::SerdeFail("nope".to_string()));
    }
}
