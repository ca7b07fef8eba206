//! intpack is a variable-length, order-preserving binary encoding for 64-bit signed integers,
//! meant for building sort keys in storage engines.
//!
//! Every encoding has three properties:
//!
//! - It round-trips: decoding recovers the exact original value.
//! - It is self-delimiting: the first byte says how long the encoding is, so encodings can be
//! 	concatenated and decoded one after another without any length metadata.
//! - It is order-preserving: comparing two encodings byte-wise (as unsigned bytes) gives the same
//! 	answer as comparing the integers. No encoding is a prefix of another, so a concatenation of
//! 	encodings orders like the tuple of integers it holds.
//!
//! Small magnitudes stay small: values in `-64..=63` take one byte, values in `-8256..=8255`
//! take two, and nothing takes more than nine.
//!
//! ```
//! let mut key = intpack::encode(-100);
//! intpack::encode_vec(&mut key, 1 << 40);
//!
//! let (first, used) = intpack::decode(&key).unwrap();
//! let (second, _) = intpack::decode_at(&key, used).unwrap();
//! assert_eq!((first, second), (-100, 1 << 40));
//!
//! assert!(intpack::encode(-100) < intpack::encode(-1));
//! assert!(intpack::encode(-1) < intpack::encode(0));
//! ```
//!
//! On top of the codec are two ways of working with composite keys:
//!
//! - [`Packer`] and [`Unpacker`], which push and pull integers one field at a time.
//! - [`to_key`] and [`from_key`], a serde data format where every leaf of a derived type becomes
//! 	one packed integer.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct RowKey {
//!     table: u32,
//!     row: i64,
//! }
//!
//! let a = intpack::to_key(&RowKey { table: 2, row: -5 }).unwrap();
//! let b = intpack::to_key(&RowKey { table: 2, row: 70 }).unwrap();
//! assert!(a < b);
//! assert_eq!(intpack::from_key::<RowKey>(&b).unwrap(), RowKey { table: 2, row: 70 });
//! ```

mod de;
mod error;
mod integer;
mod marker;
mod packer;
mod ser;
mod utils;

pub use de::from_key;
pub use error::{Error, Result};
pub use integer::{decode, decode_at, encode, encode_vec, encoded_len, PackInt};
pub use marker::{
    Marker, MAX_ENCODED_LEN, MAX_TAIL_LEN, NEG_1BYTE_MARKER, NEG_1BYTE_MIN, NEG_2BYTE_MARKER,
    NEG_2BYTE_MIN, NEG_MULTI_MARKER, POS_1BYTE_MARKER, POS_1BYTE_MAX, POS_2BYTE_MARKER,
    POS_2BYTE_MAX, POS_MULTI_MARKER,
};
pub use packer::{Packer, Unpacker};
pub use ser::to_key;
