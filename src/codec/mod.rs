//! Instruction data encoding
//!
//! An instruction payload is an opcode prefix followed by the arguments in
//! declaration order. Anchor programs use an 8 byte prefix hashed from the
//! instruction name; native programs (SPL Token, Token Metadata) use a
//! single leading byte. Both share the same field rules, implemented by
//! [`InstructionWriter`].
//!
//! There is no schema here. A field of the wrong type or in the wrong
//! position produces bytes the program fails to decode, which only shows
//! up in the dry-run.

mod writer;

use log::debug;
use serde::Serialize;
use solana_pubkey::Pubkey;

pub use self::writer::{InstructionWriter, REMOTE_ADDRESS_WIDTH};
use crate::constants::discriminator::ANCHOR_DISCRIMINATOR_LENGTH;
use crate::utils::hash::generate_anchor_discriminator;

/// Opcode prefix of an instruction payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Discriminator {
    /// `sha256("global:<name>")[..8]`
    Sighash([u8; ANCHOR_DISCRIMINATOR_LENGTH]),
    /// Single leading instruction byte
    Tag(u8),
}

impl Discriminator {
    pub fn sighash(name: &str) -> Self {
        Discriminator::Sighash(generate_anchor_discriminator(name))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Discriminator::Sighash(bytes) => bytes,
            Discriminator::Tag(tag) => std::slice::from_ref(tag),
        }
    }
}

/// A foreign chain address as carried in instruction data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    pub bytes: Vec<u8>,
    /// Left-pad to [`REMOTE_ADDRESS_WIDTH`] after the length prefix
    pub fixed_width: bool,
}

impl RemoteAddress {
    /// Variable width address, written as-is
    pub fn variable(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            fixed_width: false,
        }
    }

    /// Fixed width identifier, zero padded on the left
    pub fn fixed(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            fixed_width: true,
        }
    }
}

/// A typed instruction argument
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bool(bool),
    Pubkey(Pubkey),
    /// Length-prefixed byte string
    Bytes(Vec<u8>),
    /// Length-prefixed UTF-8 string
    String(String),
    RemoteAddress(RemoteAddress),
    /// Count-prefixed list; elements are encoded one after another
    List(Vec<Field>),
    /// Record; fields back to back with no prefix
    Struct(Vec<Field>),
    /// 0 for none, 1 followed by the value for some
    Option(Option<Box<Field>>),
}

impl Field {
    pub fn pubkeys(keys: &[Pubkey]) -> Field {
        Field::List(keys.iter().copied().map(Field::Pubkey).collect())
    }

    pub fn some(value: Field) -> Field {
        Field::Option(Some(Box::new(value)))
    }

    pub fn none() -> Field {
        Field::Option(None)
    }

    pub fn optional(value: Option<Field>) -> Field {
        Field::Option(value.map(Box::new))
    }

    /// Append this field to `writer`
    pub fn write_to(&self, writer: &mut InstructionWriter) {
        match self {
            Field::U8(v) => {
                writer.write_u8(*v);
            }
            Field::U16(v) => {
                writer.write_u16(*v);
            }
            Field::U32(v) => {
                writer.write_u32(*v);
            }
            Field::U64(v) => {
                writer.write_u64(*v);
            }
            Field::Bool(v) => {
                writer.write_bool(*v);
            }
            Field::Pubkey(key) => {
                writer.write_pubkey(key);
            }
            Field::Bytes(bytes) => {
                writer.write_bytes(bytes);
            }
            Field::String(s) => {
                writer.write_string(s);
            }
            Field::RemoteAddress(addr) => {
                writer.write_remote_address(&addr.bytes, addr.fixed_width);
            }
            Field::List(items) => {
                writer.write_len(items.len());
                for item in items {
                    item.write_to(writer);
                }
            }
            Field::Struct(fields) => {
                for field in fields {
                    field.write_to(writer);
                }
            }
            Field::Option(None) => {
                writer.write_u8(0);
            }
            Field::Option(Some(inner)) => {
                writer.write_u8(1);
                inner.write_to(writer);
            }
        }
    }
}

/// Encode `fields` behind an arbitrary discriminator
pub fn encode_with(discriminator: Discriminator, fields: &[Field]) -> Vec<u8> {
    let mut writer = InstructionWriter::with_prefix(discriminator.as_bytes());
    for field in fields {
        field.write_to(&mut writer);
    }
    writer.into_inner()
}

/// Encode an Anchor instruction: sighash of `name`, then `fields`.
///
/// `name` is hashed verbatim, so it must use the casing the target program
/// declares.
pub fn encode(name: &str, fields: &[Field]) -> Vec<u8> {
    let data = encode_with(Discriminator::sighash(name), fields);
    debug!("Encoded {} with {} fields into {} bytes", name, fields.len(), data.len());
    data
}

/// Encode a native instruction behind a one byte tag
pub fn encode_tagged(tag: u8, fields: &[Field]) -> Vec<u8> {
    encode_with(Discriminator::Tag(tag), fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fields_is_discriminator_only() {
        let data = encode("acceptOwnership", &[]);
        assert_eq!(data, vec![30, 43, 213, 84, 172, 203, 104, 84]);
    }

    #[test]
    fn test_prefix_depends_only_on_name() {
        let a = encode("setRouter", &[Field::Pubkey(Pubkey::new_from_array([1; 32]))]);
        let b = encode("setRouter", &[Field::U64(42), Field::Bool(true)]);
        assert_eq!(a[..8], b[..8]);

        let c = encode("set_router", &[]);
        assert_ne!(a[..8], c[..8]);
    }

    #[test]
    fn test_empty_list() {
        let data = encode_tagged(0, &[Field::List(vec![])]);
        assert_eq!(data, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_single_empty_byte_string() {
        let data = encode_tagged(0, &[Field::List(vec![Field::Bytes(vec![])])]);
        // tag, count = 1, inner length = 0, no element bytes
        assert_eq!(data, vec![0, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_options() {
        let key = Pubkey::new_from_array([3; 32]);
        let some = encode_tagged(6, &[Field::some(Field::Pubkey(key))]);
        assert_eq!(some.len(), 1 + 1 + 32);
        assert_eq!(some[1], 1);

        let none = encode_tagged(6, &[Field::none()]);
        assert_eq!(none, vec![6, 0]);
    }

    #[test]
    fn test_struct_has_no_padding() {
        let data = encode_tagged(
            9,
            &[Field::Struct(vec![
                Field::Bool(true),
                Field::U64(1),
                Field::U64(2),
            ])],
        );
        assert_eq!(data.len(), 1 + 1 + 8 + 8);
        assert_eq!(data[1], 1);
        assert_eq!(&data[2..10], &1u64.to_le_bytes());
        assert_eq!(&data[10..18], &2u64.to_le_bytes());
    }

    #[test]
    fn test_string() {
        let data = encode_tagged(1, &[Field::String("USDC".to_string())]);
        assert_eq!(data, vec![1, 4, 0, 0, 0, b'U', b'S', b'D', b'C']);
    }

    #[test]
    fn test_remote_address_list_mixes_widths() {
        let data = encode_tagged(
            0,
            &[Field::List(vec![
                Field::RemoteAddress(RemoteAddress::variable(vec![0xaa; 20])),
                Field::RemoteAddress(RemoteAddress::fixed(vec![0xbb; 20])),
            ])],
        );
        // tag + count + (4 + 20) + (4 + 32)
        assert_eq!(data.len(), 1 + 4 + 24 + 36);
        assert_eq!(&data[5..9], &20u32.to_le_bytes());
        assert_eq!(&data[29..33], &20u32.to_le_bytes());
        assert_eq!(&data[33..45], &[0u8; 12]);
    }
}
