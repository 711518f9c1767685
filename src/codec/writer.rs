//! Typed little-endian field writer
//!
//! Layouts are composed by calling one method per field in declaration
//! order. Nothing is ever written at a computed offset.

use solana_pubkey::Pubkey;

/// Width remote identifiers are padded to when stored in fixed-width space
pub const REMOTE_ADDRESS_WIDTH: usize = 32;

/// Append-only buffer for instruction data
#[derive(Debug, Default, Clone)]
pub struct InstructionWriter {
    buf: Vec<u8>,
}

impl InstructionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a buffer with an opcode prefix already written
    pub fn with_prefix(prefix: &[u8]) -> Self {
        Self {
            buf: prefix.to_vec(),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    pub fn write_pubkey(&mut self, key: &Pubkey) -> &mut Self {
        self.buf.extend_from_slice(key.as_ref());
        self
    }

    /// Element count or byte length prefix.
    ///
    /// Programs decode the prefix as a u32. Every caller writes into a single
    /// instruction, which the packet limit keeps far below that, so an
    /// overflow is a bug and panics instead of truncating.
    pub fn write_len(&mut self, len: usize) -> &mut Self {
        assert!(
            len <= u32::MAX as usize,
            "length {} does not fit a u32 prefix",
            len
        );
        self.write_u32(len as u32)
    }

    /// Raw bytes with no prefix
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Length-prefixed byte string
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_len(bytes.len()).write_raw(bytes)
    }

    /// Length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) -> &mut Self {
        self.write_bytes(value.as_bytes())
    }

    /// Foreign chain address.
    ///
    /// The prefix is always the original length. With `fixed_width` set,
    /// values shorter than [`REMOTE_ADDRESS_WIDTH`] are left-padded with
    /// zeros after the prefix.
    pub fn write_remote_address(&mut self, bytes: &[u8], fixed_width: bool) -> &mut Self {
        self.write_len(bytes.len());
        if fixed_width && bytes.len() < REMOTE_ADDRESS_WIDTH {
            self.buf
                .extend(std::iter::repeat(0u8).take(REMOTE_ADDRESS_WIDTH - bytes.len()));
        }
        self.write_raw(bytes)
    }

    pub fn write_pubkey_list(&mut self, keys: &[Pubkey]) -> &mut Self {
        self.write_len(keys.len());
        for key in keys {
            self.write_pubkey(key);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
