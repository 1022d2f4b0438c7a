use hex::FromHexError;
use snafu::{ensure, ResultExt, Snafu};
use tracing::trace;

use crate::config;


#[derive(Debug, Snafu)]
pub enum StreamError {
    #[snafu(display("stream ended, tried to read {wanted} byte(s) but only {available} available"))]
    Ended { wanted: usize, available: usize },

    #[snafu(display("invalid hex representation"))]
    InvalidHex { source: FromHexError },
}


/// Provide access to a byte stream along with a cursor to read into it.
///
/// This is different from both `std::io::Read`/`std::io::Write` and the `bytes`
/// crate as this is supposed to be used for reading from buffers that have
/// an end, so the `read` operation is fallible, but when writing we assume everything
/// is fine so the `write` operation is infallible.
#[derive(Debug, Default, Clone)]
pub struct ByteStream {
    data: Vec<u8>,

    read_pos: usize,
}

impl From<ByteStream> for Vec<u8> {
    fn from(stream: ByteStream) -> Vec<u8> {
        stream.data
    }
}

impl ByteStream {
    pub fn new() -> Self {
        Self {
            data: vec![],
            read_pos: 0,
        }
    }

    pub fn from(data: Vec<u8>) -> Self {
        Self { data, read_pos: 0 }
    }

    pub fn from_hex<T: AsRef<[u8]>>(data: T) -> Result<Self, StreamError> {
        Ok(Self::from(hex::decode(data).context(InvalidHexSnafu)?))
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn hex_data(&self) -> String {
        hex::encode(&self.data)
    }

    /// Number of bytes consumed so far.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    pub fn leftover(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    pub fn read_byte(&mut self) -> Result<u8, StreamError> {
        let pos = self.read_pos;
        ensure!(pos != self.data.len(), EndedSnafu { wanted: 1_usize, available: 0_usize });

        trace!("read 1 byte - hex: {}", hex::encode(&self.data[pos..pos + 1]));
        self.read_pos += 1;
        Ok(self.data[pos])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], StreamError> {
        let available = self.data.len() - self.read_pos;
        ensure!(n <= available, EndedSnafu { wanted: n, available });

        let result = &self.data[self.read_pos..self.read_pos + n];
        trace!("read {n} bytes - hex: {}", hex::encode(result));
        self.read_pos += n;
        Ok(result)
    }

    /// Read a fixed number of bytes into an array, eg: for decoding ints.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut result = [0u8; N];
        result.copy_from_slice(self.read_bytes(N)?);
        Ok(result)
    }

    /// Consume all the bytes that have not been read yet.
    pub fn read_remaining(&mut self) -> &[u8] {
        let start = self.read_pos;
        self.read_pos = self.data.len();
        trace!("read remaining {} bytes", self.read_pos - start);
        &self.data[start..]
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.data.push(byte)
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes)
    }

    /// Write an unsigned LEB128 integer: 7 bits per byte, least significant
    /// group first, high bit set on every byte but the last one.
    pub fn write_var_u64(&mut self, n: u64) {
        let mut n = n;
        loop {
            if n >> 7 != 0 {
                self.write_byte((0x80 | (n & 0x7f)) as u8);
                n >>= 7
            }
            else {
                self.write_byte(n as u8);
                break;
            }
        }
    }

    /// Read an unsigned LEB128 integer.
    ///
    /// Reading stops at the first byte with its high bit cleared, or after
    /// [`config::VARUINT_MAX_BYTES`] bytes, whichever comes first.
    pub fn read_var_u64(&mut self) -> Result<u64, StreamError> {
        let mut result: u64 = 0;
        for i in 0..config::VARUINT_MAX_BYTES {
            let byte = self.read_byte()?;
            result |= ((byte & 0x7f) as u64) << (7 * i);
            if byte & 0x80 == 0 { break; }
        }
        Ok(result)
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use super::*;

    #[test]
    fn read_past_end() -> Result<()> {
        let mut s = ByteStream::from_hex("010203")?;
        assert_eq!(s.read_byte()?, 1);
        assert_eq!(s.read_bytes(2)?, &[2, 3]);
        assert_eq!(s.read_pos(), 3);

        let err = s.read_bytes(4).unwrap_err();
        assert!(matches!(err, StreamError::Ended { wanted: 4, available: 0 }));
        assert!(s.read_byte().is_err());
        Ok(())
    }

    #[test]
    fn var_u64() -> Result<()> {
        let vals: [(u64, &str); 6] = [
            (0, "00"),
            (127, "7f"),
            (128, "8001"),
            (255, "ff01"),
            (u32::MAX as u64, "ffffffff0f"),
            (20_989_371_979, "cbccc1984e"),
        ];
        for (n, repr) in vals {
            let mut s = ByteStream::new();
            s.write_var_u64(n);
            assert_eq!(s.hex_data(), repr);
            assert_eq!(s.read_var_u64()?, n);
            assert!(s.leftover().is_empty());
        }
        Ok(())
    }

    #[test]
    fn var_u64_stops_after_max_bytes() -> Result<()> {
        let mut s = ByteStream::from_hex("ffffffffffffffffffff")?;
        s.read_var_u64()?;
        assert_eq!(s.read_pos(), config::VARUINT_MAX_BYTES);
        assert_eq!(s.leftover(), &[0xff]);
        Ok(())
    }

    #[test]
    fn invalid_hex() {
        assert!(ByteStream::from_hex("0").is_err());
        assert!(ByteStream::from_hex("zz").is_err());
    }
}
