//! Incremental UTF-8 decoding for streamed response bodies.
//!
//! HTTP chunk boundaries do not respect character boundaries: a multi-byte
//! UTF-8 sequence can be split across two chunks. The decoder keeps the
//! undecoded trailing bytes of each chunk and prepends them to the next one,
//! so a split character decodes once it is complete instead of being mangled
//! at the boundary.

/// Stateful byte-to-text decoder.
///
/// Feed successive chunks with [`decode`](ChunkDecoder::decode); call
/// [`finish`](ChunkDecoder::finish) once after the last chunk to flush any
/// bytes still carried over.
///
/// # Example
/// ```
/// use chatpipe::decode::ChunkDecoder;
///
/// let mut decoder = ChunkDecoder::new();
/// // "é" is 0xC3 0xA9, split across two chunks
/// assert_eq!(decoder.decode(&[b'h', 0xC3]), "h");
/// assert_eq!(decoder.decode(&[0xA9, b'!']), "é!");
/// assert_eq!(decoder.finish(), "");
/// ```
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    carry: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all text that is complete so far.
    ///
    /// An incomplete multi-byte sequence at the end of the chunk is retained
    /// for the next call. Invalid byte sequences in the interior are replaced
    /// with U+FFFD rather than aborting the stream.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes: Vec<u8> = if self.carry.is_empty() {
            chunk.to_vec()
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(chunk);
            joined
        };

        let mut out = String::new();
        let mut rest = bytes.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    // Safe: from_utf8 validated this prefix.
                    out.push_str(std::str::from_utf8(&rest[..valid]).unwrap_or(""));

                    match e.error_len() {
                        Some(bad) => {
                            // Invalid sequence in the interior; substitute and keep going.
                            out.push('\u{FFFD}');
                            rest = &rest[valid + bad..];
                        }
                        None => {
                            // Incomplete trailing sequence: carry it into the next chunk.
                            self.carry = rest[valid..].to_vec();
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flush carried bytes at end-of-stream.
    ///
    /// A sequence still incomplete when the transport closes can never be
    /// completed, so it decodes lossily.
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            return String::new();
        }
        let carry = std::mem::take(&mut self.carry);
        String::from_utf8_lossy(&carry).into_owned()
    }
}
