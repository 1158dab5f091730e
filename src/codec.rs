//! Shared binary layout.
//!
//! ```text
//! ┌───────────────┬──────────────────┬──────────────────────────┐
//! │ hashes (1B)   │ bits (2B, LE)    │ payload (variant-defined) │
//! └───────────────┴──────────────────┴──────────────────────────┘
//! ```
//!
//! Payloads:
//!   Ordinary → ceil(bits / 8) packed bytes
//!   Counting → bits raw counter bytes
//!   Paired   → ceil(2 * bits / 8) packed bytes, positive plane first
//!
//! There is no magic, version or checksum. A decoder trusts the header and
//! reads exactly the payload it implies; the only thing detected is a
//! stream that ends too early.

use std::io::{self, Read};

use crate::error::{Error, Result};
use crate::types::FilterParams;

/// Size of the header in bytes (fixed).
pub const HEADER_SIZE: usize = 3;

/// Append the header for `params` to `buf`.
pub(crate) fn encode_header(params: &FilterParams, buf: &mut Vec<u8>) {
    buf.push(params.num_hashes());
    buf.extend_from_slice(&params.num_bits().to_le_bytes());
}

/// Read and validate a header. Only `num_bits == 0` is rejected.
pub(crate) fn read_header<R: Read + ?Sized>(reader: &mut R) -> Result<FilterParams> {
    let mut header = [0u8; HEADER_SIZE];
    read_section(reader, &mut header, "header")?;
    let num_bits = u16::from_le_bytes([header[1], header[2]]);
    FilterParams::new(header[0], num_bits)
}

/// Read exactly `len` payload bytes.
pub(crate) fn read_payload<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; len];
    read_section(reader, &mut payload, "payload")?;
    Ok(payload)
}

/// Like `read_exact`, but a short read reports how far it got.
fn read_section<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    section: &'static str,
) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::Truncated {
                    section,
                    expected: buf.len(),
                    found: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
