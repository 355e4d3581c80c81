//! Per-source content hashing.
//!
//! Sources are hashed as they stream into the bundle, so every byte is read
//! once. The hash covers the transformed bytes, which is what ends up in the
//! artifact.

use sha1::{Digest, Sha1};
use std::io::{self, Write};

/// Writer that forwards to `inner` and feeds everything it accepted into a SHA-1.
///
/// Only bytes the inner writer reports as written are hashed, so the digest
/// always matches what landed in the output.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha1,
    written: u64,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            written: 0,
        }
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Lowercase hex SHA-1 of everything written.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
