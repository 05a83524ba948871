/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read bytes into `buf` up to and including the next `delimiter`, taking
/// no more than `max_len` bytes off the reader in total.
///
/// Returns whether the delimiter was found and how many bytes were read.
/// A not-found result means either EOF or that the length cap was hit, so
/// untrusted input can not grow `buf` past `max_len`.
pub(crate) async fn limited_read_until<R>(
    reader: &mut R,
    delimiter: u8,
    max_len: usize,
    buf: &mut Vec<u8>,
) -> io::Result<(bool, usize)>
where
    R: AsyncBufRead + Unpin,
{
    let mut read = 0usize;
    while read < max_len {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok((false, read));
        }
        let left = max_len - read;
        match memchr::memchr(delimiter, available) {
            Some(p) if p < left => {
                buf.extend_from_slice(&available[0..=p]);
                reader.consume(p + 1);
                return Ok((true, read + p + 1));
            }
            _ => {
                let nr = available.len().min(left);
                buf.extend_from_slice(&available[0..nr]);
                reader.consume(nr);
                read += nr;
            }
        }
    }
    Ok((false, read))
}
