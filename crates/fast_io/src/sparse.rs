//! Sparse writing: seek over zero runs instead of storing them.
//!
//! The writer scans each chunk for alternating runs of zero and non-zero
//! bytes. Non-zero runs are written in place; zero runs advance the write
//! position with a relative seek. On filesystems with hole support the
//! skipped ranges consume no backing storage. A trailing zero run leaves
//! the file shorter than the logical length, so callers that need the full
//! length must extend the file afterwards (see [`copy_sparse`]).

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::trace;

/// Chunk size used when streaming a reader through the sparse writer.
const COPY_CHUNK: usize = 64 * 1024;

/// Writes one chunk sparsely: non-zero runs are written, zero runs are
/// skipped by seeking.
///
/// Returns the number of bytes physically written (zero runs excluded).
/// The write position always advances by `chunk.len()` regardless.
pub fn write_sparse_chunk<W: Write + Seek>(writer: &mut W, chunk: &[u8]) -> io::Result<usize> {
    let mut index = 0usize;
    let mut written = 0usize;

    while index < chunk.len() {
        if chunk[index] == 0 {
            let start = index;
            while index < chunk.len() && chunk[index] == 0 {
                index += 1;
            }
            let span = index - start;
            if span > 0 {
                writer.seek(SeekFrom::Current(span as i64))?;
            }
        } else {
            let start = index;
            while index < chunk.len() && chunk[index] != 0 {
                index += 1;
            }
            writer.write_all(&chunk[start..index])?;
            written = written.saturating_add(index - start);
        }
    }

    Ok(written)
}

/// Streams `reader` to `writer` with sparse zero handling.
///
/// Reads the input in fixed-size chunks and forwards each through
/// [`write_sparse_chunk`]. Returns `(total, written)`: the number of bytes
/// consumed from the reader and the number physically written. When the
/// input ends in zeros the writer's file is left short of `total`; the
/// caller is expected to extend it (e.g. with `File::set_len`) so the
/// trailing hole becomes part of the file.
pub fn copy_sparse<R: Read, W: Write + Seek>(
    reader: &mut R,
    writer: &mut W,
) -> io::Result<(u64, u64)> {
    let mut buffer = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;
    let mut written = 0u64;

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        let physical = write_sparse_chunk(writer, &buffer[..read])?;
        total += read as u64;
        written += physical as u64;
    }

    trace!(total, written, "sparse copy complete");
    Ok((total, written))
}
