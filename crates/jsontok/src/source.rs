//! Character sources feeding a [`Scanner`](crate::Scanner).
//!
//! A source hands out one `char` at a time and may support a single bounded
//! mark/reset window. Three concrete sources are provided:
//!
//! - [`StrSource`] reads literal text and supports mark/reset natively.
//! - [`Utf8Source`] decodes UTF‑8 from any [`io::Read`]. Invalid sequences are
//!   replaced with U+FFFD.
//! - [`IterSource`] adapts any `Iterator<Item = char>`.
//!
//! Sources without native rewind gain one through [`Rewind`], which records
//! characters read after a mark and replays them after a reset.
use std::{borrow::Cow, collections::VecDeque, io};

use tracing::trace;

/// A readable stream of characters with an optional bounded rewind window.
pub trait CharSource {
    /// Reads the next character, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying stream.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Remembers the current position so that [`reset`](Self::reset) can
    /// return to it, as long as no more than `limit` characters are read in
    /// between.
    ///
    /// # Errors
    ///
    /// The default implementation reports [`io::ErrorKind::Unsupported`].
    fn mark(&mut self, limit: usize) -> io::Result<()> {
        let _ = limit;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "mark() not supported",
        ))
    }

    /// Returns to the most recent mark.
    ///
    /// # Errors
    ///
    /// Fails if the source was never marked, the mark was invalidated by
    /// reading past its limit, or the source cannot rewind at all.
    fn reset(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "reset() not supported",
        ))
    }

    /// Releases the current mark. Afterwards [`reset`](Self::reset) fails
    /// until the source is marked again.
    ///
    /// The default implementation does nothing.
    fn unmark(&mut self) {}
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }

    fn mark(&mut self, limit: usize) -> io::Result<()> {
        (**self).mark(limit)
    }

    fn reset(&mut self) -> io::Result<()> {
        (**self).reset()
    }

    fn unmark(&mut self) {
        (**self).unmark();
    }
}

fn not_marked() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "stream not marked")
}

// ------------------------------------------------------------------------------------------------
// Literal text
// ------------------------------------------------------------------------------------------------

/// Reads characters out of an in-memory string.
///
/// The mark limit is ignored: the whole text stays available, so a reset is
/// always possible once a mark has been set.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    text: Cow<'a, str>,
    pos: usize,
    mark: Option<usize>,
}

impl<'a> StrSource<'a> {
    /// Creates a source over `text`.
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
            mark: None,
        }
    }

    /// The part of the text that has not been read yet.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.text[self.pos..]
    }
}

impl CharSource for StrSource<'_> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(ch) = self.text[self.pos..].chars().next() else {
            return Ok(None);
        };
        self.pos += ch.len_utf8();
        Ok(Some(ch))
    }

    fn mark(&mut self, _limit: usize) -> io::Result<()> {
        self.mark = Some(self.pos);
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.pos = self.mark.ok_or_else(not_marked)?;
        Ok(())
    }

    fn unmark(&mut self) {
        self.mark = None;
    }
}

// ------------------------------------------------------------------------------------------------
// UTF-8 byte streams
// ------------------------------------------------------------------------------------------------

const READ_CHUNK: usize = 8 * 1024;

/// Decodes UTF‑8 characters from a byte stream.
///
/// Bytes are pulled from the reader in chunks; a multi-byte sequence split
/// across two reads is completed before decoding. Malformed sequences decode
/// to U+FFFD, one replacement per maximal invalid prefix.
#[derive(Debug)]
pub struct Utf8Source<R> {
    reader: R,
    buf: Vec<u8>,
    start: usize,
    eof: bool,
}

impl<R: io::Read> Utf8Source<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(READ_CHUNK),
            start: 0,
            eof: false,
        }
    }

    /// Returns the wrapped reader. Bytes buffered but not yet decoded are
    /// lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Tops up the buffer so that it holds at least four bytes, or everything
    /// that is left in the stream.
    fn fill(&mut self) -> io::Result<()> {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
        while !self.eof && self.buf.len() < 4 {
            let len = self.buf.len();
            self.buf.resize(len + READ_CHUNK, 0);
            let read = loop {
                match self.reader.read(&mut self.buf[len..]) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        self.buf.truncate(len);
                        return Err(e);
                    }
                }
            };
            self.buf.truncate(len + read);
            if read == 0 {
                self.eof = true;
            }
        }
        Ok(())
    }
}

impl<R: io::Read> CharSource for Utf8Source<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        if self.buf.len() - self.start < 4 {
            self.fill()?;
        }
        let pending = &self.buf[self.start..];
        if pending.is_empty() {
            return Ok(None);
        }
        let (ch, len) = bstr::decode_utf8(pending);
        self.start += len.max(1);
        Ok(Some(ch.unwrap_or('\u{FFFD}')))
    }
}

// ------------------------------------------------------------------------------------------------
// Generic character iterators
// ------------------------------------------------------------------------------------------------

/// Adapts an iterator of characters.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    chars: I,
}

impl<I: Iterator<Item = char>> IterSource<I> {
    /// Wraps `chars`.
    pub fn new(chars: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            chars: chars.into_iter(),
        }
    }
}

impl<I: Iterator<Item = char>> CharSource for IterSource<I> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

// ------------------------------------------------------------------------------------------------
// Rewind buffering
// ------------------------------------------------------------------------------------------------

#[derive(Debug)]
enum MarkState {
    Unmarked,
    Recording { limit: usize, seen: Vec<char> },
    Invalidated,
}

/// Adds a bounded mark/reset window to a source that has none.
///
/// After [`mark`](CharSource::mark), every character read is recorded, up to
/// the mark's limit. [`reset`](CharSource::reset) replays the recorded
/// characters before reading on from the inner source. Reading past the limit
/// drops the recording and the next reset fails. A mark stays valid after a
/// reset, so the window can be replayed more than once.
#[derive(Debug)]
pub struct Rewind<S> {
    inner: S,
    replay: VecDeque<char>,
    mark: MarkState,
}

impl<S: CharSource> Rewind<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            replay: VecDeque::new(),
            mark: MarkState::Unmarked,
        }
    }

    /// Returns the wrapped source. Characters queued for replay are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: CharSource> CharSource for Rewind<S> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let ch = match self.replay.pop_front() {
            Some(ch) => Some(ch),
            None => self.inner.read_char()?,
        };
        if let (Some(ch), MarkState::Recording { limit, seen }) = (ch, &mut self.mark) {
            if seen.len() < *limit {
                seen.push(ch);
            } else {
                trace!(limit = *limit, "read past mark limit, dropping mark");
                self.mark = MarkState::Invalidated;
            }
        }
        Ok(ch)
    }

    fn mark(&mut self, limit: usize) -> io::Result<()> {
        self.mark = MarkState::Recording {
            limit,
            seen: Vec::new(),
        };
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        match &mut self.mark {
            MarkState::Recording { seen, .. } => {
                for ch in seen.drain(..).rev() {
                    self.replay.push_front(ch);
                }
                Ok(())
            }
            MarkState::Invalidated => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "mark invalid: read limit exceeded",
            )),
            MarkState::Unmarked => Err(not_marked()),
        }
    }

    fn unmark(&mut self) {
        self.mark = MarkState::Unmarked;
    }
}
