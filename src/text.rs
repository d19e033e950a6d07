use std::io;
use std::ops::Range;

use bytes::Bytes;

use crate::util::utf8;

/// The complete input of a run.
///
/// Backed by a reference-counted buffer so that every [`Segment`] is a
/// zero-copy view which can be moved into its own worker. The buffer is
/// always valid UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    bytes: Bytes,
}

impl Text {
    pub fn from_utf8(bytes: Bytes) -> io::Result<Self> {
        utf8(&bytes)?;
        Ok(Text { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        // validated on construction
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    pub(crate) fn segment(&self, index: usize, range: Range<usize>) -> Segment {
        Segment {
            index,
            bytes: self.bytes.slice(range),
        }
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text {
            bytes: Bytes::from(text),
        }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text {
            bytes: Bytes::copy_from_slice(text.as_bytes()),
        }
    }
}

/// A contiguous slice of the input, handed to exactly one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    index: usize,
    bytes: Bytes,
}

impl Segment {
    pub fn new(index: usize, bytes: Bytes) -> Self {
        Segment { index, bytes }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> io::Result<&str> {
        utf8(&self.bytes)
    }
}
