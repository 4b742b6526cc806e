use std::io::{self, Read};

use memchr::memchr_iter;

use super::width::display_width;

/// Results from one counting pass. Fields outside the active selection stay
/// zero and carry no measured value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub lines: u64,
    pub words: u64,
    pub chars: u64,
    pub bytes: u64,
    pub max_line_length: u64,
}

/// Which metrics a counting pass must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSelection {
    pub lines: bool,
    pub words: bool,
    pub chars: bool,
    pub bytes: bool,
    pub max_line_length: bool,
}

impl Default for CountSelection {
    /// The wc default: newlines, words, bytes.
    fn default() -> Self {
        Self {
            lines: true,
            words: true,
            chars: false,
            bytes: true,
            max_line_length: false,
        }
    }
}

impl CountSelection {
    /// Build a selection from the five metric flags. An all-false request
    /// falls back to the default set; the selection is never empty.
    pub fn from_flags(lines: bool, words: bool, chars: bool, bytes: bool, max_line_length: bool) -> Self {
        let selection = Self {
            lines,
            words,
            chars,
            bytes,
            max_line_length,
        };

        if selection.is_empty() {
            Self::default()
        } else {
            selection
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.lines || self.words || self.chars || self.bytes || self.max_line_length)
    }

    /// True if only bytes are requested and nothing needs decoding.
    fn bytes_only(&self) -> bool {
        self.bytes && !self.lines && !self.words && !self.chars && !self.max_line_length
    }

    /// True if only newlines (and possibly bytes) are requested, so a raw
    /// byte scan suffices.
    fn lines_only(&self) -> bool {
        self.lines && !self.words && !self.chars && !self.max_line_length
    }
}

/// GNU wc whitespace: the Unicode White_Space property, plus four extra
/// space-like codepoints unless POSIXLY_CORRECT is in effect.
#[inline]
pub fn is_whitespace(c: char, posix_mode: bool) -> bool {
    if c.is_whitespace() {
        return true;
    }

    if posix_mode {
        return false;
    }

    matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2060}')
}

/// Buffer size for the streaming pass. A throughput knob, not a correctness
/// parameter.
const COUNT_BUF_SIZE: usize = 64 * 1024;

/// Longest UTF-8 encoding of a scalar value.
const UTF8_MAX: usize = 4;

/// Compute all requested metrics in one streaming pass over `reader`.
///
/// Invalid UTF-8 decodes as one unit per raw byte: counted as a byte,
/// treated as word content, skipped for chars and lines, zero display width.
pub fn count_reader<R: Read>(
    mut reader: R,
    selection: CountSelection,
    posix_mode: bool,
) -> io::Result<Counts> {
    if selection.bytes_only() {
        return drain_bytes(reader);
    }

    if selection.lines_only() {
        return scan_newlines(reader, selection);
    }

    let mut counts = Counts::default();
    let mut in_word = false;
    let mut line_width: u64 = 0;

    let mut buf = vec![0u8; COUNT_BUF_SIZE];
    let mut start = 0usize;
    let mut end = 0usize;
    let mut eof = false;

    loop {
        // Keep at least one full UTF-8 sequence buffered, so a codepoint
        // split across reads is never misread as malformed.
        if !eof && end - start < UTF8_MAX {
            buf.copy_within(start..end, 0);
            end -= start;
            start = 0;
            while !eof && end < UTF8_MAX {
                match reader.read(&mut buf[end..]) {
                    Ok(0) => eof = true,
                    Ok(n) => end += n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }

        if start == end {
            break;
        }

        let (decoded, size) = decode_scalar(&buf[start..end]);
        start += size;

        if selection.bytes {
            counts.bytes += size as u64;
        }

        match decoded {
            Some(c) => {
                if selection.lines && c == '\n' {
                    counts.lines += 1;
                }

                if selection.chars {
                    counts.chars += 1;
                }

                if selection.max_line_length {
                    match c {
                        '\n' => {
                            counts.max_line_length = counts.max_line_length.max(line_width);
                            line_width = 0;
                        }
                        '\t' => line_width += 8 - line_width % 8,
                        _ => line_width += display_width(c) as u64,
                    }
                }

                if selection.words {
                    if is_whitespace(c, posix_mode) {
                        in_word = false;
                    } else if !in_word {
                        counts.words += 1;
                        in_word = true;
                    }
                }
            }
            // An invalid unit is word content; it contributes nothing to
            // the decoded-codepoint metrics.
            None => {
                if selection.words && !in_word {
                    counts.words += 1;
                    in_word = true;
                }
            }
        }
    }

    // The last line may not end with a newline.
    if selection.max_line_length {
        counts.max_line_length = counts.max_line_length.max(line_width);
    }

    Ok(counts)
}

/// Decode the first UTF-8 scalar in `bytes`, returning it and the number of
/// bytes consumed. A malformed or truncated sequence consumes exactly one
/// byte and decodes to `None`; there is no resynchronization.
fn decode_scalar(bytes: &[u8]) -> (Option<char>, usize) {
    let lead = bytes[0];
    if lead < 0x80 {
        return (Some(lead as char), 1);
    }

    let len = match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (None, 1),
    };

    if bytes.len() < len {
        return (None, 1);
    }

    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => (s.chars().next(), len),
        Err(_) => (None, 1),
    }
}

/// Bytes-only fast path: drain the stream and report its length. Produces
/// byte-identical results to the general path, which consumes every raw
/// byte exactly once.
fn drain_bytes<R: Read>(mut reader: R) -> io::Result<Counts> {
    let bytes = io::copy(&mut reader, &mut io::sink())?;
    Ok(Counts {
        bytes,
        ..Counts::default()
    })
}

/// Lines-only fast path: SIMD newline scan over raw chunks. Identical to
/// the decoded path because 0x0A only ever encodes `\n` in UTF-8 and an
/// invalid unit consumes a single non-0x0A byte.
fn scan_newlines<R: Read>(mut reader: R, selection: CountSelection) -> io::Result<Counts> {
    let mut counts = Counts::default();
    let mut buf = vec![0u8; COUNT_BUF_SIZE];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                counts.lines += memchr_iter(b'\n', &buf[..n]).count() as u64;
                if selection.bytes {
                    counts.bytes += n as u64;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(counts)
}
