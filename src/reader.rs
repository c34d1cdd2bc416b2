use std::io::{self, BufRead};

use encoding_rs::UTF_8;
use tracing::warn;

use crate::error::{ExtractError, Stream};

/// Reads raw lines and decodes them as UTF-8, replacing invalid sequences
/// with U+FFFD instead of failing.
pub struct DecodedLines<R> {
    reader: R,
    stream: Stream,
    line: usize,
    invalid_lines: usize,
    buf: Vec<u8>,
    after_cr: bool,
}

impl<R: BufRead> DecodedLines<R> {
    pub fn new(reader: R, stream: Stream) -> Self {
        DecodedLines {
            reader,
            stream,
            line: 0,
            invalid_lines: 0,
            buf: Vec::with_capacity(1024),
            after_cr: false,
        }
    }

    /// Number of lines read so far that were not valid UTF-8.
    pub fn invalid_lines(&self) -> usize {
        self.invalid_lines
    }

    /// Reads one line into `buf`, terminator included. `\n`, `\r` and
    /// `\r\n` all end a line. Returns false at end of input.
    fn read_raw_line(&mut self) -> io::Result<bool> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(!self.buf.is_empty());
            }

            // The \n of a \r\n pair may arrive in the next buffer fill.
            if self.after_cr {
                self.after_cr = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    self.after_cr = available[i] == b'\r';
                    self.buf.extend_from_slice(&available[..=i]);
                    self.reader.consume(i + 1);
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for DecodedLines<R> {
    type Item = Result<String, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.read_raw_line() {
            Ok(false) => None,
            Ok(true) => {
                let (decoded, had_errors) = UTF_8.decode_without_bom_handling(&self.buf);
                if had_errors {
                    self.invalid_lines += 1;
                    warn!("Encoding errors in {} line {}", self.stream, self.line);
                }
                self.line += 1;
                Some(Ok(decoded.into_owned()))
            }
            Err(source) => Some(Err(ExtractError::Read {
                stream: self.stream,
                line: self.line,
                source,
            })),
        }
    }
}

/// One training line and its alignment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 0-based line number in both inputs.
    pub index: usize,
    pub pair: String,
    pub alignment: String,
}

/// Walks both inputs in lockstep and stops at the end of the shorter one.
pub struct Records<P, A> {
    pairs: DecodedLines<P>,
    alignments: DecodedLines<A>,
    next_index: usize,
}

impl<P: BufRead, A: BufRead> Records<P, A> {
    pub fn new(pairs: P, alignments: A) -> Self {
        Records {
            pairs: DecodedLines::new(pairs, Stream::SentencePairs),
            alignments: DecodedLines::new(alignments, Stream::Alignments),
            next_index: 0,
        }
    }

    pub fn invalid_lines(&self) -> usize {
        self.pairs.invalid_lines() + self.alignments.invalid_lines()
    }
}

impl<P: BufRead, A: BufRead> Iterator for Records<P, A> {
    type Item = Result<RawRecord, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = match self.pairs.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        let alignment = match self.alignments.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };

        let index = self.next_index;
        self.next_index += 1;
        Some(Ok(RawRecord {
            index,
            pair,
            alignment,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_decoded_lines_keep_terminators() {
        let lines: Vec<_> = DecodedLines::new(Cursor::new("a\nb\r\nc"), Stream::Alignments)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["a\n", "b\r", "c"]);
    }

    #[test]
    fn test_lone_carriage_return_ends_line() {
        let lines: Vec<_> =
            DecodedLines::new(Cursor::new("a ||| x\rb ||| y\r"), Stream::SentencePairs)
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(lines, vec!["a ||| x\r", "b ||| y\r"]);
    }

    #[test]
    fn test_crlf_split_across_buffer_fills() {
        // A capacity of 2 puts the \r and the \n of "b\r\n" in different fills.
        let reader = BufReader::with_capacity(2, Cursor::new("a\rb\r\n\nc"));
        let lines: Vec<_> = DecodedLines::new(reader, Stream::Alignments)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["a\r", "b\r", "\n", "c"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let input = Cursor::new(b"caf\xe9\nok\n".to_vec());
        let mut lines = DecodedLines::new(input, Stream::SentencePairs);
        assert_eq!(lines.next().unwrap().unwrap(), "caf\u{fffd}\n");
        assert_eq!(lines.next().unwrap().unwrap(), "ok\n");
        assert!(lines.next().is_none());
        assert_eq!(lines.invalid_lines(), 1);
    }

    #[test]
    fn test_records_stop_at_shorter_input() {
        let records: Vec<_> =
            Records::new(Cursor::new("p0\np1\np2\n"), Cursor::new("a0\na1\n"))
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].pair, "p1\n");
        assert_eq!(records[1].alignment, "a1\n");

        let records = Records::new(Cursor::new("p0\n"), Cursor::new("a0\na1\na2\n")).count();
        assert_eq!(records, 1);
    }

    #[test]
    fn test_records_empty_inputs() {
        assert_eq!(Records::new(Cursor::new(""), Cursor::new("a0\n")).count(), 0);
    }
}
