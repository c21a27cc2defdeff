use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::warn;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, RawDocument};
use crate::corpus::state::TrecParserState;

const DOC_OPEN: &[u8] = b"<DOC>";
const DOC_CLOSE: &[u8] = b"</DOC>";
const DOCNO_OPEN: &[u8] = b"<DOCNO>";
const DOCNO_CLOSE: &[u8] = b"</DOCNO>";
const TEXT_OPEN: &[u8] = b"<TEXT>";
const TEXT_CLOSE: &[u8] = b"</TEXT>";

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Streams `(docno, url, body, begin/end byte span)` records out of a
/// possibly-gzip'd TREC file (§4.1, C1). Doc IDs are assigned densely
/// starting at 0 in read order.
pub struct Reader {
    source: Box<dyn Read>,
    buffer: Vec<u8>,
    filled: usize,
    cursor: usize,
    global_offset: u64,
    next_doc_id: u32,
    source_eof: bool,
    state: TrecParserState,
}

impl Reader {
    pub fn open(path: &Path, buffer_size: usize) -> Result<Self> {
        Ok(Reader {
            source: open_source(path)?,
            buffer: vec![0u8; buffer_size],
            filled: 0,
            cursor: 0,
            global_offset: 0,
            next_doc_id: 0,
            source_eof: false,
            state: TrecParserState::ExpectDoc,
        })
    }

    fn absolute(&self, pos: usize) -> u64 {
        self.global_offset + pos as u64
    }

    /// Compacts unread bytes to the buffer head and fills the rest from
    /// the underlying stream (§4.1). `buffer_size` is the normal refill
    /// chunk size, not a hard ceiling: if a single document section (a
    /// DOCNO, a body) doesn't fit even after compaction, the buffer
    /// doubles rather than erroring out on an otherwise well-formed file.
    fn refill(&mut self) -> Result<()> {
        let unread = self.filled - self.cursor;
        if self.cursor > 0 {
            self.buffer.copy_within(self.cursor..self.filled, 0);
            self.global_offset += self.cursor as u64;
            self.filled = unread;
            self.cursor = 0;
        }
        if self.filled == self.buffer.len() {
            let new_len = self.buffer.len() * 2;
            self.buffer.resize(new_len, 0);
        }
        if self.source_eof {
            return Ok(());
        }
        while self.filled < self.buffer.len() {
            let n = self.source.read(&mut self.buffer[self.filled..])?;
            if n == 0 {
                self.source_eof = true;
                break;
            }
            self.filled += n;
        }
        Ok(())
    }

    fn at_clean_eof(&self) -> bool {
        self.source_eof && self.cursor == self.filled
    }

    /// Consumes `literal` at the cursor, refilling as needed. Returns
    /// `Ok(false)` only when the stream ends cleanly before any of
    /// `literal` has been seen (a legitimate end of corpus).
    fn expect_literal(&mut self, literal: &[u8]) -> Result<bool> {
        loop {
            if self.filled - self.cursor >= literal.len() {
                if &self.buffer[self.cursor..self.cursor + literal.len()] == literal {
                    self.cursor += literal.len();
                    return Ok(true);
                }
                return Err(Error::format_at(
                    self.absolute(self.cursor),
                    format!("expected {:?}", String::from_utf8_lossy(literal)),
                ));
            }
            if self.at_clean_eof() {
                return Ok(false);
            }
            if self.source_eof {
                return Err(Error::format_at(self.absolute(self.cursor), "truncated document"));
            }
            self.refill()?;
        }
    }

    /// Returns the bytes before `needle`, consuming through `needle`.
    fn read_until(&mut self, needle: &[u8]) -> Result<Vec<u8>> {
        loop {
            let start = self.cursor;
            if let Some(rel) = find_subslice(&self.buffer[start..self.filled], needle) {
                let end = start + rel;
                let content = self.buffer[start..end].to_vec();
                self.cursor = end + needle.len();
                return Ok(content);
            }
            if self.source_eof {
                return Err(Error::format_at(
                    self.absolute(start),
                    format!("missing terminator {:?}", String::from_utf8_lossy(needle)),
                ));
            }
            self.refill()?;
        }
    }

    /// Skips exactly one newline if present; otherwise warns and does not
    /// consume a byte (§4.1: "terminal newlines are tolerated but not required").
    fn consume_optional_newline(&mut self) -> Result<()> {
        loop {
            if self.cursor < self.filled {
                if self.buffer[self.cursor] == b'\n' {
                    self.cursor += 1;
                } else {
                    warn!(offset = self.absolute(self.cursor), "missing terminal newline after tag");
                }
                return Ok(());
            }
            if self.source_eof {
                return Ok(());
            }
            self.refill()?;
        }
    }

    /// Parses and returns the next document, or `None` at clean end-of-corpus.
    pub fn next_document(&mut self) -> Result<Option<RawDocument>> {
        self.state = TrecParserState::ExpectDoc;
        if !self.expect_literal(DOC_OPEN)? {
            self.state = TrecParserState::Eof;
            return Ok(None);
        }
        self.consume_optional_newline()?;

        self.state = TrecParserState::ExpectDocnoOpen;
        self.expect_literal(DOCNO_OPEN)?;

        self.state = TrecParserState::ReadDocno;
        let docno_bytes = self.read_until(DOCNO_CLOSE)?;
        let docno = std::str::from_utf8(&docno_bytes)?.trim().to_string();

        self.state = TrecParserState::ExpectDocnoClose;
        self.consume_optional_newline()?;

        self.state = TrecParserState::ExpectTextOpen;
        self.expect_literal(TEXT_OPEN)?;
        self.consume_optional_newline()?;

        self.state = TrecParserState::ReadUrlLine;
        let url_bytes = self.read_until(b"\n")?;
        let url = std::str::from_utf8(&url_bytes)?.trim().to_string();

        self.state = TrecParserState::ReadBody;
        let begin_offset = self.absolute(self.cursor);
        let body = self.read_until(TEXT_CLOSE)?;
        let end_offset = begin_offset + body.len() as u64;
        std::str::from_utf8(&body)?;
        self.consume_optional_newline()?;

        self.state = TrecParserState::ExpectDocClose;
        self.expect_literal(DOC_CLOSE)?;
        self.consume_optional_newline()?;

        let doc_id = DocId::new(self.next_doc_id);
        self.next_doc_id += 1;

        Ok(Some(RawDocument { doc_id, docno, url, body, begin_offset, end_offset }))
    }
}

impl Iterator for Reader {
    type Item = Result<RawDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_document().transpose()
    }
}
