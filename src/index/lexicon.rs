use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::core::error::{Error, Result};

/// Offsets into the final index/freqs streams for one term (§3 "Lexicon Entry").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconEntry {
    pub ids_offset: u64,
    pub freqs_offset: u64,
    pub doc_count: u32,
}

/// In-memory term → [`LexiconEntry`] map, loaded once and shared read-only
/// across query-engine worker threads (§5).
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon { entries: HashMap::new() }
    }

    pub fn insert(&mut self, term: String, entry: LexiconEntry) {
        self.entries.insert(term, entry);
    }

    pub fn get(&self, term: &str) -> Option<&LexiconEntry> {
        self.entries.get(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes `term ids_offset freqs_offset doc_count` lines, sorted by
    /// term (§4.4, §6).
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut terms: Vec<&String> = self.entries.keys().collect();
        terms.sort();
        let mut out = File::create(path)?;
        for term in terms {
            let entry = &self.entries[term];
            writeln!(
                out,
                "{} {} {} {}",
                term, entry.ids_offset, entry.freqs_offset, entry.doc_count
            )?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lexicon = Lexicon::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let term = parts
                .next()
                .ok_or_else(|| Error::format_at(line_no as u64, "lexicon line missing term"))?;
            let ids_offset = Self::next_u64(&mut parts, line_no, "ids_offset")?;
            let freqs_offset = Self::next_u64(&mut parts, line_no, "freqs_offset")?;
            let doc_count = Self::next_u64(&mut parts, line_no, "doc_count")? as u32;
            lexicon.insert(
                term.to_string(),
                LexiconEntry { ids_offset, freqs_offset, doc_count },
            );
        }
        Ok(lexicon)
    }

    fn next_u64<'a>(
        parts: &mut impl Iterator<Item = &'a str>,
        line_no: usize,
        field: &str,
    ) -> Result<u64> {
        parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::format_at(line_no as u64, format!("lexicon line missing {field}")))
    }
}
