use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::core::types::PageTableEntry;

/// Ordered, dense array mapping `doc_id` (its index) to metadata (§3 "Page Table").
#[derive(Debug, Default)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    pub fn new() -> Self {
        PageTable { entries: Vec::new() }
    }

    pub fn push(&mut self, entry: PageTableEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, doc_id: u32) -> Option<&PageTableEntry> {
        self.entries.get(doc_id as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `url term_count begin_offset end_offset` lines starting at
    /// index `from` (§6). `docno` is not part of the on-disk page table —
    /// it matters only to the DOCNO→docID conversion tool, out of scope here.
    pub fn append_from(&self, path: &Path, from: usize) -> Result<()> {
        let mut out = OpenOptions::new().create(true).append(true).open(path)?;
        for entry in &self.entries[from..] {
            writeln!(out, "{} {} {} {}", entry.url, entry.term_count, entry.begin_offset, entry.end_offset)?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut table = PageTable::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let url = parts
                .next()
                .ok_or_else(|| Error::format_at(line_no as u64, "page table line missing url"))?
                .to_string();
            let term_count: u32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::format_at(line_no as u64, "page table line missing term_count"))?;
            let begin_offset: u64 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::format_at(line_no as u64, "page table line missing begin_offset"))?;
            let end_offset: u64 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| Error::format_at(line_no as u64, "page table line missing end_offset"))?;
            table.push(PageTableEntry { docno: String::new(), url, term_count, begin_offset, end_offset });
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(url: &str, term_count: u32, begin: u64, end: u64) -> PageTableEntry {
        PageTableEntry { docno: String::new(), url: url.to_string(), term_count, begin_offset: begin, end_offset: end }
    }

    #[test]
    fn append_then_load_roundtrips_by_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.txt");

        let mut table = PageTable::new();
        table.push(entry("http://a", 3, 0, 10));
        table.push(entry("http://b", 5, 10, 25));
        table.append_from(&path, 0).unwrap();

        let loaded = PageTable::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(0).unwrap().url, "http://a");
        assert_eq!(loaded.get(1).unwrap().term_count, 5);
        assert!(loaded.get(2).is_none());
    }

    #[test]
    fn append_from_only_writes_the_new_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.txt");

        let mut table = PageTable::new();
        table.push(entry("http://a", 3, 0, 10));
        table.append_from(&path, 0).unwrap();

        table.push(entry("http://b", 5, 10, 25));
        table.append_from(&path, 1).unwrap();

        let loaded = PageTable::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
