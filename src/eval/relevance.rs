use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::error::{Error, Result};

/// One row of the already-converted relevance file: `query_id numeric_doc_id`.
/// The DOCNO→docID conversion itself is out of scope (§6) — this reader only
/// understands the two-column form the evaluator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceJudgment {
    pub query_id: u32,
    pub relevant_doc_id: u32,
}

pub fn load_relevance(path: &Path) -> Result<Vec<RelevanceJudgment>> {
    let reader = BufReader::new(File::open(path)?);
    let mut judgments = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let query_id = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::format_at(line_no as u64, "relevance line missing query_id"))?;
        let relevant_doc_id = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::format_at(line_no as u64, "relevance line missing doc_id"))?;
        judgments.push(RelevanceJudgment { query_id, relevant_doc_id });
    }
    Ok(judgments)
}

/// One row of the queries file: an integer ID followed by the query text (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRow {
    pub query_id: u32,
    pub text: String,
}

pub fn load_queries(path: &Path) -> Result<Vec<QueryRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (id_part, text) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::format_at(line_no as u64, "queries line missing text"))?;
        let query_id = id_part
            .parse()
            .map_err(|_| Error::format_at(line_no as u64, "queries line has a non-numeric id"))?;
        rows.push(QueryRow { query_id, text: text.trim().to_string() });
    }
    Ok(rows)
}
