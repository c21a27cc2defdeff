/// States of the TREC document parser (§4.8). The Reader advances through
/// these explicitly so a malformed document can be reported by the state
/// it failed in, not just a raw byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrecParserState {
    ExpectDoc,
    ExpectDocnoOpen,
    ReadDocno,
    ExpectDocnoClose,
    ExpectTextOpen,
    ReadUrlLine,
    ReadBody,
    ExpectDocClose,
    Eof,
}
