use super::lexicon::RecordClass;
use super::{ResourceRecord, Result, ZoneEntry, ZoneError, ZoneParser};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Sequence of zone entries read from a line-oriented source
///
/// Each reader owns one parser session. Reading stops for good after the
/// first error; to start over, open a new reader.
pub struct ZoneReader<R> {
    source: R,
    parser: ZoneParser,
    line_no: usize,
    buf: String,
    done: bool,
}

impl ZoneReader<BufReader<File>> {
    /// Open a zone file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!("Opened zone file {}", path.as_ref().display());
        Ok(Self::open(BufReader::new(file)))
    }
}

impl<R: BufRead> ZoneReader<R> {
    pub fn open(source: R) -> Self {
        Self::with_parser(source, ZoneParser::new())
    }

    /// Open with a default TTL and class already in effect
    pub fn with_defaults(source: R, ttl: u32, class: RecordClass) -> Self {
        Self::with_parser(source, ZoneParser::with_defaults(ttl, class))
    }

    fn with_parser(source: R, parser: ZoneParser) -> Self {
        Self {
            source,
            parser,
            line_no: 0,
            buf: String::new(),
            done: false,
        }
    }

    /// Number lines from `line` instead of 1, for text cut out of a larger file
    pub fn starting_at(mut self, line: usize) -> Self {
        self.line_no = line.saturating_sub(1);
        self
    }

    /// Number of physical lines read so far
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Next logical entry, `None` at end of input
    pub fn next_entry(&mut self) -> Option<Result<ZoneEntry>> {
        if self.done {
            return None;
        }
        let result = self.read_entry();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }

    /// Next resource record, skipping blank lines and directives.
    ///
    /// `$INCLUDE` is an error: included files are never read.
    pub fn next_record(&mut self) -> Option<Result<ResourceRecord>> {
        loop {
            match self.next_entry()? {
                Ok(ZoneEntry::Record(record)) => return Some(Ok(record)),
                Ok(ZoneEntry::Include { path, line, .. }) => {
                    self.done = true;
                    return Some(Err(ZoneError::IncludeUnsupported { line, path }));
                }
                Ok(entry) => trace!("Skipping entry {:?}", entry),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Iterate over resource records only
    pub fn records(&mut self) -> impl Iterator<Item = Result<ResourceRecord>> + '_ {
        std::iter::from_fn(move || self.next_record())
    }

    fn read_entry(&mut self) -> Option<Result<ZoneEntry>> {
        loop {
            self.buf.clear();
            match self.source.read_line(&mut self.buf) {
                Ok(0) => {
                    return match self.parser.finish() {
                        Ok(()) => None,
                        Err(e) => Some(Err(e)),
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    return Some(Err(ZoneError::Io {
                        line: self.line_no + 1,
                        message: e.to_string(),
                    }));
                }
            }
            self.line_no += 1;

            let line = self.buf.trim_end_matches(['\n', '\r']);
            match self.parser.parse_line(line, self.line_no) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: BufRead> Iterator for ZoneReader<R> {
    type Item = Result<ZoneEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry()
    }
}
