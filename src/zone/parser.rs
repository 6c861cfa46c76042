use super::lexicon::{self, RecordClass, RecordType};
use super::tokenizer::{Continuation, RdataBuilder, Tokenizer};
use super::{ResourceRecord, Result, ZoneEntry, ZoneError};
use tracing::{debug, trace};

/// State carried from one logical entry to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Absolute origin for relative names; empty for the root
    pub origin: String,
    /// Last owner name, inherited by records starting with whitespace
    pub owner: Option<String>,
    /// Default TTL from `$TTL`
    pub default_ttl: Option<u32>,
    /// TTL of the last record that stated one explicitly
    pub last_ttl: Option<u32>,
    pub default_class: Option<RecordClass>,
    pub continuation: Continuation,
}

/// Owner, TTL and class read so far, waiting for the record type
#[derive(Debug)]
struct RecordHeader {
    owner: String,
    ttl: Option<u32>,
    class: Option<RecordClass>,
    line: usize,
}

impl RecordHeader {
    fn new(owner: String, line: usize) -> Self {
        Self {
            owner,
            ttl: None,
            class: None,
            line,
        }
    }

    /// Take one `[TTL] [CLASS] [TTL] TYPE` field; returns the type once seen
    fn push(&mut self, field: &str, line: usize) -> Result<Option<RecordType>> {
        if self.ttl.is_none() && starts_with_digit(field) {
            self.ttl = Some(parse_ttl_field(field, line)?);
            return Ok(None);
        }
        if self.class.is_none() {
            if let Some(class) = lexicon::class_from_str(field) {
                self.class = Some(class);
                return Ok(None);
            }
            if lexicon::is_generic_form(field, "CLASS") {
                return Err(ZoneError::UnknownClass {
                    line,
                    class: field.to_string(),
                });
            }
        }
        lexicon::type_from_str(field)
            .map(Some)
            .ok_or_else(|| ZoneError::UnknownRecordType {
                line,
                rtype: field.to_string(),
            })
    }
}

/// Logical entry still open at the end of a line
#[derive(Debug)]
enum Pending {
    Header(RecordHeader),
    Rdata(PendingRecord),
}

/// Record whose RDATA continues on following lines
#[derive(Debug)]
struct PendingRecord {
    owner: String,
    ttl: u32,
    class: RecordClass,
    rtype: RecordType,
    rdata: RdataBuilder,
    line: usize,
}

impl PendingRecord {
    fn finish(self) -> ResourceRecord {
        ResourceRecord {
            owner: self.owner,
            ttl: self.ttl,
            class: self.class,
            rtype: self.rtype,
            rdata: self.rdata.into_parts(),
            line: self.line,
        }
    }
}

/// RFC 1035 zone entry parser
///
/// Fed one physical line at a time. A line that leaves a parenthesis group or
/// a quoted string open produces no entry; the record is completed by the
/// following lines.
#[derive(Debug, Default)]
pub struct ZoneParser {
    state: ParserState,
    pending: Option<Pending>,
}

impl ZoneParser {
    /// Create a new zone parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with preset TTL and class defaults
    pub fn with_defaults(ttl: u32, class: RecordClass) -> Self {
        Self {
            state: ParserState {
                default_ttl: Some(ttl),
                default_class: Some(class),
                ..ParserState::default()
            },
            pending: None,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Parse one physical line.
    ///
    /// Returns `Ok(None)` while a multi-line record is still being collected.
    pub fn parse_line(&mut self, line: &str, line_no: usize) -> Result<Option<ZoneEntry>> {
        trace!("Parsing line {}: {}", line_no, line);

        match self.pending.take() {
            Some(Pending::Header(header)) => {
                return self.continue_header(header, Tokenizer::new(line, line_no));
            }
            Some(Pending::Rdata(pending)) => return self.continue_record(pending, line, line_no),
            None => {}
        }

        let content = line.trim_start();
        if content.is_empty() || content.starts_with(';') {
            return Ok(Some(ZoneEntry::Empty));
        }

        let mut tokenizer = Tokenizer::new(line, line_no);
        if content.len() != line.len() {
            // Leading whitespace: the owner is inherited
            let owner = self
                .state
                .owner
                .clone()
                .ok_or(ZoneError::MissingOwner { line: line_no })?;
            return self.parse_record(owner, tokenizer);
        }

        if content.starts_with('$') {
            return self.parse_directive(tokenizer).map(Some);
        }

        let name = tokenizer
            .next_word()
            .ok_or_else(|| ZoneError::syntax(line_no, "missing owner name"))?;
        let owner = self.resolve_name(name);
        self.parse_record(owner, tokenizer)
    }

    /// Check for constructs left open at end of input
    pub fn finish(&mut self) -> Result<()> {
        let cont = self.state.continuation;
        self.pending = None;
        self.state.continuation = Continuation::default();
        if let Some(line) = cont.quote_line {
            return Err(ZoneError::UnterminatedQuote { line });
        }
        if let Some(line) = cont.paren_line {
            return Err(ZoneError::UnterminatedParenthesis { line });
        }
        Ok(())
    }

    /// Parse a directive line
    fn parse_directive(&mut self, mut tokenizer: Tokenizer<'_>) -> Result<ZoneEntry> {
        let line_no = tokenizer.line_no();
        let directive = tokenizer
            .next_word()
            .ok_or_else(|| ZoneError::syntax(line_no, "empty directive"))?;

        match directive.to_ascii_uppercase().as_str() {
            "$ORIGIN" => {
                let name = tokenizer
                    .next_word()
                    .ok_or_else(|| ZoneError::syntax(line_no, "$ORIGIN requires a domain name"))?;
                tokenizer.expect_end()?;
                let origin = self.resolve_origin(name);
                debug!("Set origin to: {:?}", origin);
                self.state.origin = origin.clone();
                Ok(ZoneEntry::Origin(origin))
            }
            "$TTL" => {
                let value = tokenizer
                    .next_word()
                    .ok_or_else(|| ZoneError::syntax(line_no, "$TTL requires a value"))?;
                tokenizer.expect_end()?;
                let ttl = value
                    .bytes()
                    .all(|b| b.is_ascii_digit())
                    .then(|| value.parse::<u32>().ok())
                    .flatten()
                    .ok_or_else(|| ZoneError::MalformedTtl {
                        line: line_no,
                        value: value.to_string(),
                    })?;
                debug!("Set default TTL to: {}", ttl);
                self.state.default_ttl = Some(ttl);
                Ok(ZoneEntry::Ttl(ttl))
            }
            "$INCLUDE" => {
                let path = tokenizer
                    .next_word()
                    .ok_or_else(|| ZoneError::syntax(line_no, "$INCLUDE requires a file path"))?;
                let origin = tokenizer.next_word().map(|name| self.resolve_origin(name));
                tokenizer.expect_end()?;
                debug!("Found $INCLUDE {} {:?}", path, origin);
                Ok(ZoneEntry::Include {
                    path: path.to_string(),
                    origin,
                    line: line_no,
                })
            }
            _ => Err(ZoneError::syntax(
                line_no,
                format!("unknown directive {}", directive),
            )),
        }
    }

    /// Parse `[TTL] [CLASS] [TTL] TYPE RDATA...` after the owner
    fn parse_record(
        &mut self,
        owner: String,
        tokenizer: Tokenizer<'_>,
    ) -> Result<Option<ZoneEntry>> {
        let header = RecordHeader::new(owner, tokenizer.line_no());
        self.continue_header(header, tokenizer)
    }

    fn continue_header(
        &mut self,
        mut header: RecordHeader,
        mut tokenizer: Tokenizer<'_>,
    ) -> Result<Option<ZoneEntry>> {
        let rtype = loop {
            match tokenizer.next_header_word(&mut self.state.continuation)? {
                Some(field) => {
                    if let Some(rtype) = header.push(field, tokenizer.line_no())? {
                        break rtype;
                    }
                }
                None if self.state.continuation.paren_line.is_some() => {
                    self.pending = Some(Pending::Header(header));
                    return Ok(None);
                }
                None => {
                    return Err(ZoneError::syntax(tokenizer.line_no(), "missing record type"));
                }
            }
        };

        let line_no = header.line;
        let ttl = match header.ttl {
            Some(ttl) => {
                self.state.last_ttl = Some(ttl);
                ttl
            }
            None => self
                .state
                .default_ttl
                .or(self.state.last_ttl)
                .ok_or(ZoneError::MissingTtl { line: line_no })?,
        };
        let class = match header.class {
            Some(class) => {
                self.state.default_class = Some(class);
                class
            }
            None => self
                .state
                .default_class
                .ok_or(ZoneError::MissingClass { line: line_no })?,
        };

        self.state.owner = Some(header.owner.clone());

        let mut rdata = RdataBuilder::new();
        rdata.fill(&mut tokenizer, &mut self.state.continuation)?;

        let pending = PendingRecord {
            owner: header.owner,
            ttl,
            class,
            rtype,
            rdata,
            line: line_no,
        };
        if self.state.continuation.is_active() {
            self.pending = Some(Pending::Rdata(pending));
            return Ok(None);
        }
        Ok(Some(ZoneEntry::Record(pending.finish())))
    }

    fn continue_record(
        &mut self,
        mut pending: PendingRecord,
        line: &str,
        line_no: usize,
    ) -> Result<Option<ZoneEntry>> {
        if self.state.continuation.quote_line.is_some() {
            pending.rdata.push_text("\n");
        }
        let mut tokenizer = Tokenizer::new(line, line_no);
        pending
            .rdata
            .fill(&mut tokenizer, &mut self.state.continuation)?;

        if self.state.continuation.is_active() {
            self.pending = Some(Pending::Rdata(pending));
            return Ok(None);
        }
        Ok(Some(ZoneEntry::Record(pending.finish())))
    }

    /// Resolve an owner name against the current origin
    fn resolve_name(&self, name: &str) -> String {
        if name == "@" {
            return if self.state.origin.is_empty() {
                ".".to_string()
            } else {
                self.state.origin.clone()
            };
        }
        let name = name.to_ascii_lowercase();
        if name.ends_with('.') {
            name
        } else {
            format!("{}.{}", name, self.state.origin)
        }
    }

    /// Resolve a `$ORIGIN` argument; the root is stored as the empty string
    fn resolve_origin(&self, name: &str) -> String {
        match self.resolve_name(name).as_str() {
            "." => String::new(),
            origin => origin.to_string(),
        }
    }
}

fn starts_with_digit(field: &str) -> bool {
    field.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

fn parse_ttl_field(field: &str, line: usize) -> Result<u32> {
    parse_ttl(field).ok_or_else(|| ZoneError::MalformedTtl {
        line,
        value: field.to_string(),
    })
}

/// Parse a TTL with optional BIND-style units (`1W2D3H4M5S`, case-insensitive).
///
/// A trailing number without a unit counts as seconds. Returns `None` for
/// malformed input or totals above 2^32-1.
pub fn parse_ttl(s: &str) -> Option<u32> {
    if !starts_with_digit(s) {
        return None;
    }

    let mut total: u64 = 0;
    let mut value: Option<u64> = None;
    for c in s.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = value.unwrap_or(0);
            value = Some(current.checked_mul(10)?.checked_add(u64::from(digit))?);
            continue;
        }
        let unit: u64 = match c.to_ascii_lowercase() {
            'w' => 604_800,
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(value.take()?.checked_mul(unit)?)?;
    }
    if let Some(seconds) = value {
        total = total.checked_add(seconds)?;
    }
    u32::try_from(total).ok()
}
