pub mod errors;
pub mod lexicon;
pub mod parser;
pub mod reader;
pub mod record;
pub mod tokenizer;

pub use errors::{Result, ZoneError};
pub use lexicon::{RecordClass, RecordType};
pub use parser::{ParserState, ZoneParser, parse_ttl};
pub use reader::ZoneReader;
pub use record::{ResourceRecord, ZoneEntry};
