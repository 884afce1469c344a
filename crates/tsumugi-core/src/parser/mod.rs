pub mod delimiter;
pub mod tokenizer;

pub use delimiter::{scan_delimiters, Delimiter, DelimiterKind};
pub use tokenizer::{parse, CreditTokenizer, TokenizerConfig, TrailingToken};
