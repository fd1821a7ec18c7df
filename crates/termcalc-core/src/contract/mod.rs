//! Contract field parsing.

mod parser;
pub mod rules;

pub use parser::{parse, ContractParser, HeuristicContractParser, ParseResult};
