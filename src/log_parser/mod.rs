pub mod detector;
pub mod formats;
pub mod parser;
pub mod patterns;

pub use formats::{ConnectionEvent, Engine};
pub use parser::ConnectionExtractor;
