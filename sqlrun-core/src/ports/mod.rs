// sqlrun-core/src/ports/mod.rs

pub mod connector;
pub mod source;
pub mod validator;

pub use connector::{ColumnMeta, Connector, RawRow, ResultCursor};
pub use source::ScriptSource;
pub use validator::SyntaxValidator;
