pub mod aggregate;
pub mod cli;
pub mod ctx;
pub mod error;
pub mod evaluation;
pub mod inference;
pub mod input;
pub mod io;
pub mod labels;
pub mod pipeline;
pub mod report;
pub mod schema;
