// Library exports for columnar

pub mod engine;
pub mod error;
pub mod functions;
pub mod graph;
pub mod output;
pub mod palette;
pub mod plots;
pub mod series;
pub mod stats;

pub use engine::{Functions, MemoryFunctions, Range, SeriesFunctions};
pub use error::FunctionError;
pub use functions::{apply, FunctionOutput};
pub use graph::Figure;
pub use output::{Chart, OutputMode, Rendered};
pub use series::{Series, Value};
