//! Named `(x, y)` datasets and the providers that serve them.

mod ascii;
mod filesystem;
mod name;
mod provider;
mod xy;

pub use ascii::AsciiParser;
pub use filesystem::FileSystemProvider;
pub use name::QualifiedName;
pub use provider::{DatasetProvider, InMemoryProvider};
pub use xy::XYDataset;
