pub mod mmseqs;
pub mod traits;

pub use mmseqs::Mmseqs;
pub use traits::PrefilterEngine;
