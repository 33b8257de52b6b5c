mod upload;
pub use upload::*;

mod conversion;
pub use conversion::*;
