pub mod counter;
pub mod error;
pub mod gzip;

pub use counter::Counter;
pub use error::UtilError;
pub use gzip::Gzip;
