pub mod convert;
pub mod extract;
pub mod init;
pub mod inspect;
pub mod normalize;

pub use convert::{convert, ConvertArgs};
pub use extract::{extract, ExtractArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use normalize::{normalize, NormalizeArgs};
