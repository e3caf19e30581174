pub mod media;
pub mod path;
pub mod time;

pub use media::*;
pub use path::*;
pub use time::*;
