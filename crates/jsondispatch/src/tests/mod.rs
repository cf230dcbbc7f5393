mod dispatch_good;
pub mod utils;
