pub mod errors;
pub mod general;
pub mod verification;

pub use errors::on_error;
pub use general::{bothelp, ping};
pub use verification::verify;
