pub mod keyword_responder;
pub mod permission_checker;
pub mod verification_manager;

pub use keyword_responder::{create_shared_keyword_responder, IncomingMessage, SharedKeywordResponder};
pub use permission_checker::run_startup_permission_check;
pub use verification_manager::{create_shared_verification_manager, SharedVerificationManager};
