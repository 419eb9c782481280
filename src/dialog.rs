//! Conversational dispatch core
//!
//! Routes each utterance to exactly one handler of the innermost active
//! machine. Machines may delegate to a child machine until it finishes.

mod collation;
mod machine;
mod matcher;
mod response;
mod session;

#[cfg(test)]
mod proptests;

pub use collation::Collation;
pub use machine::{Behavior, DialogError, Dispatch, Handler, HandlerTable, Machine, Outcome};
pub use matcher::MatchSpec;
#[allow(unused_imports)] // Used by tests
pub use response::UNRECOGNIZED_TEXT;
pub use response::{Response, Utterance};
pub use session::{RootFactory, SessionDirectory};
