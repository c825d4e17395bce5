//! Cursor-based export of a full result set.
//!
//! A [`ScrollSession`] opens a scroll with the search request, then keeps
//! trading the latest cursor for the next page until the number of hits seen
//! reaches the total reported when the scroll was opened. A page that comes
//! back empty before that point fails the session with a timeout, and a page
//! that should be followed by another but carries no cursor fails it with a
//! protocol error. Nothing is retried.
//!
//! [`ScrollStream`] exposes the same session one page at a time, so a caller
//! can stop between pages by dropping the stream.

mod progress;
mod session;
mod stream;

pub use progress::ScrollProgress;
pub use session::ScrollSession;
pub use stream::ScrollStream;
