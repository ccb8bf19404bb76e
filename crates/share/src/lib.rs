//! Share tokens: the visited set, selection and custom color of a session
//! packed into a URL-safe string, plus the links that carry them.

pub mod codec;
pub mod link;

pub use codec::{DecodeError, ShareableState, decode, encode};
pub use link::{Utm, share_link, token_from_link};
