//! Conversion traits implemented by transport adapters.

use super::{message::Message, postback::Postback, user::User};

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Converts a transport-specific button callback to core [`Postback`].
pub trait ToCorePostback: Send + Sync {
    fn to_core(&self) -> Postback;
}
