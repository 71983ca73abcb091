/// Push channel implementations
///
/// A channel knows how to deliver one message to one external chat. The
/// deliverer drives channels through the [`PushChannel`] trait so the
/// transport can be swapped (and mocked in tests).

pub mod channel_trait;
pub mod mock;
pub mod telegram;

pub use channel_trait::{ChannelError, PushChannel};
pub use mock::MockChannel;
pub use telegram::TelegramChannel;
