pub mod cursor_codec;
pub mod type_codec;

pub use cursor_codec::CursorCodec;
pub use type_codec::{LooseTyping, TypeCodec};
