mod chat;
mod event;
mod word;

pub use chat::{ChatMessage, ChatRole};
pub use event::{AppEvent, CardView, ExploreView, LoadingState, Tab, UiEvent};
pub use word::WordEntry;
