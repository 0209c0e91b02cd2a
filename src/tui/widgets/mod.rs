// src/tui/widgets/mod.rs — Dashboard panels.

pub mod chat_list;
pub mod header;

pub use chat_list::ActiveChatList;
pub use header::DashboardHeader;
