// src/cli/chats.rs — Print the active chat list.

use crate::presence::ActiveChatsSource;
use crate::tui::widgets::chat_list::{ActiveChatList, EMPTY_MESSAGE};

pub async fn run_chats(
    source: &dyn ActiveChatsSource,
    specialist_id: &str,
    selected: Option<&str>,
) -> anyhow::Result<()> {
    let chats = source.active_chats(specialist_id).await?;
    print!("{}", format_chat_list(&ActiveChatList::new(&chats, selected)));
    Ok(())
}

pub fn format_chat_list(list: &ActiveChatList<'_>) -> String {
    let mut out = format!("Active Chats ({})\n", list.count());
    let rows = list.rows();
    if rows.is_empty() {
        out.push_str(&format!("  {EMPTY_MESSAGE}\n"));
        return out;
    }
    for row in rows {
        let marker = if row.active { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:<20} {:>5}  {:<16}  {}\n",
            row.customer, row.time, row.preview, row.id
        ));
    }
    out
}
