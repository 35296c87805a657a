use chatzen_chats::utils::{chat_display_name, is_same_user, sender_margin, shows_avatar, SenderMargin};
use chatzen_chats::{Chat, Message, Notice, NoticeBoard, NoticeLevel};
use chatzen_users::User;
use colored::*;

const AVATAR_COLUMN: usize = 4;
const THREAD_WIDTH: usize = 72;

/// One message of a thread, laid out like a chat bubble
pub fn message(messages: &[Message], index: usize, user_id: &str) -> String {
    let Some(message) = messages.get(index) else {
        return String::new();
    };

    let spacing = if index > 0 && !is_same_user(messages, index) {
        "\n"
    } else {
        ""
    };

    let body = match sender_margin(messages, index, user_id) {
        SenderMargin::Auto if message.is_from(user_id) => {
            format!("{:>THREAD_WIDTH$}", message.content).green().to_string()
        }
        SenderMargin::Indented => {
            format!("{}{}", " ".repeat(AVATAR_COLUMN), message.content)
        }
        SenderMargin::Flush | SenderMargin::Auto => {
            let avatar = if shows_avatar(messages, index, user_id) {
                initials(&message.sender)
            } else {
                String::new()
            };
            format!(
                "{:<width$}{}",
                avatar.cyan().bold(),
                message.content,
                width = AVATAR_COLUMN
            )
        }
    };

    format!("{spacing}{body}")
}

fn initials(user: &User) -> String {
    user.name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Full thread, oldest first
pub fn thread(messages: &[Message], user_id: &str) {
    for index in 0..messages.len() {
        println!("{}", message(messages, index, user_id));
    }
}

/// One row of the chat list
pub fn chat_row(chat: &Chat, user_id: &str, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let title = chat_display_name(chat, user_id);
    let kind = if chat.is_group_chat { "group" } else { "direct" };

    let mut row = format!(
        "{marker} {:<26} {:<28} {}",
        chat.id.dimmed(),
        title.bold(),
        kind.yellow()
    );
    if let Some(latest) = chat.latest_message.as_deref() {
        let preview: String = latest.content.chars().take(50).collect();
        row.push_str(&format!("\n    {}: {}", latest.sender.name, preview));
    }
    row
}

pub fn user_row(user: &User) -> String {
    format!(
        "  {:<26} {:<24} {}",
        user.id.dimmed(),
        user.name.bold(),
        user.email.as_deref().unwrap_or("")
    )
}

fn notice(notice: &Notice) -> String {
    let title = match notice.level {
        NoticeLevel::Info => notice.title.blue(),
        NoticeLevel::Warning => notice.title.yellow(),
        NoticeLevel::Error => notice.title.red(),
    };
    match &notice.description {
        Some(description) => format!("[{}] {}", title.bold(), description),
        None => format!("[{}]", title.bold()),
    }
}

/// Print and drop every queued notice
pub fn notices(board: &NoticeBoard) {
    for queued in board.drain() {
        eprintln!("{}", notice(&queued));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials(&User::new("u1", "ada king lovelace")), "AK");
        assert_eq!(initials(&User::new("u2", "Grace")), "G");
    }

    #[test]
    fn other_senders_run_is_indented_until_last() {
        colored::control::set_override(false);
        let grace = User::new("u2", "Grace Hopper");
        let messages = vec![
            Message::new("m1", grace.clone(), "one", "c1"),
            Message::new("m2", grace, "two", "c1"),
        ];

        assert_eq!(message(&messages, 0, "u1"), "    one");
        assert_eq!(message(&messages, 1, "u1"), "GH  two");
    }

    #[test]
    fn own_messages_are_right_aligned() {
        colored::control::set_override(false);
        let messages = vec![Message::new("m1", User::new("u1", "Ada"), "hi", "c1")];

        let line = message(&messages, 0, "u1");
        assert_eq!(line.len(), THREAD_WIDTH);
        assert!(line.ends_with("hi"));
    }
}
