//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, ParseMode};
use tracing::{debug, error, info, warn};

use crate::books_client::BooksClient;
use crate::config::{MIN_QUERY_CHARS, SEARCH_RESULT_LIMIT};
use crate::db;

use super::ui_builder::{self, Reply};

/// Prefix of the detail command carried in a message text
pub const BOOK_COMMAND_PREFIX: &str = "/book_";

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    api: Arc<BooksClient>,
    pool: SqlitePool,
) -> Result<()> {
    if let Err(err) = handle_message(&bot, &msg, &api, &pool).await {
        error!(user_id = %msg.chat.id, error = ?err, "Message handling failed");
        // One generic apology; a failure to deliver it is swallowed
        let _ = bot
            .send_message(msg.chat.id, ui_builder::GENERIC_ERROR)
            .await;
    }
    Ok(())
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    api: &BooksClient,
    pool: &SqlitePool,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    if text == "/start" {
        handle_start(bot, msg, pool).await?;
    } else if text == "/help" {
        bot.send_message(msg.chat.id, help_text())
            .parse_mode(ParseMode::Html)
            .await?;
    } else if text == "/search" {
        bot.send_message(msg.chat.id, ui_builder::SEARCH_PROMPT)
            .await?;
    } else if let Some(book_id) = text.strip_prefix(BOOK_COMMAND_PREFIX) {
        if !book_id.is_empty() {
            show_book_details(bot, msg.chat.id, book_id, api).await?;
        }
    } else if text.starts_with('/') {
        // Unknown command, ignore
    } else {
        handle_search(bot, msg, text, api).await?;
    }

    Ok(())
}

async fn handle_start(bot: &Bot, msg: &Message, pool: &SqlitePool) -> Result<()> {
    let first_name = match &msg.from {
        Some(user) => {
            // Fire-and-forget user record; a DB error must not break the greeting
            if let Err(err) = db::upsert_user(
                pool,
                user.id.0 as i64,
                user.username.as_deref(),
                &user.first_name,
                user.last_name.as_deref().unwrap_or(""),
            )
            .await
            {
                error!(user_id = %user.id, error = ?err, "Failed to record user");
            }
            user.first_name.clone()
        }
        None => String::new(),
    };

    info!(user_id = %msg.chat.id, "User started the bot");

    bot.send_message(msg.chat.id, welcome_text(&first_name))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

async fn handle_search(bot: &Bot, msg: &Message, query: &str, api: &BooksClient) -> Result<()> {
    if query.chars().count() < MIN_QUERY_CHARS {
        bot.send_message(msg.chat.id, ui_builder::SHORT_QUERY_PROMPT)
            .await?;
        return Ok(());
    }

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let outcome = api.search(query, SEARCH_RESULT_LIMIT).await;
    let reply = ui_builder::search_reply(query, &outcome);

    deliver(bot, msg.chat.id, reply).await
}

/// Fetch a single book and deliver the detail reply
pub async fn show_book_details(
    bot: &Bot,
    chat_id: ChatId,
    book_id: &str,
    api: &BooksClient,
) -> Result<()> {
    debug!(user_id = %chat_id, book_id, "Showing book details");

    bot.send_chat_action(chat_id, ChatAction::Typing).await?;

    let outcome = api.fetch_volume(book_id).await;
    let reply = ui_builder::detail_reply(&outcome);

    deliver(bot, chat_id, reply).await
}

/// Deliver a reply, as photo-with-caption when a cover is available.
/// A failed photo send falls back to plain text exactly once; a
/// failure of the fallback itself propagates to the caller.
pub async fn deliver(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<()> {
    let photo = reply
        .photo_url
        .as_deref()
        .and_then(|raw| reqwest::Url::parse(raw).ok());

    if let Some(url) = photo {
        let mut request = bot
            .send_photo(chat_id, InputFile::url(url))
            .caption(reply.text.clone())
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = reply.keyboard.clone() {
            request = request.reply_markup(keyboard);
        }

        match request.await {
            Ok(_) => return Ok(()),
            Err(err) => {
                warn!(user_id = %chat_id, error = %err, "Photo delivery failed, falling back to text");
            }
        }
    }

    let mut request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;

    Ok(())
}

fn welcome_text(first_name: &str) -> String {
    format!(
        "Привет, {}!\n\n\
         Я помогу найти информацию о книгах.\n\n\
         <b>Поиск книг</b> - просто отправьте название, автора или тему\n\
         <b>Подробная информация</b> - нажмите на кнопку при просмотре книги\n\n\
         Примеры запросов:\n\
         • Гарри Поттер\n\
         • Стивен Кинг\n\
         • Программирование Python\n\
         • 9785171202442 (ISBN)\n\n\
         Попробуйте!",
        teloxide::utils::html::escape(first_name)
    )
}

fn help_text() -> String {
    "<b>Справка по боту</b>\n\n\
     <b>Доступные команды:</b>\n\
     /start - Начать работу\n\
     /search - Поиск книг\n\
     /help - Эта справка\n\n\
     <b>Как использовать:</b>\n\
     1. Отправьте название книги, автора или тему\n\
     2. Выберите книгу из результатов\n\
     3. Нажмите \"Подробнее\" для детальной информации\n\n\
     <b>Примеры запросов:</b>\n\
     • \"Война и мир\"\n\
     • Автор: Толстой\n\
     • Фантастика\n\
     • 9785171202442\n\n\
     <b>API:</b> Google Books"
        .to_string()
}
