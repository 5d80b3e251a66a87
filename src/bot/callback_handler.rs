//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::books_client::BooksClient;

use super::message_handler::show_book_details;
use super::ui_builder::{self, DETAILS_CALLBACK_PREFIX, NEW_SEARCH_CALLBACK};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, api: Arc<BooksClient>) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    if let Err(err) = handle_callback(&bot, &q, &api).await {
        error!(user_id = %q.from.id, error = ?err, "Callback handling failed");
        if let Some(msg) = &q.message {
            let _ = bot
                .send_message(msg.chat().id, ui_builder::GENERIC_ERROR)
                .await;
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    Ok(())
}

async fn handle_callback(bot: &Bot, q: &CallbackQuery, api: &BooksClient) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    let Some(msg) = &q.message else {
        return Ok(());
    };

    if let Some(book_id) = data.strip_prefix(DETAILS_CALLBACK_PREFIX) {
        if !book_id.is_empty() {
            show_book_details(bot, msg.chat().id, book_id, api).await?;
        }
    } else if data == NEW_SEARCH_CALLBACK {
        // A media caption cannot be edited into text; log and move on
        match bot
            .edit_message_text(msg.chat().id, msg.id(), ui_builder::SEARCH_PROMPT)
            .await
        {
            Ok(_) => (),
            Err(err) => {
                error!(user_id = %q.from.id, error = %err, "Failed to edit message for new search");
                bot.send_message(msg.chat().id, ui_builder::SEARCH_PROMPT)
                    .await?;
            }
        }
    }

    Ok(())
}
