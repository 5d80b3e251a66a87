//! UI Builder module for creating keyboards and formatting messages
//!
//! Holds the two reply builders at the heart of the bot: the search
//! result formatter and the book detail formatter. Both are pure
//! functions of their inputs; abnormal API outcomes degrade to a
//! fixed message, never an error surfaced to the caller.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html::escape;

use crate::books::{BookDetail, BookSummary, SearchResponse, Volume};
use crate::books_client::ApiError;
use crate::config::SEARCH_RESULT_LIMIT;

// User-facing texts
pub const SEARCH_PROMPT: &str = "Введите название книги, автора или тему:";
pub const SHORT_QUERY_PROMPT: &str = "Введите запрос длиной не менее 2 символов";
pub const SEARCH_FAILED: &str = "Ошибка при поиске. Попробуйте позже.";
pub const DETAILS_FAILED: &str = "Не удалось загрузить информацию о книге.";
pub const GENERIC_ERROR: &str = "Произошла ошибка. Пожалуйста, попробуйте еще раз.";
pub const NO_PAGE_COUNT: &str = "Нет данных";
pub const NO_RATING: &str = "Нет";
pub const NO_ISBN: &str = "Нет";
const NEW_SEARCH_BUTTON: &str = "Новый поиск";
const DETAILS_BUTTON: &str = "Подробнее";
const OPEN_LINK_BUTTON: &str = "Открыть в Google Books";

/// Callback payload prefix carrying a book id
pub const DETAILS_CALLBACK_PREFIX: &str = "details_";
/// Callback payload of the new-search reset signal
pub const NEW_SEARCH_CALLBACK: &str = "new_search";

/// An outbound chat message: HTML text, optional inline keyboard,
/// optional cover image to deliver as photo-with-caption
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    pub photo_url: Option<String>,
}

/// Format the reply to a search request
pub fn search_reply(query: &str, outcome: &Result<SearchResponse, ApiError>) -> Reply {
    let response = match outcome {
        Ok(response) => response,
        Err(_) => {
            return Reply {
                text: SEARCH_FAILED.to_string(),
                ..Default::default()
            }
        }
    };

    if response.items.is_empty() {
        return Reply {
            text: format!("По запросу '{}' ничего не найдено.", escape(query)),
            ..Default::default()
        };
    }

    let summaries: Vec<BookSummary> = response
        .items
        .iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(BookSummary::from_volume)
        .collect();

    let mut text = format!(
        "Найдено книг: {}\nЗапрос: <code>{}</code>\n\n",
        response.total_items,
        escape(query)
    );

    for (i, book) in summaries.iter().enumerate() {
        text.push_str(&format!("{}. <b>{}</b>\n", i + 1, escape(&book.title)));
        text.push_str(&format!("   {}\n", escape(&book.authors.join(", "))));
        if let Some(year) = &book.published_year {
            text.push_str(&format!("   {}\n", escape(year)));
        }
        text.push('\n');
    }

    Reply {
        text,
        keyboard: Some(search_results_keyboard(&summaries)),
        photo_url: None,
    }
}

/// Format the reply to a book detail request
pub fn detail_reply(outcome: &Result<Volume, ApiError>) -> Reply {
    let volume = match outcome {
        Ok(volume) => volume,
        Err(_) => {
            return Reply {
                text: DETAILS_FAILED.to_string(),
                ..Default::default()
            }
        }
    };

    let book = BookDetail::from_volume(volume);

    let pages = book
        .page_count
        .filter(|count| *count > 0)
        .map(|count| count.to_string())
        .unwrap_or_else(|| NO_PAGE_COUNT.to_string());

    // A zero rating counts as no rating
    let rating = book
        .average_rating
        .filter(|rating| *rating > 0.0)
        .map(|rating| rating.to_string())
        .unwrap_or_else(|| NO_RATING.to_string());

    let isbn = book.isbn.as_deref().unwrap_or(NO_ISBN);

    let mut text = format!(
        "<b>{}</b>\n\n\
         Автор(ы): {}\n\
         Издательство: {}\n\
         Дата публикации: {}\n\
         Страниц: {}\n\
         Рейтинг: {} ({} оценок)\n\
         ISBN: <code>{}</code>\n\n\
         Описание:\n{}",
        escape(&book.title),
        escape(&book.authors.join(", ")),
        escape(&book.publisher),
        escape(&book.published_date),
        escape(&pages),
        escape(&rating),
        book.ratings_count,
        escape(isbn),
        escape(&book.description),
    );

    if !book.info_link.is_empty() {
        text.push_str(&format!(
            "\n\n<a href=\"{}\">Ссылка на Google Books</a>",
            escape(&book.info_link)
        ));
    }

    Reply {
        text,
        keyboard: Some(detail_keyboard(&book)),
        photo_url: book.thumbnail.clone(),
    }
}

/// Create one details button per result plus the new-search affordance
fn search_results_keyboard(summaries: &[BookSummary]) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = summaries
        .iter()
        .enumerate()
        .map(|(i, book)| {
            vec![InlineKeyboardButton::callback(
                format!("{}. {}", i + 1, DETAILS_BUTTON),
                format!("{}{}", DETAILS_CALLBACK_PREFIX, book.id),
            )]
        })
        .collect();

    buttons.push(vec![InlineKeyboardButton::callback(
        NEW_SEARCH_BUTTON,
        NEW_SEARCH_CALLBACK,
    )]);

    InlineKeyboardMarkup::new(buttons)
}

/// Create the detail keyboard: outbound link (when valid) and new search
fn detail_keyboard(book: &BookDetail) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = Vec::new();

    // An empty or malformed infoLink renders as an absent button
    if let Ok(url) = reqwest::Url::parse(&book.info_link) {
        buttons.push(vec![InlineKeyboardButton::url(OPEN_LINK_BUTTON, url)]);
    }

    buttons.push(vec![InlineKeyboardButton::callback(
        NEW_SEARCH_BUTTON,
        NEW_SEARCH_CALLBACK,
    )]);

    InlineKeyboardMarkup::new(buttons)
}
