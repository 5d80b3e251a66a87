use bookbot::books::{SearchResponse, Volume};
use bookbot::books_client::ApiError;
use bookbot::bot::ui_builder::{
    detail_reply, search_reply, DETAILS_FAILED, SEARCH_FAILED,
};
use bookbot::config::MIN_QUERY_CHARS;

fn search_response(payload: serde_json::Value) -> SearchResponse {
    serde_json::from_value(payload).expect("search payload should decode")
}

fn volume(payload: serde_json::Value) -> Volume {
    serde_json::from_value(payload).expect("volume payload should decode")
}

fn harry_potter_response() -> SearchResponse {
    search_response(serde_json::json!({
        "totalItems": 150,
        "items": [
            {
                "id": "hp1",
                "volumeInfo": {
                    "title": "Гарри Поттер и философский камень",
                    "authors": ["Дж. К. Роулинг"],
                    "publishedDate": "1997-06-26"
                }
            },
            {
                "id": "hp2",
                "volumeInfo": {
                    "title": "Гарри Поттер и Тайная комната",
                    "authors": ["Дж. К. Роулинг"],
                    "publishedDate": "1998"
                }
            },
            {
                "id": "hp3",
                "volumeInfo": {
                    "title": "Гарри Поттер и узник Азкабана",
                    "authors": ["Дж. К. Роулинг"],
                    "publishedDate": "1999"
                }
            },
            {
                "id": "hp4",
                "volumeInfo": {
                    "title": "Гарри Поттер и Кубок огня",
                    "authors": ["Дж. К. Роулинг"],
                    "publishedDate": "2000"
                }
            },
            {
                "id": "hp5",
                "volumeInfo": {
                    "title": "Гарри Поттер и Орден Феникса",
                    "authors": ["Дж. К. Роулинг"],
                    "publishedDate": "2003"
                }
            }
        ]
    }))
}

/// End-to-end search formatting scenario
#[test]
fn test_search_reply_harry_potter_scenario() {
    let outcome = Ok(harry_potter_response());
    let reply = search_reply("Гарри Поттер", &outcome);

    assert!(reply.text.starts_with("Найдено книг: 150"));
    assert!(reply.text.contains("Гарри Поттер"));
    for i in 1..=5 {
        assert!(reply.text.contains(&format!("{}. <b>", i)));
    }
    assert!(!reply.text.contains("6. <b>"));
}

#[test]
fn test_search_reply_preserves_api_order() {
    let outcome = Ok(harry_potter_response());
    let reply = search_reply("Гарри Поттер", &outcome);

    let first = reply
        .text
        .find("философский камень")
        .expect("first title expected");
    let second = reply
        .text
        .find("Тайная комната")
        .expect("second title expected");
    assert!(first < second);
}

#[test]
fn test_search_reply_api_error_hides_raw_message() {
    let outcome = Err(ApiError {
        message: "error sending request for url".to_string(),
    });

    let reply = search_reply("Гарри Поттер", &outcome);
    assert_eq!(reply.text, SEARCH_FAILED);
    assert!(!reply.text.contains("error sending request"));
}

#[test]
fn test_detail_reply_api_error_hides_raw_message() {
    let outcome = Err(ApiError {
        message: "HTTP status client error (404)".to_string(),
    });

    let reply = detail_reply(&outcome);
    assert_eq!(reply.text, DETAILS_FAILED);
    assert!(!reply.text.contains("404"));
}

#[test]
fn test_search_reply_no_results_lists_nothing() {
    let outcome = Ok(search_response(serde_json::json!({
        "totalItems": 0,
        "items": []
    })));

    let reply = search_reply("кзхтbyv", &outcome);
    assert!(reply.text.contains("кзхтbyv"));
    assert!(!reply.text.contains("1. <b>"));
    assert!(reply.keyboard.is_none());
}

#[test]
fn test_search_reply_missing_authors_uses_placeholder() {
    let outcome = Ok(search_response(serde_json::json!({
        "totalItems": 1,
        "items": [ { "id": "a", "volumeInfo": { "title": "Анонимный труд" } } ]
    })));

    let reply = search_reply("труд", &outcome);
    assert!(reply.text.contains("Неизвестен"));
}

/// Query length is counted in characters, not bytes
#[test]
fn test_min_query_chars_counts_characters() {
    assert!("Я".chars().count() < MIN_QUERY_CHARS);
    assert!("Яр".chars().count() >= MIN_QUERY_CHARS);
    // Two Cyrillic characters are four bytes but still a valid query
    assert_eq!("Яр".len(), 4);
}

/// Detail fields appear in their fixed order
#[test]
fn test_detail_reply_field_order() {
    let outcome = Ok(volume(serde_json::json!({
        "id": "hp1",
        "volumeInfo": {
            "title": "Гарри Поттер и философский камень",
            "authors": ["Дж. К. Роулинг"],
            "publisher": "Росмэн",
            "publishedDate": "1997-06-26",
            "description": "Мальчик, который выжил.",
            "pageCount": 432,
            "averageRating": 4.5,
            "ratingsCount": 120,
            "industryIdentifiers": [
                { "type": "OTHER", "identifier": "x" },
                { "type": "ISBN_13", "identifier": "9785171202442" }
            ],
            "infoLink": "http://books.google.com/books?id=hp1"
        }
    })));

    let reply = detail_reply(&outcome);
    let positions: Vec<usize> = [
        "Гарри Поттер и философский камень",
        "Автор(ы):",
        "Издательство:",
        "Дата публикации:",
        "Страниц:",
        "Рейтинг:",
        "ISBN:",
        "Описание:",
        "Ссылка на Google Books",
    ]
    .iter()
    .map(|needle| reply.text.find(needle).expect("field expected in reply"))
    .collect();

    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "detail fields out of order");
    }

    // First qualifying identifier wins
    assert!(reply.text.contains("9785171202442"));
    assert!(!reply.text.contains("ISBN: <code>x</code>"));
}

#[test]
fn test_detail_reply_carries_thumbnail_for_photo_delivery() {
    let outcome = Ok(volume(serde_json::json!({
        "id": "hp1",
        "volumeInfo": {
            "title": "Гарри Поттер и философский камень",
            "imageLinks": { "thumbnail": "http://books.google.com/thumb.jpg" }
        }
    })));

    let reply = detail_reply(&outcome);
    assert_eq!(
        reply.photo_url.as_deref(),
        Some("http://books.google.com/thumb.jpg")
    );
    // The caption text does not depend on the delivery branch
    assert!(reply.text.contains("Гарри Поттер"));
}
