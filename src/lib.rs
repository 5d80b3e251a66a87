//! # Book Search Telegram Bot
//!
//! A Telegram bot that searches the Google Books catalog and shows
//! detailed information about a selected book.

pub mod books;
pub mod books_client;
pub mod bot;
pub mod config;
pub mod db;
