//! 가격 피드(`data.json`) 관련 모듈
//!
//! - `client`: 피드 HTTP 클라이언트

pub mod client;

pub use client::FeedClient;
