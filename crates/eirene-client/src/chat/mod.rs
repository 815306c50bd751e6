//! Eirene chat server client.
//!
//! `ChatClient` implements `ChatApi` over plain HTTP POSTs with JSON
//! bodies. The reply to a chat message is streamed; see
//! [`ChatClient::message_stream`] for pull-based consumption.

mod api;
mod client;
mod config;

pub use client::ChatClient;
pub use config::ClientConfig;
