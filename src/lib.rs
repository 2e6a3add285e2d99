//! Speak one English sentence in many languages.
//!
//! A submission translates the sentence into the first N catalog languages
//! through a chat-completions model, synthesizes each translation to MP3 and
//! stores the clips until the janitor clears them.

pub mod artifacts;
pub mod config;
pub mod i18n;
pub mod janitor;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod speech;
pub mod translation;

#[cfg(test)]
mod test_util;
