//! Voice Adapter - Voice Assistant Platform Adaptation Layer
//!
//! This crate sits between voice assistant platforms (Amazon Alexa) and
//! conversational business logic. Platform requests are turned into a neutral
//! conversation input, dispatched by lifecycle signal to a business handler,
//! and the handler's neutral output is rendered back into the platform's
//! response format. Every failure becomes a spoken error response.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
