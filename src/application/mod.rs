//! Application layer: use-case services and DTOs

pub mod commands;
pub mod dto;

pub use commands::{
    ChargeService, CustomerService, UserService, WebhookDispatcher, WebhookEventPublisher,
};
