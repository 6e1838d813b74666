pub mod auth_service;
pub mod codec;
pub mod export;
pub mod form_engine;
pub mod identity;
pub mod qr;
pub mod slugs;
