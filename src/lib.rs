//! # repairdesk
//!
//! Headless client for an equipment-repair ticketing service. Technicians
//! sign in, browse service orders by status, and close an open order with a
//! written solution. Persistence and authentication live in a hosted
//! backend (Firestore + Identity Toolkit REST APIs); this crate holds the
//! screen controllers, the backend clients behind trait seams, and the
//! navigation shell that ties them together.

pub mod backend;
pub mod config;
pub mod model;
pub mod screens;
pub mod shell;
