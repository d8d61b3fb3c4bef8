//! Carpool marketplace server.
//!
//! Drivers post rides, riders search for them (including rides that start
//! or end near the requested route) and request seats, and everyone is
//! kept informed through a per-user notification inbox.

pub mod booking;
pub mod config;
pub mod domain;
pub mod geo;
pub mod notify;
pub mod search;
pub mod service;
pub mod store;
pub mod web;
