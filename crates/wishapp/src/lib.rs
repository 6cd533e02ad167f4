//! # Wishapp Architecture
//!
//! Wishapp is a **UI-agnostic wishlist library**: a list of short wishes, each with
//! a category and two flags (completed, priority), kept on the device and
//! optionally shared between devices through a sync code.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Display layer (the `wish` binary)                          │
//! │  - Parses arguments, renders results, owns stdout/stderr    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Selector resolution, structured CmdResult values         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  WishStore (store/)                                         │
//! │  - Canonical in-memory list, write path, read path, polling │
//! │  - LocalCache (FsCache, MemCache)                           │
//! │  - RemoteStore (HttpRemote, StaticFileRemote, NoRemote)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//!
//! There is none to speak of, on purpose: the local cache is authoritative for
//! this device, the remote document is replaced wholesale by whichever device
//! writes last, and a successful fetch replaces the local list wholesale. See
//! [`reconcile`] for what that means in practice.
//!
//! ## Logging
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! display layer's job.
//!
//! ## Module Overview
//!
//! - [`model`]: `Wish`, ids, filters, counts
//! - [`token`]: sync codes
//! - [`store`]: `WishStore`, local caches, sync advisories
//! - [`remote`]: the shared document store contract and clients
//! - [`reconcile`]: what a fetched snapshot does to the local list
//! - [`commands`] / [`api`]: the operations display layers call
//! - [`config`] / [`init`]: configuration and context wiring
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod token;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
