//! # flowstate-market
//!
//! Client library and CLI for the Flowstate workflow marketplace, where
//! users buy, sell and generate workflow JSON files and pay in the FLOW
//! ERC-20 token.
//!
//! The backend REST API and the token/marketplace contracts are external.
//! This crate wraps the backend in a typed client, talks to the contracts
//! through a [`chain::ChainGateway`], and drives paid actions through the
//! [`service::PurchaseOrchestrator`].
//!
//! ## Architecture
//!
//! ```text
//! CLI (cli.rs)                 notifications ◄── NotificationBus (domain/)
//!     │                                              ▲
//!     ├── MarketService (service/) ──────────────────┤
//!     │       └── views (view/)                      │
//!     │                                              │
//!     ├── PurchaseOrchestrator (service/) ───────────┘
//!     │       ├── ChainGateway (chain/) ── ethers ── RPC node
//!     │       └── MarketBackend (api/)
//!     │
//!     └── MarketApiClient (api/) ── reqwest ── backend REST API
//! ```
//!
//! ## Purchase flow
//!
//! 1. Read the FLOW allowance granted to the marketplace contract.
//! 2. If it is below the price, approve `2^255 - 1` and wait for it.
//! 3. Simulate the contract call, then sign and submit it.
//! 4. Report the mined transaction to the backend.

pub mod api;
pub mod app_state;
pub mod chain;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod view;
