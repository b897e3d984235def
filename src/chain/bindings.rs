//! Contract bindings generated from human-readable ABIs.
#![allow(
    missing_docs,
    missing_debug_implementations,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

use ethers::contract::abigen;

abigen!(
    FlowToken,
    r#"[
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

abigen!(
    FlowMarketplace,
    r#"[
        function purchaseAgent(uint256 amount, address seller) external
        function generateAgent(uint256 amount) external
    ]"#
);
