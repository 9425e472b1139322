//! Adapter for the mobile-wallet gateway (shared-secret signature scheme).
//!
//! Requests and responses travel as flat XML documents. Both directions are
//! signed with the same keyed-MD5 construction over the same shared secret:
//! possession of the secret allows forging requests and responses alike,
//! which is a constraint of the provider's protocol, not a defect to fix
//! here. Success is a two-level check — `return_code` for the communication
//! layer, `result_code` for the business result — and both must be
//! `SUCCESS` before a payload is trusted.

pub mod api;
pub mod client;
mod xml;

pub use api::{
    AppPayment, PaymentNotification, QueryOrderResponse, QueryRefundResponse,
    RefundOrderResponse, SandboxSignKeyResponse, UnifiedOrderResponse,
};
pub use client::{WechatClient, WechatConfig, SUCCESS};
