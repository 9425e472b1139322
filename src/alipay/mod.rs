//! Adapter for the QR/app-based gateway (asymmetric signature scheme).
//!
//! Requests travel as URL-encoded form bodies and responses come back as a
//! JSON envelope. Outgoing requests are signed with the merchant's RSA
//! private key; incoming responses and asynchronous notifications are
//! verified against the provider's published RSA public key — never the
//! merchant's own. The digest is SHA-1 for sign type `RSA` and SHA-256 for
//! `RSA2`.
//!
//! | direction             | key                                  |
//! |-----------------------|--------------------------------------|
//! | outgoing request      | merchant RSA private key (sign)      |
//! | incoming response     | provider RSA public key (verify)     |
//! | incoming notification | provider RSA public key (verify)     |

pub mod api;
pub mod client;

pub use api::{
    CreateTradeParam, ExtendParam, GoodsDetail, PayParam, QueryRefundParam, QueryTradeParam,
    RefundDetailItem, RefundQueryResponse, RefundTradeParam, ResponsePayload, ResponseStatus,
    RoyaltyDetailInfo, RoyaltyInfo, SubMerchant, TradeCreateResponse, TradeNotification,
    TradeQueryResponse, TradeRefundResponse,
};
pub use client::{AlipayClient, AlipayConfig, GATEWAY, SANDBOX_GATEWAY, SUCCESS_CODE};
