//! Request and response types for the QR gateway's trade APIs.
//!
//! Each request type declares its API method name and per-call extra fields
//! through the [`PayParam`] trait, and each response type declares the JSON
//! envelope node it lives under through [`ResponsePayload`]. The mapping is
//! explicit and visible at compile time; nothing is discovered by runtime
//! introspection.

use crate::errors::Result;
use crate::params::{insert_nonempty, ParamMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Interface implemented by every outgoing API call.
pub trait PayParam: Serialize {
    /// API method name carried in the `method` envelope field,
    /// e.g. `alipay.trade.create`.
    const METHOD: &'static str;

    /// Per-call envelope fields outside `biz_content`
    /// (delegated-auth token, callback URL).
    fn extra_params(&self) -> ParamMap {
        ParamMap::new()
    }

    /// The JSON-serialized business payload for the `biz_content` field.
    fn biz_content(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Business result carried by every synchronous response node.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    /// Gateway result code; `"10000"` means the call succeeded
    #[serde(default)]
    pub code: String,
    /// Gateway result message
    #[serde(default)]
    pub msg: String,
    /// Detailed error code, empty on success
    #[serde(default)]
    pub sub_code: String,
    /// Detailed error message, empty on success
    #[serde(default)]
    pub sub_msg: String,
}

/// Interface implemented by every synchronous response payload.
pub trait ResponsePayload: DeserializeOwned {
    /// JSON key of the response node inside the envelope,
    /// e.g. `alipay_trade_create_response`.
    const NODE: &'static str;

    /// The business result of the call.
    fn status(&self) -> &ResponseStatus;
}

/// Parameters for `alipay.trade.create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTradeParam {
    /// Delegated-auth token, sent outside `biz_content`
    #[serde(skip)]
    pub app_auth_token: String,
    /// Asynchronous notification URL, filled in from the client config
    #[serde(skip)]
    pub notify_url: String,
    /// Merchant-side order number
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
    /// Seller account id, defaults to the merchant itself
    #[serde(skip_serializing_if = "String::is_empty")]
    pub seller_id: String,
    /// Order amount in yuan with two decimals, e.g. `"10.00"`
    pub total_amount: String,
    /// Part of the amount eligible for discounts
    #[serde(skip_serializing_if = "String::is_empty")]
    pub discountable_amount: String,
    /// Part of the amount not eligible for discounts
    #[serde(skip_serializing_if = "String::is_empty")]
    pub undiscountable_amount: String,
    /// Buyer account name (email or mobile number)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub buyer_logon_id: String,
    /// Order title
    pub subject: String,
    /// Order description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Buyer account id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub buyer_id: String,
    /// Line items of the order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub goods_detail: Vec<GoodsDetail>,
    /// Merchant operator id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operator_id: String,
    /// Merchant store id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub store_id: String,
    /// Merchant terminal id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terminal_id: String,
    /// Business extension parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend_params: Option<ExtendParam>,
    /// Relative payment timeout, e.g. `"90m"`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout_express: String,
    /// Settlement split description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub royalty_info: Option<RoyaltyInfo>,
    /// Provider-side store id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alipay_store_id: String,
    /// Secondary merchants of the order
    #[serde(rename = "sub_merchant", skip_serializing_if = "Vec::is_empty")]
    pub sub_merchants: Vec<SubMerchant>,
    /// Merchant-side order number of the originating system
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merchant_order_no: String,
}

impl PayParam for CreateTradeParam {
    const METHOD: &'static str = "alipay.trade.create";

    fn extra_params(&self) -> ParamMap {
        let mut extras = ParamMap::new();
        insert_nonempty(&mut extras, "app_auth_token", &self.app_auth_token);
        insert_nonempty(&mut extras, "notify_url", &self.notify_url);
        extras
    }
}

/// A line item of the order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoodsDetail {
    /// Merchant-side goods id
    pub goods_id: String,
    /// Provider-side goods id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alipay_goods_id: String,
    /// Goods name
    pub goods_name: String,
    /// Quantity ordered
    pub quantity: String,
    /// Unit price in yuan
    pub price: String,
    /// Goods category code
    #[serde(skip_serializing_if = "String::is_empty")]
    pub goods_category: String,
    /// Goods description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Goods detail page URL
    #[serde(skip_serializing_if = "String::is_empty")]
    pub show_url: String,
}

/// Business extension parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtendParam {
    /// System service provider id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sys_service_provider_id: String,
    /// Installment count for installment payments
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hb_fq_num: String,
    /// Seller's share of the installment fee, in percent
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hb_fq_seller_percent: String,
    /// Relative payment timeout override
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timeout_express: String,
}

/// Settlement split description.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoyaltyInfo {
    /// Split type, e.g. `ROYALTY`
    pub royalty_type: String,
    /// The individual split entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub royalty_detail_infos: Vec<RoyaltyDetailInfo>,
}

/// One settlement split entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoyaltyDetailInfo {
    /// Serial number of the entry
    pub serial_no: String,
    /// Account type receiving the split
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trans_in_type: String,
    /// Batch number
    #[serde(skip_serializing_if = "String::is_empty")]
    pub batch_no: String,
    /// Merchant-side relation id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_relation_id: String,
    /// Account type paying the split
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trans_out_type: String,
    /// Account paying the split
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trans_out: String,
    /// Account receiving the split
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trans_in: String,
    /// Split amount in yuan
    #[serde(skip_serializing_if = "String::is_empty")]
    pub amount: String,
    /// Split description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
    /// Split amount as a percentage of the order
    #[serde(skip_serializing_if = "String::is_empty")]
    pub amount_percentage: String,
    /// Provider-side store id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alipay_store_id: String,
}

/// Secondary merchant identity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubMerchant {
    /// Secondary merchant id
    pub merchant_id: String,
}

/// Response node of `alipay.trade.create`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeCreateResponse {
    /// Business result of the call
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Provider-side trade number
    #[serde(default)]
    pub trade_no: String,
    /// Merchant-side order number echoed back
    #[serde(default)]
    pub out_trade_no: String,
}

impl ResponsePayload for TradeCreateResponse {
    const NODE: &'static str = "alipay_trade_create_response";

    fn status(&self) -> &ResponseStatus {
        &self.status
    }
}

/// Parameters for `alipay.trade.query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryTradeParam {
    /// Delegated-auth token, sent outside `biz_content`
    #[serde(skip)]
    pub app_auth_token: String,
    /// Merchant-side order number; one of the two identifiers is required
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
    /// Provider-side trade number
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trade_no: String,
}

impl PayParam for QueryTradeParam {
    const METHOD: &'static str = "alipay.trade.query";

    fn extra_params(&self) -> ParamMap {
        let mut extras = ParamMap::new();
        insert_nonempty(&mut extras, "app_auth_token", &self.app_auth_token);
        extras
    }
}

/// Response node of `alipay.trade.query`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeQueryResponse {
    /// Business result of the call
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Buyer account name
    #[serde(default)]
    pub buyer_logon_id: String,
    /// Amount actually paid by the buyer, in yuan
    #[serde(default)]
    pub buyer_pay_amount: String,
    /// Buyer account id
    #[serde(default)]
    pub buyer_user_id: String,
    /// Invoiceable amount of the trade
    #[serde(default)]
    pub invoice_amount: String,
    /// Deprecated buyer identifier, kept for older responses
    #[serde(default)]
    pub open_id: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Amount paid with loyalty points, in yuan
    #[serde(default)]
    pub point_amount: String,
    /// Amount received by the merchant, in yuan
    #[serde(default)]
    pub receipt_amount: String,
    /// Time the payout to the seller was made
    #[serde(default)]
    pub send_pay_date: String,
    /// Order amount of the trade, in yuan
    #[serde(default)]
    pub total_amount: String,
    /// Provider-side trade number
    #[serde(default)]
    pub trade_no: String,
    /// Trade state, e.g. `TRADE_SUCCESS`
    #[serde(default)]
    pub trade_status: String,
}

impl ResponsePayload for TradeQueryResponse {
    const NODE: &'static str = "alipay_trade_query_response";

    fn status(&self) -> &ResponseStatus {
        &self.status
    }
}

/// Parameters for `alipay.trade.refund`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefundTradeParam {
    /// Delegated-auth token, sent outside `biz_content`
    #[serde(skip)]
    pub app_auth_token: String,
    /// Merchant-side order number; one of the two identifiers is required
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
    /// Provider-side trade number
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trade_no: String,
    /// Refund amount in yuan, must not exceed the order amount
    pub refund_amount: String,
    /// Reason shown to the buyer
    #[serde(skip_serializing_if = "String::is_empty")]
    pub refund_reason: String,
    /// Identifies a partial refund; required when refunding more than once
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_request_no: String,
    /// Merchant operator id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operator_id: String,
    /// Merchant store id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub store_id: String,
    /// Merchant terminal id
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terminal_id: String,
}

impl PayParam for RefundTradeParam {
    const METHOD: &'static str = "alipay.trade.refund";

    fn extra_params(&self) -> ParamMap {
        let mut extras = ParamMap::new();
        insert_nonempty(&mut extras, "app_auth_token", &self.app_auth_token);
        extras
    }
}

/// One refund settlement channel entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundDetailItem {
    /// Funding channel the refund went back through
    #[serde(default)]
    pub fund_channel: String,
    /// Amount refunded through this channel, in yuan
    #[serde(default)]
    pub amount: String,
    /// Actual amount after fee adjustments, in yuan
    #[serde(default)]
    pub real_amount: String,
}

/// Response node of `alipay.trade.refund`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRefundResponse {
    /// Business result of the call
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Provider-side trade number
    #[serde(default)]
    pub trade_no: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Deprecated buyer identifier, kept for older responses
    #[serde(default)]
    pub open_id: String,
    /// Buyer account name
    #[serde(default)]
    pub buyer_logon_id: String,
    /// Whether this refund changed the fund flow
    #[serde(default)]
    pub fund_change: String,
    /// Total refunded amount for the trade, in yuan
    #[serde(default)]
    pub refund_fee: String,
    /// Time the refund was paid out
    #[serde(default)]
    pub gmt_refund_pay: String,
    /// Store name attached to the trade
    #[serde(default)]
    pub store_name: String,
    /// Per-channel breakdown of the refund
    #[serde(default)]
    pub refund_detail_item_list: Vec<RefundDetailItem>,
}

impl ResponsePayload for TradeRefundResponse {
    const NODE: &'static str = "alipay_trade_refund_response";

    fn status(&self) -> &ResponseStatus {
        &self.status
    }
}

/// Parameters for `alipay.trade.fastpay.refund.query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRefundParam {
    /// Delegated-auth token, sent outside `biz_content`
    #[serde(skip)]
    pub app_auth_token: String,
    /// Merchant-side order number; one of the two identifiers is required
    #[serde(skip_serializing_if = "String::is_empty")]
    pub out_trade_no: String,
    /// Provider-side trade number
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trade_no: String,
    /// Request number of the refund being queried
    pub out_request_no: String,
}

impl PayParam for QueryRefundParam {
    const METHOD: &'static str = "alipay.trade.fastpay.refund.query";

    fn extra_params(&self) -> ParamMap {
        let mut extras = ParamMap::new();
        insert_nonempty(&mut extras, "app_auth_token", &self.app_auth_token);
        extras
    }
}

/// Response node of `alipay.trade.fastpay.refund.query`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundQueryResponse {
    /// Business result of the call
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Provider-side trade number
    #[serde(default)]
    pub trade_no: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Request number of the refund
    #[serde(default)]
    pub out_request_no: String,
    /// Reason given when the refund was requested
    #[serde(default)]
    pub refund_reason: String,
    /// Order amount of the trade being refunded, in yuan
    #[serde(default)]
    pub total_amount: String,
    /// Amount of this refund request, in yuan
    #[serde(default)]
    pub refund_amount: String,
}

impl ResponsePayload for RefundQueryResponse {
    const NODE: &'static str = "alipay_trade_fastpay_refund_query_response";

    fn status(&self) -> &ResponseStatus {
        &self.status
    }
}

/// An asynchronous trade notification, decoded from the provider's callback
/// POST body after its signature has been checked.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeNotification {
    /// Time the notification was sent
    #[serde(default)]
    pub notify_time: String,
    /// Notification type, e.g. `trade_status_sync`
    #[serde(default)]
    pub notify_type: String,
    /// Provider-side notification id
    #[serde(default)]
    pub notify_id: String,
    /// Merchant application id
    #[serde(default)]
    pub app_id: String,
    /// Authorizing application id for delegated calls
    #[serde(default)]
    pub auth_app_id: String,
    /// Character set of the notification
    #[serde(default)]
    pub charset: String,
    /// Interface version
    #[serde(default)]
    pub version: String,
    /// Signature scheme declared by the notification itself
    #[serde(default)]
    pub sign_type: String,
    /// Base64 RSA signature over the canonical string
    #[serde(default)]
    pub sign: String,
    /// Provider-side trade number
    #[serde(default)]
    pub trade_no: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Buyer account id
    #[serde(default)]
    pub buyer_id: String,
    /// Buyer account name
    #[serde(default)]
    pub buyer_logon_id: String,
    /// Seller account id
    #[serde(default)]
    pub seller_id: String,
    /// Seller account email
    #[serde(default)]
    pub seller_email: String,
    /// Trade state this notification reports, e.g. `TRADE_SUCCESS`
    #[serde(default)]
    pub trade_status: String,
    /// Order amount in yuan
    #[serde(default)]
    pub total_amount: String,
    /// Amount received by the merchant, in yuan
    #[serde(default)]
    pub receipt_amount: String,
    /// Invoiceable amount, in yuan
    #[serde(default)]
    pub invoice_amount: String,
    /// Amount actually paid by the buyer, in yuan
    #[serde(default)]
    pub buyer_pay_amount: String,
    /// Amount paid with loyalty points, in yuan
    #[serde(default)]
    pub point_amount: String,
    /// Total refunded amount, present on refund notifications
    #[serde(default)]
    pub refund_fee: String,
    /// Order title
    #[serde(default)]
    pub subject: String,
    /// Order description
    #[serde(default)]
    pub body: String,
    /// Trade creation time
    #[serde(default)]
    pub gmt_create: String,
    /// Payment time
    #[serde(default)]
    pub gmt_payment: String,
    /// Trade close time
    #[serde(default)]
    pub gmt_close: String,
    /// Refund time
    #[serde(default)]
    pub gmt_refund: String,
    /// Raw JSON list of funding channels used to pay
    #[serde(default)]
    pub fund_bill_list: String,
}

impl TradeNotification {
    /// Whether the reported trade state means the buyer's payment went
    /// through (`TRADE_SUCCESS` or `TRADE_FINISHED`).
    pub fn is_paid(&self) -> bool {
        matches!(self.trade_status.as_str(), "TRADE_SUCCESS" | "TRADE_FINISHED")
    }
}
