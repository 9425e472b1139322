//! Request and response types for the mobile-wallet gateway's pay APIs.
//!
//! Each request type declares its endpoints and its explicit field mapping
//! through the [`ApiRequest`] trait; responses are decoded from the verified
//! parameter set. Nothing is discovered by runtime introspection.

use crate::params::{insert_nonempty, ParamMap};
use serde::{Deserialize, Serialize};

/// Interface implemented by every outgoing API call.
pub(crate) trait ApiRequest {
    /// Production endpoint.
    const URL: &'static str;
    /// Sandbox endpoint.
    const SANDBOX_URL: &'static str;

    /// Explicit field mapping used for both signing and wire encoding.
    fn into_params(self) -> ParamMap;
}

pub(crate) struct UnifiedOrderRequest {
    pub appid: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub body: String,
    pub out_trade_no: String,
    pub total_fee: String,
    pub spbill_create_ip: String,
    pub notify_url: String,
    pub trade_type: String,
}

impl ApiRequest for UnifiedOrderRequest {
    const URL: &'static str = "https://api.mch.weixin.qq.com/pay/unifiedorder";
    const SANDBOX_URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/unifiedorder";

    fn into_params(self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), self.appid);
        params.insert("mch_id".to_string(), self.mch_id);
        params.insert("nonce_str".to_string(), self.nonce_str);
        params.insert("body".to_string(), self.body);
        params.insert("out_trade_no".to_string(), self.out_trade_no);
        params.insert("total_fee".to_string(), self.total_fee);
        params.insert("spbill_create_ip".to_string(), self.spbill_create_ip);
        insert_nonempty(&mut params, "notify_url", &self.notify_url);
        params.insert("trade_type".to_string(), self.trade_type);
        params
    }
}

/// Response of the unified-order API.
#[derive(Debug, Clone, Deserialize)]
pub struct UnifiedOrderResponse {
    /// Communication status, `SUCCESS` when the gateway accepted the call
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Application id echoed back
    #[serde(default)]
    pub appid: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Terminal device number
    #[serde(default)]
    pub device_info: String,
    /// Random string generated by the gateway
    #[serde(default)]
    pub nonce_str: String,
    /// Uppercase hex MD5 signature of the response
    #[serde(default)]
    pub sign: String,
    /// Business status, `SUCCESS` when the order was created
    #[serde(default)]
    pub result_code: String,
    /// Business error code, empty on success
    #[serde(default)]
    pub err_code: String,
    /// Business error description, empty on success
    #[serde(default)]
    pub err_code_des: String,
    /// Trade type, e.g. `APP`, `NATIVE`, `JSAPI`
    #[serde(default)]
    pub trade_type: String,
    /// Prepay id to hand to the app SDK or render as a QR code
    #[serde(default)]
    pub prepay_id: String,
    /// QR link, present for native (QR) trade types
    #[serde(default)]
    pub code_url: String,
}

pub(crate) struct QueryOrderRequest {
    pub appid: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub transaction_id: String,
    pub out_trade_no: String,
}

impl ApiRequest for QueryOrderRequest {
    const URL: &'static str = "https://api.mch.weixin.qq.com/pay/orderquery";
    const SANDBOX_URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/orderquery";

    fn into_params(self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), self.appid);
        params.insert("mch_id".to_string(), self.mch_id);
        params.insert("nonce_str".to_string(), self.nonce_str);
        // One of the two order identifiers is enough.
        insert_nonempty(&mut params, "transaction_id", &self.transaction_id);
        insert_nonempty(&mut params, "out_trade_no", &self.out_trade_no);
        params
    }
}

/// Response of the order-query API.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryOrderResponse {
    /// Communication status, `SUCCESS` when the gateway accepted the call
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Application id echoed back
    #[serde(default)]
    pub appid: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Random string generated by the gateway
    #[serde(default)]
    pub nonce_str: String,
    /// Uppercase hex MD5 signature of the response
    #[serde(default)]
    pub sign: String,
    /// Business status, `SUCCESS` when the query succeeded
    #[serde(default)]
    pub result_code: String,
    /// Business error code, empty on success
    #[serde(default)]
    pub err_code: String,
    /// Business error description, empty on success
    #[serde(default)]
    pub err_code_des: String,
    /// Terminal device number
    #[serde(default)]
    pub device_info: String,
    /// Paying user's id under the application
    #[serde(default)]
    pub openid: String,
    /// Whether the payer follows the merchant's official account
    #[serde(default)]
    pub is_subscribe: String,
    /// Trade type, e.g. `APP`, `NATIVE`, `JSAPI`
    #[serde(default)]
    pub trade_type: String,
    /// Order state, e.g. `SUCCESS`, `NOTPAY`, `CLOSED`
    #[serde(default)]
    pub trade_state: String,
    /// Human-readable description of the order state
    #[serde(default)]
    pub trade_state_desc: String,
    /// Paying bank code
    #[serde(default)]
    pub bank_type: String,
    /// Order amount in cents
    #[serde(default)]
    pub total_fee: String,
    /// Currency, e.g. `CNY`
    #[serde(default)]
    pub fee_type: String,
    /// Cash amount paid, in cents
    #[serde(default)]
    pub cash_fee: String,
    /// Currency of the cash amount
    #[serde(default)]
    pub cash_fee_type: String,
    /// Coupon amount applied, in cents
    #[serde(default)]
    pub coupon_fee: String,
    /// Number of coupons applied
    #[serde(default)]
    pub coupon_count: String,
    /// Provider-side transaction id
    #[serde(default)]
    pub transaction_id: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Merchant data packet echoed back
    #[serde(default)]
    pub attach: String,
    /// Payment completion time, `yyyyMMddHHmmss`
    #[serde(default)]
    pub time_end: String,
}

pub(crate) struct RefundOrderRequest {
    pub appid: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub transaction_id: String,
    pub out_trade_no: String,
    pub out_refund_no: String,
    pub total_fee: String,
    pub refund_fee: String,
}

impl ApiRequest for RefundOrderRequest {
    const URL: &'static str = "https://api.mch.weixin.qq.com/secapi/pay/refund";
    const SANDBOX_URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/refund";

    fn into_params(self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), self.appid);
        params.insert("mch_id".to_string(), self.mch_id);
        params.insert("nonce_str".to_string(), self.nonce_str);
        insert_nonempty(&mut params, "transaction_id", &self.transaction_id);
        insert_nonempty(&mut params, "out_trade_no", &self.out_trade_no);
        params.insert("out_refund_no".to_string(), self.out_refund_no);
        params.insert("total_fee".to_string(), self.total_fee);
        params.insert("refund_fee".to_string(), self.refund_fee);
        params
    }
}

/// Response of the refund API.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundOrderResponse {
    /// Communication status, `SUCCESS` when the gateway accepted the call
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Application id echoed back
    #[serde(default)]
    pub appid: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Random string generated by the gateway
    #[serde(default)]
    pub nonce_str: String,
    /// Uppercase hex MD5 signature of the response
    #[serde(default)]
    pub sign: String,
    /// Business status, `SUCCESS` when the refund was accepted
    #[serde(default)]
    pub result_code: String,
    /// Business error code, empty on success
    #[serde(default)]
    pub err_code: String,
    /// Business error description, empty on success
    #[serde(default)]
    pub err_code_des: String,
    /// Provider-side transaction id
    #[serde(default)]
    pub transaction_id: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Merchant-side refund number echoed back
    #[serde(default)]
    pub out_refund_no: String,
    /// Provider-side refund id
    #[serde(default)]
    pub refund_id: String,
    /// Refunded amount in cents
    #[serde(default)]
    pub refund_fee: String,
    /// Order amount in cents
    #[serde(default)]
    pub total_fee: String,
    /// Cash amount paid, in cents
    #[serde(default)]
    pub cash_fee: String,
}

pub(crate) struct QueryRefundRequest {
    pub appid: String,
    pub mch_id: String,
    pub nonce_str: String,
    pub transaction_id: String,
    pub out_trade_no: String,
    pub out_refund_no: String,
    pub refund_id: String,
}

impl ApiRequest for QueryRefundRequest {
    const URL: &'static str = "https://api.mch.weixin.qq.com/pay/refundquery";
    const SANDBOX_URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/refundquery";

    fn into_params(self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), self.appid);
        params.insert("mch_id".to_string(), self.mch_id);
        params.insert("nonce_str".to_string(), self.nonce_str);
        // Any one of the four identifiers selects the refund.
        insert_nonempty(&mut params, "transaction_id", &self.transaction_id);
        insert_nonempty(&mut params, "out_trade_no", &self.out_trade_no);
        insert_nonempty(&mut params, "out_refund_no", &self.out_refund_no);
        insert_nonempty(&mut params, "refund_id", &self.refund_id);
        params
    }
}

/// Response of the refund-query API.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRefundResponse {
    /// Communication status, `SUCCESS` when the gateway accepted the call
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Application id echoed back
    #[serde(default)]
    pub appid: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Random string generated by the gateway
    #[serde(default)]
    pub nonce_str: String,
    /// Uppercase hex MD5 signature of the response
    #[serde(default)]
    pub sign: String,
    /// Business status, `SUCCESS` when the query succeeded
    #[serde(default)]
    pub result_code: String,
    /// Business error code, empty on success
    #[serde(default)]
    pub err_code: String,
    /// Business error description, empty on success
    #[serde(default)]
    pub err_code_des: String,
    /// Provider-side transaction id
    #[serde(default)]
    pub transaction_id: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Order amount in cents
    #[serde(default)]
    pub total_fee: String,
    /// Cash amount paid, in cents
    #[serde(default)]
    pub cash_fee: String,
    /// Currency, e.g. `CNY`
    #[serde(default)]
    pub fee_type: String,
    /// Number of refunds reported for the order
    #[serde(default)]
    pub refund_count: String,
}

pub(crate) struct SandboxSignKeyRequest {
    pub mch_id: String,
    pub nonce_str: String,
}

impl ApiRequest for SandboxSignKeyRequest {
    const URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/getsignkey";
    const SANDBOX_URL: &'static str = "https://api.mch.weixin.qq.com/sandboxnew/pay/getsignkey";

    fn into_params(self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("mch_id".to_string(), self.mch_id);
        params.insert("nonce_str".to_string(), self.nonce_str);
        params
    }
}

/// Response of the sandbox sign-key API.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxSignKeyResponse {
    /// Communication status, `SUCCESS` when the gateway accepted the call
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Signing key to use against the sandbox endpoints
    #[serde(default)]
    pub sandbox_signkey: String,
}

/// An asynchronous payment notification, decoded from the provider's
/// callback POST body after its signature has been checked.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    /// Communication status, `SUCCESS` when the notification is well-formed
    #[serde(default)]
    pub return_code: String,
    /// Communication message
    #[serde(default)]
    pub return_msg: String,
    /// Application id echoed back
    #[serde(default)]
    pub appid: String,
    /// Merchant id echoed back
    #[serde(default)]
    pub mch_id: String,
    /// Terminal device number
    #[serde(default)]
    pub device_info: String,
    /// Random string generated by the gateway
    #[serde(default)]
    pub nonce_str: String,
    /// Uppercase hex MD5 signature of the notification
    #[serde(default)]
    pub sign: String,
    /// Business status, `SUCCESS` when the payment went through
    #[serde(default)]
    pub result_code: String,
    /// Business error code, empty on success
    #[serde(default)]
    pub err_code: String,
    /// Business error description, empty on success
    #[serde(default)]
    pub err_code_des: String,
    /// Paying user's id under the application
    #[serde(default)]
    pub openid: String,
    /// Whether the payer follows the merchant's official account
    #[serde(default)]
    pub is_subscribe: String,
    /// Trade type, e.g. `APP`, `NATIVE`, `JSAPI`
    #[serde(default)]
    pub trade_type: String,
    /// Paying bank code
    #[serde(default)]
    pub bank_type: String,
    /// Order amount in cents
    #[serde(default)]
    pub total_fee: String,
    /// Currency, e.g. `CNY`
    #[serde(default)]
    pub fee_type: String,
    /// Cash amount paid, in cents
    #[serde(default)]
    pub cash_fee: String,
    /// Currency of the cash amount
    #[serde(default)]
    pub cash_fee_type: String,
    /// Coupon amount applied, in cents
    #[serde(default)]
    pub coupon_fee: String,
    /// Number of coupons applied
    #[serde(default)]
    pub coupon_count: String,
    /// Provider-side transaction id
    #[serde(default)]
    pub transaction_id: String,
    /// Merchant-side order number
    #[serde(default)]
    pub out_trade_no: String,
    /// Merchant data packet echoed back
    #[serde(default)]
    pub attach: String,
    /// Payment completion time, `yyyyMMddHHmmss`
    #[serde(default)]
    pub time_end: String,
}

/// Signed invocation parameters handed to the mobile app SDK to start the
/// payment UI for a prepay id.
#[derive(Debug, Clone, Serialize)]
pub struct AppPayment {
    /// Application id
    #[serde(rename = "appid")]
    pub app_id: String,
    /// Merchant id
    #[serde(rename = "partnerid")]
    pub partner_id: String,
    /// Prepay id returned by the unified-order API
    #[serde(rename = "prepayid")]
    pub prepay_id: String,
    /// Per-invocation nonce, part of the signed payload
    #[serde(rename = "noncestr")]
    pub nonce_str: String,
    /// Epoch seconds, part of the signed payload
    pub timestamp: String,
    /// Fixed extension field, always `Sign=WXPay`
    pub package: String,
    /// Uppercase hex MD5 signature over the other six fields
    pub sign: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_order_field_mapping() {
        let request = UnifiedOrderRequest {
            appid: "wxtest".to_string(),
            mch_id: "10000100".to_string(),
            nonce_str: "abc123".to_string(),
            body: "coffee".to_string(),
            out_trade_no: "T001".to_string(),
            total_fee: "100".to_string(),
            spbill_create_ip: "203.0.113.1".to_string(),
            notify_url: String::new(),
            trade_type: "APP".to_string(),
        };

        let params = request.into_params();
        assert_eq!(params.get("appid").map(String::as_str), Some("wxtest"));
        assert_eq!(params.get("total_fee").map(String::as_str), Some("100"));
        // Empty notify_url stays off the wire.
        assert!(!params.contains_key("notify_url"));
    }

    #[test]
    fn test_query_order_alternative_identifiers() {
        let request = QueryOrderRequest {
            appid: "wxtest".to_string(),
            mch_id: "10000100".to_string(),
            nonce_str: "abc123".to_string(),
            transaction_id: String::new(),
            out_trade_no: "T001".to_string(),
        };

        let params = request.into_params();
        assert!(!params.contains_key("transaction_id"));
        assert_eq!(params.get("out_trade_no").map(String::as_str), Some("T001"));
    }

    #[test]
    fn test_app_payment_wire_names() {
        let payment = AppPayment {
            app_id: "wxtest".to_string(),
            partner_id: "10000100".to_string(),
            prepay_id: "wx20240101".to_string(),
            nonce_str: "abc123".to_string(),
            timestamp: "1700000000".to_string(),
            package: "Sign=WXPay".to_string(),
            sign: "ABCD".to_string(),
        };

        let json = serde_json::to_string(&payment).unwrap();
        assert!(json.contains("\"appid\""));
        assert!(json.contains("\"partnerid\""));
        assert!(json.contains("\"prepayid\""));
        assert!(json.contains("\"noncestr\""));
    }
}
