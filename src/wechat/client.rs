//! Client for the mobile-wallet gateway.
//!
//! The client owns an immutable [`WechatConfig`] and a reqwest client.
//! Signing and verification are pure functions of their inputs plus the
//! shared secret, so one client instance can serve concurrent calls from
//! multiple tasks without coordination.

use crate::errors::{PayError, Result};
use crate::params::{from_params, ParamMap, SIGN_FIELD};
use crate::schemes::symmetric;
use crate::utils::{epoch_seconds_utc8, generate_nonce};
use crate::wechat::api::{
    ApiRequest, AppPayment, PaymentNotification, QueryOrderRequest, QueryOrderResponse,
    QueryRefundRequest, QueryRefundResponse, RefundOrderRequest, RefundOrderResponse,
    SandboxSignKeyRequest, SandboxSignKeyResponse, UnifiedOrderRequest, UnifiedOrderResponse,
};
use crate::wechat::xml::{from_xml, to_xml};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Status value meaning success, checked against both `return_code` and
/// `result_code`.
pub const SUCCESS: &str = "SUCCESS";

/// Configuration for the mobile-wallet gateway client.
#[derive(Clone)]
pub struct WechatConfig {
    /// Application id (`appid` envelope field)
    pub app_id: String,

    /// Merchant id (`mch_id` envelope field)
    pub mch_id: String,

    /// Shared secret. Signs outgoing requests AND authenticates incoming
    /// responses; anyone holding it can forge both directions.
    pub api_key: String,

    /// Callback URL for asynchronous payment notifications
    pub notify_url: String,

    /// Trade type sent with unified orders, e.g. `APP`, `NATIVE`, `JSAPI`
    pub trade_type: String,

    /// Whether to call the sandbox endpoints
    pub sandbox: bool,
}

impl WechatConfig {
    /// Creates a configuration for the production endpoints with trade type
    /// `APP`.
    ///
    /// # Examples
    ///
    /// ```
    /// use paygate_rs::wechat::WechatConfig;
    ///
    /// let config = WechatConfig::new("wxd930ea5d5a258f4f", "10000100", "shared-secret")
    ///     .with_notify_url("https://merchant.example.com/wx/notify");
    /// ```
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            api_key: api_key.into(),
            notify_url: String::new(),
            trade_type: "APP".to_string(),
            sandbox: false,
        }
    }

    /// Sets the asynchronous notification URL attached to unified orders.
    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = url.into();
        self
    }

    /// Sets the trade type sent with unified orders.
    pub fn with_trade_type(mut self, trade_type: impl Into<String>) -> Self {
        self.trade_type = trade_type.into();
        self
    }

    /// Switches the client to the sandbox endpoints.
    pub fn with_sandbox(mut self) -> Self {
        self.sandbox = true;
        self
    }
}

/// Client for the mobile-wallet gateway's pay APIs.
pub struct WechatClient {
    config: WechatConfig,
    http_client: Client,
}

impl WechatClient {
    /// Creates a client from an immutable configuration.
    pub fn new(config: WechatConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    /// Replaces the HTTP client, e.g. to configure timeouts or proxies.
    /// Transport policy (timeouts, retries, pooling) belongs to the injected
    /// client, not to this crate.
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Creates an order and returns the prepay id.
    ///
    /// `total_fee` is the order amount in cents; `client_ip` is the IP the
    /// paying device connects from.
    pub async fn unified_order(
        &self,
        total_fee: u64,
        description: &str,
        out_trade_no: &str,
        client_ip: &str,
    ) -> Result<UnifiedOrderResponse> {
        let request = UnifiedOrderRequest {
            appid: self.config.app_id.clone(),
            mch_id: self.config.mch_id.clone(),
            nonce_str: generate_nonce(),
            body: description.to_string(),
            out_trade_no: out_trade_no.to_string(),
            total_fee: total_fee.to_string(),
            spbill_create_ip: client_ip.to_string(),
            notify_url: self.config.notify_url.clone(),
            trade_type: self.config.trade_type.clone(),
        };
        self.call(request).await
    }

    /// Queries an order by provider transaction id and/or merchant order
    /// number.
    pub async fn query_order(
        &self,
        transaction_id: &str,
        out_trade_no: &str,
    ) -> Result<QueryOrderResponse> {
        let request = QueryOrderRequest {
            appid: self.config.app_id.clone(),
            mch_id: self.config.mch_id.clone(),
            nonce_str: generate_nonce(),
            transaction_id: transaction_id.to_string(),
            out_trade_no: out_trade_no.to_string(),
        };
        self.call(request).await
    }

    /// Refunds an order, fully or partially. Amounts are in cents.
    pub async fn refund_order(
        &self,
        transaction_id: &str,
        out_trade_no: &str,
        out_refund_no: &str,
        total_fee: u64,
        refund_fee: u64,
    ) -> Result<RefundOrderResponse> {
        let request = RefundOrderRequest {
            appid: self.config.app_id.clone(),
            mch_id: self.config.mch_id.clone(),
            nonce_str: generate_nonce(),
            transaction_id: transaction_id.to_string(),
            out_trade_no: out_trade_no.to_string(),
            out_refund_no: out_refund_no.to_string(),
            total_fee: total_fee.to_string(),
            refund_fee: refund_fee.to_string(),
        };
        self.call(request).await
    }

    /// Queries a refund by any of its identifiers.
    pub async fn query_refund(
        &self,
        transaction_id: &str,
        out_trade_no: &str,
        out_refund_no: &str,
        refund_id: &str,
    ) -> Result<QueryRefundResponse> {
        let request = QueryRefundRequest {
            appid: self.config.app_id.clone(),
            mch_id: self.config.mch_id.clone(),
            nonce_str: generate_nonce(),
            transaction_id: transaction_id.to_string(),
            out_trade_no: out_trade_no.to_string(),
            out_refund_no: out_refund_no.to_string(),
            refund_id: refund_id.to_string(),
        };
        self.call(request).await
    }

    /// Re-signs a prepay id into the invocation parameters the mobile app
    /// SDK needs to start the payment UI.
    ///
    /// The timestamp and nonce participate in the signature, so they are
    /// generated once here and returned unchanged in the result.
    pub fn app_payment(&self, prepay_id: &str) -> AppPayment {
        let nonce_str = generate_nonce();
        let timestamp = epoch_seconds_utc8();

        let mut params = ParamMap::new();
        params.insert("appid".to_string(), self.config.app_id.clone());
        params.insert("partnerid".to_string(), self.config.mch_id.clone());
        params.insert("prepayid".to_string(), prepay_id.to_string());
        params.insert("noncestr".to_string(), nonce_str.clone());
        params.insert("timestamp".to_string(), timestamp.clone());
        params.insert("package".to_string(), "Sign=WXPay".to_string());
        let sign = symmetric::signature(&params, &self.config.api_key);

        AppPayment {
            app_id: self.config.app_id.clone(),
            partner_id: self.config.mch_id.clone(),
            prepay_id: prepay_id.to_string(),
            nonce_str,
            timestamp,
            package: "Sign=WXPay".to_string(),
            sign,
        }
    }

    /// Verifies an asynchronous payment notification delivered as an XML
    /// body and returns the decoded notification.
    ///
    /// Runs the same authenticator as synchronous responses: communication
    /// status, then signature, then business status. An unverified
    /// notification must never trigger order fulfillment.
    pub fn verify_notification(&self, body: &str) -> Result<PaymentNotification> {
        self.authenticate_response(body)
    }

    /// Renders the small XML acknowledgement document the notification
    /// endpoint answers with.
    ///
    /// # Examples
    ///
    /// ```
    /// use paygate_rs::wechat::{WechatClient, WechatConfig};
    ///
    /// let client = WechatClient::new(WechatConfig::new("wxtest", "10000100", "secret"));
    /// let ack = client.notification_reply("SUCCESS", "OK");
    /// assert_eq!(ack, "<xml><return_code>SUCCESS</return_code><return_msg>OK</return_msg></xml>");
    /// ```
    pub fn notification_reply(&self, return_code: &str, return_msg: &str) -> String {
        let mut params = ParamMap::new();
        params.insert("return_code".to_string(), return_code.to_string());
        params.insert("return_msg".to_string(), return_msg.to_string());
        to_xml(&params)
    }

    /// Fetches the signing key for the sandbox environment.
    ///
    /// The request is signed with the production secret; the response carries
    /// no reliable signature and only its communication status is checked.
    pub async fn sandbox_sign_key(&self) -> Result<SandboxSignKeyResponse> {
        let request = SandboxSignKeyRequest {
            mch_id: self.config.mch_id.clone(),
            nonce_str: generate_nonce(),
        };

        let mut params = request.into_params();
        let sign = symmetric::signature(&params, &self.config.api_key);
        params.insert(SIGN_FIELD.to_string(), sign);

        let body = self.execute(SandboxSignKeyRequest::URL, to_xml(&params)).await?;
        let response = from_xml(&body)?;
        if response.is_empty() {
            return Err(PayError::InvalidPayload("empty or non-XML response body".to_string()));
        }
        let return_code = response.get("return_code").cloned().unwrap_or_default();
        if return_code != SUCCESS {
            return Err(PayError::BusinessError {
                code: return_code,
                msg: response.get("return_msg").cloned().unwrap_or_default(),
                sub_code: String::new(),
                sub_msg: String::new(),
            });
        }
        from_params(&response)
    }

    async fn call<R, T>(&self, request: R) -> Result<T>
    where
        R: ApiRequest,
        T: DeserializeOwned,
    {
        let url = if self.config.sandbox { R::SANDBOX_URL } else { R::URL };

        let mut params = request.into_params();
        let sign = symmetric::signature(&params, &self.config.api_key);
        params.insert(SIGN_FIELD.to_string(), sign);

        let body = self.execute(url, to_xml(&params)).await?;
        self.authenticate_response(&body)
    }

    async fn execute(&self, url: &str, body: String) -> Result<String> {
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %url, "sending gateway request");

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    /// Runs the response authenticator over a raw XML body.
    ///
    /// `return_code` must be `SUCCESS` first — communication failures are
    /// unsigned — then the MD5 signature is recomputed over the decoded
    /// parameter set and compared, and finally `result_code` must be
    /// `SUCCESS`. Decode failures, signature failures, and business failures
    /// surface as distinct error variants.
    ///
    /// Public so that callers running their own transport can still reuse
    /// the trust decision.
    pub fn authenticate_response<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let params = from_xml(body)?;
        if params.is_empty() {
            return Err(PayError::InvalidPayload("empty or non-XML response body".to_string()));
        }

        let return_code = params.get("return_code").cloned().unwrap_or_default();
        if return_code != SUCCESS {
            return Err(PayError::BusinessError {
                code: return_code,
                msg: params.get("return_msg").cloned().unwrap_or_default(),
                sub_code: String::new(),
                sub_msg: String::new(),
            });
        }

        if !symmetric::verify(&params, &self.config.api_key) {
            return Err(PayError::SignatureError("response signature mismatch".to_string()));
        }

        let result_code = params.get("result_code").cloned().unwrap_or_default();
        if result_code != SUCCESS {
            let err_code = params.get("err_code").cloned().unwrap_or_default();
            return Err(PayError::BusinessError {
                code: if err_code.is_empty() { result_code } else { err_code },
                msg: params.get("err_code_des").cloned().unwrap_or_default(),
                sub_code: String::new(),
                sub_msg: String::new(),
            });
        }

        from_params(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> WechatClient {
        WechatClient::new(WechatConfig::new("wxtest", "10000100", "testkey"))
    }

    // Signature precomputed for api_key "testkey".
    const UNIFIED_ORDER_BODY: &str = "<xml>\
<appid><![CDATA[wxtest]]></appid>\
<mch_id><![CDATA[10000100]]></mch_id>\
<nonce_str><![CDATA[abc123]]></nonce_str>\
<prepay_id><![CDATA[wx20240101]]></prepay_id>\
<result_code><![CDATA[SUCCESS]]></result_code>\
<return_code><![CDATA[SUCCESS]]></return_code>\
<return_msg><![CDATA[OK]]></return_msg>\
<trade_type><![CDATA[APP]]></trade_type>\
<sign><![CDATA[9FC54B2089714679F6D711C72B2D4B4F]]></sign>\
</xml>";

    #[test]
    fn test_authenticate_response_accepts_valid() {
        let client = test_client();
        let response: UnifiedOrderResponse = client.authenticate_response(UNIFIED_ORDER_BODY).unwrap();
        assert_eq!(response.prepay_id, "wx20240101");
        assert_eq!(response.trade_type, "APP");
        assert_eq!(response.result_code, "SUCCESS");
    }

    #[test]
    fn test_authenticate_response_rejects_tampered_field() {
        let client = test_client();
        let tampered = UNIFIED_ORDER_BODY.replace("wx20240101", "wx20240102");
        let err = client
            .authenticate_response::<UnifiedOrderResponse>(&tampered)
            .unwrap_err();
        assert!(matches!(err, PayError::SignatureError(_)));
    }

    #[test]
    fn test_authenticate_response_rejects_wrong_secret() {
        let client = WechatClient::new(WechatConfig::new("wxtest", "10000100", "otherkey"));
        let err = client
            .authenticate_response::<UnifiedOrderResponse>(UNIFIED_ORDER_BODY)
            .unwrap_err();
        assert!(matches!(err, PayError::SignatureError(_)));
    }

    #[test]
    fn test_authenticate_response_communication_failure() {
        let client = test_client();
        let body = "<xml><return_code>FAIL</return_code><return_msg>appid not exist</return_msg></xml>";
        let err = client
            .authenticate_response::<UnifiedOrderResponse>(body)
            .unwrap_err();
        match err {
            PayError::BusinessError { code, msg, .. } => {
                assert_eq!(code, "FAIL");
                assert_eq!(msg, "appid not exist");
            }
            other => panic!("expected business error, got {:?}", other),
        }
    }

    #[test]
    fn test_authenticate_response_business_failure() {
        // Correctly signed response whose result_code reports a failure.
        let client = test_client();
        let body = "<xml>\
<appid>wxtest</appid>\
<err_code>ORDERPAID</err_code>\
<err_code_des>order paid</err_code_des>\
<mch_id>10000100</mch_id>\
<nonce_str>abc123</nonce_str>\
<result_code>FAIL</result_code>\
<return_code>SUCCESS</return_code>\
<return_msg>OK</return_msg>\
<sign>7786DB39D73E430577E5CE1C3EA52DB2</sign>\
</xml>";
        let err = client
            .authenticate_response::<UnifiedOrderResponse>(body)
            .unwrap_err();
        match err {
            PayError::BusinessError { code, msg, .. } => {
                assert_eq!(code, "ORDERPAID");
                assert_eq!(msg, "order paid");
            }
            other => panic!("expected business error, got {:?}", other),
        }
    }

    #[test]
    fn test_authenticate_response_non_xml_body() {
        let client = test_client();
        let err = client
            .authenticate_response::<UnifiedOrderResponse>("502 Bad Gateway")
            .unwrap_err();
        assert!(matches!(err, PayError::InvalidPayload(_)));
    }

    #[test]
    fn test_app_payment_signature_verifies() {
        let client = test_client();
        let payment = client.app_payment("wx20240101");

        let mut params = ParamMap::new();
        params.insert("appid".to_string(), payment.app_id.clone());
        params.insert("partnerid".to_string(), payment.partner_id.clone());
        params.insert("prepayid".to_string(), payment.prepay_id.clone());
        params.insert("noncestr".to_string(), payment.nonce_str.clone());
        params.insert("timestamp".to_string(), payment.timestamp.clone());
        params.insert("package".to_string(), payment.package.clone());
        params.insert(SIGN_FIELD.to_string(), payment.sign.clone());

        assert!(symmetric::verify(&params, "testkey"));
        assert_eq!(payment.package, "Sign=WXPay");
        assert_eq!(payment.nonce_str.len(), 32);
    }

    #[test]
    fn test_notification_reply_shape() {
        let client = test_client();
        let ack = client.notification_reply("SUCCESS", "OK");
        assert_eq!(
            ack,
            "<xml><return_code>SUCCESS</return_code><return_msg>OK</return_msg></xml>"
        );
    }

    #[test]
    fn test_verify_notification_requires_signature() {
        let client = test_client();
        let body = "<xml>\
<out_trade_no>T002</out_trade_no>\
<result_code>SUCCESS</result_code>\
<return_code>SUCCESS</return_code>\
</xml>";
        let err = client.verify_notification(body).unwrap_err();
        assert!(matches!(err, PayError::SignatureError(_)));
    }
}
