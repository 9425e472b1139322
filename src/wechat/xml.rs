//! Flat `<xml>` document encoding and decoding.
//!
//! The mobile-wallet gateway speaks single-level XML: a root `<xml>` element
//! whose children are `<field>value</field>` pairs, with values sometimes
//! wrapped in CDATA. Both directions go through a [`ParamMap`] so that the
//! signer and the verifier always see the same parameter set.

use crate::errors::Result;
use crate::params::ParamMap;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Renders a parameter set as a flat `<xml>` document.
///
/// Keys come out in ascending order (the map is ordered); values are
/// XML-escaped.
pub(crate) fn to_xml(params: &ParamMap) -> String {
    let mut xml = String::from("<xml>");
    for (key, value) in params {
        xml.push('<');
        xml.push_str(key);
        xml.push('>');
        xml.push_str(&escape(value.as_str()));
        xml.push_str("</");
        xml.push_str(key);
        xml.push('>');
    }
    xml.push_str("</xml>");
    xml
}

/// Decodes a flat `<xml>` document into a parameter set.
///
/// Text and CDATA content of the root's direct children is collected;
/// anything nested deeper is ignored. A body with no elements at all yields
/// an empty map, which callers treat as a malformed payload.
pub(crate) fn from_xml(body: &str) -> Result<ParamMap> {
    let mut reader = Reader::from_str(body);

    let mut params = ParamMap::new();
    let mut stack: Vec<String> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) if stack.len() == 2 => {
                params.insert(stack[1].clone(), text.unescape()?.trim().to_string());
            }
            Event::CData(cdata) if stack.len() == 2 => {
                let value = String::from_utf8_lossy(&cdata.into_inner()).trim().to_string();
                params.insert(stack[1].clone(), value);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), "wxtest".to_string());
        params.insert("mch_id".to_string(), "10000100".to_string());
        params.insert("out_trade_no".to_string(), "T001".to_string());

        let xml = to_xml(&params);
        assert_eq!(
            xml,
            "<xml><appid>wxtest</appid><mch_id>10000100</mch_id><out_trade_no>T001</out_trade_no></xml>"
        );
        assert_eq!(from_xml(&xml).unwrap(), params);
    }

    #[test]
    fn test_values_are_escaped() {
        let mut params = ParamMap::new();
        params.insert("body".to_string(), "coffee & cake <hot>".to_string());

        let xml = to_xml(&params);
        assert!(xml.contains("coffee &amp; cake &lt;hot&gt;"));
        assert_eq!(
            from_xml(&xml).unwrap().get("body").map(String::as_str),
            Some("coffee & cake <hot>")
        );
    }

    #[test]
    fn test_cdata_values() {
        let xml = "<xml><return_code><![CDATA[SUCCESS]]></return_code><return_msg><![CDATA[OK]]></return_msg></xml>";
        let params = from_xml(xml).unwrap();
        assert_eq!(params.get("return_code").map(String::as_str), Some("SUCCESS"));
        assert_eq!(params.get("return_msg").map(String::as_str), Some("OK"));
    }

    #[test]
    fn test_non_xml_body_yields_empty_map() {
        assert!(from_xml("plain text, no elements").unwrap().is_empty());
        assert!(from_xml("").unwrap().is_empty());
    }

    #[test]
    fn test_nested_content_ignored() {
        let xml = "<xml><outer><inner>deep</inner></outer><flat>kept</flat></xml>";
        let params = from_xml(xml).unwrap();
        assert_eq!(params.get("flat").map(String::as_str), Some("kept"));
        assert!(!params.contains_key("inner"));
    }
}
