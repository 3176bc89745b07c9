//! DNS-over-HTTPS JSON lookups.

use serde_json::Value;

use crate::config::DNS_TYPE_A;

/// Queries a DoH JSON endpoint for the A record of `domain`.
///
/// Sends `GET <endpoint>?type=1&name=<domain>` and expects
/// `{"Status": 0, "Answer": [{"type": 1, "data": "<ip>"}]}`.
///
/// # Returns
///
/// The `data` of the first answer with `type == 1`. `None` on network errors,
/// non-2xx responses, unparseable bodies, a missing or non-zero `Status`, or
/// when no answer is an A record.
pub async fn doh_lookup(client: &reqwest::Client, endpoint: &str, domain: &str) -> Option<String> {
    let type_param = DNS_TYPE_A.to_string();
    let response = match client
        .get(endpoint)
        .query(&[("type", type_param.as_str()), ("name", domain)])
        .header("Accept", "application/dns-json")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log::warn!("DoH request for {domain} failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        log::warn!("DoH request for {domain} returned {}", response.status());
        return None;
    }

    let body: Value = match response.text().await.map(|text| serde_json::from_str(&text)) {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            log::warn!("DoH response for {domain} is not JSON: {e}");
            return None;
        }
        Err(e) => {
            log::warn!("Failed to read DoH response for {domain}: {e}");
            return None;
        }
    };

    first_a_record(&body)
}

/// Extracts the first A record from a DoH JSON body.
fn first_a_record(body: &Value) -> Option<String> {
    let status = body.get("Status")?.as_i64()?;
    if status != 0 {
        log::debug!("DoH status {status}, treating as no answer");
        return None;
    }
    body.get("Answer")?
        .as_array()?
        .iter()
        .find(|answer| answer["type"].as_u64() == Some(u64::from(DNS_TYPE_A)))
        .and_then(|answer| answer["data"].as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_a_record_skips_cnames() {
        let body = json!({
            "Status": 0,
            "Answer": [
                {"name": "www.example.com.", "type": 5, "data": "example.com."},
                {"name": "example.com.", "type": 1, "data": "93.184.216.34"},
                {"name": "example.com.", "type": 1, "data": "93.184.216.35"},
            ]
        });
        assert_eq!(first_a_record(&body), Some("93.184.216.34".to_string()));
    }

    #[test]
    fn test_first_a_record_nonzero_status() {
        let body = json!({"Status": 3, "Answer": [{"type": 1, "data": "1.2.3.4"}]});
        assert_eq!(first_a_record(&body), None);
    }

    #[test]
    fn test_first_a_record_missing_status() {
        let body = json!({"Answer": [{"type": 1, "data": "1.2.3.4"}]});
        assert_eq!(first_a_record(&body), None);
    }

    #[test]
    fn test_first_a_record_no_matching_answer() {
        assert_eq!(first_a_record(&json!({"Status": 0})), None);
        let body = json!({"Status": 0, "Answer": [{"type": 28, "data": "::1"}]});
        assert_eq!(first_a_record(&body), None);
    }
}
