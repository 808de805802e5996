//! Business settings used to assemble push-payment payloads.

use chrono::FixedOffset;

/// Paybill identity and payload constants, validated once at startup.
#[derive(Clone)]
pub struct BusinessSettings {
    /// Paybill / till short code
    pub short_code: String,
    /// Pass key issued with the short code
    pub pass_key: String,
    /// Where the gateway posts the asynchronous result
    pub callback_url: String,
    pub account_reference: String,
    pub transaction_desc: String,
    /// Offset the gateway expects timestamps in
    pub utc_offset: FixedOffset,
}

impl std::fmt::Debug for BusinessSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessSettings")
            .field("short_code", &self.short_code)
            .field("pass_key", &"***")
            .field("callback_url", &self.callback_url)
            .field("account_reference", &self.account_reference)
            .field("transaction_desc", &self.transaction_desc)
            .field("utc_offset", &self.utc_offset)
            .finish()
    }
}
