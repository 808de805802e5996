//! Push-payment (STK push) request body.

use serde::Serialize;

use super::{Amount, Donation, Password, PhoneNumber, Timestamp};
use crate::settings::BusinessSettings;

/// Transaction type sent with every push payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    CustomerPayBillOnline,
}

/// Body of `POST /mpesa/stkpush/v1/processrequest`.
///
/// The payer is both `PartyA` and `PhoneNumber`; the paybill short code is
/// both `BusinessShortCode` and `PartyB`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PushPaymentPayload {
    pub business_short_code: String,
    pub password: Password,
    pub timestamp: Timestamp,
    pub transaction_type: TransactionType,
    pub amount: Amount,
    pub party_a: PhoneNumber,
    pub party_b: String,
    pub phone_number: PhoneNumber,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    pub account_reference: String,
    pub transaction_desc: String,
}

impl PushPaymentPayload {
    /// Assembles the payload for one donation at `timestamp`.
    pub fn new(settings: &BusinessSettings, donation: &Donation, timestamp: Timestamp) -> Self {
        let password = Password::derive(&settings.short_code, &settings.pass_key, &timestamp);

        Self {
            business_short_code: settings.short_code.clone(),
            password,
            timestamp,
            transaction_type: TransactionType::CustomerPayBillOnline,
            amount: donation.amount.clone(),
            party_a: donation.phone.clone(),
            party_b: settings.short_code.clone(),
            phone_number: donation.phone.clone(),
            callback_url: settings.callback_url.clone(),
            account_reference: settings.account_reference.clone(),
            transaction_desc: settings.transaction_desc.clone(),
        }
    }
}
