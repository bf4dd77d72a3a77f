use offers_types::OffersError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no unused referral code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("bonus credits for code {code} are not an integer: {value:?}")]
    CorruptBonus { code: String, value: String },

    #[error("storage error: {0}")]
    Storage(#[from] offers_store::StoreError),
}

impl From<LedgerError> for OffersError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Storage(inner) => OffersError::Storage(inner.to_string()),
            other => OffersError::Other(other.to_string()),
        }
    }
}
