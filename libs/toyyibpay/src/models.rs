//! Derived fields the client adds to gateway responses.
//!
//! Responses stay as `serde_json::Value`. Enrichment inserts keys into the
//! record objects it recognises and leaves everything else, including
//! bodies that are not a list of objects, exactly as received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker `toyyibPay` appends to the name of a bank that is currently down.
const OFFLINE_MARKER: &str = "(offline)";

pub const NAME_KEY: &str = "NAME";
pub const STATUS_KEY: &str = "STATUS";
pub const IS_ONLINE_KEY: &str = "IS_ONLINE";
pub const DESCRIPTION_KEY: &str = "description";

/// Availability derived from an FPX bank's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankStatus {
    Online,
    Offline,
}

impl BankStatus {
    /// Status implied by a bank name: offline iff it carries the
    /// `(Offline)` marker, in any letter case.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains(OFFLINE_MARKER) {
            Self::Offline
        } else {
            Self::Online
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }

    #[must_use]
    pub fn is_online(self) -> bool {
        self == Self::Online
    }

    /// Write `STATUS` and `IS_ONLINE` into a bank record.
    fn apply(self, bank: &mut Map<String, Value>) {
        bank.insert(STATUS_KEY.to_owned(), Value::from(self.as_str()));
        bank.insert(IS_ONLINE_KEY.to_owned(), Value::Bool(self.is_online()));
    }
}

/// Account status codes reported by `getUserStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Inactive,
    PendingApproval,
    Active,
}

impl AccountStatus {
    /// Decode a status code sent either as a string (`"2"`) or a number (`2`).
    #[must_use]
    pub fn from_code(code: &Value) -> Option<Self> {
        let code = match code {
            Value::String(s) => s.trim().parse::<u64>().ok()?,
            Value::Number(n) => n.as_u64()?,
            _ => return None,
        };
        match code {
            0 => Some(Self::Inactive),
            1 => Some(Self::PendingApproval),
            2 => Some(Self::Active),
            _ => None,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::PendingApproval => "New-Pending Approval",
            Self::Active => "Active",
        }
    }
}

/// Add `STATUS` and `IS_ONLINE` to every object in a bank list.
///
/// A record without a string `NAME` counts as online. Array entries that are
/// not objects are skipped. Returns the number of offline banks, or `None`
/// when `banks` is not an array and nothing was changed.
pub fn annotate_bank_status(banks: &mut Value) -> Option<usize> {
    let records = banks.as_array_mut()?;
    let mut offline = 0;
    for bank in records.iter_mut().filter_map(Value::as_object_mut) {
        let name = bank.get(NAME_KEY).and_then(Value::as_str).unwrap_or_default();
        let status = BankStatus::from_name(name);
        if !status.is_online() {
            offline += 1;
        }
        status.apply(bank);
    }
    Some(offline)
}

/// Describe the first record's `status`; later records are left untouched.
///
/// Unknown or missing codes leave the first record without a
/// `description`. Returns the status found, or `None` when there was nothing
/// to describe (not an array, empty, or a first entry that is not an object).
pub fn describe_first_status(records: &mut Value) -> Option<AccountStatus> {
    let first = records.as_array_mut()?.first_mut()?.as_object_mut()?;
    let status = first.get("status").and_then(AccountStatus::from_code);
    if let Some(status) = status {
        first.insert(DESCRIPTION_KEY.to_owned(), Value::from(status.description()));
    } else {
        first.remove(DESCRIPTION_KEY);
    }
    status
}
