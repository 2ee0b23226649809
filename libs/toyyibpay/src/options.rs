//! Per-call option bags.
//!
//! Every string field defaults to `""` and every flag to `false`, so a bag
//! deserialized from a partial mapping (or built with `..Default::default()`)
//! always produces a request body with every key present. Values are
//! forwarded unvalidated.
//!
//! The `dev` switch selects the sandbox host and is never sent to the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operation::Environment;

/// Options for the plain listing calls (`get_bank`, `get_package`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListOptions {
    pub dev: bool,
}

impl ListOptions {
    /// Shorthand for `ListOptions { dev: true }`.
    #[must_use]
    pub fn dev() -> Self {
        Self { dev: true }
    }
}

/// Options for `get_bank_fpx`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankFpxOptions {
    pub dev: bool,
    /// Annotate each bank with `STATUS` and `IS_ONLINE`.
    pub with_status: bool,
}

/// Options for `create_user` (enterprise accounts only).
///
/// `Debug` redacts `password` and `following`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserOptions {
    #[serde(skip_serializing)]
    pub dev: bool,
    pub fullname: String,
    /// Login name for the new account.
    pub username: String,
    /// Email or any unique user id; does not have to be an email address.
    pub email: String,
    pub password: String,
    pub phone: String,
    /// Bank id as returned by `get_bank`.
    pub bank: String,
    pub account_no: String,
    pub account_holder_name: String,
    /// Company, business or organisation registration number.
    pub registration_no: String,
    /// Package id as returned by `get_package`.
    pub package: String,
    /// Secret key of the enterprise account the user is created under.
    pub following: String,
}

impl fmt::Debug for CreateUserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserOptions")
            .field("dev", &self.dev)
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("phone", &self.phone)
            .field("bank", &self.bank)
            .field("account_no", &self.account_no)
            .field("account_holder_name", &self.account_holder_name)
            .field("registration_no", &self.registration_no)
            .field("package", &self.package)
            .field("following", &"[REDACTED]")
            .finish()
    }
}

/// Options for `get_user_status`: look one user up by username.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStatusOptions {
    #[serde(skip_serializing)]
    pub dev: bool,
    pub username: String,
    pub enterprise_user_secret_key: String,
}

impl fmt::Debug for UserStatusOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserStatusOptions")
            .field("dev", &self.dev)
            .field("username", &self.username)
            .field("enterprise_user_secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Options for `get_all_user_info`: list every user under a partner account.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllUserInfoOptions {
    #[serde(skip_serializing)]
    pub dev: bool,
    pub user_secret_key: String,
    /// `"OEM"` or `"ENTERPRISE"`; sent as given.
    pub partner_type: String,
}

impl fmt::Debug for AllUserInfoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllUserInfoOptions")
            .field("dev", &self.dev)
            .field("user_secret_key", &"[REDACTED]")
            .field("partner_type", &self.partner_type)
            .finish()
    }
}

/// Anything carrying the `dev` switch.
pub trait EnvironmentOption {
    fn environment(&self) -> Environment;
}

macro_rules! impl_environment_option {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl EnvironmentOption for $ty {
                fn environment(&self) -> Environment {
                    Environment::from_dev(self.dev)
                }
            }
        )+
    };
}

impl_environment_option!(
    ListOptions,
    BankFpxOptions,
    CreateUserOptions,
    UserStatusOptions,
    AllUserInfoOptions,
);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_user_body_has_every_key() {
        let body = serde_json::to_value(CreateUserOptions {
            dev: true,
            username: "ali".into(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "fullname": "",
                "username": "ali",
                "email": "",
                "password": "",
                "phone": "",
                "bank": "",
                "accountNo": "",
                "accountHolderName": "",
                "registrationNo": "",
                "package": "",
                "following": ""
            })
        );
    }

    #[test]
    fn partial_bag_deserializes_with_defaults() {
        let opts: CreateUserOptions =
            serde_json::from_value(json!({"dev": true, "accountNo": "1234"})).unwrap();
        assert!(opts.dev);
        assert_eq!(opts.account_no, "1234");
        assert_eq!(opts.email, "");
        assert_eq!(opts.following, "");
    }

    #[test]
    fn empty_bags_default() {
        let fpx: BankFpxOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(fpx, BankFpxOptions::default());
        assert!(!fpx.with_status);

        let fpx: BankFpxOptions =
            serde_json::from_value(json!({"dev": false, "withStatus": true})).unwrap();
        assert!(fpx.with_status);
    }

    #[test]
    fn status_lookup_bodies() {
        let body = serde_json::to_value(UserStatusOptions {
            username: "ali".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"username": "ali", "enterpriseUserSecretKey": ""}));

        let body = serde_json::to_value(AllUserInfoOptions {
            dev: true,
            partner_type: "OEM".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"userSecretKey": "", "partnerType": "OEM"}));
    }

    #[test]
    fn debug_redacts_secrets() {
        let opts = CreateUserOptions {
            password: "hunter2".into(),
            following: "ent-secret".into(),
            ..Default::default()
        };
        let rendered = format!("{opts:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("ent-secret"));

        let opts = UserStatusOptions {
            enterprise_user_secret_key: "ent-secret".into(),
            ..Default::default()
        };
        assert!(!format!("{opts:?}").contains("ent-secret"));

        let opts = AllUserInfoOptions {
            user_secret_key: "usr-secret".into(),
            ..Default::default()
        };
        assert!(!format!("{opts:?}").contains("usr-secret"));
    }

    #[test]
    fn dev_switch_selects_environment() {
        assert_eq!(ListOptions::dev().environment(), Environment::Development);
        assert_eq!(
            BankFpxOptions::default().environment(),
            Environment::Production
        );
    }
}
