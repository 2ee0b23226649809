use std::fmt;

/// Which `toyyibPay` host a call goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// `https://toyyibpay.com`
    #[default]
    Production,
    /// `https://dev.toyyibpay.com` (sandbox)
    Development,
}

impl Environment {
    /// Map the `dev` switch of an options bag to an environment.
    #[must_use]
    pub fn from_dev(dev: bool) -> Self {
        if dev {
            Self::Development
        } else {
            Self::Production
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Production => "production",
            Self::Development => "development",
        })
    }
}

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One remote operation exposed by the client.
///
/// `GetUserStatus` and `GetAllUserInfo` share the `/getUserStatus` endpoint
/// and differ only in the fields they send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operation {
    GetBank,
    GetBankFpx,
    GetPackage,
    CreateUser,
    GetUserStatus,
    GetAllUserInfo,
}

impl Operation {
    /// Endpoint name appended to `<base>/index.php/api/`.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::GetBank => "getBank",
            Self::GetBankFpx => "getBankFPX",
            Self::GetPackage => "getPackage",
            Self::CreateUser => "createAccount",
            Self::GetUserStatus | Self::GetAllUserInfo => "getUserStatus",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetBank | Self::GetBankFpx | Self::GetPackage => Method::Get,
            Self::CreateUser | Self::GetUserStatus | Self::GetAllUserInfo => Method::Post,
        }
    }

    /// Human-readable action used in failure messages ("Unable to <action>").
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::GetBank => "get bank list",
            Self::GetBankFpx => "get bank fpx list",
            Self::GetPackage => "get package list",
            Self::CreateUser => "create user",
            Self::GetUserStatus => "get user status",
            Self::GetAllUserInfo => "get all user info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn environment_from_dev_flag() {
        assert_eq!(Environment::from_dev(true), Environment::Development);
        assert_eq!(Environment::from_dev(false), Environment::Production);
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn list_endpoints_are_get() {
        for op in [Operation::GetBank, Operation::GetBankFpx, Operation::GetPackage] {
            assert_eq!(op.method(), Method::Get, "{op:?}");
        }
    }

    #[test]
    fn account_endpoints_are_post() {
        for op in [
            Operation::CreateUser,
            Operation::GetUserStatus,
            Operation::GetAllUserInfo,
        ] {
            assert_eq!(op.method(), Method::Post, "{op:?}");
        }
    }

    #[test]
    fn status_lookups_share_endpoint_but_not_action() {
        assert_eq!(
            Operation::GetUserStatus.endpoint(),
            Operation::GetAllUserInfo.endpoint()
        );
        assert_ne!(
            Operation::GetUserStatus.action(),
            Operation::GetAllUserInfo.action()
        );
    }

    #[test]
    fn display_is_action() {
        assert_eq!(Operation::GetBankFpx.to_string(), "get bank fpx list");
        assert_eq!(Operation::CreateUser.to_string(), "create user");
    }
}
