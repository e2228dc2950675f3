//! Contact lookups and the account's own profile.

use gateway::{BinaryPart, RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    CheckContact,
    GetAvatar,
    GetPrivacySettings,
    GetUserInfo,
    SetAvatar,
}

impl OperationKind for UserOperation {
    const RESOURCE: Resource = Resource::User;
    const ALL: &'static [Self] = &[
        Self::CheckContact,
        Self::GetAvatar,
        Self::GetPrivacySettings,
        Self::GetUserInfo,
        Self::SetAvatar,
    ];
    const DEFAULT: Self = Self::GetUserInfo;

    fn info(self) -> OperationInfo {
        match self {
            Self::CheckContact => OperationInfo::new(
                "checkContact",
                "Check Contact",
                Some("Check if contact is on WhatsApp"),
                "Check if contact is on whats app",
            ),
            Self::GetAvatar => OperationInfo::new(
                "getAvatar",
                "Get Avatar",
                Some("Get user avatar"),
                "Get user avatar",
            ),
            Self::GetPrivacySettings => OperationInfo::new(
                "getPrivacySettings",
                "Get Privacy Settings",
                None,
                "Get privacy settings",
            ),
            Self::GetUserInfo => OperationInfo::new(
                "getUserInfo",
                "Get User Info",
                Some("Get user information"),
                "Get user information",
            ),
            Self::SetAvatar => OperationInfo::new(
                "setAvatar",
                "Set Avatar",
                Some("Set user avatar"),
                "Set user avatar",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    CheckContact { phone: String },
    /// `None` targets the account itself.
    GetAvatar { phone: Option<String> },
    GetPrivacySettings,
    GetUserInfo { phone: Option<String> },
    SetAvatar { avatar: BinaryPart },
}

impl ResourceCommand for UserCommand {
    type Kind = UserOperation;

    fn parse(kind: UserOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        Ok(match kind {
            UserOperation::CheckContact => Self::CheckContact {
                phone: params
                    .optional_string("userPhone")?
                    .ok_or_else(|| NodeError::MissingParameter("userPhone".to_owned()))?,
            },
            UserOperation::GetAvatar => Self::GetAvatar {
                phone: params.optional_string("userPhone")?,
            },
            UserOperation::GetPrivacySettings => Self::GetPrivacySettings,
            UserOperation::GetUserInfo => Self::GetUserInfo {
                phone: params.optional_string("userPhone")?,
            },
            UserOperation::SetAvatar => Self::SetAvatar {
                avatar: params.binary("avatarFile")?,
            },
        })
    }

    fn kind(&self) -> UserOperation {
        match self {
            Self::CheckContact { .. } => UserOperation::CheckContact,
            Self::GetAvatar { .. } => UserOperation::GetAvatar,
            Self::GetPrivacySettings => UserOperation::GetPrivacySettings,
            Self::GetUserInfo { .. } => UserOperation::GetUserInfo,
            Self::SetAvatar { .. } => UserOperation::SetAvatar,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::CheckContact { phone } => api
                .get("/user/check")
                .query_param("phone", phone.as_str()),
            Self::GetAvatar { phone } => api
                .get("/user/avatar")
                .query_param_opt("phone", phone.as_deref()),
            Self::GetPrivacySettings => api.get("/user/my/privacy"),
            Self::GetUserInfo { phone } => api
                .get("/user/info")
                .query_param_opt("phone", phone.as_deref()),
            Self::SetAvatar { avatar } => api.post("/user/avatar").form_file("avatar", avatar.clone()),
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::string("userPhone", "User Phone")
            .show(Resource::User, &["getUserInfo", "getAvatar", "checkContact"])
            .description("Phone number to get info for (leave empty for own info)"),
        Property::string("avatarFile", "Avatar File Property")
            .required()
            .default_value("data")
            .show(Resource::User, &["setAvatar"])
            .description("Name of the binary property containing the avatar image file"),
    ]
}
