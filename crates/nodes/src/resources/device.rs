//! Multi-device slot management under `/devices`.
//!
//! These operations address a slot by id in the path.  The credential's own
//! device id still goes out as the `X-Device-Id` header like on every call.

use gateway::{RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOperation {
    AddDevice,
    GetDevice,
    GetDeviceStatus,
    ListDevices,
    LoginDevice,
    LoginDeviceWithCode,
    LogoutDevice,
    ReconnectDevice,
    RemoveDevice,
}

impl OperationKind for DeviceOperation {
    const RESOURCE: Resource = Resource::Device;
    const ALL: &'static [Self] = &[
        Self::AddDevice,
        Self::GetDevice,
        Self::GetDeviceStatus,
        Self::ListDevices,
        Self::LoginDevice,
        Self::LoginDeviceWithCode,
        Self::LogoutDevice,
        Self::ReconnectDevice,
        Self::RemoveDevice,
    ];
    const DEFAULT: Self = Self::ListDevices;

    fn info(self) -> OperationInfo {
        match self {
            Self::AddDevice => OperationInfo::new(
                "addDevice",
                "Add Device",
                Some("Create a new device slot for multi-device management"),
                "Add a new device",
            ),
            Self::GetDevice => OperationInfo::new(
                "getDevice",
                "Get Device",
                Some("Get detailed information about a specific device"),
                "Get device info",
            ),
            Self::GetDeviceStatus => OperationInfo::new(
                "getDeviceStatus",
                "Get Device Status",
                Some("Get the current connection status of a specific device"),
                "Get device connection status",
            ),
            Self::ListDevices => OperationInfo::new(
                "listDevices",
                "List Devices",
                Some("Returns all registered devices with their connection status"),
                "List all devices",
            ),
            Self::LoginDevice => OperationInfo::new(
                "loginDevice",
                "Login Device",
                Some("Initiate QR code login for a specific device"),
                "Login device with QR code",
            ),
            Self::LoginDeviceWithCode => OperationInfo::new(
                "loginDeviceWithCode",
                "Login Device with Code",
                Some("Initiate pairing code login for a specific device"),
                "Login device with pairing code",
            ),
            Self::LogoutDevice => OperationInfo::new(
                "logoutDevice",
                "Logout Device",
                Some("Logout a specific device from WhatsApp and remove its session"),
                "Logout device",
            ),
            Self::ReconnectDevice => OperationInfo::new(
                "reconnectDevice",
                "Reconnect Device",
                Some("Reconnect a specific device to WhatsApp"),
                "Reconnect device",
            ),
            Self::RemoveDevice => OperationInfo::new(
                "removeDevice",
                "Remove Device",
                Some("Remove a device from the server (does not logout from WhatsApp)"),
                "Remove a device",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    List,
    /// `None` lets the gateway generate the id.
    Add { device_id: Option<String> },
    Get { device_id: String },
    Remove { device_id: String },
    Login { device_id: String },
    LoginWithCode { device_id: String, phone: String },
    Logout { device_id: String },
    Reconnect { device_id: String },
    Status { device_id: String },
}

impl ResourceCommand for DeviceCommand {
    type Kind = DeviceOperation;

    fn parse(kind: DeviceOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        let device_id = || params.path_segment("deviceId");

        Ok(match kind {
            DeviceOperation::ListDevices => Self::List,
            DeviceOperation::AddDevice => Self::Add {
                device_id: params.optional_string("customDeviceId")?,
            },
            DeviceOperation::GetDevice => Self::Get {
                device_id: device_id()?,
            },
            DeviceOperation::RemoveDevice => Self::Remove {
                device_id: device_id()?,
            },
            DeviceOperation::LoginDevice => Self::Login {
                device_id: device_id()?,
            },
            DeviceOperation::LoginDeviceWithCode => Self::LoginWithCode {
                device_id: device_id()?,
                phone: params.string("phone")?,
            },
            DeviceOperation::LogoutDevice => Self::Logout {
                device_id: device_id()?,
            },
            DeviceOperation::ReconnectDevice => Self::Reconnect {
                device_id: device_id()?,
            },
            DeviceOperation::GetDeviceStatus => Self::Status {
                device_id: device_id()?,
            },
        })
    }

    fn kind(&self) -> DeviceOperation {
        match self {
            Self::List => DeviceOperation::ListDevices,
            Self::Add { .. } => DeviceOperation::AddDevice,
            Self::Get { .. } => DeviceOperation::GetDevice,
            Self::Remove { .. } => DeviceOperation::RemoveDevice,
            Self::Login { .. } => DeviceOperation::LoginDevice,
            Self::LoginWithCode { .. } => DeviceOperation::LoginDeviceWithCode,
            Self::Logout { .. } => DeviceOperation::LogoutDevice,
            Self::Reconnect { .. } => DeviceOperation::ReconnectDevice,
            Self::Status { .. } => DeviceOperation::GetDeviceStatus,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::List => api.get("/devices"),
            Self::Add { device_id } => api
                .post("/devices")
                .empty_body()
                .body_field_opt("device_id", device_id.as_deref()),
            Self::Get { device_id } => RequestDescriptor::get(slot_url(api, device_id, &[])),
            Self::Remove { device_id } => RequestDescriptor::delete(slot_url(api, device_id, &[])),
            Self::Login { device_id } => RequestDescriptor::get(slot_url(api, device_id, &["login"])),
            Self::LoginWithCode { device_id, phone } => {
                RequestDescriptor::post(slot_url(api, device_id, &["login", "code"]))
                    .empty_body()
                    .query_param("phone", phone.as_str())
            }
            Self::Logout { device_id } => {
                RequestDescriptor::post(slot_url(api, device_id, &["logout"])).empty_body()
            }
            Self::Reconnect { device_id } => {
                RequestDescriptor::post(slot_url(api, device_id, &["reconnect"])).empty_body()
            }
            Self::Status { device_id } => RequestDescriptor::get(slot_url(api, device_id, &["status"])),
        }
    }
}

/// `/devices/{id}/{tail...}` with the id encoded as one segment.
fn slot_url(api: &RequestFactory, id: &str, tail: &[&str]) -> String {
    let mut segments = Vec::with_capacity(tail.len() + 2);
    segments.push("devices");
    segments.push(id);
    segments.extend_from_slice(tail);
    api.url_from_segments(&segments)
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::string("deviceId", "Device ID").required().show(
            Resource::Device,
            &[
                "getDevice",
                "removeDevice",
                "loginDevice",
                "loginDeviceWithCode",
                "logoutDevice",
                "reconnectDevice",
                "getDeviceStatus",
            ],
        ),
        Property::string("customDeviceId", "Custom Device ID")
            .show(Resource::Device, &["addDevice"])
            .description("Optional custom device ID. If not provided, one will be generated."),
        Property::string("phone", "Phone Number")
            .required()
            .show(Resource::Device, &["loginDeviceWithCode"])
            .placeholder("628912344551")
            .description("Phone number to pair with"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::{body, build, query};
    use gateway::Method;
    use serde_json::json;

    #[test]
    fn add_device_without_id_sends_empty_body() {
        let request = build::<DeviceCommand>("addDevice", json!({})).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://localhost:3000/devices");
        assert_eq!(body(&request), json!({}));

        let request = build::<DeviceCommand>("addDevice", json!({ "customDeviceId": "office" })).unwrap();
        assert_eq!(body(&request), json!({ "device_id": "office" }));
    }

    #[test]
    fn slot_operations_put_id_in_path() {
        for (operation, method, url) in [
            ("getDevice", Method::Get, "http://localhost:3000/devices/d%201"),
            ("removeDevice", Method::Delete, "http://localhost:3000/devices/d%201"),
            ("loginDevice", Method::Get, "http://localhost:3000/devices/d%201/login"),
            ("logoutDevice", Method::Post, "http://localhost:3000/devices/d%201/logout"),
            ("reconnectDevice", Method::Post, "http://localhost:3000/devices/d%201/reconnect"),
            ("getDeviceStatus", Method::Get, "http://localhost:3000/devices/d%201/status"),
        ] {
            let request = build::<DeviceCommand>(operation, json!({ "deviceId": "d 1" })).unwrap();
            assert_eq!(request.method, method, "{operation}");
            assert_eq!(request.url, url, "{operation}");
        }
    }

    #[test]
    fn login_with_code_posts_phone_as_query() {
        let request = build::<DeviceCommand>(
            "loginDeviceWithCode",
            json!({ "deviceId": "office", "phone": "628912344551" }),
        )
        .unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://localhost:3000/devices/office/login/code");
        assert_eq!(query(&request), json!({ "phone": "628912344551" }));
    }

    #[test]
    fn device_id_is_required_for_slot_operations() {
        let err = build::<DeviceCommand>("getDeviceStatus", json!({})).unwrap_err();
        assert!(matches!(err, NodeError::MissingParameter(ref p) if p == "deviceId"));
    }

    #[test]
    fn dot_segment_ids_cannot_change_the_endpoint() {
        for id in [".", ".."] {
            for operation in ["removeDevice", "getDevice", "logoutDevice"] {
                let err = build::<DeviceCommand>(operation, json!({ "deviceId": id })).unwrap_err();
                assert!(
                    matches!(err, NodeError::InvalidParameter { ref name, .. } if name == "deviceId"),
                    "{operation} {id}"
                );
            }
        }
    }
}
