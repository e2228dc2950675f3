//! Group lifecycle, membership and settings.

use gateway::{RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperation {
    AddParticipant,
    ApproveParticipantRequest,
    CreateGroup,
    DemoteParticipant,
    GetGroupInfo,
    GetGroupInfoFromLink,
    GetParticipantRequests,
    JoinGroupWithLink,
    LeaveGroup,
    PromoteParticipant,
    RejectParticipantRequest,
    RemoveParticipant,
    SetGroupAnnounce,
    SetGroupLocked,
    SetGroupName,
    SetGroupTopic,
}

impl OperationKind for GroupOperation {
    const RESOURCE: Resource = Resource::Group;
    const ALL: &'static [Self] = &[
        Self::AddParticipant,
        Self::ApproveParticipantRequest,
        Self::CreateGroup,
        Self::DemoteParticipant,
        Self::GetGroupInfo,
        Self::GetGroupInfoFromLink,
        Self::GetParticipantRequests,
        Self::JoinGroupWithLink,
        Self::LeaveGroup,
        Self::PromoteParticipant,
        Self::RejectParticipantRequest,
        Self::RemoveParticipant,
        Self::SetGroupAnnounce,
        Self::SetGroupLocked,
        Self::SetGroupName,
        Self::SetGroupTopic,
    ];
    const DEFAULT: Self = Self::CreateGroup;

    fn info(self) -> OperationInfo {
        match self {
            Self::AddParticipant => OperationInfo::new(
                "addParticipant",
                "Add Participant",
                Some("Add participant to group"),
                "Add participant to group",
            ),
            Self::ApproveParticipantRequest => OperationInfo::new(
                "approveParticipantRequest",
                "Approve Participant Request",
                Some("Approve participant request to join group"),
                "Approve participant request to join group",
            ),
            Self::CreateGroup => OperationInfo::new(
                "createGroup",
                "Create Group",
                Some("Create a new group"),
                "Create a new group",
            ),
            Self::DemoteParticipant => OperationInfo::new(
                "demoteParticipant",
                "Demote Participant",
                Some("Demote participant from admin"),
                "Demote participant from admin",
            ),
            Self::GetGroupInfo => OperationInfo::new(
                "getGroupInfo",
                "Get Group Info",
                Some("Get information about a group"),
                "Get group info",
            ),
            Self::GetGroupInfoFromLink => OperationInfo::new(
                "getGroupInfoFromLink",
                "Get Group Info From Link",
                Some("Get group information from invitation link"),
                "Get group info from link",
            ),
            Self::GetParticipantRequests => OperationInfo::new(
                "getParticipantRequests",
                "Get Participant Requests",
                Some("Get list of participant requests to join group"),
                "Get list of participant requests to join group",
            ),
            Self::JoinGroupWithLink => OperationInfo::new(
                "joinGroupWithLink",
                "Join Group With Link",
                Some("Join group using invite link"),
                "Join group using invite link",
            ),
            Self::LeaveGroup => OperationInfo::new(
                "leaveGroup",
                "Leave Group",
                Some("Leave a group"),
                "Leave a group",
            ),
            Self::PromoteParticipant => OperationInfo::new(
                "promoteParticipant",
                "Promote Participant",
                Some("Promote participant to admin"),
                "Promote participant to admin",
            ),
            Self::RejectParticipantRequest => OperationInfo::new(
                "rejectParticipantRequest",
                "Reject Participant Request",
                Some("Reject participant request to join group"),
                "Reject participant request to join group",
            ),
            Self::RemoveParticipant => OperationInfo::new(
                "removeParticipant",
                "Remove Participant",
                Some("Remove participant from group"),
                "Remove participant from group",
            ),
            Self::SetGroupAnnounce => OperationInfo::new(
                "setGroupAnnounce",
                "Set Group Announce Mode",
                Some("Enable/disable announce mode so only admins can send messages"),
                "Set group announce mode",
            ),
            Self::SetGroupLocked => OperationInfo::new(
                "setGroupLocked",
                "Set Group Locked Status",
                Some("Lock/unlock group so only admins can modify group info"),
                "Set group locked status",
            ),
            Self::SetGroupName => {
                OperationInfo::new("setGroupName", "Set Group Name", None, "Set group name")
            }
            Self::SetGroupTopic => OperationInfo::new(
                "setGroupTopic",
                "Set Group Topic",
                Some("Set or remove group topic/description"),
                "Set group topic",
            ),
        }
    }
}

/// Membership change applied to existing participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantChange {
    Add,
    Remove,
    Promote,
    Demote,
}

impl ParticipantChange {
    fn path(self) -> &'static str {
        match self {
            Self::Add => "/group/participants",
            Self::Remove => "/group/participants/remove",
            Self::Promote => "/group/participants/promote",
            Self::Demote => "/group/participants/demote",
        }
    }
}

/// Answer to pending join requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    Approve,
    Reject,
}

impl JoinDecision {
    fn path(self) -> &'static str {
        match self {
            Self::Approve => "/group/participant-requests/approve",
            Self::Reject => "/group/participant-requests/reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCommand {
    Create {
        title: String,
        participants: Option<Vec<String>>,
    },
    ChangeParticipants {
        change: ParticipantChange,
        group_id: String,
        participants: Vec<String>,
    },
    Leave {
        group_id: String,
    },
    JoinWithLink {
        link: String,
    },
    Info {
        group_id: String,
    },
    InfoFromLink {
        link: String,
    },
    ParticipantRequests {
        group_id: String,
    },
    DecideRequests {
        decision: JoinDecision,
        group_id: String,
        participants: Vec<String>,
    },
    SetName {
        group_id: String,
        name: String,
    },
    SetLocked {
        group_id: String,
        locked: bool,
    },
    SetAnnounce {
        group_id: String,
        announce: bool,
    },
    /// An empty topic removes it.
    SetTopic {
        group_id: String,
        topic: String,
    },
}

fn participants(params: &Parameters<'_>, name: &str) -> Result<Vec<String>, NodeError> {
    let list = params.list(name)?;
    if list.is_empty() {
        return Err(NodeError::invalid(name, "at least one participant is required"));
    }
    Ok(list)
}

impl ResourceCommand for GroupCommand {
    type Kind = GroupOperation;

    fn parse(kind: GroupOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        let change = |change: ParticipantChange| -> Result<Self, NodeError> {
            Ok(Self::ChangeParticipants {
                change,
                group_id: params.string("groupId")?,
                participants: participants(params, "participantPhone")?,
            })
        };
        let decide = |decision: JoinDecision| -> Result<Self, NodeError> {
            Ok(Self::DecideRequests {
                decision,
                group_id: params.string("groupId")?,
                participants: participants(params, "participants")?,
            })
        };

        match kind {
            GroupOperation::CreateGroup => Ok(Self::Create {
                title: params.string("groupTitle")?,
                participants: params.optional_list("groupParticipants")?,
            }),
            GroupOperation::AddParticipant => change(ParticipantChange::Add),
            GroupOperation::RemoveParticipant => change(ParticipantChange::Remove),
            GroupOperation::PromoteParticipant => change(ParticipantChange::Promote),
            GroupOperation::DemoteParticipant => change(ParticipantChange::Demote),
            GroupOperation::LeaveGroup => Ok(Self::Leave {
                group_id: params.string("groupId")?,
            }),
            GroupOperation::JoinGroupWithLink => Ok(Self::JoinWithLink {
                link: params.string("groupLink")?,
            }),
            GroupOperation::GetGroupInfo => Ok(Self::Info {
                group_id: params.string("groupId")?,
            }),
            GroupOperation::GetGroupInfoFromLink => Ok(Self::InfoFromLink {
                link: params.string("groupLink")?,
            }),
            GroupOperation::GetParticipantRequests => Ok(Self::ParticipantRequests {
                group_id: params.string("groupId")?,
            }),
            GroupOperation::ApproveParticipantRequest => decide(JoinDecision::Approve),
            GroupOperation::RejectParticipantRequest => decide(JoinDecision::Reject),
            GroupOperation::SetGroupName => Ok(Self::SetName {
                group_id: params.string("groupId")?,
                name: params.string("groupName")?,
            }),
            GroupOperation::SetGroupLocked => Ok(Self::SetLocked {
                group_id: params.string("groupId")?,
                locked: params.boolean("locked")?,
            }),
            GroupOperation::SetGroupAnnounce => Ok(Self::SetAnnounce {
                group_id: params.string("groupId")?,
                announce: params.boolean("announce")?,
            }),
            GroupOperation::SetGroupTopic => Ok(Self::SetTopic {
                group_id: params.string("groupId")?,
                topic: params.optional_string("topic")?.unwrap_or_default(),
            }),
        }
    }

    fn kind(&self) -> GroupOperation {
        match self {
            Self::Create { .. } => GroupOperation::CreateGroup,
            Self::ChangeParticipants { change, .. } => match change {
                ParticipantChange::Add => GroupOperation::AddParticipant,
                ParticipantChange::Remove => GroupOperation::RemoveParticipant,
                ParticipantChange::Promote => GroupOperation::PromoteParticipant,
                ParticipantChange::Demote => GroupOperation::DemoteParticipant,
            },
            Self::Leave { .. } => GroupOperation::LeaveGroup,
            Self::JoinWithLink { .. } => GroupOperation::JoinGroupWithLink,
            Self::Info { .. } => GroupOperation::GetGroupInfo,
            Self::InfoFromLink { .. } => GroupOperation::GetGroupInfoFromLink,
            Self::ParticipantRequests { .. } => GroupOperation::GetParticipantRequests,
            Self::DecideRequests { decision, .. } => match decision {
                JoinDecision::Approve => GroupOperation::ApproveParticipantRequest,
                JoinDecision::Reject => GroupOperation::RejectParticipantRequest,
            },
            Self::SetName { .. } => GroupOperation::SetGroupName,
            Self::SetLocked { .. } => GroupOperation::SetGroupLocked,
            Self::SetAnnounce { .. } => GroupOperation::SetGroupAnnounce,
            Self::SetTopic { .. } => GroupOperation::SetGroupTopic,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::Create {
                title,
                participants,
            } => api
                .post("/group")
                .body_field("title", title.as_str())
                .body_field_opt("participants", participants.clone()),
            Self::ChangeParticipants {
                change,
                group_id,
                participants,
            } => api
                .post(change.path())
                .body_field("group_id", group_id.as_str())
                .body_field("participants", participants.clone()),
            Self::Leave { group_id } => api
                .post("/group/leave")
                .body_field("group_id", group_id.as_str()),
            Self::JoinWithLink { link } => api
                .post("/group/join-with-link")
                .body_field("link", link.as_str()),
            Self::Info { group_id } => api
                .get("/group/info")
                .query_param("group_id", group_id.as_str()),
            Self::InfoFromLink { link } => api
                .get("/group/info-from-link")
                .query_param("link", link.as_str()),
            Self::ParticipantRequests { group_id } => api
                .get("/group/participant-requests")
                .query_param("group_id", group_id.as_str()),
            Self::DecideRequests {
                decision,
                group_id,
                participants,
            } => api
                .post(decision.path())
                .body_field("group_id", group_id.as_str())
                .body_field("participants", participants.clone()),
            Self::SetName { group_id, name } => api
                .post("/group/name")
                .body_field("group_id", group_id.as_str())
                .body_field("name", name.as_str()),
            Self::SetLocked { group_id, locked } => api
                .post("/group/locked")
                .body_field("group_id", group_id.as_str())
                .body_field("locked", *locked),
            Self::SetAnnounce { group_id, announce } => api
                .post("/group/announce")
                .body_field("group_id", group_id.as_str())
                .body_field("announce", *announce),
            Self::SetTopic { group_id, topic } => api
                .post("/group/topic")
                .body_field("group_id", group_id.as_str())
                .body_field("topic", topic.as_str()),
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::string("groupTitle", "Group Title")
            .required()
            .show(Resource::Group, &["createGroup"])
            .description("Title for the new group"),
        Property::string("groupName", "Group Name")
            .required()
            .show(Resource::Group, &["setGroupName"])
            .description("New name for the group"),
        Property::string("groupParticipants", "Participants")
            .show(Resource::Group, &["createGroup"])
            .placeholder("628123,628456")
            .description("Comma-separated phone numbers of participants to add to the new group"),
        Property::string("groupId", "Group ID")
            .required()
            .show(
                Resource::Group,
                &[
                    "addParticipant",
                    "removeParticipant",
                    "promoteParticipant",
                    "demoteParticipant",
                    "leaveGroup",
                    "getGroupInfo",
                    "getParticipantRequests",
                    "approveParticipantRequest",
                    "rejectParticipantRequest",
                    "setGroupName",
                    "setGroupLocked",
                    "setGroupAnnounce",
                    "setGroupTopic",
                ],
            )
            .description("ID of the group"),
        Property::string("participantPhone", "Participant Phone")
            .required()
            .show(
                Resource::Group,
                &[
                    "addParticipant",
                    "removeParticipant",
                    "promoteParticipant",
                    "demoteParticipant",
                ],
            )
            .description("Comma-separated phone numbers of the participant(s)"),
        Property::string("participants", "Participants")
            .required()
            .show(
                Resource::Group,
                &["approveParticipantRequest", "rejectParticipantRequest"],
            )
            .placeholder("6281234567890,6281234567891")
            .description("Comma-separated WhatsApp IDs of participants to approve/reject"),
        Property::string("groupLink", "Group Link")
            .required()
            .show(Resource::Group, &["joinGroupWithLink", "getGroupInfoFromLink"])
            .placeholder("https://chat.whatsapp.com/whatsappKeyJoinGroup")
            .description("WhatsApp group invite link"),
        Property::boolean("locked", "Locked", true)
            .required()
            .show(Resource::Group, &["setGroupLocked"])
            .description("Whether to lock the group (true) or unlock it (false)"),
        Property::boolean("announce", "Announce Mode", true)
            .required()
            .show(Resource::Group, &["setGroupAnnounce"])
            .description("Whether to enable announce mode (true) or disable it (false)"),
        Property::string("topic", "Topic")
            .show(Resource::Group, &["setGroupTopic"])
            .description("The group topic/description. Leave empty to remove the topic."),
    ]
}
