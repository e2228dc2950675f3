//! Newsletter (channel) subscriptions.

use gateway::{RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsletterOperation {
    UnfollowNewsletter,
}

impl OperationKind for NewsletterOperation {
    const RESOURCE: Resource = Resource::Newsletter;
    const ALL: &'static [Self] = &[Self::UnfollowNewsletter];
    const DEFAULT: Self = Self::UnfollowNewsletter;

    fn info(self) -> OperationInfo {
        match self {
            Self::UnfollowNewsletter => OperationInfo::new(
                "unfollowNewsletter",
                "Unfollow Newsletter",
                Some("Unfollow a newsletter"),
                "Unfollow a newsletter",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsletterCommand {
    Unfollow { newsletter_id: String },
}

impl ResourceCommand for NewsletterCommand {
    type Kind = NewsletterOperation;

    fn parse(kind: NewsletterOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        match kind {
            NewsletterOperation::UnfollowNewsletter => Ok(Self::Unfollow {
                newsletter_id: params.string("newsletterId")?,
            }),
        }
    }

    fn kind(&self) -> NewsletterOperation {
        match self {
            Self::Unfollow { .. } => NewsletterOperation::UnfollowNewsletter,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::Unfollow { newsletter_id } => api
                .post("/newsletter/unfollow")
                .body_field("newsletter_id", newsletter_id.as_str()),
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![Property::string("newsletterId", "Newsletter ID")
        .required()
        .show(Resource::Newsletter, &["unfollowNewsletter"])
        .placeholder("120363024512399999@newsletter")
        .description("The newsletter ID to unfollow")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::{body, build};
    use serde_json::json;

    #[test]
    fn unfollow_posts_newsletter_id() {
        let request = build::<NewsletterCommand>(
            "unfollowNewsletter",
            json!({ "newsletterId": "120363024512399999@newsletter" }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/newsletter/unfollow");
        assert_eq!(
            body(&request),
            json!({ "newsletter_id": "120363024512399999@newsletter" })
        );
    }

    #[test]
    fn newsletter_id_is_required() {
        let err = build::<NewsletterCommand>("unfollowNewsletter", json!({})).unwrap_err();
        assert!(matches!(err, NodeError::MissingParameter(ref p) if p == "newsletterId"));
    }
}
